//! Identifiers and data records shared by commands and events.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Unique identifier of a frame within a page.
///
/// Opaque: only compared for equality.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrameId(pub String);

impl FrameId {
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// An empty id never matches a frame the browser reports.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl fmt::Display for FrameId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for FrameId {
	fn from(id: &str) -> Self {
		Self(id.to_string())
	}
}

impl From<String> for FrameId {
	fn from(id: String) -> Self {
		Self(id)
	}
}

/// Unique identifier of a loader (one per document load).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoaderId(pub String);

/// Identifier of a debuggable target (page, worker, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetId(pub String);

impl From<&str> for TargetId {
	fn from(id: &str) -> Self {
		Self(id.to_string())
	}
}

impl fmt::Display for TargetId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Identifier of a flattened session attached to a target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl From<&str> for SessionId {
	fn from(id: &str) -> Self {
		Self(id.to_string())
	}
}

/// A frame as described by `Page.frameNavigated` and `Page.getFrameTree`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
	pub id: FrameId,
	/// Absent for the main frame.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub parent_id: Option<FrameId>,
	#[serde(default)]
	pub loader_id: LoaderId,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	pub url: String,
}

impl Frame {
	pub fn is_main(&self) -> bool {
		self.parent_id.is_none()
	}
}

/// Recursive frame hierarchy rooted at the main frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameTree {
	pub frame: Frame,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub child_frames: Vec<FrameTree>,
}

/// One entry of the page's session history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationEntry {
	pub id: i64,
	pub url: String,
	#[serde(rename = "userTypedURL", default)]
	pub user_typed_url: String,
	#[serde(default)]
	pub title: String,
	#[serde(default)]
	pub transition_type: TransitionType,
}

/// How a navigation was initiated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionType {
	Link,
	Typed,
	AddressBar,
	AutoBookmark,
	AutoSubframe,
	ManualSubframe,
	Generated,
	AutoToplevel,
	FormSubmit,
	Reload,
	Keyword,
	KeywordGenerated,
	#[default]
	#[serde(other)]
	Other,
}

/// Image encoding for `Page.captureScreenshot`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenshotFormat {
	#[default]
	Png,
	Jpeg,
	Webp,
}

/// Capture region in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
	pub x: f64,
	pub y: f64,
	pub width: f64,
	pub height: f64,
	pub scale: f64,
}

/// Mirror of a JavaScript value returned by `Runtime.evaluate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteObject {
	#[serde(rename = "type")]
	pub kind: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub subtype: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub value: Option<Value>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
}

/// Details of an exception thrown during evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionDetails {
	pub text: String,
	#[serde(default)]
	pub line_number: i64,
	#[serde(default)]
	pub column_number: i64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub exception: Option<RemoteObject>,
}

impl ExceptionDetails {
	/// Prefers the thrown value's description over the generic `text`.
	pub fn message(&self) -> &str {
		self.exception
			.as_ref()
			.and_then(|e| e.description.as_deref())
			.unwrap_or(&self.text)
	}
}

/// Entry of the `/json/list` discovery endpoint, or of `Target.getTargets`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetInfo {
	#[serde(alias = "targetId")]
	pub id: TargetId,
	#[serde(rename = "type")]
	pub kind: String,
	#[serde(default)]
	pub title: String,
	#[serde(default)]
	pub url: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub web_socket_debugger_url: Option<String>,
}

impl TargetInfo {
	pub fn is_page(&self) -> bool {
		self.kind == "page"
	}
}
