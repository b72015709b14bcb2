//! Command parameter and return shapes.
//!
//! Each command is a serializable parameter struct implementing [`Command`],
//! which ties it to its wire method name and the type its acknowledgment
//! deserializes into. The acknowledgment only confirms the browser accepted
//! the command; the semantic effect (a finished page load, for instance) is
//! reported later through events.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::types::{ExceptionDetails, FrameId, FrameTree, LoaderId, NavigationEntry, RemoteObject, ScreenshotFormat, SessionId, TargetId, TargetInfo, Viewport};

/// A protocol request with a typed acknowledgment.
pub trait Command: Serialize + Send + Sync {
	/// Fully-qualified method name, e.g. `Page.navigate`.
	const METHOD: &'static str;

	/// Acknowledgment payload.
	type Returns: DeserializeOwned + Send;
}

/// Acknowledgment carrying no data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Empty {}

/// `Page.enable`
#[derive(Debug, Clone, Default, Serialize)]
pub struct PageEnable {}

impl Command for PageEnable {
	const METHOD: &'static str = "Page.enable";
	type Returns = Empty;
}

/// `Page.setLifecycleEventsEnabled`
#[derive(Debug, Clone, Serialize)]
pub struct SetLifecycleEventsEnabled {
	pub enabled: bool,
}

impl Command for SetLifecycleEventsEnabled {
	const METHOD: &'static str = "Page.setLifecycleEventsEnabled";
	type Returns = Empty;
}

/// `Page.getFrameTree`
#[derive(Debug, Clone, Default, Serialize)]
pub struct GetFrameTree {}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetFrameTreeReturns {
	pub frame_tree: FrameTree,
}

impl Command for GetFrameTree {
	const METHOD: &'static str = "Page.getFrameTree";
	type Returns = GetFrameTreeReturns;
}

/// `Page.navigate`
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Navigate {
	pub url: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub referrer: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub frame_id: Option<FrameId>,
}

impl Navigate {
	pub fn new(url: impl Into<String>) -> Self {
		Self {
			url: url.into(),
			..Default::default()
		}
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigateReturns {
	pub frame_id: FrameId,
	/// Absent for same-document navigations.
	#[serde(default)]
	pub loader_id: Option<LoaderId>,
	/// Set when the navigation failed outright (e.g. DNS error).
	#[serde(default)]
	pub error_text: Option<String>,
}

impl Command for Navigate {
	const METHOD: &'static str = "Page.navigate";
	type Returns = NavigateReturns;
}

/// `Page.reload`
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reload {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub ignore_cache: Option<bool>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub script_to_evaluate_on_load: Option<String>,
}

impl Command for Reload {
	const METHOD: &'static str = "Page.reload";
	type Returns = Empty;
}

/// `Page.navigateToHistoryEntry`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigateToHistoryEntry {
	pub entry_id: i64,
}

impl Command for NavigateToHistoryEntry {
	const METHOD: &'static str = "Page.navigateToHistoryEntry";
	type Returns = Empty;
}

/// `Page.getNavigationHistory`
#[derive(Debug, Clone, Default, Serialize)]
pub struct GetNavigationHistory {}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationHistory {
	pub current_index: i64,
	#[serde(default)]
	pub entries: Vec<NavigationEntry>,
}

impl Command for GetNavigationHistory {
	const METHOD: &'static str = "Page.getNavigationHistory";
	type Returns = NavigationHistory;
}

/// `Page.stopLoading`
#[derive(Debug, Clone, Default, Serialize)]
pub struct StopLoading {}

impl Command for StopLoading {
	const METHOD: &'static str = "Page.stopLoading";
	type Returns = Empty;
}

/// `Page.captureScreenshot`
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureScreenshot {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub format: Option<ScreenshotFormat>,
	/// Compression quality in `[0, 100]`, jpeg only.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub quality: Option<i64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub clip: Option<Viewport>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub from_surface: Option<bool>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub capture_beyond_viewport: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CaptureScreenshotReturns {
	/// Base64-encoded image data.
	pub data: String,
}

impl Command for CaptureScreenshot {
	const METHOD: &'static str = "Page.captureScreenshot";
	type Returns = CaptureScreenshotReturns;
}

/// `Runtime.evaluate`
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluate {
	pub expression: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub return_by_value: Option<bool>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub await_promise: Option<bool>,
}

impl Evaluate {
	/// Evaluates `expression` and returns its JSON value.
	pub fn by_value(expression: impl Into<String>) -> Self {
		Self {
			expression: expression.into(),
			return_by_value: Some(true),
			await_promise: None,
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateReturns {
	pub result: RemoteObject,
	#[serde(default)]
	pub exception_details: Option<ExceptionDetails>,
}

impl Command for Evaluate {
	const METHOD: &'static str = "Runtime.evaluate";
	type Returns = EvaluateReturns;
}

/// `Target.attachToTarget`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachToTarget {
	pub target_id: TargetId,
	/// Flattened sessions route messages by `sessionId` on the browser connection.
	pub flatten: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachToTargetReturns {
	pub session_id: SessionId,
}

impl Command for AttachToTarget {
	const METHOD: &'static str = "Target.attachToTarget";
	type Returns = AttachToTargetReturns;
}

/// `Target.getTargets`
#[derive(Debug, Clone, Default, Serialize)]
pub struct GetTargets {}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetTargetsReturns {
	pub target_infos: Vec<TargetInfo>,
}

impl Command for GetTargets {
	const METHOD: &'static str = "Target.getTargets";
	type Returns = GetTargetsReturns;
}
