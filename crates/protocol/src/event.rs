//! Decoded protocol events.
//!
//! Only the page events the navigation layer reacts to are typed; everything
//! else is carried through as [`Event::Other`] so listeners still see it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{Frame, FrameId, LoaderId};

/// `Page.lifecycleEvent`: a frame reached a named milestone (`init`,
/// `DOMContentLoaded`, `load`, `networkIdle`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifecycleEvent {
	pub frame_id: FrameId,
	#[serde(default)]
	pub loader_id: LoaderId,
	pub name: String,
	#[serde(default)]
	pub timestamp: f64,
}

/// `Page.frameNavigated`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameNavigated {
	pub frame: Frame,
}

/// Payload of `Page.loadEventFired` and `Page.domContentEventFired`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timestamped {
	#[serde(default)]
	pub timestamp: f64,
}

/// An event received from the browser.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
	Lifecycle(LifecycleEvent),
	FrameNavigated(FrameNavigated),
	LoadEventFired(Timestamped),
	DomContentEventFired(Timestamped),
	/// Any event without a typed representation, or one whose params did not
	/// match the expected shape.
	Other { method: String, params: Value },
}

impl Event {
	pub const LIFECYCLE: &'static str = "Page.lifecycleEvent";
	pub const FRAME_NAVIGATED: &'static str = "Page.frameNavigated";
	pub const LOAD_EVENT_FIRED: &'static str = "Page.loadEventFired";
	pub const DOM_CONTENT_EVENT_FIRED: &'static str = "Page.domContentEventFired";

	/// Decodes a raw `{method, params}` pair.
	pub fn decode(method: &str, params: Value) -> Self {
		let typed = match method {
			Self::LIFECYCLE => serde_json::from_value(params.clone()).map(Event::Lifecycle).ok(),
			Self::FRAME_NAVIGATED => serde_json::from_value(params.clone()).map(Event::FrameNavigated).ok(),
			Self::LOAD_EVENT_FIRED => serde_json::from_value(params.clone()).map(Event::LoadEventFired).ok(),
			Self::DOM_CONTENT_EVENT_FIRED => serde_json::from_value(params.clone()).map(Event::DomContentEventFired).ok(),
			_ => None,
		};

		typed.unwrap_or_else(|| Event::Other {
			method: method.to_string(),
			params,
		})
	}

	pub fn method(&self) -> &str {
		match self {
			Event::Lifecycle(_) => Self::LIFECYCLE,
			Event::FrameNavigated(_) => Self::FRAME_NAVIGATED,
			Event::LoadEventFired(_) => Self::LOAD_EVENT_FIRED,
			Event::DomContentEventFired(_) => Self::DOM_CONTENT_EVENT_FIRED,
			Event::Other { method, .. } => method,
		}
	}

	pub fn as_lifecycle(&self) -> Option<&LifecycleEvent> {
		match self {
			Event::Lifecycle(e) => Some(e),
			_ => None,
		}
	}
}
