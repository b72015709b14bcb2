//! Frame-scoped lifecycle waits.
//!
//! A page session reports `Page.lifecycleEvent` for every frame it hosts,
//! iframes included, and a navigation can overlap another one. Matching on
//! the event name alone could resolve a wait on an unrelated frame's `load`,
//! so the predicate also pins the frame id, captured once when the barrier
//! is armed.

use cdpnav_protocol::{Event, FrameId};
use cdpnav_runtime::Context;
use tracing::debug;

use crate::Target;
use crate::barrier::{Release, Wait, expect_event};

/// Lifecycle milestone signalling the page finished loading.
pub const LOAD: &str = "load";

/// Matches `Page.lifecycleEvent` named `name` for `frame_id`.
pub fn lifecycle_predicate(frame_id: FrameId, name: impl Into<String>) -> impl Fn(&Event) -> bool + Send + Sync + 'static {
	let name = name.into();
	move |event: &Event| match event {
		Event::Lifecycle(e) => e.name == name && e.frame_id == frame_id,
		_ => false,
	}
}

/// Arms a barrier for lifecycle milestone `name` on the target's current frame.
pub fn expect_lifecycle_event(ctx: &Context, target: &Target, name: &str) -> (Wait, Release) {
	let frame_id = target.navigated_frame_id();
	if frame_id.is_empty() {
		debug!(name, "arming lifecycle wait without a known frame");
	} else {
		debug!(name, frame = %frame_id, "armed lifecycle wait");
	}
	expect_event(ctx, target, lifecycle_predicate(frame_id, name))
}

/// Arms a barrier for the current frame's `load` milestone.
pub fn expect_lifecycle_loaded(ctx: &Context, target: &Target) -> (Wait, Release) {
	expect_lifecycle_event(ctx, target, LOAD)
}
