// cdpnav: navigation that waits for the page to load.
//
// A navigation command on the DevTools protocol is acknowledged as soon as
// the browser starts loading. This crate arms an event barrier before issuing
// the command and waits on it afterwards, so `Page::navigate` and friends
// return once the navigated frame reports its `load` lifecycle milestone.

pub mod barrier;
pub mod history;
pub mod lifecycle;
pub mod listeners;
pub mod page;
pub mod target;

#[cfg(test)]
mod test_support;

/// Default deadline for a navigation, in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

pub use barrier::{EventSource, Release, Wait, expect_event};
pub use cdpnav_runtime::{Connection, Context, Error, Result};
pub use lifecycle::{LOAD, expect_lifecycle_event, expect_lifecycle_loaded, lifecycle_predicate};
pub use page::Page;
pub use target::{Target, execute};

pub mod protocol {
	pub use cdpnav_protocol::*;
}
