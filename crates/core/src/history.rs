//! Back/forward resolution against the session history.

use cdpnav_protocol::{NavigationEntry, NavigationHistory};
use cdpnav_runtime::{Error, Result};

/// Entry one step back from the current one.
///
/// Fails unless `0 < current_index <= entries.len() - 1`.
pub fn previous_entry(history: &NavigationHistory) -> Result<&NavigationEntry> {
	let cur = history.current_index;
	let last = history.entries.len() as i64 - 1;
	if cur <= 0 || cur > last {
		return Err(invalid(history));
	}
	Ok(&history.entries[(cur - 1) as usize])
}

/// Entry one step forward from the current one.
///
/// Fails unless `0 <= current_index < entries.len() - 1`.
pub fn next_entry(history: &NavigationHistory) -> Result<&NavigationEntry> {
	let cur = history.current_index;
	let last = history.entries.len() as i64 - 1;
	if cur < 0 || cur >= last {
		return Err(invalid(history));
	}
	Ok(&history.entries[(cur + 1) as usize])
}

fn invalid(history: &NavigationHistory) -> Error {
	Error::InvalidNavigationEntry {
		current_index: history.current_index,
		len: history.entries.len(),
	}
}
