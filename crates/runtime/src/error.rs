//! Error types shared by the connection, barrier, and navigation layers.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
	/// The browser rejected a command.
	#[error("Protocol error ({code}): {message}")]
	Protocol { code: i64, message: String },

	#[error("Transport error: {0}")]
	Transport(String),

	/// The connection went away before a response arrived.
	#[error("Connection closed")]
	ChannelClosed,

	#[error("Target closed: {0}")]
	TargetClosed(String),

	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	/// `Page.navigate` was acknowledged with an `errorText`.
	#[error("Navigation failed: {0}")]
	NavigationFailed(String),

	/// Back/forward requested past either end of the session history.
	#[error("invalid navigation entry: current index {current_index} of {len} entries")]
	InvalidNavigationEntry { current_index: i64, len: usize },

	#[error("Evaluation failed: {0}")]
	Evaluation(String),

	#[error("Decode error: {0}")]
	Decode(String),

	/// The governing context was cancelled.
	#[error("context canceled")]
	Cancelled,

	/// The governing context's deadline passed.
	#[error("context deadline exceeded")]
	DeadlineExceeded,
}

impl Error {
	/// True when the error came from the governing context rather than the browser.
	pub fn is_cancellation(&self) -> bool {
		matches!(self, Error::Cancelled | Error::DeadlineExceeded)
	}

	pub fn is_timeout(&self) -> bool {
		matches!(self, Error::DeadlineExceeded)
	}
}
