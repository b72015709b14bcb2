use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the `cdpnav` binary.
#[derive(Debug, Error)]
pub enum CliError {
	#[error(transparent)]
	Cdp(#[from] cdpnav::Error),

	#[error("Invalid endpoint '{0}': expected host:port, http://host:port or ws://...")]
	InvalidEndpoint(String),

	#[error("Endpoint discovery failed at {url}: {message}")]
	Discovery { url: String, message: String },

	#[error("No page target found at {0}")]
	NoPageTarget(String),

	#[error("Failed to write {path}: {source}")]
	Write {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CliError>;

impl CliError {
	/// Exit code for this error: 2 for timeouts, 1 otherwise.
	pub fn exit_code(&self) -> i32 {
		match self {
			Self::Cdp(e) if e.is_timeout() => 2,
			_ => 1,
		}
	}
}
