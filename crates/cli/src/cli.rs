use std::path::PathBuf;

use cdpnav_protocol::ScreenshotFormat;
use clap::{Parser, Subcommand, ValueEnum};

use crate::discovery::Endpoint;

#[derive(Parser, Debug)]
#[command(name = "cdpnav")]
#[command(about = "Navigate a browser over its remote-debugging endpoint and wait for pages to load")]
#[command(version)]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	/// Remote-debugging endpoint: host:port, http://host:port, or a ws:// browser URL
	#[arg(long, short, global = true, env = "CDPNAV_ENDPOINT", default_value = "127.0.0.1:9222")]
	pub endpoint: Endpoint,

	/// Deadline for the whole command in milliseconds (0 disables it)
	#[arg(long, global = true, env = "CDPNAV_TIMEOUT_MS", default_value_t = cdpnav::DEFAULT_TIMEOUT_MS)]
	pub timeout_ms: u64,

	/// Page target to attach to (defaults to the first page)
	#[arg(long, short, global = true, value_name = "TARGET_ID")]
	pub target: Option<String>,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
	/// List page targets on the endpoint
	Targets,

	#[command(flatten)]
	Page(PageCommand),
}

/// Commands run against an attached page target.
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum PageCommand {
	/// Navigate to URL and wait for the page to load
	#[command(alias = "nav")]
	Navigate { url: String },

	/// Reload the page and wait for it to load
	Reload {
		/// Reload bypassing the cache
		#[arg(long)]
		ignore_cache: bool,
	},

	/// Go back one history entry
	Back,

	/// Go forward one history entry
	Forward,

	/// Print the session history, marking the current entry
	History,

	/// Stop loading the page
	Stop,

	/// Capture the viewport to a file
	#[command(alias = "ss")]
	Screenshot {
		/// Output file path
		#[arg(short, long, default_value = "screenshot.png")]
		output: PathBuf,
		/// Image format
		#[arg(long, value_enum, default_value = "png")]
		format: ImageFormat,
		/// Compression quality (jpeg and webp only)
		#[arg(long, value_parser = clap::value_parser!(i64).range(0..=100))]
		quality: Option<i64>,
	},

	/// Print the document title
	Title,

	/// Print the document location
	Location,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Default)]
pub enum ImageFormat {
	#[default]
	Png,
	Jpeg,
	Webp,
}

impl From<ImageFormat> for ScreenshotFormat {
	fn from(format: ImageFormat) -> Self {
		match format {
			ImageFormat::Png => ScreenshotFormat::Png,
			ImageFormat::Jpeg => ScreenshotFormat::Jpeg,
			ImageFormat::Webp => ScreenshotFormat::Webp,
		}
	}
}
