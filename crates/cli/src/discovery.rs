//! Remote-debugging endpoint parsing and discovery.
//!
//! A browser started with `--remote-debugging-port` serves `/json/version`
//! (with the browser-level WebSocket URL) and `/json/list` (open targets) over
//! HTTP on that port. A proxy in front of it may serve the same over HTTPS.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use cdpnav_protocol::TargetInfo;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::{CliError, Result};

const DEFAULT_PORT: u16 = 9222;

/// Where to reach the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
	/// HTTP discovery endpoint; the WebSocket URL is looked up on connect.
	Http { host: String, port: u16, secure: bool },
	/// Browser-level WebSocket URL, used as is.
	WebSocket(String),
}

impl FromStr for Endpoint {
	type Err = CliError;

	fn from_str(s: &str) -> Result<Self> {
		let invalid = || CliError::InvalidEndpoint(s.to_string());
		let s = s.trim();
		if s.is_empty() {
			return Err(invalid());
		}

		let with_scheme = if s.contains("://") { s.to_string() } else { format!("http://{s}") };
		let url = Url::parse(&with_scheme).map_err(|_| invalid())?;
		match url.scheme() {
			"ws" | "wss" => Ok(Self::WebSocket(url.to_string())),
			"http" | "https" => {
				let host = url.host_str().ok_or_else(invalid)?.to_string();
				// `Url::port` hides a port equal to the scheme default.
				let port = if has_explicit_port(&with_scheme) { url.port_or_known_default() } else { None };
				Ok(Self::Http {
					host,
					port: port.unwrap_or(DEFAULT_PORT),
					secure: url.scheme() == "https",
				})
			}
			_ => Err(invalid()),
		}
	}
}

impl fmt::Display for Endpoint {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Http { host, port, secure } => {
				let scheme = if *secure { "https" } else { "http" };
				write!(f, "{scheme}://{host}:{port}")
			}
			Self::WebSocket(url) => f.write_str(url),
		}
	}
}

/// Whether the authority of `url` (which has a scheme) spells out a port.
fn has_explicit_port(url: &str) -> bool {
	let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
	let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
	let host_port = authority.rsplit_once('@').map_or(authority, |(_, host_port)| host_port);
	let after_host = host_port.rsplit_once(']').map_or(host_port, |(_, after)| after);
	after_host.contains(':')
}

/// `/json/version` response subset.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionInfo {
	#[serde(rename = "Browser", default)]
	pub browser: Option<String>,
	#[serde(rename = "Protocol-Version", default)]
	pub protocol_version: Option<String>,
	#[serde(rename = "webSocketDebuggerUrl")]
	pub web_socket_debugger_url: String,
}

/// Fetches `/json/version` below `base` (`http(s)://host:port`).
pub async fn fetch_version(base: &str) -> Result<VersionInfo> {
	fetch_json(&format!("{base}/json/version")).await
}

/// Browser-level WebSocket URL advertised by `base`.
pub async fn discover_websocket_url(base: &str) -> Result<String> {
	let info = fetch_version(base).await?;
	debug!(
		browser = info.browser.as_deref().unwrap_or("unknown"),
		protocol = info.protocol_version.as_deref().unwrap_or("unknown"),
		url = %info.web_socket_debugger_url,
		"discovered browser endpoint"
	);
	Ok(info.web_socket_debugger_url)
}

/// Page targets listed by `/json/list` below `base`.
pub async fn list_targets(base: &str) -> Result<Vec<TargetInfo>> {
	let targets: Vec<TargetInfo> = fetch_json(&format!("{base}/json/list")).await?;
	Ok(targets.into_iter().filter(TargetInfo::is_page).collect())
}

async fn fetch_json<T: DeserializeOwned>(url: &str) -> Result<T> {
	let discovery = |message: String| CliError::Discovery {
		url: url.to_string(),
		message,
	};

	let client = reqwest::Client::builder()
		.timeout(Duration::from_secs(2))
		.build()
		.map_err(|e| discovery(format!("failed to create HTTP client: {e}")))?;

	let response = client.get(url).send().await.map_err(|e| discovery(e.to_string()))?;
	if !response.status().is_success() {
		return Err(discovery(format!("unexpected status {}", response.status())));
	}

	response.json().await.map_err(|e| discovery(format!("failed to parse response: {e}")))
}
