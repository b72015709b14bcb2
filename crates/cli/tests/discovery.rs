//! Endpoint discovery against a local HTTP server standing in for the browser.

use cdpnav_cli::discovery::{Endpoint, discover_websocket_url, fetch_version, list_targets};
use cdpnav_cli::error::CliError;
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serves `/json/version` and `/json/list`; anything else is a 404.
async fn spawn_devtools_http() -> u16 {
	let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
	let port = listener.local_addr().unwrap().port();

	tokio::spawn(async move {
		loop {
			let Ok((mut stream, _)) = listener.accept().await else {
				return;
			};
			tokio::spawn(async move {
				let mut request = Vec::new();
				let mut buf = [0u8; 1024];
				while !request.windows(4).any(|w| w == b"\r\n\r\n") {
					match stream.read(&mut buf).await {
						Ok(0) | Err(_) => return,
						Ok(n) => request.extend_from_slice(&buf[..n]),
					}
				}
				let request = String::from_utf8_lossy(&request);
				let path = request.split_whitespace().nth(1).unwrap_or("/");

				let (status, body) = match path {
					"/json/version" => (
						"200 OK",
						json!({
							"Browser": "HeadlessChrome/126.0.6478.126",
							"Protocol-Version": "1.3",
							"webSocketDebuggerUrl": format!("ws://127.0.0.1:{port}/devtools/browser/b0b")
						}),
					),
					"/json/list" => (
						"200 OK",
						json!([
							{"id": "W1", "type": "service_worker", "title": "", "url": "https://a.test/sw.js"},
							{"id": "P1", "type": "page", "title": "A", "url": "https://a.test/",
							 "webSocketDebuggerUrl": format!("ws://127.0.0.1:{port}/devtools/page/P1")},
							{"id": "P2", "type": "page", "title": "B", "url": "https://b.test/"}
						]),
					),
					_ => ("404 Not Found", json!({})),
				};

				let body = body.to_string();
				let response = format!(
					"HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
					body.len()
				);
				let _ = stream.write_all(response.as_bytes()).await;
				let _ = stream.shutdown().await;
			});
		}
	});

	port
}

#[tokio::test]
async fn discovers_browser_websocket_url() {
	let port = spawn_devtools_http().await;

	let url = discover_websocket_url(&format!("http://127.0.0.1:{port}")).await.unwrap();
	assert_eq!(url, format!("ws://127.0.0.1:{port}/devtools/browser/b0b"));

	let version = fetch_version(&format!("http://127.0.0.1:{port}")).await.unwrap();
	assert_eq!(version.protocol_version.as_deref(), Some("1.3"));
}

#[tokio::test]
async fn lists_only_page_targets() {
	let port = spawn_devtools_http().await;

	let targets = list_targets(&format!("http://127.0.0.1:{port}")).await.unwrap();
	let ids: Vec<String> = targets.iter().map(|t| t.id.to_string()).collect();
	assert_eq!(ids, ["P1", "P2"]);
	assert!(targets[0].web_socket_debugger_url.is_some());
	assert!(targets[1].web_socket_debugger_url.is_none());
}

#[tokio::test]
async fn unreachable_port_is_a_discovery_error() {
	let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
	let port = listener.local_addr().unwrap().port();
	drop(listener);

	let err = discover_websocket_url(&format!("http://127.0.0.1:{port}")).await.unwrap_err();
	assert!(matches!(err, CliError::Discovery { ref url, .. } if url.ends_with("/json/version")));
}

#[tokio::test]
async fn parsed_endpoint_is_the_discovery_base() {
	let port = spawn_devtools_http().await;
	let endpoint: Endpoint = format!("127.0.0.1:{port}").parse().unwrap();

	let url = discover_websocket_url(&endpoint.to_string()).await.unwrap();
	assert_eq!(url, format!("ws://127.0.0.1:{port}/devtools/browser/b0b"));
}

#[tokio::test]
async fn https_endpoint_is_fetched_over_tls() {
	let port = spawn_devtools_http().await;
	let endpoint: Endpoint = format!("https://127.0.0.1:{port}").parse().unwrap();

	// The plain HTTP responder cannot complete a TLS handshake.
	let err = list_targets(&endpoint.to_string()).await.unwrap_err();
	assert!(matches!(err, CliError::Discovery { ref url, .. } if url == &format!("https://127.0.0.1:{port}/json/list")));
}
