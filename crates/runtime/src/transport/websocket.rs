//! WebSocket transport to a browser's remote-debugging endpoint.

use std::future::Future;
use std::pin::Pin;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use serde_json::Value as JsonValue;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, trace, warn};

use super::{Transport, TransportParts, TransportReceiver};
use crate::{Error, Result};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Transport speaking JSON text frames over a WebSocket.
pub struct WebSocketTransport {
	sink: SplitSink<WsStream, Message>,
	stream: SplitStream<WsStream>,
	message_tx: mpsc::UnboundedSender<JsonValue>,
}

impl WebSocketTransport {
	/// Opens the WebSocket at `url` (a `ws://.../devtools/browser/<id>` endpoint).
	pub async fn connect(url: &str) -> Result<(Self, mpsc::UnboundedReceiver<JsonValue>)> {
		debug!(%url, "connecting websocket transport");
		let (ws, _) = tokio_tungstenite::connect_async(url)
			.await
			.map_err(|e| Error::Transport(format!("Failed to connect to {url}: {e}")))?;

		let (sink, stream) = ws.split();
		let (message_tx, message_rx) = mpsc::unbounded_channel();

		Ok((Self { sink, stream, message_tx }, message_rx))
	}

	pub fn into_transport_parts(self, message_rx: mpsc::UnboundedReceiver<JsonValue>) -> TransportParts {
		TransportParts {
			sender: Box::new(WebSocketSender { sink: self.sink }),
			receiver: Box::new(WebSocketReceiver {
				stream: self.stream,
				message_tx: self.message_tx,
			}),
			message_rx,
		}
	}
}

struct WebSocketSender {
	sink: SplitSink<WsStream, Message>,
}

impl Transport for WebSocketSender {
	fn send(&mut self, message: JsonValue) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
		Box::pin(async move {
			let text = serde_json::to_string(&message)?;
			trace!(%text, "ws send");
			self.sink
				.send(Message::Text(text.into()))
				.await
				.map_err(|e| Error::Transport(format!("Failed to send message: {e}")))
		})
	}
}

struct WebSocketReceiver {
	stream: SplitStream<WsStream>,
	message_tx: mpsc::UnboundedSender<JsonValue>,
}

impl TransportReceiver for WebSocketReceiver {
	fn run(mut self: Box<Self>) -> Pin<Box<dyn Future<Output = Result<()>> + Send>> {
		Box::pin(async move {
			while let Some(frame) = self.stream.next().await {
				let frame = frame.map_err(|e| Error::Transport(format!("Failed to read message: {e}")))?;
				let message: JsonValue = match frame {
					Message::Text(text) => match serde_json::from_str(&text) {
						Ok(value) => value,
						Err(e) => {
							warn!(error = %e, "dropping unparseable text frame");
							continue;
						}
					},
					Message::Binary(bytes) => match serde_json::from_slice(&bytes) {
						Ok(value) => value,
						Err(e) => {
							warn!(error = %e, "dropping unparseable binary frame");
							continue;
						}
					},
					Message::Close(reason) => {
						debug!(?reason, "websocket closed by peer");
						break;
					}
					_ => continue,
				};

				if self.message_tx.send(message).is_err() {
					break;
				}
			}
			Ok(())
		})
	}
}
