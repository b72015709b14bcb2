//! Message transports.
//!
//! A transport is split in two halves so the connection can write while its
//! read loop runs in the background:
//!
//! * [`Transport`]: serializes and writes one JSON message.
//! * [`TransportReceiver`]: reads messages and forwards them, parsed, into
//!   the connection's inbound channel until the peer goes away.

mod fake;
mod websocket;

use std::future::Future;
use std::pin::Pin;

use serde_json::Value as JsonValue;
use tokio::sync::mpsc;

use crate::Result;

pub use fake::{FakeTransportBuilder, FakeTransportController};
pub use websocket::WebSocketTransport;

/// Outbound half of a transport.
pub trait Transport: Send {
	fn send(&mut self, message: JsonValue) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Inbound half of a transport, consumed by its read loop.
pub trait TransportReceiver: Send {
	fn run(self: Box<Self>) -> Pin<Box<dyn Future<Output = Result<()>> + Send>>;
}

/// Everything a [`Connection`](crate::Connection) needs from a transport.
pub struct TransportParts {
	pub sender: Box<dyn Transport>,
	pub receiver: Box<dyn TransportReceiver>,
	pub message_rx: mpsc::UnboundedReceiver<JsonValue>,
}
