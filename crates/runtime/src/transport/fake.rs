//! In-memory transport for exercising the connection without a browser.
//!
//! # Example
//!
//! ```ignore
//! let (parts, controller) = FakeTransportBuilder::new().build();
//! let connection = Arc::new(Connection::new(parts));
//! tokio::spawn({
//!     let conn = Arc::clone(&connection);
//!     async move { conn.run().await }
//! });
//!
//! let fut = connection.send("Page.reload", json!({}), None);
//! controller.inject_response(0, json!({}));
//! fut.await?;
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::Value as JsonValue;
use tokio::sync::{Mutex, Notify, mpsc};

use super::{Transport, TransportParts, TransportReceiver};
use crate::Result;

/// Builder for creating fake transport instances.
#[derive(Default)]
pub struct FakeTransportBuilder {}

impl FakeTransportBuilder {
	pub fn new() -> Self {
		Self {}
	}

	/// Returns [`TransportParts`] for a [`Connection`](crate::Connection) and a
	/// [`FakeTransportController`] for injecting inbound traffic and
	/// inspecting what was sent.
	pub fn build(self) -> (TransportParts, FakeTransportController) {
		let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
		let (message_tx, message_rx) = mpsc::unbounded_channel();
		let sent = Arc::new(Mutex::new(Vec::new()));
		let notify = Arc::new(Notify::new());

		let sender = FakeTransportSender {
			sent: Arc::clone(&sent),
			notify: Arc::clone(&notify),
		};
		let receiver = FakeTransportReceiver { inbound_rx, message_tx };
		let controller = FakeTransportController { inbound_tx, sent, notify };

		let parts = TransportParts {
			sender: Box::new(sender),
			receiver: Box::new(receiver),
			message_rx,
		};

		(parts, controller)
	}
}

/// Controller for injecting responses/events and inspecting sent messages.
pub struct FakeTransportController {
	inbound_tx: mpsc::UnboundedSender<JsonValue>,
	sent: Arc<Mutex<Vec<JsonValue>>>,
	notify: Arc<Notify>,
}

impl FakeTransportController {
	/// Injects a raw JSON message as if the browser had sent it.
	pub fn inject(&self, message: JsonValue) {
		let _ = self.inbound_tx.send(message);
	}

	pub fn inject_response(&self, id: u64, result: JsonValue) {
		self.inject(serde_json::json!({
			"id": id,
			"result": result
		}));
	}

	pub fn inject_error(&self, id: u64, code: i64, message: &str) {
		self.inject(serde_json::json!({
			"id": id,
			"error": {
				"code": code,
				"message": message
			}
		}));
	}

	/// Injects a browser-level event (no session).
	pub fn inject_event(&self, method: &str, params: JsonValue) {
		self.inject(serde_json::json!({
			"method": method,
			"params": params
		}));
	}

	pub fn inject_session_event(&self, session_id: &str, method: &str, params: JsonValue) {
		self.inject(serde_json::json!({
			"method": method,
			"params": params,
			"sessionId": session_id
		}));
	}

	/// Takes all sent messages, clearing the buffer.
	pub async fn take_sent(&self) -> Vec<JsonValue> {
		std::mem::take(&mut *self.sent.lock().await)
	}

	/// Returns a copy of the sent messages without clearing them.
	pub async fn sent(&self) -> Vec<JsonValue> {
		self.sent.lock().await.clone()
	}

	/// Waits until a request for `method` has been sent, removes it from the
	/// buffer and returns it.
	pub async fn wait_for_request(&self, method: &str) -> JsonValue {
		loop {
			let notified = self.notify.notified();
			tokio::pin!(notified);
			notified.as_mut().enable();

			{
				let mut sent = self.sent.lock().await;
				if let Some(pos) = sent.iter().position(|m| m["method"] == method) {
					return sent.remove(pos);
				}
			}

			notified.await;
		}
	}

	/// Drops the inbound side, ending the connection's read loop.
	pub fn disconnect(self) {}
}

struct FakeTransportSender {
	sent: Arc<Mutex<Vec<JsonValue>>>,
	notify: Arc<Notify>,
}

impl Transport for FakeTransportSender {
	fn send(&mut self, message: JsonValue) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
		let sent = Arc::clone(&self.sent);
		let notify = Arc::clone(&self.notify);
		Box::pin(async move {
			sent.lock().await.push(message);
			notify.notify_waiters();
			Ok(())
		})
	}
}

struct FakeTransportReceiver {
	inbound_rx: mpsc::UnboundedReceiver<JsonValue>,
	message_tx: mpsc::UnboundedSender<JsonValue>,
}

impl TransportReceiver for FakeTransportReceiver {
	fn run(mut self: Box<Self>) -> Pin<Box<dyn Future<Output = Result<()>> + Send>> {
		Box::pin(async move {
			while let Some(message) = self.inbound_rx.recv().await {
				if self.message_tx.send(message).is_err() {
					break;
				}
			}
			Ok(())
		})
	}
}
