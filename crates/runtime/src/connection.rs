//! Request/response correlation and event routing over a transport.
//!
//! It handles:
//! - Generating unique request IDs
//! - Correlating responses with pending requests
//! - Distinguishing events from responses
//! - Handing events to the sink registered for their session
//!
//! # Message Flow
//!
//! 1. Caller invokes [`Connection::send`] with method, params and optional session
//! 2. Connection allocates the next ID and parks a oneshot sender under it
//! 3. Request is serialized and written through the transport
//! 4. Read loop ([`Connection::run`]) receives the matching response
//! 5. Response is correlated by ID and completes the oneshot
//!
//! Events are delivered synchronously from the read loop, in receive order.
//! A slow sink therefore delays every later message on the connection.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use cdpnav_protocol::SessionId;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, trace, warn};

use crate::error::{Error, Result};
use crate::transport::{Transport, TransportParts, TransportReceiver};

/// Outbound command.
///
/// ```json
/// { "id": 42, "method": "Page.navigate", "params": { "url": "https://example.com" }, "sessionId": "9A1B..." }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
	pub id: u64,
	pub method: String,
	pub params: Value,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub session_id: Option<SessionId>,
}

/// Reply to a [`Request`]; exactly one of `result` and `error` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
	pub id: u64,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub result: Option<Value>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<ErrorPayload>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorPayload {
	pub code: i64,
	pub message: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub data: Option<String>,
}

/// Notification pushed by the browser; distinguished from responses by the
/// absence of `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMessage {
	pub method: String,
	#[serde(default)]
	pub params: Value,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub session_id: Option<SessionId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Message {
	Response(Response),
	Event(EventMessage),
}

/// Receiver of events for one session.
pub trait EventSink: Send + Sync {
	fn on_event(&self, method: &str, params: Value);
}

type Callbacks = HashMap<u64, oneshot::Sender<Result<Value>>>;

/// Connection to a browser's remote-debugging endpoint.
///
/// Shared across tasks behind an `Arc`; any number of requests may be in
/// flight at once.
pub struct Connection {
	last_id: AtomicU64,
	callbacks: Mutex<Callbacks>,
	sender: tokio::sync::Mutex<Box<dyn Transport>>,
	receiver: Mutex<Option<Box<dyn TransportReceiver>>>,
	message_rx: Mutex<Option<mpsc::UnboundedReceiver<Value>>>,
	/// Keyed by session; `None` is the browser-level session.
	sinks: RwLock<HashMap<Option<SessionId>, Weak<dyn EventSink>>>,
	closed: AtomicBool,
}

impl Connection {
	pub fn new(parts: TransportParts) -> Self {
		Self {
			last_id: AtomicU64::new(0),
			callbacks: Mutex::new(HashMap::new()),
			sender: tokio::sync::Mutex::new(parts.sender),
			receiver: Mutex::new(Some(parts.receiver)),
			message_rx: Mutex::new(Some(parts.message_rx)),
			sinks: RwLock::new(HashMap::new()),
			closed: AtomicBool::new(false),
		}
	}

	/// Sends `method` and waits for its acknowledgment.
	///
	/// # Errors
	///
	/// - [`Error::Protocol`] / [`Error::TargetClosed`] when the browser rejects the command
	/// - [`Error::Transport`] when writing fails
	/// - [`Error::ChannelClosed`] when the connection ends before the reply
	pub async fn send(&self, method: &str, params: Value, session_id: Option<&SessionId>) -> Result<Value> {
		if self.closed.load(Ordering::SeqCst) {
			return Err(Error::ChannelClosed);
		}

		let id = self.last_id.fetch_add(1, Ordering::SeqCst);
		let (tx, rx) = oneshot::channel();
		self.callbacks.lock().insert(id, tx);
		if self.closed.load(Ordering::SeqCst) {
			self.callbacks.lock().remove(&id);
			return Err(Error::ChannelClosed);
		}

		let request = Request {
			id,
			method: method.to_string(),
			params,
			session_id: session_id.cloned(),
		};
		trace!(id, method, session = ?request.session_id, "send");

		let request_value = serde_json::to_value(&request)?;
		if let Err(e) = self.sender.lock().await.send(request_value).await {
			self.callbacks.lock().remove(&id);
			return Err(e);
		}

		rx.await.map_err(|_| Error::ChannelClosed).and_then(|result| result)
	}

	/// Routes events carrying `session_id` to `sink`.
	///
	/// The connection holds the sink weakly; a dropped sink is forgotten on
	/// its next event.
	pub fn register_sink(&self, session_id: Option<SessionId>, sink: Weak<dyn EventSink>) {
		self.sinks.write().insert(session_id, sink);
	}

	pub fn unregister_sink(&self, session_id: Option<&SessionId>) {
		self.sinks.write().remove(&session_id.cloned());
	}

	pub fn is_closed(&self) -> bool {
		self.closed.load(Ordering::SeqCst)
	}

	/// Runs the read loop until the transport closes.
	///
	/// Must be spawned exactly once; later calls return immediately.
	pub async fn run(&self) {
		let (receiver, message_rx) = {
			let receiver = self.receiver.lock().take();
			let message_rx = self.message_rx.lock().take();
			(receiver, message_rx)
		};
		let (Some(receiver), Some(mut message_rx)) = (receiver, message_rx) else {
			warn!("Connection::run called more than once");
			return;
		};

		let transport_handle = tokio::spawn(async move {
			if let Err(e) = receiver.run().await {
				error!("Transport error: {}", e);
			}
		});

		while let Some(message_value) = message_rx.recv().await {
			match serde_json::from_value::<Message>(message_value.clone()) {
				Ok(message) => self.dispatch(message),
				Err(e) => error!("Failed to parse message: {} - message: {}", e, message_value),
			}
		}

		debug!("Message loop ended (transport closed)");
		self.closed.store(true, Ordering::SeqCst);
		// Dropping the senders fails every pending request with ChannelClosed.
		self.callbacks.lock().clear();

		let _ = transport_handle.await;
	}

	fn dispatch(&self, message: Message) {
		match message {
			Message::Response(response) => {
				let Some(callback) = self.callbacks.lock().remove(&response.id) else {
					warn!(id = response.id, "Cannot find request to respond");
					return;
				};

				let result = match response.error {
					Some(error) => Err(parse_protocol_error(error)),
					None => Ok(response.result.unwrap_or(Value::Null)),
				};

				// Receiver may have been dropped by a cancelled caller.
				let _ = callback.send(result);
			}
			Message::Event(event) => {
				trace!(method = %event.method, session = ?event.session_id, "event");
				let sink = self.sinks.read().get(&event.session_id).cloned();
				match sink.as_ref().map(Weak::upgrade) {
					Some(Some(sink)) => sink.on_event(&event.method, event.params),
					Some(None) => {
						self.sinks.write().remove(&event.session_id);
					}
					None => {}
				}
			}
		}
	}
}

fn parse_protocol_error(error: ErrorPayload) -> Error {
	let message = match error.data {
		Some(data) => format!("{}: {}", error.message, data),
		None => error.message,
	};

	if message.contains("Target closed") || message.contains("No target with given id") || message.contains("Session with given id not found") {
		Error::TargetClosed(message)
	} else {
		Error::Protocol { code: error.code, message }
	}
}

/// Shorthand for handing an `Arc`'d sink to [`Connection::register_sink`].
pub fn downgrade_sink<S: EventSink + 'static>(sink: &Arc<S>) -> Weak<dyn EventSink> {
	let weak: Weak<S> = Arc::downgrade(sink);
	weak
}
