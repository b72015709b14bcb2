//! Shared harness: a connection over the fake transport and an attached page.

#![allow(dead_code)]

use std::sync::Arc;

use cdpnav::{Connection, Context, Page, Target};
use cdpnav_protocol::{FrameId, SessionId, TargetId};
use cdpnav_runtime::connection::downgrade_sink;
use cdpnav_runtime::transport::{FakeTransportBuilder, FakeTransportController};
use cdpnav_runtime::Session;
use serde_json::{Value, json};
use tokio::task::JoinHandle;

pub const SESSION: &str = "S1";
pub const MAIN_FRAME: &str = "MAIN";

pub struct Harness {
	pub connection: Arc<Connection>,
	pub controller: FakeTransportController,
	pub reader: JoinHandle<()>,
}

impl Harness {
	pub fn start() -> Self {
		let _ = tracing_subscriber::fmt().with_test_writer().with_max_level(tracing::Level::DEBUG).try_init();

		let (parts, controller) = FakeTransportBuilder::new().build();
		let connection = Arc::new(Connection::new(parts));
		let reader = tokio::spawn({
			let connection = Arc::clone(&connection);
			async move { connection.run().await }
		});
		Self {
			connection,
			controller,
			reader,
		}
	}

	/// A page on session [`SESSION`] whose current frame is [`MAIN_FRAME`].
	pub fn page(&self) -> Page {
		let session = Session::attached(Arc::clone(&self.connection), SessionId::from(SESSION));
		let target = Arc::new(Target::new(Arc::new(session)));
		target.set_current_frame(FrameId::from(MAIN_FRAME));
		self.connection.register_sink(Some(SessionId::from(SESSION)), downgrade_sink(&target));
		Page::new(target)
	}

	/// Waits for `method` to be sent and acknowledges it with `result`.
	pub async fn reply(&self, method: &str, result: Value) -> Value {
		let request = self.controller.wait_for_request(method).await;
		let id = request["id"].as_u64().expect("request carries an id");
		self.controller.inject_response(id, result);
		request
	}

	pub async fn reply_error(&self, method: &str, code: i64, message: &str) -> Value {
		let request = self.controller.wait_for_request(method).await;
		let id = request["id"].as_u64().expect("request carries an id");
		self.controller.inject_error(id, code, message);
		request
	}

	pub fn lifecycle(&self, frame: &str, name: &str) {
		self.controller.inject_session_event(
			SESSION,
			"Page.lifecycleEvent",
			json!({"frameId": frame, "loaderId": "L1", "name": name, "timestamp": 1.0}),
		);
	}

	pub fn frame_navigated(&self, frame: &str, url: &str) {
		self.controller
			.inject_session_event(SESSION, "Page.frameNavigated", json!({"frame": {"id": frame, "loaderId": "L2", "url": url}}));
	}
}

pub fn target_id(id: &str) -> TargetId {
	TargetId::from(id)
}

pub fn unbounded() -> Context {
	Context::new()
}
