//! Command execution bound to one session.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use cdpnav_protocol::SessionId;
use serde_json::Value;

use crate::connection::Connection;
use crate::error::Result;

/// Issues raw protocol commands.
///
/// Implemented by [`Session`] for a live connection; tests substitute their
/// own implementations to script acknowledgments.
pub trait Executor: Send + Sync {
	fn execute<'a>(&'a self, method: &'a str, params: Value) -> Pin<Box<dyn Future<Output = Result<Value>> + Send + 'a>>;
}

/// A connection plus the session its commands are addressed to.
#[derive(Clone)]
pub struct Session {
	connection: Arc<Connection>,
	session_id: Option<SessionId>,
}

impl Session {
	/// Browser-level session (no `sessionId` on the wire).
	pub fn browser(connection: Arc<Connection>) -> Self {
		Self { connection, session_id: None }
	}

	pub fn attached(connection: Arc<Connection>, session_id: SessionId) -> Self {
		Self {
			connection,
			session_id: Some(session_id),
		}
	}

	pub fn connection(&self) -> &Arc<Connection> {
		&self.connection
	}

	pub fn session_id(&self) -> Option<&SessionId> {
		self.session_id.as_ref()
	}
}

impl Executor for Session {
	fn execute<'a>(&'a self, method: &'a str, params: Value) -> Pin<Box<dyn Future<Output = Result<Value>> + Send + 'a>> {
		Box::pin(self.connection.send(method, params, self.session_id.as_ref()))
	}
}
