//! Connecting to the browser and attaching to a page target.

use std::sync::Arc;

use cdpnav::{Connection, Context, Page, Target, execute};
use cdpnav_protocol::{GetTargets, TargetId, TargetInfo};
use cdpnav_runtime::Session;
use cdpnav_runtime::transport::WebSocketTransport;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::discovery::{Endpoint, discover_websocket_url, list_targets};
use crate::error::{CliError, Result};

/// A live browser connection with its read loop.
///
/// Dropping it stops the read loop.
pub struct BrowserConnection {
	connection: Arc<Connection>,
	endpoint: Endpoint,
	reader: JoinHandle<()>,
}

impl BrowserConnection {
	/// Opens the browser-level WebSocket for `endpoint`.
	pub async fn open(ctx: &Context, endpoint: &Endpoint) -> Result<Self> {
		let ws_url = match endpoint {
			Endpoint::Http { .. } => discover_websocket_url(&endpoint.to_string()).await?,
			Endpoint::WebSocket(url) => url.clone(),
		};

		let (transport, message_rx) = ctx.run(WebSocketTransport::connect(&ws_url)).await?;
		info!(url = %ws_url, "connected");
		Ok(Self::from_connection(Arc::new(Connection::new(transport.into_transport_parts(message_rx))), endpoint.clone()))
	}

	/// Wraps an already constructed connection and spawns its read loop.
	pub fn from_connection(connection: Arc<Connection>, endpoint: Endpoint) -> Self {
		let reader = tokio::spawn({
			let connection = Arc::clone(&connection);
			async move { connection.run().await }
		});
		Self {
			connection,
			endpoint,
			reader,
		}
	}

	pub fn connection(&self) -> &Arc<Connection> {
		&self.connection
	}

	/// Page targets, from `/json/list` when the endpoint is HTTP and from
	/// `Target.getTargets` otherwise.
	pub async fn page_targets(&self, ctx: &Context) -> Result<Vec<TargetInfo>> {
		match &self.endpoint {
			Endpoint::Http { .. } => list_targets(&self.endpoint.to_string()).await,
			Endpoint::WebSocket(_) => {
				let browser = Session::browser(Arc::clone(&self.connection));
				let targets = execute(ctx, &browser, &GetTargets {}).await?;
				Ok(targets.target_infos.into_iter().filter(TargetInfo::is_page).collect())
			}
		}
	}

	/// Attaches to `target`, or to the first page target when `None`.
	pub async fn attach_page(&self, ctx: &Context, target: Option<&str>) -> Result<Page> {
		let target_id = match target {
			Some(id) => TargetId::from(id),
			None => {
				let first = self.page_targets(ctx).await?.into_iter().next();
				let info = first.ok_or_else(|| CliError::NoPageTarget(self.endpoint.to_string()))?;
				debug!(target_id = %info.id, url = %info.url, "picked first page target");
				info.id
			}
		};

		let target = Target::attach(ctx, Arc::clone(&self.connection), &target_id).await?;
		Ok(Page::new(target))
	}
}

impl Drop for BrowserConnection {
	fn drop(&mut self) {
		self.reader.abort();
	}
}
