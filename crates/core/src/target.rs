//! Target: one attached page session.
//!
//! A [`Target`] bundles three things the navigation layer needs:
//!
//! - an [`Executor`] to issue commands on the session,
//! - the event bus ([`Target::listen`]) fed by the connection's read loop,
//! - the id of the frame currently being navigated.
//!
//! The current frame is written only by the target itself (when the browser
//! reports a main-frame navigation, or when attaching) and read under a read
//! lock by anyone arming a navigation wait.

use std::sync::Arc;

use cdpnav_protocol::{AttachToTarget, Command, Event, FrameId, GetFrameTree, PageEnable, SetLifecycleEventsEnabled, TargetId};
use cdpnav_runtime::connection::downgrade_sink;
use cdpnav_runtime::{Connection, Context, EventSink, Executor, Result, Session};
use parking_lot::RwLock;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::listeners::Listeners;

/// Issues `command` through `executor`, bounded by `ctx`.
///
/// Returns the typed acknowledgment. If `ctx` ends first the acknowledgment
/// is abandoned and the context's error is returned.
pub async fn execute<C: Command>(ctx: &Context, executor: &dyn Executor, command: &C) -> Result<C::Returns> {
	let params = serde_json::to_value(command)?;
	trace!(method = C::METHOD, %params, "execute");

	let value = ctx.run(executor.execute(C::METHOD, params)).await?;
	let value = match value {
		Value::Null => Value::Object(Default::default()),
		other => other,
	};
	Ok(serde_json::from_value(value)?)
}

pub struct Target {
	executor: Arc<dyn Executor>,
	listeners: Listeners,
	current_frame: RwLock<Option<FrameId>>,
}

impl Target {
	pub fn new(executor: Arc<dyn Executor>) -> Self {
		Self {
			executor,
			listeners: Listeners::new(),
			current_frame: RwLock::new(None),
		}
	}

	/// Attaches to `target_id` over `connection` and prepares the page domain.
	///
	/// The returned target receives every event for its session. Lifecycle
	/// events are switched on and the current frame is seeded from the frame
	/// tree, so a navigation can be awaited right away.
	pub async fn attach(ctx: &Context, connection: Arc<Connection>, target_id: &TargetId) -> Result<Arc<Self>> {
		let browser = Session::browser(Arc::clone(&connection));
		let attached = execute(
			ctx,
			&browser,
			&AttachToTarget {
				target_id: target_id.clone(),
				flatten: true,
			},
		)
		.await?;
		debug!(target_id = %target_id, session = %attached.session_id.as_str(), "attached to target");

		let session = Session::attached(Arc::clone(&connection), attached.session_id.clone());
		let target = Arc::new(Self::new(Arc::new(session)));
		connection.register_sink(Some(attached.session_id), downgrade_sink(&target));

		target.enable(ctx).await?;
		Ok(target)
	}

	/// Enables page events, lifecycle events, and seeds the current frame.
	pub async fn enable(&self, ctx: &Context) -> Result<()> {
		self.call(ctx, &PageEnable {}).await?;
		self.call(ctx, &SetLifecycleEventsEnabled { enabled: true }).await?;

		let tree = self.call(ctx, &GetFrameTree {}).await?;
		debug!(frame = %tree.frame_tree.frame.id, url = %tree.frame_tree.frame.url, "main frame");
		self.set_current_frame(tree.frame_tree.frame.id);
		Ok(())
	}

	/// Issues a typed command on this target's session.
	pub async fn call<C: Command>(&self, ctx: &Context, command: &C) -> Result<C::Returns> {
		execute(ctx, self.executor.as_ref(), command).await
	}

	pub fn current_frame(&self) -> Option<FrameId> {
		self.current_frame.read().clone()
	}

	/// The frame a navigation issued now would load into.
	///
	/// Empty when no frame is known yet; an empty id matches no event.
	pub fn navigated_frame_id(&self) -> FrameId {
		self.current_frame().unwrap_or_default()
	}

	pub fn set_current_frame(&self, frame_id: FrameId) {
		*self.current_frame.write() = Some(frame_id);
	}

	/// Registers `handler` for every event on this target until `scope` is cancelled.
	pub fn listen<F>(&self, scope: CancellationToken, handler: F)
	where
		F: Fn(&Event) + Send + Sync + 'static,
	{
		self.listeners.listen(scope, Arc::new(handler));
	}

	pub fn listener_count(&self) -> usize {
		self.listeners.live_count()
	}

	/// Applies `event` to the target's own state, then hands it to listeners.
	pub fn handle_event(&self, event: Event) {
		if let Event::FrameNavigated(navigated) = &event {
			if navigated.frame.is_main() {
				debug!(frame = %navigated.frame.id, url = %navigated.frame.url, "main frame navigated");
				self.set_current_frame(navigated.frame.id.clone());
			}
		}

		self.listeners.dispatch(&event);
	}
}

impl EventSink for Target {
	fn on_event(&self, method: &str, params: Value) {
		self.handle_event(Event::decode(method, params));
	}
}
