//! Scoped event listeners.
//!
//! A listener is registered together with a [`CancellationToken`]; cancelling
//! that token is the only way to unsubscribe. Cancelled registrations are
//! pruned on the next registration or delivery and are never invoked again.

use std::sync::Arc;

use cdpnav_protocol::Event;
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

pub type Handler = Arc<dyn Fn(&Event) + Send + Sync>;

struct Registration {
	scope: CancellationToken,
	handler: Handler,
}

#[derive(Default)]
pub struct Listeners {
	registrations: Mutex<Vec<Registration>>,
}

impl Listeners {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers `handler` until `scope` is cancelled.
	///
	/// Registration is complete when this returns: the next [`dispatch`](Self::dispatch)
	/// reaches the handler. A scope that is already cancelled registers nothing.
	pub fn listen(&self, scope: CancellationToken, handler: Handler) {
		let mut registrations = self.registrations.lock();
		registrations.retain(|r| !r.scope.is_cancelled());
		if !scope.is_cancelled() {
			registrations.push(Registration { scope, handler });
		}
	}

	/// Delivers `event` to every live listener, in registration order.
	///
	/// Handlers run without the registry lock held, so they may register or
	/// cancel listeners themselves.
	pub fn dispatch(&self, event: &Event) {
		let live: Vec<(CancellationToken, Handler)> = {
			let mut registrations = self.registrations.lock();
			registrations.retain(|r| !r.scope.is_cancelled());
			registrations.iter().map(|r| (r.scope.clone(), Arc::clone(&r.handler))).collect()
		};

		for (scope, handler) in live {
			// An earlier handler in this round may have released this one.
			if !scope.is_cancelled() {
				handler(event);
			}
		}
	}

	/// Number of registrations whose scope is still live.
	pub fn live_count(&self) -> usize {
		let mut registrations = self.registrations.lock();
		registrations.retain(|r| !r.scope.is_cancelled());
		registrations.len()
	}
}
