//! Event barrier: turns "some event will arrive later" into an awaitable wait.
//!
//! Commands on the protocol are acknowledged before their effect completes;
//! `Page.navigate` returns as soon as the browser starts loading. To wait for
//! completion, a caller arms a barrier for the event that signals it, issues
//! the command, then awaits the barrier:
//!
//! ```ignore
//! let (wait, _release) = expect_event(ctx, &target, |e| is_done(e));
//! target.call(ctx, &command).await?;
//! wait.wait().await?;
//! ```
//!
//! Arming registers the listener before it returns, so an event emitted any
//! time after arming is observed, including one that arrives before the
//! command's acknowledgment. Arming after issuing the command would leave a
//! window where the event is missed.
//!
//! The listener is released exactly once, by whichever comes first:
//!
//! - the predicate matching (the listener releases itself),
//! - [`Release::release`], or dropping both the [`Wait`] and the [`Release`],
//! - cancellation of the governing context's token.
//!
//! Discarding only the `Release` (`let (wait, _) = ...`) keeps the listener
//! armed for as long as the `Wait` lives.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use cdpnav_protocol::Event;
use cdpnav_runtime::{Context, Result};
use tokio::sync::watch;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::trace;

/// Set-once flag shared by the listener (writer) and the waiter (reader).
#[derive(Debug)]
struct CompletionSignal {
	matched: AtomicBool,
	tx: watch::Sender<bool>,
}

impl CompletionSignal {
	fn new() -> Self {
		let (tx, _) = watch::channel(false);
		Self {
			matched: AtomicBool::new(false),
			tx,
		}
	}

	/// Returns `true` for the one call that sets the flag.
	fn fire(&self) -> bool {
		if self.matched.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire).is_err() {
			return false;
		}
		self.tx.send_replace(true);
		true
	}

	fn is_set(&self) -> bool {
		self.matched.load(Ordering::Acquire)
	}

	async fn fired(&self) {
		let mut rx = self.tx.subscribe();
		// The sender lives in `self`, so this only returns once the flag is set.
		let _ = rx.wait_for(|matched| *matched).await;
	}
}

/// Waiting half of an armed barrier.
#[must_use = "an armed barrier does nothing unless waited on"]
#[derive(Debug)]
pub struct Wait {
	ctx: Context,
	signal: Arc<CompletionSignal>,
	_armed: Arc<DropGuard>,
}

impl Wait {
	/// Resolves once the predicate has matched, or with the governing
	/// context's error if the context ends first.
	///
	/// When both are ready the match wins; a wait never reports both.
	pub async fn wait(self) -> Result<()> {
		tokio::select! {
			biased;
			_ = self.signal.fired() => Ok(()),
			err = self.ctx.done() => Err(err),
		}
	}

	pub fn is_matched(&self) -> bool {
		self.signal.is_set()
	}
}

/// Releasing half of an armed barrier.
///
/// Releasing deregisters the listener. Idempotent. Dropping the guard
/// releases once the matching [`Wait`] is gone as well, so holding it for the
/// caller's scope covers every exit path.
#[derive(Debug)]
pub struct Release {
	scope: CancellationToken,
	_armed: Arc<DropGuard>,
}

impl Release {
	pub fn release(&self) {
		self.scope.cancel();
	}

	pub fn is_released(&self) -> bool {
		self.scope.is_cancelled()
	}
}

/// Something events can be listened on.
///
/// Implemented by [`Target`](crate::Target); abstracted so barriers can be
/// armed on any event source.
pub trait EventSource {
	fn listen_scoped(&self, scope: CancellationToken, handler: Box<dyn Fn(&Event) + Send + Sync>);
}

impl EventSource for crate::Target {
	fn listen_scoped(&self, scope: CancellationToken, handler: Box<dyn Fn(&Event) + Send + Sync>) {
		self.listen(scope, handler);
	}
}

/// Arms a barrier on `source` that resolves on the first event matching `is`.
///
/// The listener is registered before this returns. Its scope is a child of
/// `ctx`'s token: cancelling `ctx` releases it as well.
pub fn expect_event<S, P>(ctx: &Context, source: &S, is: P) -> (Wait, Release)
where
	S: EventSource + ?Sized,
	P: Fn(&Event) -> bool + Send + Sync + 'static,
{
	let signal = Arc::new(CompletionSignal::new());
	let scope = ctx.token().child_token();

	let listener = {
		let signal = Arc::clone(&signal);
		let scope = scope.clone();
		move |event: &Event| {
			if !is(event) {
				return;
			}
			if signal.fire() {
				trace!(method = event.method(), "barrier matched");
			}
			scope.cancel();
		}
	};
	source.listen_scoped(scope.clone(), Box::new(listener));

	let armed = Arc::new(scope.clone().drop_guard());
	(
		Wait {
			ctx: ctx.clone(),
			signal,
			_armed: Arc::clone(&armed),
		},
		Release { scope, _armed: armed },
	)
}
