//! Governing context for commands and waits.
//!
//! A [`Context`] is a cancellable scope with an optional deadline. It is
//! cloned freely; clones share the same cancellation state. Child contexts
//! are cancelled together with their parent but can be cancelled on their
//! own without affecting it.
//!
//! # Example
//!
//! ```ignore
//! let ctx = Context::with_timeout(Duration::from_secs(30));
//! page.navigate(&ctx, "https://example.com").await?;
//! ```

use std::future::Future;
use std::time::Duration;

use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Default)]
pub struct Context {
	token: CancellationToken,
	deadline: Option<Instant>,
}

impl Context {
	/// A context that ends only when cancelled.
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_timeout(timeout: Duration) -> Self {
		Self::with_deadline(Instant::now() + timeout)
	}

	pub fn with_deadline(deadline: Instant) -> Self {
		Self {
			token: CancellationToken::new(),
			deadline: Some(deadline),
		}
	}

	/// Derives a context cancelled with `self`, inheriting its deadline.
	pub fn child(&self) -> Self {
		Self {
			token: self.token.child_token(),
			deadline: self.deadline,
		}
	}

	/// Derives a child whose deadline is the earlier of the parent's and `now + timeout`.
	pub fn child_with_timeout(&self, timeout: Duration) -> Self {
		let deadline = Instant::now() + timeout;
		Self {
			token: self.token.child_token(),
			deadline: Some(self.deadline.map_or(deadline, |parent| parent.min(deadline))),
		}
	}

	pub fn token(&self) -> &CancellationToken {
		&self.token
	}

	pub fn deadline(&self) -> Option<Instant> {
		self.deadline
	}

	pub fn cancel(&self) {
		self.token.cancel();
	}

	/// Returns the termination error if the context has already ended.
	pub fn err(&self) -> Option<Error> {
		if self.token.is_cancelled() {
			Some(Error::Cancelled)
		} else if self.deadline.is_some_and(|d| d <= Instant::now()) {
			Some(Error::DeadlineExceeded)
		} else {
			None
		}
	}

	/// Resolves once the context ends, yielding the reason.
	pub async fn done(&self) -> Error {
		match self.deadline {
			Some(deadline) => {
				tokio::select! {
					biased;
					_ = self.token.cancelled() => Error::Cancelled,
					_ = time::sleep_until(deadline) => Error::DeadlineExceeded,
				}
			}
			None => {
				self.token.cancelled().await;
				Error::Cancelled
			}
		}
	}

	/// Runs `fut` unless the context ends first.
	pub async fn run<T, F>(&self, fut: F) -> Result<T>
	where
		F: Future<Output = Result<T>>,
	{
		if let Some(err) = self.err() {
			return Err(err);
		}

		tokio::select! {
			biased;
			err = self.done() => Err(err),
			result = fut => result,
		}
	}
}
