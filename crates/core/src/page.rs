//! Page: navigation and page-level queries on a [`Target`].
//!
//! Navigation methods return once the browser reports the current frame's
//! `load` milestone, not when the triggering command is acknowledged. Each
//! one follows the same sequence:
//!
//! 1. arm a `load` barrier for the current frame,
//! 2. issue the triggering command (a failure returns immediately),
//! 3. wait for the barrier, bounded by the caller's [`Context`].
//!
//! The barrier is released on every path out of the method.

use std::future::Future;
use std::sync::Arc;

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use cdpnav_protocol::{CaptureScreenshot, Evaluate, GetNavigationHistory, Navigate, NavigateReturns, NavigateToHistoryEntry, NavigationHistory, Reload, StopLoading};
use cdpnav_runtime::{Context, Error, Result};
use serde_json::Value;
use tracing::{debug, info};

use crate::Target;
use crate::history::{next_entry, previous_entry};
use crate::lifecycle::expect_lifecycle_loaded;

#[derive(Clone)]
pub struct Page {
	target: Arc<Target>,
}

impl Page {
	pub fn new(target: Arc<Target>) -> Self {
		Self { target }
	}

	pub fn target(&self) -> &Arc<Target> {
		&self.target
	}

	/// Navigates the current frame to `url` and waits for it to load.
	///
	/// # Errors
	///
	/// - [`Error::NavigationFailed`] when the browser could not start the load
	/// - any command error from `Page.navigate`
	/// - the context's error if it ends before `load`
	pub async fn navigate(&self, ctx: &Context, url: &str) -> Result<NavigateReturns> {
		info!(url, "navigate");
		self.load_after(ctx, "Page.navigate", || async move {
			let acked = self.target.call(ctx, &Navigate::new(url)).await?;
			match acked.error_text.as_deref() {
				Some(text) if !text.is_empty() => Err(Error::NavigationFailed(text.to_string())),
				_ => Ok(acked),
			}
		})
		.await
	}

	/// Reloads the page and waits for it to load.
	pub async fn reload(&self, ctx: &Context) -> Result<()> {
		self.reload_with(ctx, Reload::default()).await
	}

	pub async fn reload_with(&self, ctx: &Context, params: Reload) -> Result<()> {
		info!(ignore_cache = ?params.ignore_cache, "reload");
		self.load_after(ctx, "Page.reload", || async move { self.target.call(ctx, &params).await.map(drop) })
			.await
	}

	/// Navigates to the history entry with `entry_id` and waits for it to load.
	pub async fn navigate_to_history_entry(&self, ctx: &Context, entry_id: i64) -> Result<()> {
		info!(entry_id, "navigate to history entry");
		self.load_after(ctx, "Page.navigateToHistoryEntry", || async move {
			self.target.call(ctx, &NavigateToHistoryEntry { entry_id }).await.map(drop)
		})
		.await
	}

	/// Goes one entry back in the session history.
	///
	/// Fails with [`Error::InvalidNavigationEntry`] at the first entry, before
	/// arming anything or issuing a navigation command.
	pub async fn navigate_back(&self, ctx: &Context) -> Result<()> {
		let history = self.navigation_entries(ctx).await?;
		let entry = previous_entry(&history)?;
		debug!(entry_id = entry.id, url = %entry.url, "navigate back");
		self.navigate_to_history_entry(ctx, entry.id).await
	}

	/// Goes one entry forward in the session history.
	///
	/// Fails with [`Error::InvalidNavigationEntry`] at the last entry.
	pub async fn navigate_forward(&self, ctx: &Context) -> Result<()> {
		let history = self.navigation_entries(ctx).await?;
		let entry = next_entry(&history)?;
		debug!(entry_id = entry.id, url = %entry.url, "navigate forward");
		self.navigate_to_history_entry(ctx, entry.id).await
	}

	/// Current history index and the full entry list.
	pub async fn navigation_entries(&self, ctx: &Context) -> Result<NavigationHistory> {
		self.target.call(ctx, &GetNavigationHistory {}).await
	}

	/// Stops all navigation and pending resource loads. Does not wait.
	pub async fn stop(&self, ctx: &Context) -> Result<()> {
		self.target.call(ctx, &StopLoading {}).await.map(drop)
	}

	/// Captures the viewport (or `params.clip`) and returns the decoded image.
	pub async fn capture_screenshot(&self, ctx: &Context, params: &CaptureScreenshot) -> Result<Vec<u8>> {
		let shot = self.target.call(ctx, params).await?;
		BASE64_STANDARD
			.decode(shot.data.as_bytes())
			.map_err(|e| Error::Decode(format!("Failed to decode screenshot: {e}")))
	}

	pub async fn title(&self, ctx: &Context) -> Result<String> {
		self.evaluate_string(ctx, "document.title").await
	}

	/// The document's location as a string.
	pub async fn location(&self, ctx: &Context) -> Result<String> {
		self.evaluate_string(ctx, "document.location.toString()").await
	}

	async fn evaluate_string(&self, ctx: &Context, expression: &str) -> Result<String> {
		let evaluated = self.target.call(ctx, &Evaluate::by_value(expression)).await?;
		if let Some(details) = evaluated.exception_details {
			return Err(Error::Evaluation(details.message().to_string()));
		}

		match evaluated.result.value {
			Some(Value::String(s)) => Ok(s),
			other => Err(Error::Evaluation(format!("`{expression}` returned {} instead of a string: {other:?}", evaluated.result.kind))),
		}
	}

	/// Runs `trigger` between arming a `load` barrier and waiting on it.
	async fn load_after<T, F, Fut>(&self, ctx: &Context, command: &'static str, trigger: F) -> Result<T>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = Result<T>>,
	{
		let (wait, _release) = expect_lifecycle_loaded(ctx, &self.target);

		let acked = trigger().await.inspect_err(|e| debug!(command, error = %e, "command failed"))?;
		debug!(command, "command acknowledged, waiting for load");

		wait.wait().await.inspect_err(|e| debug!(command, error = %e, "load wait abandoned"))?;
		debug!(command, "load reached");
		Ok(acked)
	}
}
