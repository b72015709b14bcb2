pub mod cli;
pub mod commands;
pub mod discovery;
pub mod error;
pub mod logging;
pub mod session;

use std::time::Duration;

use cdpnav::Context;
use tracing::debug;

use crate::cli::Cli;
use crate::error::Result;
use crate::session::BrowserConnection;

/// Governing context for one invocation; a zero timeout means no deadline.
pub fn command_context(timeout_ms: u64) -> Context {
	match timeout_ms {
		0 => Context::new(),
		ms => Context::with_timeout(Duration::from_millis(ms)),
	}
}

/// Runs `cli.command` against the configured endpoint, writing results to stdout.
pub async fn run(cli: Cli) -> Result<()> {
	let ctx = command_context(cli.timeout_ms);
	debug!(endpoint = %cli.endpoint, timeout_ms = cli.timeout_ms, command = ?cli.command, "starting");

	let browser = BrowserConnection::open(&ctx, &cli.endpoint).await?;
	commands::run_command(&cli.command, &browser, &ctx, cli.target.as_deref(), &mut std::io::stdout()).await
}
