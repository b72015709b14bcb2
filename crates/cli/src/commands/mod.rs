//! Subcommand implementations.
//!
//! Each command writes its human-readable result to `out`; logging goes to
//! stderr through `tracing`.

mod history;
mod inspect;
mod navigation;
mod screenshot;
mod targets;

use std::io::Write;

use cdpnav::{Context, Page};

use crate::cli::{Commands, PageCommand};
use crate::error::Result;
use crate::session::BrowserConnection;

pub use history::render_history;
pub use screenshot::write_image;

/// Runs `command`, attaching to `target` (or the first page) for page commands.
pub async fn run_command(command: &Commands, browser: &BrowserConnection, ctx: &Context, target: Option<&str>, out: &mut impl Write) -> Result<()> {
	match command {
		Commands::Targets => targets::run(browser, ctx, out).await,
		Commands::Page(command) => {
			let page = browser.attach_page(ctx, target).await?;
			run_page_command(command, &page, ctx, out).await
		}
	}
}

/// Runs a page command against `page`.
pub async fn run_page_command(command: &PageCommand, page: &Page, ctx: &Context, out: &mut impl Write) -> Result<()> {
	match command {
		PageCommand::Navigate { url } => navigation::navigate(page, ctx, url, out).await,
		PageCommand::Reload { ignore_cache } => navigation::reload(page, ctx, *ignore_cache, out).await,
		PageCommand::Back => navigation::back(page, ctx, out).await,
		PageCommand::Forward => navigation::forward(page, ctx, out).await,
		PageCommand::Stop => navigation::stop(page, ctx).await,
		PageCommand::History => history::run(page, ctx, out).await,
		PageCommand::Screenshot { output, format, quality } => screenshot::run(page, ctx, output, *format, *quality, out).await,
		PageCommand::Title => inspect::title(page, ctx, out).await,
		PageCommand::Location => inspect::location(page, ctx, out).await,
	}
}
