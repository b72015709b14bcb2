use std::io::Write;

use cdpnav::{Context, Page};
use cdpnav_protocol::Reload;
use tracing::info;

use crate::error::Result;

pub async fn navigate(page: &Page, ctx: &Context, url: &str, out: &mut impl Write) -> Result<()> {
	page.navigate(ctx, url).await?;
	report_location(page, ctx, out).await
}

pub async fn reload(page: &Page, ctx: &Context, ignore_cache: bool, out: &mut impl Write) -> Result<()> {
	let params = Reload {
		ignore_cache: ignore_cache.then_some(true),
		..Default::default()
	};
	page.reload_with(ctx, params).await?;
	report_location(page, ctx, out).await
}

pub async fn back(page: &Page, ctx: &Context, out: &mut impl Write) -> Result<()> {
	page.navigate_back(ctx).await?;
	report_location(page, ctx, out).await
}

pub async fn forward(page: &Page, ctx: &Context, out: &mut impl Write) -> Result<()> {
	page.navigate_forward(ctx).await?;
	report_location(page, ctx, out).await
}

pub async fn stop(page: &Page, ctx: &Context) -> Result<()> {
	page.stop(ctx).await?;
	info!("stopped loading");
	Ok(())
}

/// Prints where the page ended up once it loaded.
async fn report_location(page: &Page, ctx: &Context, out: &mut impl Write) -> Result<()> {
	let location = page.location(ctx).await?;
	info!(%location, "loaded");
	writeln!(out, "{location}")?;
	Ok(())
}
