use std::io::Write;

use cdpnav::{Context, Page};

use crate::error::Result;

pub async fn title(page: &Page, ctx: &Context, out: &mut impl Write) -> Result<()> {
	writeln!(out, "{}", page.title(ctx).await?)?;
	Ok(())
}

pub async fn location(page: &Page, ctx: &Context, out: &mut impl Write) -> Result<()> {
	writeln!(out, "{}", page.location(ctx).await?)?;
	Ok(())
}
