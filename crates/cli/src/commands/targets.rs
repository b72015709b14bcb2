use std::io::Write;

use cdpnav::Context;

use crate::error::Result;
use crate::session::BrowserConnection;

pub async fn run(browser: &BrowserConnection, ctx: &Context, out: &mut impl Write) -> Result<()> {
	for target in browser.page_targets(ctx).await? {
		writeln!(out, "{}  {}  {}", target.id, target.url, target.title)?;
	}
	Ok(())
}
