use std::io::Write;

use cdpnav::{Context, Page};
use cdpnav_protocol::NavigationHistory;

use crate::error::Result;

pub async fn run(page: &Page, ctx: &Context, out: &mut impl Write) -> Result<()> {
	let history = page.navigation_entries(ctx).await?;
	out.write_all(render_history(&history).as_bytes())?;
	Ok(())
}

/// One line per entry, oldest first, with `*` on the current one.
pub fn render_history(history: &NavigationHistory) -> String {
	let mut rendered = String::new();
	for (index, entry) in history.entries.iter().enumerate() {
		let marker = if index as i64 == history.current_index { '*' } else { ' ' };
		rendered.push_str(&format!("{marker} {index:>2}  {}", entry.url));
		if !entry.title.is_empty() {
			rendered.push_str(&format!("  ({})", entry.title));
		}
		rendered.push('\n');
	}
	rendered
}
