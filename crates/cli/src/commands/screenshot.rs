use std::io::Write;
use std::path::Path;

use cdpnav::{Context, Page};
use cdpnav_protocol::CaptureScreenshot;
use tracing::info;

use crate::cli::ImageFormat;
use crate::error::{CliError, Result};

pub async fn run(page: &Page, ctx: &Context, output: &Path, format: ImageFormat, quality: Option<i64>, out: &mut impl Write) -> Result<()> {
	let params = CaptureScreenshot {
		format: Some(format.into()),
		// The browser rejects a quality for png.
		quality: quality.filter(|_| format != ImageFormat::Png),
		..Default::default()
	};
	let image = page.capture_screenshot(ctx, &params).await?;
	write_image(output, &image)?;

	info!(path = %output.display(), bytes = image.len(), "screenshot saved");
	writeln!(out, "{}", output.display())?;
	Ok(())
}

/// Writes `image` to `path`, creating missing parent directories.
pub fn write_image(path: &Path, image: &[u8]) -> Result<()> {
	let write_err = |source| CliError::Write {
		path: path.to_path_buf(),
		source,
	};

	if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
		std::fs::create_dir_all(parent).map_err(write_err)?;
	}
	std::fs::write(path, image).map_err(write_err)
}
