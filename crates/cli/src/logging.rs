use tracing_subscriber::EnvFilter;

/// Installs the stderr subscriber.
///
/// `RUST_LOG` wins when set; otherwise `-v` enables info and `-vv` debug for
/// the cdpnav crates, with everything else at warn.
pub fn init_logging(verbose: u8) {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

	let _ = tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(verbose > 1)
		.try_init();
}

fn default_directives(verbose: u8) -> String {
	let level = match verbose {
		0 => return "warn".to_string(),
		1 => "info",
		_ => "debug",
	};
	["cdpnav", "cdpnav_cli", "cdpnav_runtime"].iter().fold("warn".to_string(), |acc, krate| format!("{acc},{krate}={level}"))
}
