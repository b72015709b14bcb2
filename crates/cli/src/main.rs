use clap::Parser;
use cdpnav_cli::cli::Cli;
use cdpnav_cli::logging;
use tracing::error;

#[tokio::main]
async fn main() {
	let cli = Cli::parse();
	logging::init_logging(cli.verbose);

	if let Err(err) = cdpnav_cli::run(cli).await {
		error!(error = %err, "command failed");
		std::process::exit(err.exit_code());
	}
}
