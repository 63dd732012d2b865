mod cli;
mod dispatcher;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use tracing_subscriber::EnvFilter;
use transition_report::config::ReportConfig;

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays clean for --json output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let config = ReportConfig::load(cli.config.as_deref())?;

    dispatcher::dispatch_command(cli.command, &config)
}
