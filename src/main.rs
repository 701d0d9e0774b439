use anyhow::Result;
use clap::Parser;
use expense_tracker::cli::Cli;
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt, Layer};

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);
    cli.run()
}

/// Diagnostics go to stderr so they never mix with command output.
fn setup_logging(verbose: bool) {
    let level = if verbose {
        filter::LevelFilter::DEBUG
    } else {
        filter::LevelFilter::WARN
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time()
                .with_filter(level),
        )
        .init();
}
