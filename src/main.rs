mod cli;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt::time::ChronoUtc};

fn main() -> anyhow::Result<()> {
    let args = cli::Args::parse();

    let default_filter = if args.global.verbose {
        "sedbuilder=debug"
    } else {
        "sedbuilder=info"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let multiprogress = indicatif::MultiProgress::new();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(ChronoUtc::new("%Y-%m-%dT%H:%M:%SZ".to_owned()))
        .with_writer(cli::spinner::SuspendingWriter::new(multiprogress.clone()))
        .init();

    cli::run(args, multiprogress)
}
