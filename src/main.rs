use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod core;
mod matching;
mod parsing;
mod report;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("ar_recon=debug,info")
    } else {
        EnvFilter::new("ar_recon=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        cli::Commands::Reconcile(args) => {
            cli::reconcile::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Sample(args) => {
            cli::sample::run(args, cli.verbose)?;
        }
    }

    Ok(())
}
