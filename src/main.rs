use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod client;
mod core;
mod mapping;
mod matching;
mod parsing;
mod resolver;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("segment_mapper=debug,info")
    } else {
        EnvFilter::new("segment_mapper=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        cli::Commands::Map(args) => {
            cli::map::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Toc(args) => {
            cli::toc::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::UploadSegments(args) => {
            cli::upload::run(args, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
