use clap::Parser;
use tracing_subscriber::EnvFilter;

mod catalog;
mod chemistry;
mod cli;
mod core;
mod matching;
mod parsing;
mod utils;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("lipid_solver=debug,info")
    } else {
        EnvFilter::new("lipid_solver=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        cli::Commands::Annotate(args) => {
            cli::annotate::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Library(args) => {
            cli::library::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Classes => {
            cli::classes::run(cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
