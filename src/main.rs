use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use std::process;
use tracing::error;
use tracing_subscriber::EnvFilter;

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evolve a compact placement for a set of pattern pieces
    Search(cmd::search::SearchArgs),
    /// Report overlaps and workspace violations of a placement
    Check(cmd::check::CheckArgs),
}

fn main() {
    // Raw matches tell user-typed flags apart from defaults when merging a config file.
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    let level = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match &cli.command {
        Commands::Search(args) => cmd::search::run(args, matches.subcommand_matches("search")),
        Commands::Check(args) => cmd::check::run(args),
    };

    if let Err(e) = result {
        error!("{}", e);
        process::exit(1);
    }
}
