use crate::reports;
use clap::{ArgMatches, Args};
use nestforge::config::Config;
use nestforge::error::NestResult;
use nestforge::genome::Genome;
use nestforge::geometry::PieceSet;
use nestforge::optimizer::{GenerationHistory, GenerationReport, OptimizerParams, ProgressCallback};
use nestforge::placement::PlacementFile;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    #[command(flatten)]
    pub config: Config,

    /// JSON file with the pattern-piece outlines
    #[arg(short, long)]
    pub pieces: PathBuf,

    /// JSON config file; flags given on the command line override it
    #[arg(long = "config")]
    pub config_path: Option<PathBuf>,

    #[arg(short = 'S', long)]
    pub seed: Option<u64>,

    /// Write per-generation best/mean fitness as CSV
    #[arg(long)]
    pub history: Option<PathBuf>,

    /// Write the best placement as JSON
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Start from the pieces as drawn in the piece file
    #[arg(long, default_value_t = false)]
    pub seed_from_drawing: bool,

    /// Print progress every N generations (0 disables)
    #[arg(long, default_value_t = 10)]
    pub report_interval: usize,
}

struct ConsoleProgress {
    interval: usize,
}

impl ProgressCallback for ConsoleProgress {
    fn on_generation(&self, report: &GenerationReport) {
        if self.interval > 0 && report.generation % self.interval == 0 {
            println!(
                "Gen {:5} | Best: {:.2} | Mean: {:.2}",
                report.generation, report.best_fitness, report.mean_fitness
            );
        }
    }
}

fn resolve_config(args: &SearchArgs, matches: Option<&ArgMatches>) -> NestResult<Config> {
    let Some(path) = &args.config_path else {
        return Ok(args.config.clone());
    };

    info!("Loading config from {}", path.display());
    let mut config = Config::load_from_file(path)?;
    if let Some(m) = matches {
        config.merge_from_cli(&args.config, m);
    }
    Ok(config)
}

pub fn run(args: &SearchArgs, matches: Option<&ArgMatches>) -> NestResult<()> {
    let config = resolve_config(args, matches)?;
    config.validate()?;
    let workspace = config.workspace.to_workspace()?;

    info!("Loading pieces from {}", args.pieces.display());
    let pieces = Arc::new(PieceSet::load_from_file(&args.pieces)?);

    let mut initial = Vec::new();
    if args.seed_from_drawing {
        initial.push(Genome::from_vector(pieces.reference_genes())?);
    }

    let mut optimizer = OptimizerParams::builder()
        .config(config.evolution.clone())
        .workspace(workspace)
        .pieces(pieces.clone())
        .seed(args.seed)
        .initial_genomes(initial)
        .build()
        .build_optimizer()?;
    info!(
        "Fitness mode: {} | {}",
        optimizer.objective().mode(),
        workspace
    );

    let history = GenerationHistory::new();
    let console = ConsoleProgress {
        interval: args.report_interval,
    };
    let result = optimizer.run((&history, console))?;

    reports::print_result(&result);
    reports::print_placement_table(&pieces, &result.genome);
    reports::print_feasibility(&pieces, &workspace, result.genome.genes());

    if let Some(path) = &args.history {
        history.write_csv(path)?;
        info!("Wrote {} generations to {}", history.len(), path.display());
    }

    if let Some(path) = &args.output {
        PlacementFile::from_genome(&pieces, &result.genome)
            .with_fingerprint(result.fingerprint())
            .save_to_file(path)?;
        info!("Wrote placement to {}", path.display());
    }

    Ok(())
}
