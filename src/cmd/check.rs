use crate::reports;
use clap::Args;
use nestforge::config::WorkspaceParams;
use nestforge::error::NestResult;
use nestforge::genome::Genome;
use nestforge::geometry::PieceSet;
use nestforge::placement::PlacementFile;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    #[command(flatten)]
    pub workspace: WorkspaceParams,

    #[arg(short, long)]
    pub pieces: PathBuf,

    /// Placement JSON from `search --output`; defaults to the pieces as drawn
    #[arg(long)]
    pub placement: Option<PathBuf>,
}

pub fn run(args: &CheckArgs) -> NestResult<()> {
    let workspace = args.workspace.to_workspace()?;
    let pieces = PieceSet::load_from_file(&args.pieces)?;

    let genome = match &args.placement {
        Some(path) => {
            info!("Checking placement {}", path.display());
            PlacementFile::load_from_file(path)?.to_genome(&pieces)?
        }
        None => Genome::from_vector(pieces.reference_genes())?,
    };

    reports::print_placement_table(&pieces, &genome);
    reports::print_feasibility(&pieces, &workspace, genome.genes());
    Ok(())
}
