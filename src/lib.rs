pub mod config;
pub mod error;
pub mod genome;
pub mod geometry;
pub mod optimizer;
pub mod placement;
pub mod population;
pub mod scorer;
pub mod workspace;

pub use crate::config::{Config, EvolutionConfig, OffspringSizes, WorkspaceParams};
pub use crate::error::{NestError, NestResult};
pub use crate::genome::Genome;
pub use crate::optimizer::{OptimizationResult, Optimizer, OptimizerParams};
pub use crate::population::Population;
pub use crate::workspace::Workspace;
