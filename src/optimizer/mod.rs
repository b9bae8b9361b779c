pub mod crossover;
pub mod elitism;
pub mod history;
pub mod mutation;
pub mod runner;
pub mod scaling;
pub mod selection;

pub use self::history::GenerationHistory;
pub use self::runner::{
    EvolutionState, GenerationReport, NoProgress, OptimizationResult, Optimizer, OptimizerParams,
    ProgressCallback,
};
