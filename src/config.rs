use crate::error::{NestError, NestResult};
use crate::scorer::FitnessMode;
use crate::workspace::Workspace;
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Args, Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    #[command(flatten)]
    pub evolution: EvolutionConfig,
    #[command(flatten)]
    pub workspace: WorkspaceParams,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EvolutionConfig {
    #[arg(long, default_value_t = 100)]
    pub population_size: usize,
    #[arg(long, default_value_t = 200)]
    pub generations: usize,
    #[arg(long, default_value_t = 6)]
    pub elite_size: usize,

    /// Share of non-elite children produced by crossover
    #[arg(long, default_value_t = 0.7)]
    pub crossover_rate: f64,
    /// Upper bound of the blend factor from parent 1 towards parent 2
    #[arg(long, default_value_t = 0.5)]
    pub crossover_ratio: f64,
    /// Per-gene probability of resampling
    #[arg(long, default_value_t = 0.01)]
    pub mutation_rate: f64,

    // === FITNESS ===
    #[arg(long, default_value_t = FitnessMode::OverlapAware)]
    pub fitness_mode: FitnessMode,
    #[arg(long, default_value_t = 1.0)]
    pub overlap_penalty: f64,
    #[arg(long, default_value_t = 1.0)]
    pub boundary_penalty: f64,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            generations: 200,
            elite_size: 6,
            crossover_rate: 0.7,
            crossover_ratio: 0.5,
            mutation_rate: 0.01,
            fitness_mode: FitnessMode::OverlapAware,
            overlap_penalty: 1.0,
            boundary_penalty: 1.0,
        }
    }
}

/// Workspace dimensions in millimeters.
#[derive(Args, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorkspaceParams {
    #[arg(long, default_value_t = 1300.0)]
    pub ws_width: f64,
    #[arg(long, default_value_t = 2500.0)]
    pub ws_height: f64,
    #[arg(long, default_value_t = 10.0)]
    pub ws_step: f64,
    #[arg(long, default_value_t = 10.0)]
    pub ws_tolerance: f64,
}

impl Default for WorkspaceParams {
    fn default() -> Self {
        Self {
            ws_width: 1300.0,
            ws_height: 2500.0,
            ws_step: 10.0,
            ws_tolerance: 10.0,
        }
    }
}

/// Child-group sizes derived once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffspringSizes {
    pub elite: usize,
    pub crossover: usize,
    pub mutation: usize,
    pub parent: usize,
}

impl OffspringSizes {
    pub fn population(&self) -> usize {
        self.elite + self.crossover + self.mutation
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> NestResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn validate(&self) -> NestResult<()> {
        self.evolution.validate()?;
        self.workspace.to_workspace()?;
        Ok(())
    }

    /// Copies every flag the user typed explicitly over the values loaded from a file.
    pub fn merge_from_cli(&mut self, cli: &Config, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($group:ident, $field:ident) => {
                if matches.value_source(stringify!($field)) == Some(ValueSource::CommandLine) {
                    self.$group.$field = cli.$group.$field.clone();
                }
            };
        }

        update_if_present!(evolution, population_size);
        update_if_present!(evolution, generations);
        update_if_present!(evolution, elite_size);
        update_if_present!(evolution, crossover_rate);
        update_if_present!(evolution, crossover_ratio);
        update_if_present!(evolution, mutation_rate);
        update_if_present!(evolution, fitness_mode);
        update_if_present!(evolution, overlap_penalty);
        update_if_present!(evolution, boundary_penalty);

        update_if_present!(workspace, ws_width);
        update_if_present!(workspace, ws_height);
        update_if_present!(workspace, ws_step);
        update_if_present!(workspace, ws_tolerance);
    }
}

impl EvolutionConfig {
    pub fn validate(&self) -> NestResult<()> {
        if self.population_size == 0 {
            return Err(invalid("population_size must be positive"));
        }
        if self.generations == 0 {
            return Err(invalid("generations must be positive"));
        }
        if self.elite_size >= self.population_size {
            return Err(invalid(format!(
                "elite_size ({}) must be smaller than population_size ({})",
                self.elite_size, self.population_size
            )));
        }

        check_unit_interval("crossover_rate", self.crossover_rate)?;
        check_unit_interval("crossover_ratio", self.crossover_ratio)?;
        check_unit_interval("mutation_rate", self.mutation_rate)?;

        for (name, value) in [
            ("overlap_penalty", self.overlap_penalty),
            ("boundary_penalty", self.boundary_penalty),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(format!("{} must be a non-negative number", name)));
            }
        }

        let sizes = self.raw_offspring_sizes();
        if sizes.population() != self.population_size
            || sizes.parent != 2 * sizes.crossover + sizes.mutation
        {
            return Err(invalid(format!(
                "derived sizes {:?} do not add up to population_size {}",
                sizes, self.population_size
            )));
        }
        Ok(())
    }

    /// Validates the configuration and derives the per-generation group sizes.
    pub fn offspring_sizes(&self) -> NestResult<OffspringSizes> {
        self.validate()?;
        Ok(self.raw_offspring_sizes())
    }

    fn raw_offspring_sizes(&self) -> OffspringSizes {
        let breeding = self.population_size.saturating_sub(self.elite_size);
        let crossover = ((self.crossover_rate * breeding as f64).round() as usize).min(breeding);
        let mutation = breeding - crossover;

        OffspringSizes {
            elite: self.elite_size,
            crossover,
            mutation,
            parent: 2 * crossover + mutation,
        }
    }
}

impl WorkspaceParams {
    pub fn to_workspace(&self) -> NestResult<Workspace> {
        Workspace::new(self.ws_width, self.ws_height, self.ws_step, self.ws_tolerance)
    }
}

fn check_unit_interval(name: &str, value: f64) -> NestResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(format!("{} must lie in [0, 1], got {}", name, value)))
    }
}

fn invalid(msg: impl Into<String>) -> NestError {
    NestError::InvalidConfiguration(msg.into())
}
