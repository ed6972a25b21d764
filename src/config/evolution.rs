use super::traits::{invalid, ConfigSection};
use crate::error::SignalTuneError;
use crate::types::DEFAULT_MIN_GREEN;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub population_size: usize,
    pub generation_limit: usize,
    pub crossover_points: usize,   // upper bound on cut points per crossover
    pub offspring_per_pair: usize, // children produced from one selected pair
    pub mutation_delta: f64,       // max green shift (s) per mutation
    pub min_green: f64,
    pub selection_weighting: SelectionWeighting,
    pub parallel_evaluation: bool,
    pub seed: Option<u64>,
}

/// How roulette selection turns a fitness score into a draw weight.
///
/// `RawFitness` weights by the score itself. Scores are minimised, so this
/// favours worse plans; it is the default because existing tuned runs depend
/// on it. `InverseFitness` and `Rank` apply real minimisation pressure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionWeighting {
    #[default]
    RawFitness,
    InverseFitness,
    Rank,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 20,
            generation_limit: 50,
            crossover_points: 2,
            offspring_per_pair: 3,
            mutation_delta: 5.0,
            min_green: DEFAULT_MIN_GREEN,
            selection_weighting: SelectionWeighting::default(),
            parallel_evaluation: false,
            seed: None,
        }
    }
}

impl ConfigSection for EvolutionConfig {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<(), SignalTuneError> {
        let section = Self::section_name();
        if self.population_size == 0 {
            return Err(invalid(section, "Population size must be at least 1"));
        }
        if self.crossover_points == 0 {
            return Err(invalid(section, "Crossover needs at least one cut point"));
        }
        if self.offspring_per_pair == 0 {
            return Err(invalid(section, "Offspring per pair must be at least 1"));
        }
        if !self.mutation_delta.is_finite() || self.mutation_delta < 0.0 {
            return Err(invalid(section, "Mutation delta must be a non-negative number"));
        }
        if !self.min_green.is_finite() || self.min_green < 0.0 {
            return Err(invalid(section, "Minimum green must be a non-negative number"));
        }
        Ok(())
    }
}
