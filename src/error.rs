use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SignalTuneError {
    #[error("Infeasible demand: no draw with critical ratio below 1 after {attempts} attempts (last Y = {last_critical_ratio:.3})")]
    InfeasibleDemand {
        attempts: usize,
        last_critical_ratio: f64,
    },

    #[error("Phase count mismatch: expected {expected}, got {actual}")]
    PhaseCountMismatch { expected: usize, actual: usize },

    #[error("Population size mismatch: expected {expected}, got {actual}")]
    PopulationSize { expected: usize, actual: usize },

    #[error("Population is empty")]
    EmptyPopulation,

    #[error("Invalid intersection parameters: {0}")]
    InvalidParams(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Evaluation error: {0}")]
    Evaluation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Pipeline stage an error originated from, used in user-facing failure reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Configuration,
    Seeding,
    Evaluation,
    Recombination,
    Evolution,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Configuration => "configuration",
            Stage::Seeding => "seeding",
            Stage::Evaluation => "evaluation",
            Stage::Recombination => "recombination",
            Stage::Evolution => "evolution",
        };
        f.write_str(name)
    }
}

impl SignalTuneError {
    pub fn stage(&self) -> Stage {
        match self {
            SignalTuneError::InfeasibleDemand { .. } | SignalTuneError::InvalidParams(_) => {
                Stage::Seeding
            }
            SignalTuneError::PhaseCountMismatch { .. } => Stage::Recombination,
            SignalTuneError::PopulationSize { .. } | SignalTuneError::EmptyPopulation => {
                Stage::Evolution
            }
            SignalTuneError::Configuration(_) => Stage::Configuration,
            SignalTuneError::Evaluation(_) => Stage::Evaluation,
            SignalTuneError::Io(_) | SignalTuneError::Serde(_) => Stage::Configuration,
        }
    }
}

pub type Result<T> = std::result::Result<T, SignalTuneError>;
