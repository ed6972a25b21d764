use crate::engines::generation::{EvolutionOutcome, GenerationSummary};
use crate::error::Result;
use crate::types::ScoredPlan;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Serializable summary of one optimization run.
///
/// Sentinel scores are infinite and serialize to JSON `null`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub timestamp: String,
    pub generations_run: usize,
    pub best: Option<ScoredPlan>,
    pub population: Vec<ScoredPlan>,
    pub history: Vec<GenerationSummary>,
}

impl RunReport {
    pub fn from_outcome(outcome: &EvolutionOutcome) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            generations_run: outcome.generations_run,
            best: outcome.best().cloned(),
            population: outcome.population.clone(),
            history: outcome.history.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
