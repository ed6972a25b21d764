use super::traits::{invalid, ConfigSection};
use crate::error::SignalTuneError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    /// Simulator executable, required by the command oracle. `{workdir}`,
    /// `{plan}` and `{cwd}` are expanded in `args`.
    pub program: String,
    pub args: Vec<String>,
    pub score_source: ScoreSource,
    /// Trip records file, relative to the scratch directory
    pub trip_file: String,
    pub scratch_root: Option<PathBuf>,
    pub weights: ScoreWeights,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreSource {
    Stdout,
    TripFile,
}

/// Weights combining per-trip averages into one cost
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub time_loss: f64,
    pub waiting: f64,
    pub stops: f64,
    pub delays: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            time_loss: 0.5,
            waiting: 0.4,
            stops: 0.4,
            delays: 0.05,
        }
    }
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            program: String::new(),
            args: Vec::new(),
            score_source: ScoreSource::Stdout,
            trip_file: "trips.json".to_string(),
            scratch_root: None,
            weights: ScoreWeights::default(),
        }
    }
}

impl ConfigSection for OracleConfig {
    fn section_name() -> &'static str {
        "oracle"
    }

    fn validate(&self) -> Result<(), SignalTuneError> {
        let section = Self::section_name();
        if self.score_source == ScoreSource::TripFile && self.trip_file.trim().is_empty() {
            return Err(invalid(section, "Trip file name must not be empty"));
        }
        let w = &self.weights;
        if [w.time_loss, w.waiting, w.stops, w.delays]
            .iter()
            .any(|v| !v.is_finite() || *v < 0.0)
        {
            return Err(invalid(section, "Score weights must be non-negative numbers"));
        }
        Ok(())
    }
}
