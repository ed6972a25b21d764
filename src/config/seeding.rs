use super::traits::{invalid, ConfigSection};
use crate::engines::seeding::DEFAULT_MAX_ATTEMPTS;
use crate::error::SignalTuneError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedingConfig {
    /// Arrival redraws allowed before demand is reported infeasible
    pub max_attempts: usize,
}

impl Default for SeedingConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl ConfigSection for SeedingConfig {
    fn section_name() -> &'static str {
        "seeding"
    }

    fn validate(&self) -> Result<(), SignalTuneError> {
        if self.max_attempts == 0 {
            return Err(invalid(Self::section_name(), "At least one seeding attempt is required"));
        }
        Ok(())
    }
}
