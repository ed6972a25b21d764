use crate::error::SignalTuneError;
use serde::{Deserialize, Serialize};

/// Trait for configuration sections
pub trait ConfigSection: Serialize + for<'de> Deserialize<'de> + Default + Clone {
    fn section_name() -> &'static str;
    fn validate(&self) -> Result<(), SignalTuneError>;
}

pub(crate) fn invalid(section: &str, message: &str) -> SignalTuneError {
    SignalTuneError::Configuration(format!("[{}] {}", section, message))
}
