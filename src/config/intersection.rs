use super::traits::{invalid, ConfigSection};
use crate::error::SignalTuneError;
use crate::types::IntersectionParams;

impl ConfigSection for IntersectionParams {
    fn section_name() -> &'static str {
        "intersection"
    }

    fn validate(&self) -> Result<(), SignalTuneError> {
        IntersectionParams::validate(self)
            .map_err(|e| invalid(Self::section_name(), &e.to_string()))
    }
}
