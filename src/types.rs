use crate::error::{Result, SignalTuneError};
use serde::{Deserialize, Serialize};

/// Minimum green time (s) every phase must keep after any operator.
pub const DEFAULT_MIN_GREEN: f64 = 5.0;

/// Timing of a single signal phase, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseConfig {
    pub green: f64,
    pub amber: f64,
    pub all_red: f64,
}

impl PhaseConfig {
    pub fn new(green: f64, amber: f64, all_red: f64) -> Self {
        Self { green, amber, all_red }
    }

    pub fn duration(&self) -> f64 {
        self.green + self.amber + self.all_red
    }
}

/// A complete timing plan: one phase per controlled movement, in cycle order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrafficConfiguration {
    phases: Vec<PhaseConfig>,
}

impl TrafficConfiguration {
    pub fn new(phases: Vec<PhaseConfig>) -> Self {
        Self { phases }
    }

    pub fn phases(&self) -> &[PhaseConfig] {
        &self.phases
    }

    pub fn phases_mut(&mut self) -> &mut [PhaseConfig] {
        &mut self.phases
    }

    pub fn len(&self) -> usize {
        self.phases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PhaseConfig> {
        self.phases.iter()
    }

    pub fn cycle_length(&self) -> f64 {
        self.phases.iter().map(PhaseConfig::duration).sum()
    }

    pub fn total_green(&self) -> f64 {
        self.phases.iter().map(|p| p.green).sum()
    }

    /// True when every phase keeps at least `min_green` seconds of green.
    pub fn satisfies_min_green(&self, min_green: f64) -> bool {
        self.phases.iter().all(|p| p.green >= min_green)
    }

    pub fn clamp_min_green(&mut self, min_green: f64) {
        for phase in &mut self.phases {
            phase.green = phase.green.max(min_green);
        }
    }
}

impl From<Vec<PhaseConfig>> for TrafficConfiguration {
    fn from(phases: Vec<PhaseConfig>) -> Self {
        Self::new(phases)
    }
}

impl<'a> IntoIterator for &'a TrafficConfiguration {
    type Item = &'a PhaseConfig;
    type IntoIter = std::slice::Iter<'a, PhaseConfig>;

    fn into_iter(self) -> Self::IntoIter {
        self.phases.iter()
    }
}

/// One generation's candidate pool
pub type Population = Vec<TrafficConfiguration>;

/// A plan paired with the score the fitness oracle assigned to it (lower is better)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredPlan {
    pub plan: TrafficConfiguration,
    pub fitness: f64,
}

/// Static physical and operational inputs of one intersection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntersectionParams {
    pub saturation_flows: Vec<f64>, // veh/hour per phase
    pub lambda_rates: Vec<f64>,     // mean arrivals (veh/min) per phase
    pub reaction_time: f64,         // s
    pub road_widths: Vec<f64>,      // approach width per phase (m)
    pub vehicle_speed: f64,         // m/s
    pub deceleration_rate: f64,     // m/s^2
    pub vehicle_length: f64,        // m
}

impl Default for IntersectionParams {
    fn default() -> Self {
        Self {
            saturation_flows: vec![1800.0; 4],
            lambda_rates: vec![6.0; 4],
            reaction_time: 1.0,
            road_widths: vec![3.2; 4],
            vehicle_speed: 13.89,
            deceleration_rate: 4.5,
            vehicle_length: 5.0,
        }
    }
}

impl IntersectionParams {
    pub fn phase_count(&self) -> usize {
        self.saturation_flows.len()
    }

    pub fn validate(&self) -> Result<()> {
        let phases = self.phase_count();
        if phases == 0 {
            return Err(SignalTuneError::InvalidParams(
                "At least one phase is required".to_string(),
            ));
        }
        for (name, len) in [
            ("lambda_rates", self.lambda_rates.len()),
            ("road_widths", self.road_widths.len()),
        ] {
            if len != phases {
                return Err(SignalTuneError::InvalidParams(format!(
                    "{} has {} entries but saturation_flows has {}",
                    name, len, phases
                )));
            }
        }
        if self.vehicle_speed <= 0.0 || self.deceleration_rate <= 0.0 {
            return Err(SignalTuneError::InvalidParams(
                "Vehicle speed and deceleration rate must be positive".to_string(),
            ));
        }
        let any_negative = self
            .saturation_flows
            .iter()
            .chain(&self.lambda_rates)
            .chain(&self.road_widths)
            .chain([&self.reaction_time, &self.vehicle_length])
            .any(|v| *v < 0.0 || !v.is_finite());
        if any_negative {
            return Err(SignalTuneError::InvalidParams(
                "Flows, rates and distances must be finite and non-negative".to_string(),
            ));
        }
        if self.saturation_flows.iter().all(|s| *s == 0.0) {
            return Err(SignalTuneError::InvalidParams(
                "Every saturation flow is zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_length_and_green_sum() {
        let plan = TrafficConfiguration::new(vec![
            PhaseConfig::new(30.0, 3.0, 1.0),
            PhaseConfig::new(20.0, 3.0, 1.0),
        ]);
        assert_eq!(plan.cycle_length(), 58.0);
        assert_eq!(plan.total_green(), 50.0);
    }

    #[test]
    fn test_clamp_min_green() {
        let mut plan = TrafficConfiguration::new(vec![
            PhaseConfig::new(2.0, 3.0, 1.0),
            PhaseConfig::new(12.0, 3.0, 1.0),
        ]);
        assert!(!plan.satisfies_min_green(DEFAULT_MIN_GREEN));
        plan.clamp_min_green(DEFAULT_MIN_GREEN);
        assert_eq!(plan.phases()[0].green, 5.0);
        assert_eq!(plan.phases()[1].green, 12.0);
    }

    #[test]
    fn test_params_validation() {
        assert!(IntersectionParams::default().validate().is_ok());

        let mut misaligned = IntersectionParams::default();
        misaligned.road_widths.pop();
        assert!(matches!(
            misaligned.validate(),
            Err(SignalTuneError::InvalidParams(_))
        ));

        let mut no_capacity = IntersectionParams::default();
        no_capacity.saturation_flows = vec![0.0; 4];
        assert!(no_capacity.validate().is_err());

        let mut stopped = IntersectionParams::default();
        stopped.vehicle_speed = 0.0;
        assert!(stopped.validate().is_err());
    }

    #[test]
    fn test_plan_serializes_as_phase_list() {
        let plan = TrafficConfiguration::new(vec![PhaseConfig::new(10.0, 3.0, 1.0)]);
        let json = serde_json::to_string(&plan).unwrap();
        assert_eq!(json, r#"[{"green":10.0,"amber":3.0,"all_red":1.0}]"#);
    }
}
