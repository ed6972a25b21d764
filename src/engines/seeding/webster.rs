use super::timing::{
    all_red_time, amber_time, flow_ratio, green_time, sample_arrivals, webster_cycle_length,
};
use crate::error::{Result, SignalTuneError};
use crate::types::{IntersectionParams, PhaseConfig, TrafficConfiguration, DEFAULT_MIN_GREEN};
use rand::Rng;

/// Default bound on Poisson redraws before demand is declared infeasible
pub const DEFAULT_MAX_ATTEMPTS: usize = 1000;

/// Everything computed for one accepted arrival draw
#[derive(Debug, Clone)]
pub struct WebsterDraw {
    pub arrivals: Vec<f64>,
    pub flow_ratios: Vec<f64>,
    pub critical_ratio: f64,
    pub lost_time: f64,
    pub cycle_length: f64,
    pub plan: TrafficConfiguration,
}

/// Produces capacity-feasible timing plans from sampled arrivals using
/// Webster's optimal cycle formula.
pub struct WebsterSeeder<'a> {
    params: &'a IntersectionParams,
    max_attempts: usize,
    min_green: f64,
}

impl<'a> WebsterSeeder<'a> {
    pub fn new(params: &'a IntersectionParams) -> Self {
        Self {
            params,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            min_green: DEFAULT_MIN_GREEN,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_min_green(mut self, min_green: f64) -> Self {
        self.min_green = min_green;
        self
    }

    /// Seed one timing plan
    pub fn seed<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<TrafficConfiguration> {
        self.seed_draw(rng).map(|draw| draw.plan)
    }

    /// Seed one timing plan, keeping the accepted draw alongside it.
    ///
    /// Arrivals are redrawn while the summed flow ratio is oversaturated
    /// (`Y >= 1`), up to `max_attempts` draws.
    pub fn seed_draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<WebsterDraw> {
        self.params.validate()?;

        let mut last_critical_ratio = f64::NAN;
        for attempt in 1..=self.max_attempts {
            let arrivals: Vec<f64> = self
                .params
                .lambda_rates
                .iter()
                .map(|&lambda| sample_arrivals(lambda, rng))
                .collect();

            let flow_ratios: Vec<f64> = arrivals
                .iter()
                .zip(&self.params.saturation_flows)
                .map(|(&q, &s)| flow_ratio(q, s))
                .collect();
            let critical_ratio: f64 = flow_ratios.iter().sum();

            if critical_ratio < 1.0 {
                if attempt > 1 {
                    log::debug!(
                        "Accepted arrival draw after {} attempts (Y = {:.3})",
                        attempt,
                        critical_ratio
                    );
                }
                return Ok(self.build_plan(arrivals, flow_ratios, critical_ratio));
            }
            last_critical_ratio = critical_ratio;
        }

        Err(SignalTuneError::InfeasibleDemand {
            attempts: self.max_attempts,
            last_critical_ratio,
        })
    }

    fn build_plan(
        &self,
        arrivals: Vec<f64>,
        flow_ratios: Vec<f64>,
        critical_ratio: f64,
    ) -> WebsterDraw {
        let p = self.params;
        let amber = amber_time(p.reaction_time, p.vehicle_speed, p.deceleration_rate);
        let all_reds: Vec<f64> = p
            .road_widths
            .iter()
            .map(|&width| all_red_time(width, p.vehicle_length, p.vehicle_speed))
            .collect();

        let lost_time = amber * all_reds.len() as f64 + all_reds.iter().sum::<f64>();
        let cycle_length = webster_cycle_length(lost_time, critical_ratio);

        let phases = flow_ratios
            .iter()
            .zip(&all_reds)
            .map(|(&y, &all_red)| {
                let green =
                    green_time(y, critical_ratio, cycle_length, lost_time).max(self.min_green);
                PhaseConfig::new(green, amber, all_red)
            })
            .collect();

        WebsterDraw {
            arrivals,
            flow_ratios,
            critical_ratio,
            lost_time,
            cycle_length,
            plan: TrafficConfiguration::new(phases),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_reference_intersection() {
        let params = IntersectionParams::default();
        let seeder = WebsterSeeder::new(&params);
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..50 {
            let draw = seeder.seed_draw(&mut rng).unwrap();
            assert!(draw.critical_ratio < 1.0);
            assert_eq!(draw.plan.len(), 4);
            // amber 3 s + all-red 1 s on each of four phases
            assert_eq!(draw.lost_time, 16.0);
            for phase in draw.plan.iter() {
                assert!(phase.green >= DEFAULT_MIN_GREEN);
                assert_eq!(phase.amber, 3.0);
                assert_eq!(phase.all_red, 1.0);
            }
        }
    }

    #[test]
    fn test_oversaturated_demand_is_rejected() {
        let params = IntersectionParams {
            saturation_flows: vec![600.0, 600.0],
            lambda_rates: vec![50.0, 50.0],
            ..IntersectionParams::default()
        };
        let params = IntersectionParams {
            road_widths: vec![3.2, 3.2],
            ..params
        };
        let seeder = WebsterSeeder::new(&params).with_max_attempts(25);
        let mut rng = StdRng::seed_from_u64(1);

        match seeder.seed(&mut rng) {
            Err(SignalTuneError::InfeasibleDemand { attempts, last_critical_ratio }) => {
                assert_eq!(attempts, 25);
                assert!(last_critical_ratio >= 1.0);
            }
            other => panic!("expected infeasible demand, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_saturation_phase_gets_min_green() {
        let params = IntersectionParams {
            saturation_flows: vec![1800.0, 0.0],
            lambda_rates: vec![6.0, 6.0],
            road_widths: vec![3.2, 3.2],
            ..IntersectionParams::default()
        };
        let seeder = WebsterSeeder::new(&params);
        let mut rng = StdRng::seed_from_u64(3);

        let draw = seeder.seed_draw(&mut rng).unwrap();
        assert_eq!(draw.flow_ratios[1], 0.0);
        assert_eq!(draw.plan.phases()[1].green, DEFAULT_MIN_GREEN);
    }
}
