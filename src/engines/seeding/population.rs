use super::webster::WebsterSeeder;
use crate::config::SeedingConfig;
use crate::error::Result;
use crate::types::{IntersectionParams, Population};
use rand::Rng;

/// Build an initial population of `size` independently seeded timing plans.
pub fn generate_population<R: Rng + ?Sized>(
    size: usize,
    params: &IntersectionParams,
    seeding: &SeedingConfig,
    min_green: f64,
    rng: &mut R,
) -> Result<Population> {
    let seeder = WebsterSeeder::new(params)
        .with_max_attempts(seeding.max_attempts)
        .with_min_green(min_green);

    let population = (0..size)
        .map(|_| seeder.seed(rng))
        .collect::<Result<Population>>()?;

    log::info!(
        "Seeded {} timing plans over {} phases",
        population.len(),
        params.phase_count()
    );
    Ok(population)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DEFAULT_MIN_GREEN;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_population_size_and_shape() {
        let params = IntersectionParams::default();
        let mut rng = StdRng::seed_from_u64(11);

        let seeding = SeedingConfig::default();
        let population =
            generate_population(20, &params, &seeding, DEFAULT_MIN_GREEN, &mut rng).unwrap();

        assert_eq!(population.len(), 20);
        assert!(population.iter().all(|plan| plan.len() == 4));
    }

    #[test]
    fn test_same_seed_same_population() {
        let params = IntersectionParams::default();
        let seeding = SeedingConfig::default();

        let seeded = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            generate_population(5, &params, &seeding, DEFAULT_MIN_GREEN, &mut rng).unwrap()
        };
        assert_eq!(seeded(9), seeded(9));
    }

    #[test]
    fn test_invalid_params_fail_seeding() {
        let params = IntersectionParams {
            lambda_rates: vec![6.0],
            ..IntersectionParams::default()
        };
        let mut rng = StdRng::seed_from_u64(0);
        let seeding = SeedingConfig::default();
        assert!(generate_population(3, &params, &seeding, DEFAULT_MIN_GREEN, &mut rng).is_err());
    }
}
