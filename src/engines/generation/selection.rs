use crate::config::SelectionWeighting;
use crate::error::{Result, SignalTuneError};
use crate::types::{ScoredPlan, TrafficConfiguration};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

/// Roulette draw weight of every individual under `weighting`.
///
/// Sentinel (non-finite) and negative scores always weigh 0.
pub fn selection_weights(scored: &[ScoredPlan], weighting: SelectionWeighting) -> Vec<f64> {
    let usable = |fitness: f64| fitness.is_finite() && fitness >= 0.0;

    match weighting {
        SelectionWeighting::RawFitness => scored
            .iter()
            .map(|s| if usable(s.fitness) { s.fitness } else { 0.0 })
            .collect(),
        SelectionWeighting::InverseFitness => scored
            .iter()
            .map(|s| if usable(s.fitness) { 1.0 / (1.0 + s.fitness) } else { 0.0 })
            .collect(),
        SelectionWeighting::Rank => {
            let mut order: Vec<usize> = (0..scored.len()).collect();
            order.sort_by(|&a, &b| scored[a].fitness.total_cmp(&scored[b].fitness));

            let n = scored.len();
            let mut weights = vec![0.0; n];
            for (rank, &idx) in order.iter().enumerate() {
                if usable(scored[idx].fitness) {
                    weights[idx] = (n - rank) as f64;
                }
            }
            weights
        }
    }
}

/// Roulette wheel selection of two parents, with replacement.
///
/// Falls back to a uniform draw when no individual has a positive weight.
pub fn select_parents<'a, R: Rng + ?Sized>(
    scored: &'a [ScoredPlan],
    weighting: SelectionWeighting,
    rng: &mut R,
) -> Result<(&'a TrafficConfiguration, &'a TrafficConfiguration)> {
    if scored.is_empty() {
        return Err(SignalTuneError::EmptyPopulation);
    }

    // Scale to the largest weight so the wheel total stays finite
    let mut weights = selection_weights(scored, weighting);
    let max_weight = weights.iter().copied().fold(0.0, f64::max);
    if max_weight > 0.0 {
        for w in &mut weights {
            *w /= max_weight;
        }
    }

    let (first, second) = match WeightedIndex::new(&weights) {
        Ok(wheel) => (wheel.sample(rng), wheel.sample(rng)),
        Err(_) => {
            log::debug!("No positive selection weight, drawing parents uniformly");
            (rng.gen_range(0..scored.len()), rng.gen_range(0..scored.len()))
        }
    };

    Ok((&scored[first].plan, &scored[second].plan))
}
