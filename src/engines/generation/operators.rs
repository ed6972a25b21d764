use crate::error::{Result, SignalTuneError};
use crate::types::{PhaseConfig, TrafficConfiguration};
use rand::seq::index;
use rand::Rng;

/// n-point crossover: cut both parents at `n` distinct interior points and
/// alternate the source parent segment by segment.
///
/// `n` is clamped to `len - 1`. Child one starts from `a`, child two from `b`.
/// Every green in the children is raised to at least `min_green`.
pub fn n_point_crossover<R: Rng + ?Sized>(
    a: &TrafficConfiguration,
    b: &TrafficConfiguration,
    n: usize,
    min_green: f64,
    rng: &mut R,
) -> Result<(TrafficConfiguration, TrafficConfiguration)> {
    if a.len() != b.len() {
        return Err(SignalTuneError::PhaseCountMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    let len = a.len();
    let n = n.min(len.saturating_sub(1));

    // Interior cut points in 1..len, then the closing boundary
    let mut cuts: Vec<usize> = index::sample(rng, len.saturating_sub(1), n)
        .into_iter()
        .map(|i| i + 1)
        .collect();
    cuts.sort_unstable();
    cuts.push(len);

    let mut child1: Vec<PhaseConfig> = Vec::with_capacity(len);
    let mut child2: Vec<PhaseConfig> = Vec::with_capacity(len);
    let mut start = 0;
    let mut from_a = true;

    for end in cuts {
        let (first, second) = if from_a { (a, b) } else { (b, a) };
        child1.extend_from_slice(&first.phases()[start..end]);
        child2.extend_from_slice(&second.phases()[start..end]);
        from_a = !from_a;
        start = end;
    }

    let mut child1 = TrafficConfiguration::new(child1);
    let mut child2 = TrafficConfiguration::new(child2);
    child1.clamp_min_green(min_green);
    child2.clamp_min_green(min_green);

    Ok((child1, child2))
}

/// Produce exactly `num_offspring` children from one parent pair, varying the
/// number of cut points per call between 1 and `max_points`.
pub fn crossover<R: Rng + ?Sized>(
    a: &TrafficConfiguration,
    b: &TrafficConfiguration,
    num_offspring: usize,
    max_points: usize,
    min_green: f64,
    rng: &mut R,
) -> Result<Vec<TrafficConfiguration>> {
    let upper = max_points.min(a.len().saturating_sub(1));
    let mut offspring = Vec::with_capacity(num_offspring + 1);

    while offspring.len() < num_offspring {
        let n = if upper == 0 { 0 } else { rng.gen_range(1..=upper) };
        let (child1, child2) = n_point_crossover(a, b, n, min_green, rng)?;
        offspring.push(child1);
        offspring.push(child2);
    }

    offspring.truncate(num_offspring);
    Ok(offspring)
}

/// Green time shift mutation.
///
/// One random phase gains or loses up to `delta` seconds (whole seconds) and
/// the opposite amount is spread over the other phases. The spread share is
/// truncated, so total green is only approximately conserved. The input is
/// returned unchanged for plans with fewer than two phases.
pub fn mutate<R: Rng + ?Sized>(
    plan: &TrafficConfiguration,
    delta: f64,
    min_green: f64,
    rng: &mut R,
) -> TrafficConfiguration {
    let phase_count = plan.len();
    let mut mutated = plan.clone();
    if phase_count <= 1 {
        return mutated;
    }

    let target = rng.gen_range(0..phase_count);
    let shift: f64 = rng.gen_range(-delta..=delta);
    shift_green(&mut mutated, target, shift, min_green);
    mutated
}

/// Apply a green shift to phase `target` and spread the opposite amount over
/// the remaining phases. When the target hits `min_green`, only the shift
/// actually applied is redistributed.
fn shift_green(plan: &mut TrafficConfiguration, target: usize, mut shift: f64, min_green: f64) {
    let phase_count = plan.len();
    let phases = plan.phases_mut();
    phases[target].green += shift.trunc();

    if phases[target].green < min_green {
        shift += min_green - phases[target].green;
        phases[target].green = min_green;
    }

    let redistribution = (-shift / (phase_count - 1) as f64).trunc();
    for (i, phase) in phases.iter_mut().enumerate() {
        if i != target {
            phase.green += redistribution;
        }
    }

    plan.clamp_min_green(min_green);
}
