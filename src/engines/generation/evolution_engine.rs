use crate::config::{ConfigSection, EvolutionConfig};
use crate::engines::evaluation::{FitnessEvaluator, FitnessOracle};
use crate::engines::generation::{
    operators::{crossover, mutate},
    selection::select_parents,
};
use crate::error::{Result, SignalTuneError};
use crate::types::{Population, ScoredPlan};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

pub trait ProgressCallback {
    fn on_generation_start(&mut self, generation: usize);
    fn on_generation_complete(&mut self, summary: &GenerationSummary);
    fn on_plans_evaluated(&mut self, evaluated: usize, total: usize);
}

impl<C: ProgressCallback + ?Sized> ProgressCallback for &mut C {
    fn on_generation_start(&mut self, generation: usize) {
        (**self).on_generation_start(generation)
    }

    fn on_generation_complete(&mut self, summary: &GenerationSummary) {
        (**self).on_generation_complete(summary)
    }

    fn on_plans_evaluated(&mut self, evaluated: usize, total: usize) {
        (**self).on_plans_evaluated(evaluated, total)
    }
}

/// Fitness statistics of one evaluated generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSummary {
    pub generation: usize,
    pub best_fitness: f64,
    pub mean_fitness: f64, // over feasible plans only
    pub infeasible_count: usize,
}

impl GenerationSummary {
    fn from_ranked(generation: usize, ranked: &[ScoredPlan]) -> Self {
        let feasible: Vec<f64> = ranked
            .iter()
            .map(|s| s.fitness)
            .filter(|f| f.is_finite())
            .collect();
        let mean_fitness = if feasible.is_empty() {
            f64::INFINITY
        } else {
            feasible.iter().sum::<f64>() / feasible.len() as f64
        };

        Self {
            generation,
            best_fitness: ranked.first().map_or(f64::INFINITY, |s| s.fitness),
            mean_fitness,
            infeasible_count: ranked.len() - feasible.len(),
        }
    }
}

/// Final ranked population of a run
#[derive(Debug, Clone)]
pub struct EvolutionOutcome {
    /// Ascending by fitness, best first
    pub population: Vec<ScoredPlan>,
    pub generations_run: usize,
    pub history: Vec<GenerationSummary>,
}

impl EvolutionOutcome {
    pub fn best(&self) -> Option<&ScoredPlan> {
        self.population.first()
    }
}

/// Generational search over timing plans with single-individual elitism.
pub struct EvolutionEngine<O> {
    config: EvolutionConfig,
    evaluator: FitnessEvaluator<O>,
    rng: StdRng,
    best_so_far: Option<ScoredPlan>,
}

impl<O: FitnessOracle> EvolutionEngine<O> {
    pub fn new(config: EvolutionConfig, evaluator: FitnessEvaluator<O>) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            config,
            evaluator,
            rng,
            best_so_far: None,
        }
    }

    /// Replace the engine's random source
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    pub fn evaluator(&self) -> &FitnessEvaluator<O> {
        &self.evaluator
    }

    /// Best plan seen in any evaluated generation, kept even when `run` fails
    pub fn best_so_far(&self) -> Option<&ScoredPlan> {
        self.best_so_far.as_ref()
    }

    /// Run `generation_limit` generations starting from `population`.
    pub fn run<C: ProgressCallback>(
        &mut self,
        population: Population,
        mut callback: C,
    ) -> Result<EvolutionOutcome> {
        self.check_population(&population)?;

        let mut population = population;
        let mut history = Vec::with_capacity(self.config.generation_limit);

        for generation in 0..self.config.generation_limit {
            callback.on_generation_start(generation);

            let ranked = self.evaluate_and_rank(population, &mut callback);
            let summary = GenerationSummary::from_ranked(generation, &ranked);
            callback.on_generation_complete(&summary);
            history.push(summary);

            population = self.next_generation(&ranked)?;
        }

        let ranked = self.evaluate_and_rank(population, &mut callback);
        if let Some(best) = ranked.first() {
            log::info!(
                "Evolution finished after {} generations, best fitness {:.2}",
                self.config.generation_limit,
                best.fitness
            );
        }

        Ok(EvolutionOutcome {
            population: ranked,
            generations_run: self.config.generation_limit,
            history,
        })
    }

    fn check_population(&self, population: &Population) -> Result<()> {
        self.config.validate()?;
        let first = population.first().ok_or(SignalTuneError::EmptyPopulation)?;

        if population.len() != self.config.population_size {
            return Err(SignalTuneError::PopulationSize {
                expected: self.config.population_size,
                actual: population.len(),
            });
        }
        if let Some(odd) = population.iter().find(|plan| plan.len() != first.len()) {
            return Err(SignalTuneError::PhaseCountMismatch {
                expected: first.len(),
                actual: odd.len(),
            });
        }
        Ok(())
    }

    /// Score every plan and sort ascending (sentinel scores last).
    fn evaluate_and_rank<C: ProgressCallback>(
        &mut self,
        population: Population,
        callback: &mut C,
    ) -> Vec<ScoredPlan> {
        let total = population.len();
        let scores = if self.config.parallel_evaluation {
            let scores = self.evaluator.evaluate_population(&population, true);
            callback.on_plans_evaluated(total, total);
            scores
        } else {
            population
                .iter()
                .enumerate()
                .map(|(i, plan)| {
                    let score = self.evaluator.evaluate(plan);
                    callback.on_plans_evaluated(i + 1, total);
                    score
                })
                .collect()
        };

        let mut ranked: Vec<ScoredPlan> = population
            .into_iter()
            .zip(scores)
            .map(|(plan, fitness)| ScoredPlan { plan, fitness })
            .collect();
        ranked.sort_by(|a, b| a.fitness.total_cmp(&b.fitness));

        if let Some(best) = ranked.first() {
            let improved = self
                .best_so_far
                .as_ref()
                .map_or(true, |current| best.fitness < current.fitness);
            if improved {
                self.best_so_far = Some(best.clone());
            }
        }

        ranked
    }

    /// Breed the next generation: N - 1 mutated offspring plus the unmutated elite.
    fn next_generation(&mut self, ranked: &[ScoredPlan]) -> Result<Population> {
        let elite = ranked
            .first()
            .ok_or(SignalTuneError::EmptyPopulation)?
            .plan
            .clone();
        let target = self.config.population_size.saturating_sub(1);
        let cfg = &self.config;

        let mut offspring: Population = Vec::with_capacity(target + cfg.offspring_per_pair);
        while offspring.len() < target {
            let (a, b) = select_parents(ranked, cfg.selection_weighting, &mut self.rng)?;
            offspring.extend(crossover(
                a,
                b,
                cfg.offspring_per_pair,
                cfg.crossover_points,
                cfg.min_green,
                &mut self.rng,
            )?);
        }
        offspring.truncate(target);

        let mut next: Population = offspring
            .iter()
            .map(|child| mutate(child, cfg.mutation_delta, cfg.min_green, &mut self.rng))
            .collect();
        next.push(elite);

        log::debug!("Bred {} offspring plus elite", next.len() - 1);
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::generation::progress::SilentProgressCallback;
    use crate::types::{PhaseConfig, TrafficConfiguration};
    use std::path::Path;

    type GreenSum = fn(&TrafficConfiguration, &Path) -> anyhow::Result<f64>;

    fn green_sum(plan: &TrafficConfiguration, _workdir: &Path) -> anyhow::Result<f64> {
        Ok(plan.total_green())
    }

    fn plan(greens: &[f64]) -> TrafficConfiguration {
        greens
            .iter()
            .map(|&g| PhaseConfig::new(g, 3.0, 1.0))
            .collect::<Vec<_>>()
            .into()
    }

    fn config(population_size: usize, generation_limit: usize) -> EvolutionConfig {
        EvolutionConfig {
            population_size,
            generation_limit,
            seed: Some(17),
            ..EvolutionConfig::default()
        }
    }

    fn engine(cfg: EvolutionConfig) -> EvolutionEngine<GreenSum> {
        let min_green = cfg.min_green;
        EvolutionEngine::new(cfg, FitnessEvaluator::new(green_sum as GreenSum, min_green))
    }

    #[test]
    fn test_population_size_is_preserved() {
        let population: Population = (0..7).map(|i| plan(&[10.0 + i as f64, 20.0, 30.0])).collect();
        let mut engine = engine(config(7, 4));

        let outcome = engine.run(population, SilentProgressCallback).unwrap();
        assert_eq!(outcome.population.len(), 7);
        assert_eq!(outcome.generations_run, 4);
        assert_eq!(outcome.history.len(), 4);
    }

    #[test]
    fn test_zero_generations_ranks_initial_population() {
        let population = vec![plan(&[30.0, 30.0]), plan(&[10.0, 10.0]), plan(&[20.0, 20.0])];
        let mut engine = engine(config(3, 0));

        let outcome = engine.run(population, SilentProgressCallback).unwrap();
        let fitness: Vec<f64> = outcome.population.iter().map(|s| s.fitness).collect();
        assert_eq!(fitness, vec![20.0, 40.0, 60.0]);
        assert_eq!(outcome.generations_run, 0);
    }

    #[test]
    fn test_single_individual_population() {
        let mut engine = engine(config(1, 3));
        let outcome = engine.run(vec![plan(&[12.0, 14.0])], SilentProgressCallback).unwrap();
        assert_eq!(outcome.population.len(), 1);
        assert_eq!(outcome.population[0].plan, plan(&[12.0, 14.0]));
    }

    #[test]
    fn test_precondition_errors() {
        let mut engine = engine(config(3, 1));
        assert!(matches!(
            engine.run(vec![], SilentProgressCallback),
            Err(SignalTuneError::EmptyPopulation)
        ));
        assert!(matches!(
            engine.run(vec![plan(&[10.0]), plan(&[10.0])], SilentProgressCallback),
            Err(SignalTuneError::PopulationSize { expected: 3, actual: 2 })
        ));
        assert!(matches!(
            engine.run(
                vec![plan(&[10.0, 10.0]), plan(&[10.0]), plan(&[10.0, 10.0])],
                SilentProgressCallback
            ),
            Err(SignalTuneError::PhaseCountMismatch { expected: 2, actual: 1 })
        ));
        assert!(engine.best_so_far().is_none());
    }

    #[test]
    fn test_best_so_far_tracks_minimum() {
        let population: Population = (0..6).map(|i| plan(&[8.0 + i as f64, 25.0])).collect();
        let mut engine = engine(config(6, 5));

        let outcome = engine.run(population, SilentProgressCallback).unwrap();
        let best = engine.best_so_far().unwrap();
        assert!(best.fitness <= outcome.history[0].best_fitness);
        assert_eq!(best.fitness, outcome.best().unwrap().fitness);
    }

    #[test]
    fn test_summary_counts_infeasible() {
        let ranked = vec![
            ScoredPlan { plan: plan(&[10.0]), fitness: 10.0 },
            ScoredPlan { plan: plan(&[20.0]), fitness: 30.0 },
            ScoredPlan { plan: plan(&[2.0]), fitness: f64::INFINITY },
        ];
        let summary = GenerationSummary::from_ranked(4, &ranked);
        assert_eq!(summary.best_fitness, 10.0);
        assert_eq!(summary.mean_fitness, 20.0);
        assert_eq!(summary.infeasible_count, 1);
    }
}
