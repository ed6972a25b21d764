use super::evolution_engine::{GenerationSummary, ProgressCallback};

/// Reports progress through the `log` facade
pub struct ConsoleProgressCallback {
    total_generations: usize,
}

impl ConsoleProgressCallback {
    pub fn new(total_generations: usize) -> Self {
        Self { total_generations }
    }
}

impl ProgressCallback for ConsoleProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        log::info!("Generation {}/{} starting", generation + 1, self.total_generations);
    }

    fn on_generation_complete(&mut self, summary: &GenerationSummary) {
        log::info!(
            "Generation {}/{} complete. Best fitness: {:.2}, mean: {:.2}, infeasible: {}",
            summary.generation + 1,
            self.total_generations,
            summary.best_fitness,
            summary.mean_fitness,
            summary.infeasible_count
        );
    }

    fn on_plans_evaluated(&mut self, evaluated: usize, total: usize) {
        log::debug!("  Evaluated {}/{} plans", evaluated, total);
    }
}

/// Ignores every event
pub struct SilentProgressCallback;

impl ProgressCallback for SilentProgressCallback {
    fn on_generation_start(&mut self, _generation: usize) {}

    fn on_generation_complete(&mut self, _summary: &GenerationSummary) {}

    fn on_plans_evaluated(&mut self, _evaluated: usize, _total: usize) {}
}
