pub mod selection;
pub mod operators;
pub mod evolution_engine;
pub mod progress;

pub use evolution_engine::{EvolutionEngine, EvolutionOutcome, GenerationSummary, ProgressCallback};
pub use operators::{crossover, mutate, n_point_crossover};
pub use progress::{ConsoleProgressCallback, SilentProgressCallback};
pub use selection::{select_parents, selection_weights};
