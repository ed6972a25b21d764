pub mod traits;
pub mod evolution;
pub mod seeding;
pub mod intersection;
pub mod oracle;
pub mod manager;

pub use manager::{AppConfig, ConfigManager};
pub use evolution::{EvolutionConfig, SelectionWeighting};
pub use seeding::SeedingConfig;
pub use oracle::{OracleConfig, ScoreSource, ScoreWeights};
pub use traits::ConfigSection;
