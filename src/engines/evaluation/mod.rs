pub mod oracle;
pub mod command;
pub mod trip_metrics;

pub use command::CommandOracle;
pub use oracle::{FitnessEvaluator, FitnessOracle, SENTINEL_SCORE};
pub use trip_metrics::{TripRecord, TripSummary};
