pub mod config;
pub mod engines;
pub mod error;
pub mod report;
pub mod types;

pub use error::{Result, SignalTuneError, Stage};
pub use types::{IntersectionParams, PhaseConfig, Population, ScoredPlan, TrafficConfiguration};
