//! Aggregates per-vehicle trip records from a simulator run into one cost.

use super::oracle::SENTINEL_SCORE;
use crate::config::ScoreWeights;
use serde::{Deserialize, Serialize};

/// One vehicle's trip as reported by the simulator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TripRecord {
    pub time_loss: f64,
    pub waiting_time: f64,
    pub waiting_count: u32, // number of stops
    pub depart_delay: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TripSummary {
    pub trips: usize,
    pub avg_time_loss: f64,
    pub avg_waiting: f64,
    pub stops_per_trip: f64,
    pub delayed_ratio: f64,
}

impl TripSummary {
    pub fn from_records(records: &[TripRecord]) -> Self {
        if records.is_empty() {
            return Self::default();
        }

        let n = records.len() as f64;
        let total_time_loss: f64 = records.iter().map(|t| t.time_loss).sum();
        let total_waiting: f64 = records.iter().map(|t| t.waiting_time).sum();
        let total_stops: u64 = records.iter().map(|t| u64::from(t.waiting_count)).sum();
        let delayed = records.iter().filter(|t| t.depart_delay > 0.0).count();

        Self {
            trips: records.len(),
            avg_time_loss: total_time_loss / n,
            avg_waiting: total_waiting / n,
            stops_per_trip: total_stops as f64 / n,
            delayed_ratio: delayed as f64 / n,
        }
    }

    /// Weighted cost rounded to two decimals; a run without trips scores the sentinel.
    pub fn score(&self, weights: &ScoreWeights) -> f64 {
        if self.trips == 0 {
            return SENTINEL_SCORE;
        }
        let score = weights.time_loss * self.avg_time_loss
            + weights.waiting * self.avg_waiting
            + weights.stops * self.stops_per_trip
            + weights.delays * self.delayed_ratio;
        (score * 100.0).round() / 100.0
    }
}
