use crate::types::TrafficConfiguration;
use rayon::prelude::*;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

/// Worst possible fitness, assigned to infeasible plans and failed evaluations
pub const SENTINEL_SCORE: f64 = f64::INFINITY;

/// Scores a timing plan; lower is better.
///
/// `workdir` is a scratch directory owned by this single call. It is removed
/// when the call returns, whatever the outcome.
pub trait FitnessOracle: Send + Sync {
    fn evaluate(&self, plan: &TrafficConfiguration, workdir: &Path) -> anyhow::Result<f64>;

    fn name(&self) -> &str {
        "oracle"
    }
}

impl<F> FitnessOracle for F
where
    F: Fn(&TrafficConfiguration, &Path) -> anyhow::Result<f64> + Send + Sync,
{
    fn evaluate(&self, plan: &TrafficConfiguration, workdir: &Path) -> anyhow::Result<f64> {
        self(plan, workdir)
    }
}

/// Core-side wrapper around a [`FitnessOracle`].
///
/// Plans breaking the minimum green rule never reach the oracle, and every
/// oracle error, panic or non-numeric score becomes [`SENTINEL_SCORE`].
pub struct FitnessEvaluator<O> {
    oracle: O,
    min_green: f64,
    scratch_root: Option<PathBuf>,
}

impl<O: FitnessOracle> FitnessEvaluator<O> {
    pub fn new(oracle: O, min_green: f64) -> Self {
        Self {
            oracle,
            min_green,
            scratch_root: None,
        }
    }

    /// Create scratch directories under `root` instead of the system temp dir
    pub fn with_scratch_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.scratch_root = Some(root.into());
        self
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn evaluate(&self, plan: &TrafficConfiguration) -> f64 {
        if !plan.satisfies_min_green(self.min_green) {
            log::debug!("Plan below minimum green of {}s, skipping evaluation", self.min_green);
            return SENTINEL_SCORE;
        }

        let scratch = match self.acquire_scratch() {
            Ok(dir) => dir,
            Err(e) => {
                log::warn!("Could not create scratch directory: {}", e);
                return SENTINEL_SCORE;
            }
        };

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.oracle.evaluate(plan, scratch.path())
        }));

        // Dropping `scratch` removes the directory on every path below
        match outcome {
            Ok(Ok(score)) if score.is_nan() => {
                log::warn!("{} returned NaN, using sentinel score", self.oracle.name());
                SENTINEL_SCORE
            }
            Ok(Ok(score)) => score,
            Ok(Err(e)) => {
                log::warn!("{} evaluation failed: {:#}", self.oracle.name(), e);
                SENTINEL_SCORE
            }
            Err(_) => {
                log::error!("{} panicked during evaluation", self.oracle.name());
                SENTINEL_SCORE
            }
        }
    }

    /// Score every plan, in order. With `parallel`, evaluations run on the
    /// rayon pool and are all joined before returning.
    pub fn evaluate_population(&self, plans: &[TrafficConfiguration], parallel: bool) -> Vec<f64> {
        if parallel {
            plans.par_iter().map(|plan| self.evaluate(plan)).collect()
        } else {
            plans.iter().map(|plan| self.evaluate(plan)).collect()
        }
    }

    fn acquire_scratch(&self) -> std::io::Result<tempfile::TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("signaltune-");
        match &self.scratch_root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
    }
}
