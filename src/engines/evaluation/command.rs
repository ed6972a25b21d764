use super::oracle::FitnessOracle;
use super::trip_metrics::{TripRecord, TripSummary};
use crate::config::{ConfigSection, OracleConfig, ScoreSource};
use crate::error::{Result, SignalTuneError};
use crate::types::TrafficConfiguration;
use anyhow::{bail, Context};
use std::path::Path;
use std::process::{Command, Stdio};

/// File name the plan is written to inside the scratch directory
pub const PLAN_FILE: &str = "plan.json";

/// Runs an external simulator command per evaluation.
///
/// The plan is written as JSON into the scratch directory, the command runs
/// with that directory as its working directory, and the score is read either
/// from its stdout or from a trip records file it leaves behind. Input files
/// relative to where signaltune was started are reachable through `{cwd}`.
#[derive(Debug)]
pub struct CommandOracle {
    config: OracleConfig,
}

impl CommandOracle {
    pub fn new(config: OracleConfig) -> Result<Self> {
        if config.program.trim().is_empty() {
            return Err(SignalTuneError::Configuration(format!(
                "[{}] program must name the simulator command",
                OracleConfig::section_name()
            )));
        }
        Ok(Self { config })
    }

    fn expand_args(&self, cwd: &Path, workdir: &Path, plan_path: &Path) -> Vec<String> {
        let cwd = cwd.to_string_lossy();
        let workdir = workdir.to_string_lossy();
        let plan_path = plan_path.to_string_lossy();
        self.config
            .args
            .iter()
            .map(|arg| {
                arg.replace("{cwd}", &cwd)
                    .replace("{workdir}", &workdir)
                    .replace("{plan}", &plan_path)
            })
            .collect()
    }

    fn read_score(&self, stdout: &[u8], workdir: &Path) -> anyhow::Result<f64> {
        match self.config.score_source {
            ScoreSource::Stdout => {
                let text = String::from_utf8_lossy(stdout);
                let text = text.trim();
                text.parse::<f64>()
                    .with_context(|| format!("stdout is not a score: {:?}", text))
            }
            ScoreSource::TripFile => {
                let path = workdir.join(&self.config.trip_file);
                let contents = std::fs::read_to_string(&path)
                    .with_context(|| format!("missing trip file {}", path.display()))?;
                let records: Vec<TripRecord> = serde_json::from_str(&contents)
                    .with_context(|| format!("malformed trip file {}", path.display()))?;
                Ok(TripSummary::from_records(&records).score(&self.config.weights))
            }
        }
    }
}

impl FitnessOracle for CommandOracle {
    fn evaluate(&self, plan: &TrafficConfiguration, workdir: &Path) -> anyhow::Result<f64> {
        let plan_path = workdir.join(PLAN_FILE);
        std::fs::write(&plan_path, serde_json::to_vec_pretty(plan)?)
            .context("writing plan file")?;

        let cwd = std::env::current_dir().context("resolving current directory")?;
        let output = Command::new(&self.config.program)
            .args(self.expand_args(&cwd, workdir, &plan_path))
            .current_dir(workdir)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .with_context(|| format!("failed to start {}", self.config.program))?;

        if !output.status.success() {
            bail!("{} exited with {}", self.config.program, output.status);
        }

        self.read_score(&output.stdout, workdir)
    }

    fn name(&self) -> &str {
        &self.config.program
    }
}
