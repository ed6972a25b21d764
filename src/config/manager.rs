use super::{
    evolution::EvolutionConfig,
    oracle::OracleConfig,
    seeding::SeedingConfig,
    traits::ConfigSection,
};
use crate::error::SignalTuneError;
use crate::types::IntersectionParams;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, RwLock};

/// Prefix of environment variables overriding file values,
/// e.g. `SIGNALTUNE__EVOLUTION__POPULATION_SIZE=40`.
pub const ENV_PREFIX: &str = "SIGNALTUNE";

/// Keys whose environment values are comma separated lists,
/// e.g. `SIGNALTUNE__INTERSECTION__LAMBDA_RATES=6,4.5,6,3`.
const LIST_KEYS: [&str; 3] = [
    "intersection.saturation_flows",
    "intersection.lambda_rates",
    "intersection.road_widths",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub evolution: EvolutionConfig,
    pub seeding: SeedingConfig,
    pub intersection: IntersectionParams,
    pub oracle: OracleConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), SignalTuneError> {
        self.evolution.validate()?;
        self.seeding.validate()?;
        ConfigSection::validate(&self.intersection)?;
        self.oracle.validate()?;
        Ok(())
    }
}

pub struct ConfigManager {
    config: Arc<RwLock<AppConfig>>,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(AppConfig::default())),
        }
    }

    /// Load a TOML file, layering `SIGNALTUNE__*` environment overrides on top.
    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), SignalTuneError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SignalTuneError::Configuration(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        self.load(config::File::from(path), env_overrides(None))
    }

    pub fn load_from_str(&self, contents: &str) -> Result<(), SignalTuneError> {
        let file = config::File::from_str(contents, config::FileFormat::Toml);
        self.load(file, env_overrides(None))
    }

    fn load<S>(&self, source: S, env: config::Environment) -> Result<(), SignalTuneError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let settings = config::Config::builder()
            .add_source(source)
            .add_source(env)
            .build()
            .map_err(|e| SignalTuneError::Configuration(format!("Failed to read config: {}", e)))?;

        let config: AppConfig = settings
            .try_deserialize()
            .map_err(|e| SignalTuneError::Configuration(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        log::debug!("Loaded configuration: {:?}", config);

        *self.write_lock()? = config;
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), SignalTuneError> {
        let config = self.get()?;
        let toml_str = toml::to_string_pretty(&config)
            .map_err(|e| SignalTuneError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str)
            .map_err(|e| SignalTuneError::Configuration(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    pub fn get(&self) -> Result<AppConfig, SignalTuneError> {
        self.config
            .read()
            .map(|config| config.clone())
            .map_err(|_| SignalTuneError::Configuration("Config lock poisoned".to_string()))
    }

    /// Apply `f` to a copy of the current config and keep it only if it still validates.
    pub fn update<F>(&self, f: F) -> Result<(), SignalTuneError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut config = self.write_lock()?;
        let mut candidate = config.clone();
        f(&mut candidate);
        candidate.validate()?;
        *config = candidate;
        Ok(())
    }

    fn write_lock(&self) -> Result<std::sync::RwLockWriteGuard<'_, AppConfig>, SignalTuneError> {
        self.config
            .write()
            .map_err(|_| SignalTuneError::Configuration("Config lock poisoned".to_string()))
    }
}

/// `SIGNALTUNE__*` overrides, read from `vars` instead of the process
/// environment when given.
fn env_overrides(vars: Option<config::Map<String, String>>) -> config::Environment {
    LIST_KEYS
        .iter()
        .fold(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .list_separator(","),
            |env, key| env.with_list_parse_key(key),
        )
        .try_parsing(true)
        .source(vars)
}
