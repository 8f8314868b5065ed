use super::{
    evolution::EvolutionConfig, fitness::FitnessConfig, genome::GenomeConfig,
    traits::ConfigSection,
};
use crate::error::GepError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

/// Prefix for environment overrides, e.g. `GEP__EVOLUTION__SEED=7`.
pub const ENV_PREFIX: &str = "GEP";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub genome: GenomeConfig,
    pub evolution: EvolutionConfig,
    pub fitness: FitnessConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), GepError> {
        validate_section(&self.genome)?;
        validate_section(&self.evolution)?;
        validate_section(&self.fitness)?;
        Ok(())
    }
}

fn validate_section<S: ConfigSection>(section: &S) -> Result<(), GepError> {
    section.validate().map_err(|e| match e {
        GepError::Configuration(msg) => {
            GepError::Configuration(format!("[{}] {}", S::section_name(), msg))
        }
        other => other,
    })
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

    /// Load a TOML file, layering `GEP__`-prefixed environment variables on top.
    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), GepError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(GepError::Configuration(format!(
                "Config file {} not found",
                path.display()
            )));
        }

        let config: AppConfig = ::config::Config::builder()
            .add_source(::config::File::from(path))
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        self.replace(config)
    }

    pub fn load_from_str(&self, contents: &str) -> Result<(), GepError> {
        let config: AppConfig = ::config::Config::builder()
            .add_source(::config::File::from_str(
                contents,
                ::config::FileFormat::Toml,
            ))
            .build()?
            .try_deserialize()?;

        self.replace(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), GepError> {
        let toml_str = toml::to_string_pretty(&self.get())?;
        std::fs::write(path, toml_str)?;
        Ok(())
    }

    pub fn get(&self) -> AppConfig {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Apply `f` and keep the result only if it still validates.
    pub fn update<F>(&self, f: F) -> Result<(), GepError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut candidate = self.get();
        f(&mut candidate);
        self.replace(candidate)
    }

    fn replace(&self, config: AppConfig) -> Result<(), GepError> {
        config.validate()?;
        log::debug!(
            "Configuration accepted: population {}, head length {}",
            config.evolution.population_size,
            config.genome.head_length
        );
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = config;
        Ok(())
    }
}
