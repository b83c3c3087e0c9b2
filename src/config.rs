use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::rank::{DEFAULT_MAX_TASKS, MAX_TASKS_LIMIT};
use crate::report::DEFAULT_NAME_WIDTH;
use crate::sampler::{DEFAULT_INTERVAL, SamplerOptions};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Used when no interval is given on the command line.
    pub interval_secs: i64,
    pub max_tasks: usize,
    pub name_width: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            interval_secs: DEFAULT_INTERVAL.as_secs() as i64,
            max_tasks: DEFAULT_MAX_TASKS,
            name_width: DEFAULT_NAME_WIDTH,
        }
    }
}

impl GeneralConfig {
    /// Options for the sampler. A `max_tasks` outside
    /// `1..=MAX_TASKS_LIMIT` falls back to the default.
    pub fn sampler_options(&self) -> SamplerOptions {
        let max_tasks = if (1..=MAX_TASKS_LIMIT).contains(&self.max_tasks) {
            self.max_tasks
        } else {
            tracing::warn!(
                max_tasks = self.max_tasks,
                limit = MAX_TASKS_LIMIT,
                "max_tasks out of range, using {DEFAULT_MAX_TASKS}"
            );
            DEFAULT_MAX_TASKS
        };
        SamplerOptions {
            max_tasks,
            name_width: self.name_width,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "warn".to_string(),
            format: "text".to_string(),
            file: None,
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("loadspy").join("config.toml"))
}

pub fn load_config() -> Config {
    match config_path() {
        Some(path) if path.exists() => load_config_from_path(&path),
        _ => Config::default(),
    }
}

pub fn load_config_from_path(path: &Path) -> Config {
    match std::fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents).unwrap_or_default(),
        Err(_) => Config::default(),
    }
}
