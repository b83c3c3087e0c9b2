use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;

use color_eyre::eyre::{Result, WrapErr, eyre};
use tracing::Level;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use crate::config::LoggingConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    pub fn from_str_config(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }
}

pub fn parse_level(s: &str) -> Level {
    s.trim().parse().unwrap_or(Level::WARN)
}

/// Install the global subscriber. Logs go to stderr unless a file is
/// configured; stdout carries the load report.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let writer = match &config.file {
        Some(path) => file_writer(path)?,
        None => BoxMakeWriter::new(std::io::stderr),
    };

    let builder = tracing_subscriber::fmt()
        .with_ansi(config.file.is_none())
        .with_target(false)
        .with_max_level(parse_level(&config.level))
        .with_writer(writer);

    let installed = match LogFormat::from_str_config(&config.format) {
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish()),
        LogFormat::Text => tracing::subscriber::set_global_default(builder.finish()),
    };
    installed.map_err(|e| eyre!("failed to set tracing subscriber: {e}"))
}

fn file_writer(path: &Path) -> Result<BoxMakeWriter> {
    ensure_parent_dir(path)?;
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .wrap_err_with(|| format!("failed to open log file {}", path.display()))?;
    Ok(BoxMakeWriter::new(Arc::new(file)))
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}
