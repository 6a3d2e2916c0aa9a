//! Application Configuration
//! JSON configuration file plus environment overrides.

use crate::data::SheetSchema;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Names a JSON configuration file to read.
pub const CONFIG_ENV: &str = "GRADE_BOARD_CONFIG";
/// Overrides the grade sheet path from the configuration file.
pub const CSV_ENV: &str = "GRADE_BOARD_CSV";
/// Read from the working directory when `GRADE_BOARD_CONFIG` is unset.
pub const DEFAULT_CONFIG_FILE: &str = "grade_board.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("No grade sheet configured: set `csv_path` in the config file or GRADE_BOARD_CSV")]
    MissingSourcePath,
}

/// Texts shown on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Labels {
    pub window_title: String,
    pub title: String,
    pub subtitle: String,
    pub email_prompt: String,
    pub email_placeholder: String,
    pub absence_warning: String,
    pub group_panel: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            window_title: "Grade Board".to_string(),
            title: "Exam Results".to_string(),
            subtitle: String::new(),
            email_prompt: "Enter your email".to_string(),
            email_placeholder: "name@example.com".to_string(),
            absence_warning: "-1: absent from the exam. Unless your situation is settled, \
                              the final exam grade will be 0."
                .to_string(),
            group_panel: "Show/hide group statistics".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub csv_path: Option<PathBuf>,
    pub schema: SheetSchema,
    /// Fields charted in the group panel
    pub chart_fields: Vec<String>,
    pub histogram_bins: usize,
    pub labels: Labels,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            csv_path: None,
            schema: SheetSchema::default(),
            chart_fields: vec!["DS".to_string(), "TP".to_string()],
            histogram_bins: 10,
            labels: Labels::default(),
        }
    }
}

impl AppConfig {
    /// Resolve the configuration from the environment and the working directory.
    pub fn resolve() -> Result<Self, ConfigError> {
        let config_path = std::env::var_os(CONFIG_ENV).map(PathBuf::from).or_else(|| {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            default.exists().then_some(default)
        });

        let mut config = match config_path {
            Some(path) => Self::from_file(&path)?,
            None => {
                warn!("No config file found, using defaults");
                Self::default()
            }
        };

        if let Some(csv) = std::env::var_os(CSV_ENV) {
            config.csv_path = Some(PathBuf::from(csv));
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        info!("Reading config from {}", path.display());
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// The grade sheet location is mandatory.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match &self.csv_path {
            Some(path) if !path.as_os_str().is_empty() => Ok(()),
            _ => Err(ConfigError::MissingSourcePath),
        }
    }

    /// Checked by `validate`; callers go through `resolve` first.
    pub fn source_path(&self) -> Result<&Path, ConfigError> {
        self.csv_path
            .as_deref()
            .ok_or(ConfigError::MissingSourcePath)
    }
}
