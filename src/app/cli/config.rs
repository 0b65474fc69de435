//! TOML configuration file loading and settings resolution
//!
//! Values come from three places, in increasing precedence: built-in
//! defaults, the configuration file, then command-line flags.

use super::args::Args;
use crate::core::error_handling::ContextualError;
use crate::core::logging::DEFAULT_LEVEL;
use crate::jobs::{JobSettings, DEFAULT_GROUP_ID, DEFAULT_POLL_INTERVAL};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Directory name under the platform config dir
pub const CONFIG_DIR_NAME: &str = "Topicsh";
/// File name of the default configuration file
pub const CONFIG_FILE_NAME: &str = "topicsh.toml";

/// Accepted range for the poll interval, in milliseconds
pub const POLL_INTERVAL_RANGE_MS: std::ops::RangeInclusive<u64> = 10..=60_000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("The specified configuration file does not exist: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Error reading configuration file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Error parsing configuration file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid value for '{field}': {reason}")]
    Invalid { field: String, reason: String },
}

impl ContextualError for ConfigError {
    fn is_user_actionable(&self) -> bool {
        true
    }

    fn user_message(&self) -> Option<String> {
        Some(self.to_string())
    }
}

/// `brokers = "a:9092,b:9092"` or `brokers = ["a:9092", "b:9092"]`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum BrokerList {
    Single(String),
    Many(Vec<String>),
}

impl BrokerList {
    /// Comma-joined form accepted by the bootstrap parser
    pub fn joined(&self) -> String {
        match self {
            BrokerList::Single(s) => s.clone(),
            BrokerList::Many(list) => list.join(","),
        }
    }
}

/// Contents of `topicsh.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub brokers: Option<BrokerList>,
    #[serde(default)]
    pub topics: Vec<String>,
    pub poll_interval_ms: Option<u64>,
    pub group_id: Option<String>,
    pub history_dir: Option<PathBuf>,
    pub color: Option<bool>,
    pub log_level: Option<String>,
    pub log_format: Option<String>,
    pub log_file: Option<String>,
}

impl FileConfig {
    pub fn parse(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// `<config dir>/Topicsh/topicsh.toml`, if the platform has a config dir
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load the configuration file
///
/// An explicitly named file must exist. Without one, the default path is
/// used when present and an empty configuration otherwise.
pub async fn load_config(config_file: Option<&Path>) -> Result<FileConfig, ConfigError> {
    let path = match config_file {
        Some(path) => {
            if !path.exists() {
                return Err(ConfigError::NotFound {
                    path: path.to_path_buf(),
                });
            }
            path.to_path_buf()
        }
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(FileConfig::default()),
        },
    };

    log::debug!("loading configuration from {}", path.display());
    let contents = tokio::fs::read_to_string(&path)
        .await
        .map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
    FileConfig::parse(&contents, &path)
}

/// Everything the console needs, after merging flags over the file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub brokers: Option<String>,
    pub topics: Vec<String>,
    pub poll_interval: Duration,
    pub group_id: String,
    pub history_dir: Option<PathBuf>,
    pub use_color: bool,
    pub log_level: String,
    pub log_format: String,
    pub log_file: Option<String>,
}

impl Settings {
    /// Merge `args` over `file`; `is_tty` decides colour when nobody else does
    pub fn resolve(args: &Args, file: FileConfig, is_tty: bool) -> Result<Self, ConfigError> {
        let poll_ms = args
            .poll_interval_ms
            .or(file.poll_interval_ms)
            .unwrap_or(DEFAULT_POLL_INTERVAL.as_millis() as u64);
        if !POLL_INTERVAL_RANGE_MS.contains(&poll_ms) {
            return Err(ConfigError::Invalid {
                field: "poll-interval-ms".to_string(),
                reason: format!(
                    "{} is outside {}..={}",
                    poll_ms,
                    POLL_INTERVAL_RANGE_MS.start(),
                    POLL_INTERVAL_RANGE_MS.end()
                ),
            });
        }

        let log_format = args
            .log_format
            .clone()
            .or(file.log_format)
            .unwrap_or_else(|| "text".to_string());
        if !matches!(log_format.as_str(), "text" | "ext" | "json") {
            return Err(ConfigError::Invalid {
                field: "log-format".to_string(),
                reason: format!("'{}' is not one of text, ext, json", log_format),
            });
        }

        let base_level = args
            .log_level
            .clone()
            .or(file.log_level)
            .unwrap_or_else(|| DEFAULT_LEVEL.to_string());
        let log_level =
            crate::core::logging::level_for_verbosity(&base_level, args.verbosity()).to_string();

        // "none" and "-" disable file logging
        let log_file = args
            .log_file
            .clone()
            .or(file.log_file)
            .filter(|f| !(f.eq_ignore_ascii_case("none") || f == "-"));

        let use_color = match args.color_override().or(file.color) {
            Some(color) => color,
            None => is_tty && std::env::var_os("NO_COLOR").is_none(),
        };

        let brokers = args
            .brokers
            .clone()
            .or_else(|| file.brokers.as_ref().map(BrokerList::joined))
            .filter(|b| !b.trim().is_empty());

        let mut topics = file.topics;
        topics.extend(args.topics.iter().cloned());
        topics.sort();
        topics.dedup();

        let history_dir = args
            .history_dir
            .clone()
            .or(file.history_dir)
            .or_else(|| dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME)));

        Ok(Self {
            brokers,
            topics,
            poll_interval: Duration::from_millis(poll_ms),
            group_id: args
                .group_id
                .clone()
                .or(file.group_id)
                .unwrap_or_else(|| DEFAULT_GROUP_ID.to_string()),
            history_dir,
            use_color,
            log_level,
            log_format,
            log_file,
        })
    }

    pub fn job_settings(&self) -> JobSettings {
        JobSettings {
            poll_interval: self.poll_interval,
            use_color: self.use_color,
            group_id: self.group_id.clone(),
        }
    }
}
