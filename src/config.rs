use crate::model::{AppRecord, ComponentKey};
use directories::ProjectDirs;
use log::warn;
use regex::Regex;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path:?}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub rules: RuleConfig,
    /// Pinned entries published into the catalog alongside scanned apps.
    #[serde(default)]
    pub extra: Vec<StaticEntry>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct GeneralConfig {
    /// Apps per row; the list never shows more than one row per section.
    #[serde(default = "default_columns")]
    pub columns: usize,
    #[serde(default = "default_history_size")]
    pub history_size: usize,
    #[serde(default)]
    pub terminal: Option<String>,
}

fn default_columns() -> usize { 5 }
fn default_history_size() -> usize { 50 }

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            columns: default_columns(),
            history_size: default_history_size(),
            terminal: None,
        }
    }
}

/// Which records make it into the catalog: `show` is a substring allowlist,
/// `hide` a regex denylist, both checked against name and key.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct RuleConfig {
    pub hide: Option<Vec<String>>,
    pub show: Option<Vec<String>>,
}

impl RuleConfig {
    pub fn compile(&self) -> RecordRules {
        let hide = self
            .hide
            .as_ref()
            .map(|patterns| {
                patterns
                    .iter()
                    .filter_map(|pattern| match Regex::new(pattern) {
                        Ok(re) => Some(re),
                        Err(err) => {
                            warn!("ignoring invalid hide pattern {:?}: {}", pattern, err);
                            None
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();
        RecordRules {
            hide,
            show: self.show.clone(),
        }
    }
}

pub struct RecordRules {
    hide: Vec<Regex>,
    show: Option<Vec<String>>,
}

impl RecordRules {
    pub fn allows(&self, record: &AppRecord) -> bool {
        if let Some(show) = &self.show {
            if !show
                .iter()
                .any(|w| record.name.contains(w) || record.key.as_str().contains(w))
            {
                return false;
            }
        }
        !self
            .hide
            .iter()
            .any(|re| re.is_match(&record.name) || re.is_match(record.key.as_str()))
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct StaticEntry {
    pub name: String,
    pub command: String,
    pub icon: Option<String>,
    #[serde(default)]
    pub terminal: bool,
}

impl StaticEntry {
    pub fn to_record(&self) -> AppRecord {
        let mut record = AppRecord::new(
            ComponentKey::new(format!("extra:{}", self.name)),
            self.name.clone(),
            self.command.clone(),
        );
        record.icon = self.icon.clone();
        record.open_in_terminal = self.terminal;
        record
    }
}

pub fn load_config() -> Result<Config, ConfigError> {
    let proj_dirs = ProjectDirs::from("org", "drawer", "drawer");
    let config_path = if let Some(dirs) = &proj_dirs {
        dirs.config_dir().join("config.toml")
    } else {
        PathBuf::from("config.toml")
    };

    if !config_path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&config_path).map_err(|source| ConfigError::Read {
        path: config_path.clone(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: config_path,
        source,
    })
}
