use std::path::{Path, PathBuf};

use random_realms_diff::DumpTools;
use random_realms_generate::{GenerateOptions, Ridiculousness};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "random-realms.toml";
pub const DEFAULT_FAILED_SEEDS_LOG: &str = "failed-seeds.log";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Contents of `random-realms.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub generate: GenerateSettings,
    /// Where failing seeds are appended.
    pub failed_seeds_log: PathBuf,
    /// Optional JSON log file.
    pub log_file: Option<PathBuf>,
    pub upgrade_check: DumpTools,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            generate: GenerateSettings::default(),
            failed_seeds_log: PathBuf::from(DEFAULT_FAILED_SEEDS_LOG),
            log_file: None,
            upgrade_check: DumpTools::default(),
        }
    }
}

/// Generation limits; unset fields fall back to the command-line defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerateSettings {
    pub name_ridiculousness: Option<Ridiculousness>,
    pub max_object_count: Option<u64>,
    pub max_data_size: Option<usize>,
    pub max_list_elements: Option<usize>,
    pub max_object_schemas: Option<usize>,
    pub min_properties: Option<usize>,
    pub max_properties: Option<usize>,
    pub max_unicode_string: Option<usize>,
}

impl GenerateSettings {
    /// Fields set in `overrides` win.
    pub fn overlay(&self, overrides: &GenerateSettings) -> GenerateSettings {
        GenerateSettings {
            name_ridiculousness: overrides.name_ridiculousness.or(self.name_ridiculousness),
            max_object_count: overrides.max_object_count.or(self.max_object_count),
            max_data_size: overrides.max_data_size.or(self.max_data_size),
            max_list_elements: overrides.max_list_elements.or(self.max_list_elements),
            max_object_schemas: overrides.max_object_schemas.or(self.max_object_schemas),
            min_properties: overrides.min_properties.or(self.min_properties),
            max_properties: overrides.max_properties.or(self.max_properties),
            max_unicode_string: overrides.max_unicode_string.or(self.max_unicode_string),
        }
    }

    pub fn resolve(&self) -> GenerateOptions {
        let defaults = command_line_defaults();
        GenerateOptions {
            name_ridiculousness: self.name_ridiculousness.unwrap_or(defaults.name_ridiculousness),
            max_object_count: self.max_object_count.unwrap_or(defaults.max_object_count),
            max_data_size: self.max_data_size.unwrap_or(defaults.max_data_size),
            max_list_elements: self.max_list_elements.unwrap_or(defaults.max_list_elements),
            max_object_schemas: self.max_object_schemas.unwrap_or(defaults.max_object_schemas),
            min_properties: self.min_properties.unwrap_or(defaults.min_properties),
            max_properties: self.max_properties.unwrap_or(defaults.max_properties),
            max_unicode_string: self.max_unicode_string.unwrap_or(defaults.max_unicode_string),
        }
    }
}

/// Limits used by the command line when neither flags nor config set them.
pub fn command_line_defaults() -> GenerateOptions {
    GenerateOptions {
        name_ridiculousness: Ridiculousness::Low,
        max_object_count: 100,
        max_data_size: 10,
        max_list_elements: 10,
        max_object_schemas: 3,
        max_properties: 3,
        ..GenerateOptions::default()
    }
}

/// Load `explicit`, or `random-realms.toml` if present, or the defaults.
pub fn load_settings(explicit: Option<&Path>) -> Result<Settings, ConfigError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let path = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !path.exists() {
                return Ok(Settings::default());
            }
            path
        }
    };
    let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;
    parse_settings(&content).map_err(|source| ConfigError::Toml { path, source })
}

pub fn parse_settings(content: &str) -> Result<Settings, toml::de::Error> {
    toml::from_str(content)
}
