//! Configuration loading for the showroom crates
//!
//! Bootstrap settings come from a single TOML file. Resolution order:
//! 1. Explicit path handed in by the caller
//! 2. Platform config file (`<config_dir>/bshow/config.toml`)
//! 3. Compiled defaults
//!
//! A missing or malformed file never stops startup: a warning is logged and
//! the compiled defaults are used instead.

use crate::time::check_date_format;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Default short-date rendering for converted spreadsheet dates (`M/D/YYYY`)
pub const DEFAULT_DATE_FORMAT: &str = "%-m/%-d/%Y";

/// Default base URL used when building blob download references
pub const DEFAULT_BLOB_BASE_URL: &str = "http://localhost/v0/b/bshow";

/// Root configuration document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShowroomConfig {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub import: ImportConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the document store and blob store adapters keep their data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// SQLite file backing the document store
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// Folder backing the filesystem blob store
    #[serde(default = "default_blob_root")]
    pub blob_root: PathBuf,

    /// Prefix for download references handed back by the blob store
    #[serde(default = "default_blob_base_url")]
    pub blob_base_url: String,
}

/// Spreadsheet import settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportConfig {
    /// chrono format string for serial-date rendering
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            blob_root: default_blob_root(),
            blob_base_url: default_blob_base_url(),
        }
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            date_format: default_date_format(),
        }
    }
}

impl ImportConfig {
    /// The configured date format, or the default when it cannot render a date
    pub fn checked_date_format(&self) -> &str {
        match check_date_format(&self.date_format) {
            Ok(()) => &self.date_format,
            Err(e) => {
                warn!("{}; using {:?}", e, DEFAULT_DATE_FORMAT);
                DEFAULT_DATE_FORMAT
            }
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_data_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("bshow"))
        .unwrap_or_else(|| PathBuf::from("./bshow_data"))
}

fn default_database_path() -> PathBuf {
    default_data_folder().join("showroom.db")
}

fn default_blob_root() -> PathBuf {
    default_data_folder().join("blobs")
}

fn default_blob_base_url() -> String {
    DEFAULT_BLOB_BASE_URL.to_string()
}

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl ShowroomConfig {
    /// Parse a configuration document from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
    }

    /// Read and parse a configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Write this configuration back out as TOML
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Serialize TOML failed: {}", e)))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Resolve the configuration, degrading to defaults on any failure
    pub fn load(explicit_path: Option<&Path>) -> Self {
        let candidate = explicit_path
            .map(Path::to_path_buf)
            .or_else(platform_config_path);

        let Some(path) = candidate else {
            info!("No configuration file location available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            info!("Configuration file {} not found, using defaults", path.display());
            return Self::default();
        }

        match Self::from_file(&path) {
            Ok(mut config) => {
                info!("Loaded configuration from {}", path.display());
                config.import.date_format = config.import.checked_date_format().to_string();
                config
            }
            Err(e) => {
                warn!("{}; using defaults", e);
                Self::default()
            }
        }
    }
}

/// Platform location of the configuration file, if the platform has one
pub fn platform_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("bshow").join("config.toml"))
}
