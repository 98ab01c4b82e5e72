//! # vgof Core Configuration
//!
//! [`KernelConfig`] carries the handful of settings the kernel needs: where
//! modules live, which file extension marks a module, an optional explicit
//! module list, and whether the kernel's registry becomes the process-wide
//! one. It can be built in code or read from a JSON, TOML or YAML file.
pub mod error;

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::kernel::constants::{DEFAULT_MODULE_DIR, DEFAULT_MODULE_EXTENSION};
pub use error::ConfigError;

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigFormat {
    /// JSON format (.json)
    Json,
    /// YAML format (.yaml, .yml) - requires "yaml-config" feature
    #[cfg(feature = "yaml-config")]
    Yaml,
    /// TOML format (.toml) - requires "toml-config" feature
    #[cfg(feature = "toml-config")]
    Toml,
}

impl ConfigFormat {
    /// Determine format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "json" => Some(ConfigFormat::Json),
                #[cfg(feature = "yaml-config")]
                "yaml" | "yml" => Some(ConfigFormat::Yaml),
                #[cfg(feature = "toml-config")]
                "toml" => Some(ConfigFormat::Toml),
                _ => None,
            })
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigFormat::Json => write!(f, "JSON"),
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => write!(f, "YAML"),
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => write!(f, "TOML"),
        }
    }
}

/// Kernel settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    module_dir: PathBuf,
    module_extension: String,
    modules: Option<Vec<String>>,
    global_registry: bool,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            module_dir: PathBuf::from(DEFAULT_MODULE_DIR),
            module_extension: DEFAULT_MODULE_EXTENSION.to_string(),
            modules: None,
            global_registry: false,
        }
    }
}

impl KernelConfig {
    pub fn new<P: AsRef<Path>>(module_dir: P) -> Self {
        Self::default().with_module_dir(module_dir)
    }

    /// Read a configuration file; the format follows the file extension.
    /// Missing keys keep their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)
            .ok_or_else(|| ConfigError::UnsupportedFormat { path: path.to_path_buf() })?;
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&content, format).map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            format: format.to_string(),
            message,
        })?;
        log::debug!("Loaded {} configuration from {}", format, path.display());
        Ok(config.normalized())
    }

    fn parse(content: &str, format: ConfigFormat) -> Result<Self, String> {
        match format {
            ConfigFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
        }
    }

    fn normalized(mut self) -> Self {
        self.module_dir = normalize_module_dir(&self.module_dir);
        self.module_extension = self.module_extension.trim_start_matches('.').to_string();
        self
    }

    pub fn with_module_dir<P: AsRef<Path>>(mut self, module_dir: P) -> Self {
        self.module_dir = normalize_module_dir(module_dir.as_ref());
        self
    }

    pub fn with_module_extension(mut self, extension: &str) -> Self {
        self.module_extension = extension.trim_start_matches('.').to_string();
        self
    }

    /// Load exactly these modules instead of scanning the module directory.
    pub fn with_modules<I, S>(mut self, modules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.modules = Some(modules.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_global_registry(mut self, global: bool) -> Self {
        self.global_registry = global;
        self
    }

    pub fn module_dir(&self) -> &Path {
        &self.module_dir
    }

    pub fn module_extension(&self) -> &str {
        &self.module_extension
    }

    pub fn modules(&self) -> Option<&[String]> {
        self.modules.as_deref()
    }

    pub fn global_registry(&self) -> bool {
        self.global_registry
    }
}

/// Strip trailing separators, so `modules/` and `modules` name the same
/// directory. The root stays `/`, an empty path becomes `.`.
pub fn normalize_module_dir(dir: &Path) -> PathBuf {
    let raw = dir.to_string_lossy();
    if raw.is_empty() {
        return PathBuf::from(".");
    }
    let trimmed = raw.trim_end_matches(|c| c == '/' || c == std::path::MAIN_SEPARATOR);
    if trimmed.is_empty() {
        return PathBuf::from(std::path::MAIN_SEPARATOR_STR);
    }
    PathBuf::from(trimmed)
}

#[cfg(test)]
mod tests;
