//! Configuration module for the DCIM extractor
//!
//! Two layers live here:
//! - [`RunConfig`] is the immutable set of inputs for one run. It is built
//!   once by the CLI and handed by reference to every scanner.
//! - [`Config`] is the optional TOML settings file that supplies defaults
//!   for the CLI. It is stored in a standard location:
//!   - Windows: %APPDATA%\dcim_extractor\config.toml
//!   - Linux: ~/.config/dcim_extractor/config.toml
//!   - macOS: ~/Library/Application Support/dcim_extractor/config.toml

use crate::core::error::{ExtractionError, Result};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf, MAIN_SEPARATOR, MAIN_SEPARATOR_STR};

/// Application name used for config directory
const APP_NAME: &str = "dcim_extractor";

/// Default config file name
const CONFIG_FILE_NAME: &str = "config.toml";

/// Settings file looked up in the working directory before the standard location
const LOCAL_CONFIG_FILE_NAME: &str = "dcim_extractor.toml";

/// Inputs for a single extraction run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Where the device volume is mounted
    pub mount: PathBuf,
    /// Directory that receives every transferred file
    pub destination: PathBuf,
    /// Move instead of copy
    pub delete: bool,
    /// Report operations without touching the filesystem
    pub dry_run: bool,
}

impl RunConfig {
    pub fn new(mount: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            mount: mount.into(),
            destination: destination.into(),
            delete: false,
            dry_run: false,
        }
    }

    pub fn with_delete(mut self, delete: bool) -> Self {
        self.delete = delete;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Check that both the mount and destination were given
    pub fn validate(&self) -> Result<()> {
        if self.mount.as_os_str().is_empty() || self.destination.as_os_str().is_empty() {
            return Err(ExtractionError::Configuration(
                "mount and target must be specified".to_string(),
            ));
        }
        Ok(())
    }

    /// Validate and return a copy whose destination ends with a separator
    pub fn normalized(&self) -> Result<Self> {
        self.validate()?;
        Ok(Self {
            destination: normalize_destination(&self.destination),
            ..self.clone()
        })
    }

    /// Root of the primary media tree
    pub fn dcim_root(&self) -> PathBuf {
        self.mount.join("DCIM")
    }

    /// Root of the edit renders tree
    pub fn mutations_root(&self) -> PathBuf {
        self.mount.join("PhotoData").join("Mutations").join("DCIM")
    }
}

/// Append a trailing separator to `destination` unless it already has one.
pub fn normalize_destination(destination: &Path) -> PathBuf {
    let raw = destination.as_os_str();
    let lossy = raw.to_string_lossy();
    if lossy.ends_with(MAIN_SEPARATOR) || lossy.ends_with('/') {
        return destination.to_path_buf();
    }
    let mut with_separator = OsString::from(raw);
    with_separator.push(MAIN_SEPARATOR_STR);
    PathBuf::from(with_separator)
}

/// Default target: `~/Pictures/YYYY-MM-DD-phone`
pub fn default_destination() -> PathBuf {
    let base = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("Pictures").join(format!(
        "{}-phone",
        chrono::Local::now().format("%Y-%m-%d")
    ))
}

/// Get the standard configuration directory for the application.
pub fn get_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_NAME))
}

/// Get the standard configuration file path.
pub fn get_config_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}

/// Main settings file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Source volume settings
    pub source: SourceConfig,

    /// Output settings
    pub output: OutputConfig,

    /// Transfer settings
    pub transfer: TransferConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// Source volume configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SourceConfig {
    /// Where the device is mounted (empty = must be given on the command line)
    pub mount: PathBuf,
}

/// Output directory configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Target directory (empty = dated folder under ~/Pictures)
    pub directory: PathBuf,
}

/// Copy/move behaviour
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TransferConfig {
    /// Move files off the device instead of copying them
    pub delete: bool,

    /// Only print the operations
    pub dry_run: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log to file
    pub log_to_file: bool,

    /// Log file path
    pub log_file: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_to_file: false,
            log_file: PathBuf::from("./dcim_extractor.log"),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> std::result::Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.to_path_buf(), e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError(path.to_path_buf(), e.to_string()))
    }

    /// Load configuration from default locations
    ///
    /// Search order:
    /// 1. ./dcim_extractor.toml
    /// 2. The standard config location
    ///
    /// If no config file is found, returns default configuration.
    pub fn load_default() -> std::result::Result<Self, ConfigError> {
        let local = PathBuf::from(".").join(LOCAL_CONFIG_FILE_NAME);
        if local.exists() {
            return Self::load(&local);
        }

        if let Some(config_path) = get_config_path() {
            if config_path.exists() {
                return Self::load(&config_path);
            }
        }

        Ok(Self::default())
    }

    /// Path of the settings file in use, or where it would be created.
    pub fn get_active_config_path() -> PathBuf {
        let local = PathBuf::from(".").join(LOCAL_CONFIG_FILE_NAME);
        if local.exists() {
            return local;
        }
        get_config_path().unwrap_or(local)
    }

    /// Save configuration to a TOML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> std::result::Result<(), ConfigError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        fs::write(path.as_ref(), content)
            .map_err(|e| ConfigError::WriteError(path.as_ref().to_path_buf(), e.to_string()))
    }

    /// Commented example settings file
    pub fn generate_default_config() -> String {
        include_str!("../../config.example.toml").to_string()
    }

    /// Write the example settings file, creating parent directories.
    pub fn write_default_config(path: &Path) -> std::result::Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| ConfigError::WriteError(parent.to_path_buf(), e.to_string()))?;
            }
        }
        fs::write(path, Self::generate_default_config())
            .map_err(|e| ConfigError::WriteError(path.to_path_buf(), e.to_string()))
    }

    /// Build the run inputs, letting explicit values win over the file.
    pub fn to_run_config(
        &self,
        mount: Option<PathBuf>,
        target: Option<PathBuf>,
        delete: bool,
        dry_run: bool,
    ) -> RunConfig {
        let mount = mount.unwrap_or_else(|| self.source.mount.clone());
        let destination = target.unwrap_or_else(|| {
            if self.output.directory.as_os_str().is_empty() {
                default_destination()
            } else {
                self.output.directory.clone()
            }
        });

        RunConfig {
            mount,
            destination,
            delete: delete || self.transfer.delete,
            dry_run: dry_run || self.transfer.dry_run,
        }
    }
}

/// Configuration error types
#[derive(Debug)]
pub enum ConfigError {
    /// Configuration file was not found at the specified path
    FileNotFound(PathBuf),
    /// Failed to read the configuration file
    ReadError(PathBuf, String),
    /// Failed to parse the configuration file (invalid TOML)
    ParseError(PathBuf, String),
    /// Failed to serialize configuration to TOML
    SerializeError(String),
    /// Failed to write configuration file
    WriteError(PathBuf, String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ReadError(path, err) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), err)
            }
            ConfigError::ParseError(path, err) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), err)
            }
            ConfigError::SerializeError(err) => {
                write!(f, "Failed to serialize configuration: {}", err)
            }
            ConfigError::WriteError(path, err) => {
                write!(f, "Failed to write config file '{}': {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_validate_requires_mount_and_target() {
        assert!(RunConfig::new("", "/out").validate().is_err());
        assert!(RunConfig::new("/mnt/iphone", "").validate().is_err());
        assert!(RunConfig::new("/mnt/iphone", "/out").validate().is_ok());

        match RunConfig::new("", "").normalized() {
            Err(ExtractionError::Configuration(msg)) => assert!(msg.contains("mount")),
            other => panic!("expected configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_normalize_destination_is_idempotent() {
        let once = normalize_destination(Path::new("/out/photos"));
        assert!(once.to_string_lossy().ends_with(MAIN_SEPARATOR));

        let twice = normalize_destination(&once);
        assert_eq!(once, twice);
        assert_eq!(once.join("IMG_1.JPG"), Path::new("/out/photos").join("IMG_1.JPG"));
    }

    #[test]
    fn test_run_config_roots() {
        let config = RunConfig::new("/mnt/iphone", "/out");
        assert_eq!(config.dcim_root(), Path::new("/mnt/iphone/DCIM"));
        assert_eq!(
            config.mutations_root(),
            Path::new("/mnt/iphone/PhotoData/Mutations/DCIM")
        );
    }

    #[test]
    fn test_default_destination_is_dated() {
        let dest = default_destination();
        let name = dest.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.ends_with("-phone"));
        assert_eq!(name.len(), "2024-01-31-phone".len());
        assert_eq!(dest.parent().unwrap().file_name().unwrap(), "Pictures");
    }

    #[test]
    fn test_cli_values_override_file() {
        let mut config = Config::default();
        config.source.mount = PathBuf::from("/mnt/from-file");
        config.output.directory = PathBuf::from("/out/from-file");
        config.transfer.dry_run = true;

        let run = config.to_run_config(None, None, false, false);
        assert_eq!(run.mount, PathBuf::from("/mnt/from-file"));
        assert_eq!(run.destination, PathBuf::from("/out/from-file"));
        assert!(run.dry_run);
        assert!(!run.delete);

        let run = config.to_run_config(
            Some(PathBuf::from("/mnt/cli")),
            Some(PathBuf::from("/out/cli")),
            true,
            false,
        );
        assert_eq!(run.mount, PathBuf::from("/mnt/cli"));
        assert_eq!(run.destination, PathBuf::from("/out/cli"));
        assert!(run.delete);
    }

    #[test]
    fn test_empty_output_falls_back_to_default_destination() {
        let run = Config::default().to_run_config(Some(PathBuf::from("/mnt")), None, false, false);
        assert!(run.destination.to_string_lossy().ends_with("-phone"));
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = Config::load(temp_dir.path().join("nope.toml"));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[transfer]\ndelete = true\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert!(config.transfer.delete);
        assert!(!config.transfer.dry_run);
        assert_eq!(config.logging.level, "info");
        assert!(config.source.mount.as_os_str().is_empty());
    }

    #[test]
    fn test_load_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[transfer\ndelete = ").unwrap();
        assert!(matches!(Config::load(&path), Err(ConfigError::ParseError(_, _))));
    }

    #[test]
    fn test_save_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        let mut config = Config::default();
        config.source.mount = PathBuf::from("/mnt/iphone");
        config.logging.level = "debug".to_string();
        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn test_example_config_parses() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");
        Config::write_default_config(&path).unwrap();

        let config = Config::load(&path).unwrap();
        assert!(!config.transfer.delete);
        assert!(!config.transfer.dry_run);
    }
}
