use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::package_name;
use crate::error::{ReleaseError, Result};

/// File name looked up in the current directory
pub const LOCAL_CONFIG_FILE: &str = "release.toml";

/// File name looked up in the user config directory
pub const USER_CONFIG_FILE: &str = ".release.toml";

/// Represents the complete configuration for release-pack.
///
/// Contains the package name, the filesystem layout, the version file symbols,
/// archive settings, and behavior options.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub package: PackageConfig,

    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub version_file: VersionFileConfig,

    #[serde(default)]
    pub archive: ArchiveConfig,

    #[serde(default)]
    pub behavior: BehaviorConfig,
}

fn default_ai_name() -> String {
    "MyAI".to_string()
}

/// Name the release files are derived from.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PackageConfig {
    #[serde(default = "default_ai_name")]
    pub ai_name: String,
}

impl Default for PackageConfig {
    fn default() -> Self {
        PackageConfig {
            ai_name: default_ai_name(),
        }
    }
}

impl PackageConfig {
    /// `ai_name` with spaces replaced by dashes
    pub fn package_name(&self) -> String {
        package_name(&self.ai_name)
    }
}

fn default_source_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_work_dir() -> PathBuf {
    PathBuf::from("../temp")
}

fn default_release_dir() -> PathBuf {
    PathBuf::from("../releases")
}

fn default_version_file() -> PathBuf {
    PathBuf::from("version.nut")
}

fn default_exclude_file() -> PathBuf {
    PathBuf::from("exclude.exc")
}

/// Filesystem layout of a release run.
///
/// Relative paths are resolved against the directory the tool runs in.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PathsConfig {
    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,

    #[serde(default = "default_work_dir")]
    pub work_dir: PathBuf,

    #[serde(default = "default_release_dir")]
    pub release_dir: PathBuf,

    #[serde(default = "default_version_file")]
    pub version_file: PathBuf,

    #[serde(default = "default_exclude_file")]
    pub exclude_file: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        PathsConfig {
            source_dir: default_source_dir(),
            work_dir: default_work_dir(),
            release_dir: default_release_dir(),
            version_file: default_version_file(),
            exclude_file: default_exclude_file(),
        }
    }
}

fn default_version_symbol() -> String {
    "SELF_VERSION".to_string()
}

fn default_date_symbol() -> String {
    "SELF_DATE".to_string()
}

/// Symbols of the two tagged declarations in the version file.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct VersionFileConfig {
    #[serde(default = "default_version_symbol")]
    pub version_symbol: String,

    #[serde(default = "default_date_symbol")]
    pub date_symbol: String,
}

impl Default for VersionFileConfig {
    fn default() -> Self {
        VersionFileConfig {
            version_symbol: default_version_symbol(),
            date_symbol: default_date_symbol(),
        }
    }
}

fn default_tar_command() -> String {
    "tar".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ArchiveConfig {
    #[serde(default = "default_tar_command")]
    pub tar_command: String,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        ArchiveConfig {
            tar_command: default_tar_command(),
        }
    }
}

/// Configuration for behavior customization.
///
/// `best_effort` keeps going (with warnings) when a packaging step fails;
/// `keep_staging` leaves the staged copy of the source tree in the work
/// directory.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct BehaviorConfig {
    #[serde(default)]
    pub best_effort: bool,

    #[serde(default)]
    pub keep_staging: bool,
}

impl Config {
    /// Check values that would only fail later in the run
    pub fn validate(&self) -> Result<()> {
        if self.package.package_name().is_empty() {
            return Err(ReleaseError::config("package.ai_name must not be empty"));
        }
        if self.archive.tar_command.trim().is_empty() {
            return Err(ReleaseError::config("archive.tar_command must not be empty"));
        }
        Ok(())
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `release.toml` in current directory
/// 3. `.release.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed, or fails validation
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path).map_err(|e| {
            ReleaseError::config(format!("cannot read {}: {}", path.display(), e))
        })?
    } else if Path::new(LOCAL_CONFIG_FILE).exists() {
        fs::read_to_string(LOCAL_CONFIG_FILE)?
    } else if let Some(config_dir) = dirs::config_dir() {
        let user_path = config_dir.join(USER_CONFIG_FILE);
        if user_path.exists() {
            tracing::debug!(path = %user_path.display(), "using user config");
            fs::read_to_string(user_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config: Config = toml::from_str(&config_str)?;
    config.validate()?;
    Ok(config)
}
