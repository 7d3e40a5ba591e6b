use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Configuration for tokei-release.
///
/// Lists the files the bump tool rewrites, as paths relative to the
/// repository root.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub targets: TargetsConfig,
}

/// Target file paths, relative to the repository root.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TargetsConfig {
    #[serde(default = "default_manifest")]
    pub manifest: String,

    #[serde(default = "default_installer_script")]
    pub installer_script: String,

    #[serde(default = "default_ui_entry")]
    pub ui_entry: String,

    #[serde(default = "default_version_resource")]
    pub version_resource: String,
}

fn default_manifest() -> String {
    "package.json".to_string()
}

fn default_installer_script() -> String {
    "installer/tokei.iss".to_string()
}

fn default_ui_entry() -> String {
    "src/main.js".to_string()
}

fn default_version_resource() -> String {
    "build/version_info.txt".to_string()
}

impl Default for TargetsConfig {
    fn default() -> Self {
        TargetsConfig {
            manifest: default_manifest(),
            installer_script: default_installer_script(),
            ui_entry: default_ui_entry(),
            version_resource: default_version_resource(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            targets: TargetsConfig::default(),
        }
    }
}

impl Config {
    /// Resolve a target path against the repository root.
    pub fn resolve(&self, root: &Path, relative: &str) -> PathBuf {
        root.join(relative)
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `release.toml` in the repository root
/// 3. `.tokei-release.toml` in the user config directory
/// 4. Default configuration if no file found
pub fn load_config(config_path: Option<&str>, root: &Path) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if root.join("release.toml").exists() {
        fs::read_to_string(root.join("release.toml"))?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(".tokei-release.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config: Config = toml::from_str(&config_str)?;
    Ok(config)
}
