//! Application configuration for DashPrep.
//!
//! User config lives at `~/.dashprep/dashprep.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DashPrepError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "dashprep.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".dashprep";

// ---------------------------------------------------------------------------
// Config structs (matching dashprep.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Input table locations.
    #[serde(default)]
    pub inputs: InputsConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Default dataset output directory.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Recruitment target year: only projects funded in this year are
    /// considered by the matcher.
    #[serde(default = "default_target_year")]
    pub target_year: i32,

    /// Departments kept in the demographics ranking.
    #[serde(default = "default_top_departments")]
    pub top_departments: usize,

    /// Departments kept in the performance ranking.
    #[serde(default = "default_top_performance")]
    pub top_performance: usize,

    /// Matched projects kept in the recruitment detail list.
    #[serde(default = "default_top_projects")]
    pub top_projects: usize,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            target_year: default_target_year(),
            top_departments: default_top_departments(),
            top_performance: default_top_performance(),
            top_projects: default_top_projects(),
        }
    }
}

fn default_output_dir() -> String {
    "~/dashprep-datasets".into()
}
fn default_target_year() -> i32 {
    2025
}
fn default_top_departments() -> usize {
    10
}
fn default_top_performance() -> usize {
    7
}
fn default_top_projects() -> usize {
    20
}

/// `[inputs]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputsConfig {
    /// Personnel table path (CSV).
    #[serde(default = "default_personnel")]
    pub personnel: String,

    /// Funded-projects table path (CSV).
    #[serde(default = "default_projects")]
    pub projects: String,
}

impl Default for InputsConfig {
    fn default() -> Self {
        Self {
            personnel: default_personnel(),
            projects: default_projects(),
        }
    }
}

fn default_personnel() -> String {
    "total_df.csv".into()
}
fn default_projects() -> String {
    "ntis_results.csv".into()
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.dashprep/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| DashPrepError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.dashprep/dashprep.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| DashPrepError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        DashPrepError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| DashPrepError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| DashPrepError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| DashPrepError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("output_dir"));
        assert!(toml_str.contains("target_year"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.defaults.target_year, 2025);
        assert_eq!(parsed.defaults.top_departments, 10);
        assert_eq!(parsed.defaults.top_performance, 7);
        assert_eq!(parsed.defaults.top_projects, 20);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[defaults]
target_year = 2024

[inputs]
personnel = "/data/people.csv"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.defaults.target_year, 2024);
        assert_eq!(config.defaults.top_projects, 20);
        assert_eq!(config.inputs.personnel, "/data/people.csv");
        assert_eq!(config.inputs.projects, "ntis_results.csv");
    }
}
