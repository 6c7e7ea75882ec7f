use crate::error::{RelnotesError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Project-local config file name
pub const CONFIG_FILE: &str = "relnotes.toml";

/// relnotes configuration, read from `relnotes.toml`
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub release: ReleaseConfig,

    #[serde(default)]
    pub notes: NotesConfig,

    #[serde(default)]
    pub verify: VerifyConfig,
}

fn default_true() -> bool {
    true
}

fn default_min_description_length() -> usize {
    crate::verify::DEFAULT_MIN_DESCRIPTION_LENGTH
}

/// How the next release is worked out
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ReleaseConfig {
    /// Keep breaking changes on the 0.Y line instead of jumping to 1.0.0
    #[serde(default = "default_true")]
    pub pre10: bool,

    /// Read history from the upstream of release branches when they have one
    #[serde(default = "default_true")]
    pub use_upstream: bool,

    /// Fetch the upstream before reading history
    #[serde(default = "default_true")]
    pub refresh_upstream: bool,

    /// When promoting a pre-release to final, also list everything since the last final
    #[serde(default = "default_true")]
    pub print_full_final: bool,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        ReleaseConfig {
            pre10: true,
            use_upstream: true,
            refresh_upstream: true,
            print_full_final: true,
        }
    }
}

/// How the notes are rendered
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct NotesConfig {
    /// Extra sections to show: `docs`, `infra`, `release`
    #[serde(default)]
    pub show_others: Vec<String>,

    /// GitHub project in `org/repo` form, used for release links
    #[serde(default)]
    pub project: Option<String>,
}

/// Pull request check settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct VerifyConfig {
    #[serde(default = "default_min_description_length")]
    pub min_description_length: usize,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        VerifyConfig {
            min_description_length: default_min_description_length(),
        }
    }
}

/// Load configuration
///
/// Search order: the explicit path, `./relnotes.toml`, then
/// `.relnotes.toml` in the user config directory. Falls back to defaults
/// when none exist.
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)
            .map_err(|e| RelnotesError::config(format!("cannot read '{}': {}", path, e)))?
    } else if Path::new(CONFIG_FILE).exists() {
        fs::read_to_string(CONFIG_FILE)?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(format!(".{}", CONFIG_FILE));
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.release.pre10);
        assert!(config.release.use_upstream);
        assert!(config.release.refresh_upstream);
        assert!(config.release.print_full_final);
        assert!(config.notes.show_others.is_empty());
        assert_eq!(config.notes.project, None);
        assert_eq!(config.verify.min_description_length, 40);
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config: Config = toml::from_str(
            r#"
[release]
pre10 = false
"#,
        )
        .unwrap();
        assert!(!config.release.pre10);
        assert!(config.release.use_upstream);
        assert_eq!(config.verify.min_description_length, 40);
    }
}
