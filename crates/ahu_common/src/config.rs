//! Configuration management.
//!
//! Loads settings from /etc/ahu/config.toml, then ~/.config/ahu/config.toml,
//! or uses defaults. Every field has a serde default, so a partial file is
//! fine.

use crate::error::ConfigError;
use crate::matcher::MatcherSettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// System config file path
pub const CONFIG_PATH: &str = "/etc/ahu/config.toml";

/// Per-user config file, relative to the home directory
pub const CONFIG_PATH_USER: &str = ".config/ahu/config.toml";

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "AHU_CONFIG";

/// Where the knowledge base comes from
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KnowledgeBaseSettings {
    /// Explicit knowledge base file; unset = standard lookup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Diagnostic report options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSettings {
    /// Stamp reports with the local diagnosis time
    #[serde(default = "default_include_timestamp")]
    pub include_timestamp: bool,
}

fn default_include_timestamp() -> bool {
    true
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            include_timestamp: default_include_timestamp(),
        }
    }
}

/// Top-level config
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AhuConfig {
    #[serde(default)]
    pub matcher: MatcherSettings,

    #[serde(default)]
    pub knowledge_base: KnowledgeBaseSettings,

    #[serde(default)]
    pub report: ReportSettings,
}

impl AhuConfig {
    /// Per-user config file under the home directory
    pub fn user_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(CONFIG_PATH_USER))
    }

    /// Load config from the standard locations, or return defaults.
    ///
    /// Only a missing file moves on to the next location. A file that exists
    /// but cannot be read, parsed or validated is an error.
    pub fn load() -> Result<Self, ConfigError> {
        let mut candidates = vec![PathBuf::from(CONFIG_PATH)];
        candidates.extend(Self::user_path());
        Self::load_first(&candidates)
    }

    fn load_first(candidates: &[PathBuf]) -> Result<Self, ConfigError> {
        for path in candidates {
            match Self::load_from_path(path) {
                Ok(config) => return Ok(config),
                Err(ConfigError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => {
                    debug!("No config at {}", path.display());
                }
                Err(e) => return Err(e),
            }
        }
        info!("Config not found, using defaults");
        Ok(AhuConfig::default())
    }

    /// Load an explicitly requested config file.
    ///
    /// Unlike [`load`](Self::load), a missing file is an error here.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: AhuConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.matcher.validate()?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save default config to path (for init)
    pub fn save_default(path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(&AhuConfig::default())?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Saved default config to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::{DEFAULT_FUZZY_CUTOFF, DEFAULT_MAX_FUZZY_RESULTS};

    #[test]
    fn test_default_config() {
        let config = AhuConfig::default();
        assert_eq!(config.matcher.max_fuzzy_results, DEFAULT_MAX_FUZZY_RESULTS);
        assert_eq!(config.matcher.fuzzy_cutoff, DEFAULT_FUZZY_CUTOFF);
        assert_eq!(config.matcher.min_fallback_token_chars, 4);
        assert!(config.report.include_timestamp);
        assert!(config.knowledge_base.path.is_none());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: AhuConfig = toml::from_str(
            r#"
[matcher]
fuzzy_cutoff = 0.6
"#,
        )
        .unwrap();
        assert_eq!(config.matcher.fuzzy_cutoff, 0.6);
        assert_eq!(config.matcher.max_fuzzy_results, 5);
        assert!(config.report.include_timestamp);
    }

    #[test]
    fn test_empty_config_parses() {
        let config: AhuConfig = toml::from_str("").unwrap();
        assert_eq!(config.matcher, MatcherSettings::default());
    }

    #[test]
    fn test_save_and_reload_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        AhuConfig::save_default(&path).unwrap();

        let loaded = AhuConfig::load_from_path(&path).unwrap();
        assert_eq!(loaded.matcher, MatcherSettings::default());
        assert!(loaded.report.include_timestamp);
    }

    #[test]
    fn test_invalid_matcher_settings_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[matcher]\nfuzzy_cutoff = 2.0\n").unwrap();

        let err = AhuConfig::load_from_path(&path).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidMatcher(_)));
    }

    #[test]
    fn test_load_first_skips_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        let present = dir.path().join("config.toml");
        fs::write(&present, "[report]\ninclude_timestamp = false\n").unwrap();

        let config = AhuConfig::load_first(&[missing.clone(), present]).unwrap();
        assert!(!config.report.include_timestamp);

        let config = AhuConfig::load_first(&[missing]).unwrap();
        assert!(config.report.include_timestamp);
    }

    #[test]
    fn test_load_first_stops_at_broken_file() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("broken.toml");
        let valid = dir.path().join("valid.toml");
        fs::write(&broken, "[matcher\nfuzzy_cutoff = 0.9\n").unwrap();
        fs::write(&valid, "").unwrap();

        let err = AhuConfig::load_first(&[broken.clone(), valid.clone()]).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));

        fs::write(&broken, "[matcher]\nfuzzy_cutoff = 2.0\n").unwrap();
        let err = AhuConfig::load_first(&[broken, valid]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidMatcher(_)));
    }

    #[test]
    fn test_user_path_is_under_home() {
        if let Some(path) = AhuConfig::user_path() {
            assert!(path.ends_with(CONFIG_PATH_USER));
        }
    }

    #[test]
    fn test_missing_file_is_error() {
        let err = AhuConfig::load_from_path(Path::new("/nonexistent/ahu/config.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
