//! Configuration management for Mirage.
//!
//! Every section carries `#[serde(default)]` so a partial TOML file only
//! overrides what it names. The pattern lists driving the policy engine are
//! plain data here; nothing downstream hardcodes them.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_SCHEMA_VERSION: u32 = 1;

const DEFAULT_STORE_DIR: &str = ".mirage";
const DEFAULT_PROFILE_FILE: &str = "identity-profile.json";
const DEFAULT_CATALOG_FILE: &str = "hardware-templates.json";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[cfg(feature = "toml")]
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Top-level Mirage configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MirageConfig {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub policy: PolicyConfig,
    #[serde(default)]
    pub profile: ProfileConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the identity profile is persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StoreConfig {
    pub directory: PathBuf,
    pub file_name: String,
}

/// Location of the hardware template catalog document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CatalogConfig {
    pub path: PathBuf,
}

/// Pattern lists consulted by the policy engine and request rewriter.
///
/// Destination patterns are plain substrings of the full destination URL.
/// Keywords are matched case-insensitively against the stringified payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PolicyConfig {
    pub essential_patterns: Vec<String>,
    pub identity_patterns: Vec<String>,
    pub telemetry_patterns: Vec<String>,
    pub identity_keywords: Vec<String>,
    pub identity_headers: Vec<String>,
}

/// Software descriptors frozen into a profile at generation time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProfileConfig {
    pub editor_version: String,
    pub runtime_version: String,
    pub package_manager_version: String,
    pub extension_version: String,
    pub locale: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,
    pub format: LogFormat,
}

fn default_schema_version() -> u32 {
    CONFIG_SCHEMA_VERSION
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Home directory from the environment, falling back to the working directory.
pub fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            directory: home_dir().join(DEFAULT_STORE_DIR),
            file_name: DEFAULT_PROFILE_FILE.to_string(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_CATALOG_FILE),
        }
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            essential_patterns: strings(&[
                "/api/completion",
                "/api/chat",
                "/api/search",
                "/api/index",
                "vscode-webview",
                "localhost",
                "127.0.0.1",
                "[::1]",
            ]),
            identity_patterns: strings(&[
                "/api/auth",
                "/api/verify",
                "/api/login",
                "/api/register",
                "/api/user",
                "/api/device",
            ]),
            telemetry_patterns: strings(&[
                "segment.io",
                "analytics",
                "telemetry",
                "mixpanel",
                "amplitude",
                "google-analytics",
                "facebook.com/tr",
                "doubleclick.net",
            ]),
            identity_keywords: strings(&[
                "machineId",
                "hostname",
                "username",
                "userInfo",
                "telemetryDevDeviceId",
                "osMachineId",
                "deviceId",
                "homeDirectory",
                "userDataPath",
            ]),
            identity_headers: strings(&["User-Agent", "X-Machine-Id", "X-Device-Id"]),
        }
    }
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            editor_version: "1.85.2".to_string(),
            runtime_version: "v18.17.0".to_string(),
            package_manager_version: "9.6.7".to_string(),
            extension_version: "0.525.0".to_string(),
            locale: "en-US".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl Default for MirageConfig {
    fn default() -> Self {
        Self {
            schema_version: CONFIG_SCHEMA_VERSION,
            store: StoreConfig::default(),
            catalog: CatalogConfig::default(),
            policy: PolicyConfig::default(),
            profile: ProfileConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl MirageConfig {
    /// Load from a TOML file. A relative catalog path is resolved against
    /// the directory holding the config file.
    #[cfg(feature = "toml")]
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let mut config: MirageConfig = toml::from_str(&content)?;

        if config.catalog.path.is_relative() {
            if let Some(parent) = path.parent() {
                config.catalog.path = parent.join(&config.catalog.path);
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Full path of the persisted identity profile.
    pub fn profile_path(&self) -> PathBuf {
        self.store.directory.join(&self.store.file_name)
    }

    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(dir) = std::env::var("MIRAGE_STORE_DIR") {
            if !dir.trim().is_empty() {
                self.store.directory = PathBuf::from(dir);
            }
        }

        if let Ok(catalog) = std::env::var("MIRAGE_CATALOG_PATH") {
            if !catalog.trim().is_empty() {
                self.catalog.path = PathBuf::from(catalog);
            }
        }

        if let Ok(level) = std::env::var("MIRAGE_LOG_LEVEL") {
            if !level.trim().is_empty() {
                self.logging.level = level;
            }
        }

        if let Ok(format) = std::env::var("MIRAGE_LOG_FORMAT") {
            match format.to_ascii_lowercase().as_str() {
                "json" => self.logging.format = LogFormat::Json,
                "pretty" | "text" => self.logging.format = LogFormat::Pretty,
                _ => {}
            }
        }

        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.file_name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "store.file_name cannot be empty".to_string(),
            ));
        }

        let lists = [
            ("essential_patterns", &self.policy.essential_patterns),
            ("identity_patterns", &self.policy.identity_patterns),
            ("telemetry_patterns", &self.policy.telemetry_patterns),
            ("identity_keywords", &self.policy.identity_keywords),
        ];
        for (name, list) in lists {
            if list.iter().any(|p| p.is_empty()) {
                return Err(ConfigError::ValidationError(format!(
                    "policy.{} contains an empty entry, which would match every request",
                    name
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = MirageConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.schema_version, CONFIG_SCHEMA_VERSION);
        assert_eq!(config.store.file_name, "identity-profile.json");
        assert!(config
            .policy
            .telemetry_patterns
            .iter()
            .any(|p| p == "segment.io"));
    }

    #[test]
    fn test_profile_path_joins_store_dir() {
        let mut config = MirageConfig::default();
        config.store.directory = PathBuf::from("/var/lib/mirage");
        assert_eq!(
            config.profile_path(),
            PathBuf::from("/var/lib/mirage/identity-profile.json")
        );
    }

    #[test]
    fn test_empty_pattern_rejected() {
        let mut config = MirageConfig::default();
        config.policy.telemetry_patterns.push(String::new());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_empty_file_name_rejected() {
        let mut config = MirageConfig::default();
        config.store.file_name = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_partial_toml_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mirage.toml");
        std::fs::write(
            &path,
            r#"
[store]
directory = "/tmp/mirage-store"

[policy]
telemetry_patterns = ["metrics.example.net"]

[logging]
format = "json"
"#,
        )
        .unwrap();

        let config = MirageConfig::from_file(&path).unwrap();
        assert_eq!(config.store.directory, PathBuf::from("/tmp/mirage-store"));
        assert_eq!(config.store.file_name, "identity-profile.json");
        assert_eq!(config.policy.telemetry_patterns, vec!["metrics.example.net"]);
        assert!(!config.policy.essential_patterns.is_empty());
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.catalog.path, dir.path().join("hardware-templates.json"));
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_invalid_toml_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[store\ndirectory = ").unwrap();
        assert!(matches!(
            MirageConfig::from_file(&path),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_shipped_config_matches_defaults() {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../config/mirage.toml");
        let config = MirageConfig::from_file(&path).unwrap();
        let defaults = MirageConfig::default();
        assert_eq!(config.policy, defaults.policy);
        assert_eq!(config.profile, defaults.profile);
        assert_eq!(config.logging, defaults.logging);
        assert!(config.catalog.path.ends_with("config/hardware-templates.json"));
    }
}
