//! Server configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use time::UtcOffset;
use time::macros::format_description;

/// Server configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server settings.
    pub server: ServerConfig,
    /// Storage settings.
    pub storage: StorageConfig,
    /// Simulated scale settings.
    pub scale: ScaleConfig,
    /// Station clock settings.
    pub station: StationConfig,
}

impl Config {
    /// Load configuration from the default path.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = default_config_path();
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Read {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.as_ref().to_path_buf(),
            source: e,
        })
    }

    /// Save configuration to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;

        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        std::fs::write(path.as_ref(), content).map_err(|e| ConfigError::Write {
            path: path.as_ref().to_path_buf(),
            source: e,
        })
    }

    /// Validate the configuration and return any errors.
    ///
    /// This checks:
    /// - Server bind address is valid (host:port format)
    /// - Storage paths are not empty
    /// - Scale range is positive and ordered, stabilization is bounded
    /// - Station UTC offset, if set, is `+HH:MM` or `-HH:MM`
    ///
    /// # Example
    ///
    /// ```
    /// use weigh_service::Config;
    ///
    /// let config = Config::default();
    /// config.validate().expect("Default config should be valid");
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        errors.extend(self.server.validate());
        errors.extend(self.storage.validate());
        errors.extend(self.scale.validate());
        errors.extend(self.station.validate());

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Load and validate configuration from a file.
    pub fn load_validated<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Self::load(path)?;
        config.validate()?;
        Ok(config)
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:8000").
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8000".to_string(),
        }
    }
}

impl ServerConfig {
    /// Validate server configuration.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.bind.is_empty() {
            errors.push(ValidationError::new(
                "server.bind",
                "bind address cannot be empty",
            ));
            return errors;
        }

        match self.bind.rsplit_once(':') {
            None => errors.push(ValidationError::new(
                "server.bind",
                format!(
                    "invalid bind address '{}': expected format 'host:port'",
                    self.bind
                ),
            )),
            Some((_, port)) => match port.parse::<u16>() {
                Ok(0) => errors.push(ValidationError::new("server.bind", "port cannot be 0")),
                Err(_) => errors.push(ValidationError::new(
                    "server.bind",
                    format!("invalid port '{}': must be a number 1-65535", port),
                )),
                Ok(_) => {}
            },
        }

        errors
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Database file path.
    pub path: PathBuf,
    /// Printer settings document path.
    pub printer_settings: PathBuf,
    /// Directory receipts are printed into.
    pub receipts_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: weigh_store::default_db_path(),
            printer_settings: weigh_store::default_printer_settings_path(),
            receipts_dir: weigh_store::default_receipts_dir(),
        }
    }
}

impl StorageConfig {
    /// Validate storage configuration.
    pub fn validate(&self) -> Vec<ValidationError> {
        [
            ("storage.path", &self.path, "database path"),
            (
                "storage.printer_settings",
                &self.printer_settings,
                "printer settings path",
            ),
            ("storage.receipts_dir", &self.receipts_dir, "receipts directory"),
        ]
        .into_iter()
        .filter(|(_, path, _)| path.as_os_str().is_empty())
        .map(|(field, _, what)| ValidationError::new(field, format!("{what} cannot be empty")))
        .collect()
    }
}

/// Maximum stabilization delay in milliseconds (1 minute).
pub const MAX_STABILIZATION_MS: u64 = 60_000;

/// Simulated scale configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleConfig {
    /// Lightest weight the scale reports, in kilograms.
    pub min_weight_kg: f64,
    /// Heaviest weight the scale reports, in kilograms.
    pub max_weight_kg: f64,
    /// Delay before a reading is reported, in milliseconds.
    pub stabilization_ms: u64,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            min_weight_kg: weigh_core::SimulatedScale::DEFAULT_MIN_KG,
            max_weight_kg: weigh_core::SimulatedScale::DEFAULT_MAX_KG,
            stabilization_ms: weigh_core::SimulatedScale::DEFAULT_STABILIZATION.as_millis() as u64,
        }
    }
}

impl ScaleConfig {
    /// The stabilization delay as a [`Duration`].
    pub fn stabilization(&self) -> Duration {
        Duration::from_millis(self.stabilization_ms)
    }

    /// Validate scale configuration.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if !(self.min_weight_kg.is_finite() && self.min_weight_kg > 0.0) {
            errors.push(ValidationError::new(
                "scale.min_weight_kg",
                format!("minimum weight {} must be positive", self.min_weight_kg),
            ));
        }

        if !self.max_weight_kg.is_finite() || self.max_weight_kg < self.min_weight_kg {
            errors.push(ValidationError::new(
                "scale.max_weight_kg",
                format!(
                    "maximum weight {} must not be below the minimum {}",
                    self.max_weight_kg, self.min_weight_kg
                ),
            ));
        }

        if self.stabilization_ms > MAX_STABILIZATION_MS {
            errors.push(ValidationError::new(
                "scale.stabilization_ms",
                format!(
                    "stabilization {} ms is too long (maximum {} ms)",
                    self.stabilization_ms, MAX_STABILIZATION_MS
                ),
            ));
        }

        errors
    }
}

/// Station clock configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StationConfig {
    /// Fixed UTC offset of the station, e.g. `"-03:00"`.
    ///
    /// When unset, the host's current offset is used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utc_offset: Option<String>,
}

impl StationConfig {
    /// Resolve the station's UTC offset.
    pub fn resolve_offset(&self) -> Result<UtcOffset, ConfigError> {
        match &self.utc_offset {
            Some(text) => parse_offset(text)
                .ok_or_else(|| ConfigError::Validation(vec![offset_error(text)])),
            None => Ok(weigh_core::system_utc_offset()),
        }
    }

    /// Validate station configuration.
    pub fn validate(&self) -> Vec<ValidationError> {
        match &self.utc_offset {
            Some(text) if parse_offset(text).is_none() => vec![offset_error(text)],
            _ => Vec::new(),
        }
    }
}

fn parse_offset(text: &str) -> Option<UtcOffset> {
    UtcOffset::parse(
        text.trim(),
        format_description!("[offset_hour sign:mandatory]:[offset_minute]"),
    )
    .ok()
}

fn offset_error(text: &str) -> ValidationError {
    ValidationError::new(
        "station.utc_offset",
        format!("invalid offset '{}': expected '+HH:MM' or '-HH:MM'", text),
    )
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),
    #[error("Failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    Validation(Vec<ValidationError>),
}

/// A single validation error with context.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The field path (e.g., `server.bind` or `scale.max_weight_kg`).
    pub field: String,
    /// Description of the validation failure.
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Default configuration file path.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("weighstation")
        .join("server.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::offset;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server.bind, "127.0.0.1:8000");
        assert_eq!(config.scale.min_weight_kg, 0.1);
        assert_eq!(config.scale.max_weight_kg, 5.0);
        assert_eq!(config.scale.stabilization(), Duration::from_secs(2));
        assert!(config.station.utc_offset.is_none());
        assert!(config.storage.path.ends_with("data.db"));
    }

    #[test]
    fn test_config_save_and_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        let config = Config {
            server: ServerConfig {
                bind: "0.0.0.0:9090".to_string(),
            },
            storage: StorageConfig {
                path: PathBuf::from("/tmp/test.db"),
                printer_settings: PathBuf::from("/tmp/printer.json"),
                receipts_dir: PathBuf::from("/tmp/tickets"),
            },
            scale: ScaleConfig {
                min_weight_kg: 0.5,
                max_weight_kg: 10.0,
                stabilization_ms: 0,
            },
            station: StationConfig {
                utc_offset: Some("-03:00".to_string()),
            },
        };

        config.save(&config_path).unwrap();
        let loaded = Config::load(&config_path).unwrap();

        assert_eq!(loaded.server.bind, "0.0.0.0:9090");
        assert_eq!(loaded.storage.path, PathBuf::from("/tmp/test.db"));
        assert_eq!(loaded.storage.receipts_dir, PathBuf::from("/tmp/tickets"));
        assert_eq!(loaded.scale.max_weight_kg, 10.0);
        assert_eq!(loaded.station.utc_offset.as_deref(), Some("-03:00"));
    }

    #[test]
    fn test_config_load_nonexistent() {
        let result = Config::load("/nonexistent/path/config.toml");
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_config_load_invalid_toml() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("invalid.toml");
        std::fs::write(&config_path, "this is not valid { toml").unwrap();

        let result = Config::load(&config_path);
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_config_partial_toml() {
        let toml = r#"
            [server]
            bind = "192.168.1.1:8888"

            [station]
            utc_offset = "+05:30"
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.bind, "192.168.1.1:8888");
        assert_eq!(config.scale.max_weight_kg, 5.0);
        assert_eq!(
            config.station.resolve_offset().unwrap(),
            offset!(+5:30)
        );
    }

    #[test]
    fn test_default_config_path() {
        let path = default_config_path();
        assert!(path.ends_with("weighstation/server.toml"));
    }

    #[test]
    fn test_default_config_validates() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_server_bind_validation() {
        let valid = ServerConfig {
            bind: "[::1]:8000".to_string(),
        };
        assert!(valid.validate().is_empty());

        for (bind, expected) in [
            ("", "cannot be empty"),
            ("127.0.0.1", "host:port"),
            ("127.0.0.1:0", "cannot be 0"),
            ("127.0.0.1:abc", "must be a number"),
        ] {
            let errors = ServerConfig {
                bind: bind.to_string(),
            }
            .validate();
            assert_eq!(errors.len(), 1, "bind {bind:?}");
            assert!(errors[0].message.contains(expected), "bind {bind:?}");
        }
    }

    #[test]
    fn test_storage_validation_reports_each_empty_path() {
        let storage = StorageConfig {
            path: PathBuf::new(),
            printer_settings: PathBuf::from("/tmp/printer.json"),
            receipts_dir: PathBuf::new(),
        };

        let errors = storage.validate();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "storage.path");
        assert_eq!(errors[1].field, "storage.receipts_dir");
    }

    #[test]
    fn test_scale_validation() {
        let inverted = ScaleConfig {
            min_weight_kg: 2.0,
            max_weight_kg: 1.0,
            stabilization_ms: 0,
        };
        let errors = inverted.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "scale.max_weight_kg");

        let nonpositive = ScaleConfig {
            min_weight_kg: 0.0,
            ..ScaleConfig::default()
        };
        assert_eq!(nonpositive.validate()[0].field, "scale.min_weight_kg");

        let slow = ScaleConfig {
            stabilization_ms: MAX_STABILIZATION_MS + 1,
            ..ScaleConfig::default()
        };
        assert_eq!(slow.validate()[0].field, "scale.stabilization_ms");
    }

    #[test]
    fn test_station_offset() {
        let fixed = StationConfig {
            utc_offset: Some("-03:00".to_string()),
        };
        assert!(fixed.validate().is_empty());
        assert_eq!(fixed.resolve_offset().unwrap(), offset!(-3));

        let bad = StationConfig {
            utc_offset: Some("Brasilia".to_string()),
        };
        assert_eq!(bad.validate().len(), 1);
        assert!(matches!(
            bad.resolve_offset(),
            Err(ConfigError::Validation(_))
        ));

        assert!(StationConfig::default().resolve_offset().is_ok());
    }

    #[test]
    fn test_validation_collects_all_errors() {
        let config = Config {
            server: ServerConfig {
                bind: String::new(),
            },
            scale: ScaleConfig {
                min_weight_kg: -1.0,
                ..ScaleConfig::default()
            },
            ..Config::default()
        };

        match config.validate() {
            Err(ConfigError::Validation(errors)) => {
                assert_eq!(errors.len(), 2);
                let message = ConfigError::Validation(errors).to_string();
                assert!(message.contains("server.bind"));
                assert!(message.contains("scale.min_weight_kg"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_load_validated_rejects_invalid() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "[server]\nbind = \"nope\"\n").unwrap();

        assert!(matches!(
            Config::load_validated(&config_path),
            Err(ConfigError::Validation(_))
        ));
    }
}
