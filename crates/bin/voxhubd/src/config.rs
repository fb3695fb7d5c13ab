//! Configuration loading - TOML file with environment variable overrides.
//!
//! Looks for `voxhub.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::collections::BTreeMap;

use serde::Deserialize;

use voxhub_domain::command::{CommandInterpreter, VocabularyEntry};
use voxhub_domain::device::{DeviceId, DeviceStatus};
use voxhub_domain::error::ValidationError;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Initial status per device id, e.g. `Fan = "on"`.
    pub devices: BTreeMap<String, DeviceStatus>,
    /// Ordered keyword → device mappings used to interpret commands.
    /// `None` keeps the built-in vocabulary.
    pub vocabulary: Option<Vec<VocabularyEntry>>,
    /// Event bus settings.
    pub events: EventsConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct EventsConfig {
    /// Broadcast channel capacity; slow SSE subscribers lag past this.
    pub capacity: usize,
}

impl Config {
    /// Load configuration from `voxhub.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("voxhub.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("VOXHUB_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("VOXHUB_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("VOXHUB_BIND") {
            if let Some((host, port)) = val.rsplit_once(':') {
                self.server.host = host.to_string();
                if let Ok(port) = port.parse() {
                    self.server.port = port;
                }
            }
        }
        if let Ok(val) = std::env::var("VOXHUB_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.events.capacity == 0 {
            return Err(ConfigError::Validation(
                "event capacity must be non-zero".to_string(),
            ));
        }
        self.interpreter()?;
        self.initial_devices()?;
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Build the command interpreter. Without a `[[vocabulary]]` section the
    /// built-in `fan` / `light` vocabulary is used.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Domain`] when a keyword is blank or an explicit
    /// vocabulary is empty.
    pub fn interpreter(&self) -> Result<CommandInterpreter, ConfigError> {
        match &self.vocabulary {
            Some(vocabulary) => Ok(CommandInterpreter::new(vocabulary.iter().cloned())?),
            None => Ok(CommandInterpreter::default()),
        }
    }

    /// Devices to register at startup: every vocabulary device starts OFF,
    /// then `[devices]` entries set or add explicit statuses.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Domain`] for a blank device id.
    pub fn initial_devices(&self) -> Result<Vec<(DeviceId, DeviceStatus)>, ConfigError> {
        let mut devices: BTreeMap<DeviceId, DeviceStatus> = self
            .interpreter()?
            .devices()
            .map(|id| (id.clone(), DeviceStatus::Off))
            .collect();
        for (id, status) in &self.devices {
            devices.insert(DeviceId::new(id.as_str())?, *status);
        }
        Ok(devices.into_iter().collect())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "voxhubd=info,voxhub_app=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self { capacity: 256 }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
    /// A configured device or keyword violates a domain rule.
    #[error("invalid configuration")]
    Domain(#[from] ValidationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(devices: &[(DeviceId, DeviceStatus)]) -> Vec<&str> {
        devices.iter().map(|(id, _)| id.as_str()).collect()
    }

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.events.capacity, 256);
        assert!(config.devices.is_empty());
        assert!(config.vocabulary.is_none());
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 3000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [server]
            host = '127.0.0.1'
            port = 9090

            [logging]
            filter = 'debug'

            [devices]
            Fan = 'on'
            AC = 'off'

            [[vocabulary]]
            keyword = 'fan'
            device = 'Fan'

            [[vocabulary]]
            keyword = 'ac'
            device = 'AC'

            [events]
            capacity = 32
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.logging.filter, "debug");
        assert_eq!(config.devices.get("Fan"), Some(&DeviceStatus::On));
        let vocabulary = config.vocabulary.unwrap();
        assert_eq!(vocabulary.len(), 2);
        assert_eq!(vocabulary[1].device.as_str(), "AC");
        assert_eq!(config.events.capacity, 32);
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn should_reject_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn should_reject_zero_event_capacity() {
        let mut config = Config::default();
        config.events.capacity = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn should_reject_blank_vocabulary_keyword() {
        let toml = "
            [[vocabulary]]
            keyword = '  '
            device = 'Fan'
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Domain(ValidationError::EmptyKeyword))
        ));
    }

    #[test]
    fn should_reject_explicitly_empty_vocabulary() {
        let config: Config = toml::from_str("vocabulary = []").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Domain(ValidationError::EmptyVocabulary))
        ));
    }

    #[test]
    fn should_reject_blank_device_id() {
        let mut config = Config::default();
        config.devices.insert(" ".to_string(), DeviceStatus::On);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Domain(ValidationError::EmptyDeviceId))
        ));
    }

    #[test]
    fn should_use_builtin_vocabulary_when_none_configured() {
        let config = Config::default();
        let interpreter = config.interpreter().unwrap();
        let devices: Vec<_> = interpreter.devices().map(DeviceId::as_str).collect();
        assert_eq!(devices, vec!["Fan", "Light"]);
    }

    #[test]
    fn should_seed_vocabulary_devices_off() {
        let devices = Config::default().initial_devices().unwrap();
        assert_eq!(ids(&devices), vec!["Fan", "Light"]);
        assert!(devices.iter().all(|(_, status)| *status == DeviceStatus::Off));
    }

    #[test]
    fn should_let_devices_section_override_initial_status() {
        let toml = "
            [devices]
            Light = 'on'
            Heater = 'off'
        ";
        let config: Config = toml::from_str(toml).unwrap();

        let devices = config.initial_devices().unwrap();

        assert_eq!(ids(&devices), vec!["Fan", "Heater", "Light"]);
        assert_eq!(devices[2].1, DeviceStatus::On);
    }

    #[test]
    fn should_format_bind_addr() {
        let config = Config::default();
        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn should_format_custom_bind_addr() {
        let mut config = Config::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 9090;
        assert_eq!(config.bind_addr(), "127.0.0.1:9090");
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }

    #[test]
    fn should_report_parse_error_for_unknown_status() {
        let result: Result<Config, _> = toml::from_str("[devices]\nFan = 'dim'");
        assert!(result.is_err());
    }
}
