use crate::errors::{Error, Result};
use serde::Deserialize;
use std::str::FromStr;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{fmt, EnvFilter};

/// Configuration for the logging system
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// The log level to use
    pub level: Level,
    /// Whether to enable JSON formatting
    pub json: bool,
    /// Whether to include file and line information
    pub file_info: bool,
    /// Whether to log span open/close events
    pub log_spans: bool,
    /// Application name reported in the welcome line
    pub app_name: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: Level::INFO,
            json: false,
            file_info: false,
            log_spans: false,
            app_name: "connect-routing".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Create a new logging configuration
    pub fn new(level: Level, app_name: impl Into<String>) -> Self {
        LoggingConfig {
            level,
            app_name: app_name.into(),
            ..Default::default()
        }
    }

    /// Enable JSON formatting
    pub fn with_json(mut self) -> Self {
        self.json = true;
        self
    }

    /// Enable file and line information in logs
    pub fn with_file_info(mut self) -> Self {
        self.file_info = true;
        self
    }

    /// Enable span logging
    pub fn with_spans(mut self) -> Self {
        self.log_spans = true;
        self
    }
}

/// Serializable form of [`LoggingConfig`], as it appears in configuration files.
///
/// Serverless handlers usually emit JSON lines, so `json` defaults to `true`
/// here while [`LoggingConfig::default`] stays human-readable for local use.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub json: bool,
    pub file_info: bool,
    pub log_spans: bool,
    pub app_name: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: true,
            file_info: false,
            log_spans: false,
            app_name: "connect-routing".to_string(),
        }
    }
}

impl LoggingSettings {
    /// Resolve the textual level and build a [`LoggingConfig`]
    pub fn to_logging_config(&self) -> Result<LoggingConfig> {
        Ok(LoggingConfig {
            level: parse_log_level(&self.level)?,
            json: self.json,
            file_info: self.file_info,
            log_spans: self.log_spans,
            app_name: self.app_name.clone(),
        })
    }
}

/// Set up the global subscriber with the provided configuration.
///
/// Warm serverless containers may call this more than once; a second call
/// returns [`Error::Logging`] instead of panicking.
pub fn setup_logging(config: LoggingConfig) -> Result<()> {
    let filter = EnvFilter::from_default_env().add_directive(config.level.into());

    let span_events = if config.log_spans {
        FmtSpan::ACTIVE
    } else {
        FmtSpan::NONE
    };

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_span_events(span_events)
        .with_file(config.file_info)
        .with_line_number(config.file_info);

    let installed = if config.json {
        subscriber.json().try_init()
    } else {
        subscriber.try_init()
    };

    installed.map_err(|e| Error::Logging(e.to_string()))
}

/// Parse a log level from a string
pub fn parse_log_level(level: &str) -> Result<Level> {
    Level::from_str(level.trim())
        .map_err(|_| Error::Config(format!("Invalid log level: {}", level)))
}

/// Log a welcome message with version info
pub fn log_welcome(app_name: &str, version: &str) {
    tracing::info!("Starting {} v{}", app_name, version);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_log_level() {
        assert_eq!(parse_log_level("debug").unwrap(), Level::DEBUG);
        assert_eq!(parse_log_level("WARN").unwrap(), Level::WARN);
        assert_eq!(parse_log_level(" trace ").unwrap(), Level::TRACE);

        let err = parse_log_level("loud").unwrap_err();
        assert!(err.to_string().contains("Invalid log level: loud"));
    }

    #[test]
    fn test_builder_methods() {
        let config = LoggingConfig::new(Level::DEBUG, "routing-test")
            .with_json()
            .with_file_info()
            .with_spans();

        assert_eq!(config.level, Level::DEBUG);
        assert_eq!(config.app_name, "routing-test");
        assert!(config.json);
        assert!(config.file_info);
        assert!(config.log_spans);
    }

    #[test]
    fn test_settings_to_config() {
        let settings = LoggingSettings {
            level: "error".to_string(),
            ..Default::default()
        };
        let config = settings.to_logging_config().unwrap();
        assert_eq!(config.level, Level::ERROR);
        assert!(config.json);

        let bad = LoggingSettings {
            level: "nope".to_string(),
            ..Default::default()
        };
        assert!(bad.to_logging_config().is_err());
    }
}
