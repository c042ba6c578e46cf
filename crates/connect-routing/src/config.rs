//! Handler configuration
//!
//! ```toml
//! [logging]
//! level = "debug"
//! json = true
//!
//! [validation]
//! error_mode = "collect"
//! max_expression_depth = 16
//! ```
//!
//! Every key can be overridden from the environment, e.g.
//! `CONNECT_ROUTING__VALIDATION__ERROR_MODE=collect`.

use std::path::Path;

use connect_infra_common::logging::log_welcome;
use connect_infra_common::{config, LoggingSettings};
use connect_routing_core::ValidatorConfig;
use serde::Deserialize;

/// Prefix of environment variable overrides
pub const ENV_PREFIX: &str = "CONNECT_ROUTING";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct IntegrationConfig {
    pub logging: LoggingSettings,
    pub validation: ValidatorConfig,
}

impl IntegrationConfig {
    /// Defaults, an optional TOML file, then `CONNECT_ROUTING__*` variables
    pub fn load(file: Option<&Path>) -> connect_infra_common::Result<Self> {
        config::load(file, ENV_PREFIX)
    }

    pub fn from_toml_str(text: &str) -> connect_infra_common::Result<Self> {
        config::load_from_str(text, ENV_PREFIX)
    }

    /// Install the global `tracing` subscriber described by `[logging]`
    pub fn init_logging(&self) -> connect_infra_common::Result<()> {
        connect_infra_common::setup_logging(self.logging.to_logging_config()?)?;
        log_welcome(&self.logging.app_name, crate::VERSION);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use connect_routing_core::ErrorMode;

    #[test]
    fn test_sections_default_independently() {
        let config = IntegrationConfig::from_toml_str(
            r#"
            [validation]
            error_mode = "collect"
            "#,
        )
        .unwrap();
        assert_eq!(config.validation.error_mode, ErrorMode::Collect);
        assert_eq!(config.validation.max_expression_depth, None);
        assert_eq!(config.logging, LoggingSettings::default());
    }

    #[test]
    fn test_invalid_error_mode_rejected() {
        let result = IntegrationConfig::from_toml_str(
            r#"
            [validation]
            error_mode = "sometimes"
            "#,
        );
        assert!(result.is_err());
    }
}
