//! Configured validator used by request handlers
//!
//! [`RoutingRuleValidator`] wraps [`parse_with`] with a fixed
//! [`ValidatorConfig`] and reports outcomes through `tracing`. It holds no
//! mutable state and can be shared between threads.

use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::config::ValidatorConfig;
use crate::error::{PayloadError, ValidationErrors};
use crate::parser::parse_with;
use crate::types::{keys, RoutingPayload};

#[derive(Debug, Clone, Default)]
pub struct RoutingRuleValidator {
    config: ValidatorConfig,
}

impl RoutingRuleValidator {
    pub fn new(config: ValidatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validate a decoded routing payload document
    #[instrument(level = "debug", skip_all)]
    pub fn validate(&self, document: &Value) -> Result<RoutingPayload, ValidationErrors> {
        let step_count = document
            .get(keys::STEPS)
            .and_then(Value::as_array)
            .map(Vec::len);
        debug!(
            steps = ?step_count,
            mode = ?self.config.error_mode,
            "Validating routing payload"
        );

        match parse_with(document, &self.config) {
            Ok(payload) => {
                debug!(
                    steps = payload.len(),
                    max_depth = payload.max_depth(),
                    "Routing payload accepted"
                );
                Ok(payload)
            }
            Err(errors) => {
                for error in &errors {
                    warn!(rule = error.rule(), path = error.path(), "{}", error.kind());
                }
                Err(errors)
            }
        }
    }

    /// Decode JSON text, then validate it
    pub fn validate_str(&self, text: &str) -> Result<RoutingPayload, PayloadError> {
        let document: Value = serde_json::from_str(text).map_err(|e| {
            warn!("Routing payload is not valid JSON: {}", e);
            e
        })?;
        Ok(self.validate(&document)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ErrorMode;
    use serde_json::json;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_validator_is_shareable() {
        assert_send_sync::<RoutingRuleValidator>();
        assert_send_sync::<RoutingPayload>();
    }

    #[test]
    fn test_validate_uses_config() {
        let document = json!({
            "Steps": [
                { "Expression": { "AndExpression": [] } },
                { "Expression": { "OrExpression": [] } }
            ]
        });

        let fail_fast = RoutingRuleValidator::default();
        assert_eq!(fail_fast.config().error_mode, ErrorMode::FailFast);
        assert_eq!(fail_fast.validate(&document).unwrap_err().len(), 1);

        let collect = RoutingRuleValidator::new(ValidatorConfig::new().collect_all());
        let errors = collect.validate(&document).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.has_rule("MISSING_EXPIRY"));
    }

    #[test]
    fn test_validate_str() {
        let validator = RoutingRuleValidator::default();
        assert!(matches!(validator.validate_str("[1,"), Err(PayloadError::Json(_))));

        let payload = validator
            .validate_str(
                r#"{"Steps":[{"Expression":{"NotAttributeCondition":{"Name":"Language","Value":"French","ComparisonOperator":"NumberGreaterOrEqualTo","ProficiencyLevel":2.5}}}]}"#,
            )
            .unwrap();
        assert_eq!(payload.steps()[0].expression().discriminator(), "NotAttributeCondition");
    }
}
