//! Entry point for function handlers invoked from a contact flow
//!
//! A handler receives the decoded invocation event and, for routing
//! functions, a routing rule document. [`InvocationValidator`] checks both
//! and turns failures into an [`InvocationError`] whose
//! [`user_message`](InvocationError::user_message) can be returned to the
//! caller as-is.

use connect_contact_flow::{ContactFlowError, ContactFlowEvent};
use connect_routing_core::{RoutingPayload, RoutingRuleValidator, ValidationErrors, ValidatorConfig};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::config::IntegrationConfig;

#[derive(Debug, Error)]
pub enum InvocationError {
    #[error("invalid contact-flow event: {0}")]
    Event(#[from] ContactFlowError),

    #[error("invalid routing rule: {0}")]
    Routing(#[from] ValidationErrors),
}

impl InvocationError {
    /// Stable rule code of the (first) violation
    pub fn rule(&self) -> &'static str {
        match self {
            InvocationError::Event(err) => err.kind().as_str(),
            InvocationError::Routing(errors) => errors.first().rule(),
        }
    }

    /// Message suitable for returning to the invoking flow
    pub fn user_message(&self) -> String {
        match self {
            InvocationError::Event(err) => match err.field() {
                Some(field) => format!("Invalid contact-flow event ({}): {}", field, err.message()),
                None => format!("Invalid contact-flow event: {}", err.message()),
            },
            InvocationError::Routing(errors) => format!("Invalid routing rule: {}", errors),
        }
    }
}

/// Validates invocation inputs; cheap to clone and safe to share across threads
#[derive(Debug, Clone, Default)]
pub struct InvocationValidator {
    routing: RoutingRuleValidator,
}

impl InvocationValidator {
    pub fn new(validation: ValidatorConfig) -> Self {
        Self {
            routing: RoutingRuleValidator::new(validation),
        }
    }

    pub fn from_config(config: &IntegrationConfig) -> Self {
        Self::new(config.validation.clone())
    }

    pub fn routing(&self) -> &RoutingRuleValidator {
        &self.routing
    }

    /// Decode the contact-flow invocation event
    #[instrument(level = "debug", skip_all)]
    pub fn decode_contact_flow_event(&self, event: Value) -> Result<ContactFlowEvent, InvocationError> {
        match ContactFlowEvent::from_json_value(event) {
            Ok(event) => {
                let contact = event.contact_data();
                debug!(
                    contact_id = contact.contact_id(),
                    channel = %contact.channel(),
                    initiation_method = %contact.initiation_method(),
                    parameters = event.parameters().len(),
                    "Decoded contact-flow event"
                );
                Ok(event)
            }
            Err(err) => {
                warn!(rule = err.kind().as_str(), field = ?err.field(), "{}", err);
                Err(err.into())
            }
        }
    }

    /// Validate a routing rule document
    #[instrument(level = "debug", skip_all)]
    pub fn validate_routing_payload(&self, payload: &Value) -> Result<RoutingPayload, InvocationError> {
        let payload = self.routing.validate(payload)?;
        info!(steps = payload.len(), "Routing rule accepted");
        Ok(payload)
    }
}
