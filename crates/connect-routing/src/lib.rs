//! # connect-routing
//!
//! Validation for the two documents a contact-center function handler
//! receives from Amazon Connect:
//!
//! - **Contact-flow events**: the invocation event with contact metadata and
//!   flow parameters ([`contact_flow`])
//! - **Proficiency routing rules**: ordered steps of boolean attribute
//!   expressions with expiries ([`routing_core`])
//!
//! ## Quick Start
//!
//! ```rust
//! use connect_routing::prelude::*;
//! use serde_json::json;
//!
//! let validator = InvocationValidator::default();
//! let rule = validator.validate_routing_payload(&json!({
//!     "Steps": [{ "Expression": { "AttributeCondition": {
//!         "Name": "Language", "Value": "English",
//!         "ComparisonOperator": "NumberGreaterOrEqualTo", "ProficiencyLevel": 1 } } }]
//! })).unwrap();
//! assert_eq!(rule.len(), 1);
//! ```
//!
//! ## Module Structure
//!
//! - [`routing_core`]: routing rule model and validator
//! - [`contact_flow`]: contact-flow event model
//! - [`infra_common`]: logging and configuration
//! - [`config`]: handler configuration
//! - [`invocation`]: handler-facing validator and error

pub use connect_contact_flow as contact_flow;
pub use connect_infra_common as infra_common;
pub use connect_routing_core as routing_core;

pub mod config;
pub mod invocation;

pub use config::IntegrationConfig;
pub use invocation::{InvocationError, InvocationValidator};

pub mod prelude {
    //! Common imports for handlers

    pub use crate::config::IntegrationConfig;
    pub use crate::contact_flow::{Channel, ContactData, ContactFlowEvent, InitiationMethod};
    pub use crate::invocation::{InvocationError, InvocationValidator};
    pub use crate::routing_core::{
        ErrorMode, Expression, RoutingPayload, ValidationError, ValidatorConfig,
    };
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
