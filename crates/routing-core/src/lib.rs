//! Proficiency routing rule validation
//!
//! A routing rule is a JSON document listing ordered steps. Each step pairs a
//! boolean expression over agent attributes with an optional expiry after
//! which routing moves on to the next step:
//!
//! ```json
//! { "Steps": [
//!     { "Expression": { "AttributeCondition": {
//!         "Name": "Language", "Value": "English",
//!         "ComparisonOperator": "NumberGreaterOrEqualTo", "ProficiencyLevel": 4 } },
//!       "Expiry": { "DurationInSeconds": 30 } },
//!     { "Expression": { "OrExpression": [ ... ] } }
//! ] }
//! ```
//!
//! [`parse`] turns such a document into an immutable [`RoutingPayload`] or a
//! [`ValidationError`] naming the JSON path and the rule that failed.
//! [`RoutingRuleValidator`] adds configuration (error collection, a nesting
//! limit) and logging on top.
//!
//! ```
//! use connect_routing_core::{parse, ComparisonOperator};
//! use serde_json::json;
//!
//! let payload = parse(&json!({
//!     "Steps": [{ "Expression": { "AttributeCondition": {
//!         "Name": "Language", "Value": "English",
//!         "ComparisonOperator": "NumberGreaterOrEqualTo", "ProficiencyLevel": 1 } } }]
//! })).unwrap();
//!
//! let condition = payload.steps()[0].expression().conditions()[0].1;
//! assert_eq!(condition.comparison_operator(), ComparisonOperator::NumberGreaterOrEqualTo);
//! ```

pub mod config;
pub mod constraints;
pub mod encode;
pub mod error;
pub mod parser;
pub mod types;
pub mod validator;

pub use config::{ErrorMode, ValidatorConfig};
pub use constraints::{
    expiry_sequence_valid, missing_expiry_indices, operator_fields_consistent, range_is_ordered,
};
pub use error::{
    CompoundAmbiguity, ConditionField, FieldOperatorMismatch, JsonType, PayloadError,
    ValidationError, ValidationErrorKind, ValidationErrors,
};
pub use parser::{parse, parse_expression, parse_with};
pub use types::{
    AttributeCondition, Comparison, ComparisonOperator, CompoundExpression, ExpiryRule, Expression,
    LogicalOperator, RangeSpec, RoutingPayload, Step, UnknownLiteral,
};
pub use validator::RoutingRuleValidator;

pub type Result<T> = std::result::Result<T, ValidationError>;

pub mod prelude {
    pub use crate::{
        parse, parse_with, ErrorMode, Expression, RoutingPayload, RoutingRuleValidator,
        ValidationError, ValidationErrors, ValidatorConfig,
    };
}
