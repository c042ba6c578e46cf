//! Error types for routing payload validation
//!
//! Every rejection carries the JSON path of the failing node and a
//! [`ValidationErrorKind`] naming the violated rule. [`ValidationErrors`] is
//! the non-empty collection returned when a validator runs in collect mode.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

use crate::types::ComparisonOperator;

/// JSON value categories, as reported in type errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonType {
    Null,
    Bool,
    Number,
    Integer,
    String,
    Array,
    Object,
}

impl JsonType {
    /// Categorize a JSON value
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => JsonType::Null,
            Value::Bool(_) => JsonType::Bool,
            Value::Number(n) if n.is_f64() => JsonType::Number,
            Value::Number(_) => JsonType::Integer,
            Value::String(_) => JsonType::String,
            Value::Array(_) => JsonType::Array,
            Value::Object(_) => JsonType::Object,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JsonType::Null => "null",
            JsonType::Bool => "boolean",
            JsonType::Number => "number",
            JsonType::Integer => "integer",
            JsonType::String => "string",
            JsonType::Array => "array",
            JsonType::Object => "object",
        }
    }
}

impl fmt::Display for JsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The optional condition fields whose presence is selected by the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionField {
    ProficiencyLevel,
    Range,
}

impl ConditionField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionField::ProficiencyLevel => "ProficiencyLevel",
            ConditionField::Range => "Range",
        }
    }
}

impl fmt::Display for ConditionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Violation of the operator/field coupling on an attribute condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldOperatorMismatch {
    /// The field the operator needs is absent
    #[error("{field} must be provided when ComparisonOperator is '{operator}'")]
    RequiredMissing {
        operator: ComparisonOperator,
        field: ConditionField,
    },

    /// A field belonging to the other operator is set
    #[error("{field} must not be set when ComparisonOperator is '{operator}'")]
    ForbiddenPresent {
        operator: ComparisonOperator,
        field: ConditionField,
    },
}

impl FieldOperatorMismatch {
    pub fn field(&self) -> ConditionField {
        match self {
            Self::RequiredMissing { field, .. } | Self::ForbiddenPresent { field, .. } => *field,
        }
    }

    pub fn operator(&self) -> ComparisonOperator {
        match self {
            Self::RequiredMissing { operator, .. } | Self::ForbiddenPresent { operator, .. } => {
                *operator
            }
        }
    }
}

/// Why a compound expression could not pick between AND and OR
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompoundAmbiguity {
    BothPresent,
    NonePresent,
}

impl fmt::Display for CompoundAmbiguity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompoundAmbiguity::BothPresent => f.write_str("both are present"),
            CompoundAmbiguity::NonePresent => f.write_str("neither is present"),
        }
    }
}

/// The rule a routing payload violated
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationErrorKind {
    #[error("missing required field '{field}'")]
    MissingField { field: &'static str },

    #[error("expected {expected}, found {found}")]
    WrongType { expected: JsonType, found: JsonType },

    #[error("'{field}' must not be empty")]
    EmptyCollection { field: &'static str },

    #[error(
        "Unknown expression type (keys: [{}]); expected one of AttributeCondition, \
         NotAttributeCondition, AndExpression, OrExpression",
        .keys.join(", ")
    )]
    UnknownDiscriminator { keys: Vec<String> },

    #[error("expression declares more than one type: [{}]", .keys.join(", "))]
    ConflictingDiscriminators { keys: Vec<String> },

    #[error(
        "Compound expression must have exactly one of AndExpression or OrExpression ({ambiguity})"
    )]
    AmbiguousCompoundExpression { ambiguity: CompoundAmbiguity },

    #[error("invalid {field} '{value}'; expected one of: {}", .expected.join(", "))]
    InvalidEnumValue {
        field: &'static str,
        value: String,
        expected: &'static [&'static str],
    },

    #[error(transparent)]
    FieldOperatorMismatch(#[from] FieldOperatorMismatch),

    #[error("{field} must be a finite number")]
    NonFiniteLevel { field: &'static str },

    #[error("MinProficiencyLevel ({min}) must be <= MaxProficiencyLevel ({max})")]
    InvalidRange { min: f64, max: f64 },

    #[error("Expiry is required for all steps except the last one (step {step_index} has none)")]
    MissingExpiry { step_index: usize },

    #[error("DurationInSeconds must be positive (got {value})")]
    InvalidDuration { value: i64 },

    #[error("expression nesting exceeds the configured limit of {limit} levels")]
    DepthLimitExceeded { limit: usize },
}

impl ValidationErrorKind {
    /// Stable rule code for this kind, suitable for metrics labels and API responses
    pub fn rule(&self) -> &'static str {
        match self {
            Self::MissingField { .. } => "MISSING_FIELD",
            Self::WrongType { .. } => "WRONG_TYPE",
            Self::EmptyCollection { .. } => "EMPTY_COLLECTION",
            Self::UnknownDiscriminator { .. } => "UNKNOWN_DISCRIMINATOR",
            Self::ConflictingDiscriminators { .. } => "CONFLICTING_DISCRIMINATORS",
            Self::AmbiguousCompoundExpression { .. } => "AMBIGUOUS_COMPOUND_EXPRESSION",
            Self::InvalidEnumValue { .. } => "INVALID_ENUM_VALUE",
            Self::FieldOperatorMismatch(FieldOperatorMismatch::RequiredMissing { .. }) => {
                "FIELD_OPERATOR_MISMATCH_REQUIRED_MISSING"
            }
            Self::FieldOperatorMismatch(FieldOperatorMismatch::ForbiddenPresent { .. }) => {
                "FIELD_OPERATOR_MISMATCH_FORBIDDEN_PRESENT"
            }
            Self::NonFiniteLevel { .. } => "NON_FINITE_LEVEL",
            Self::InvalidRange { .. } => "INVALID_RANGE",
            Self::MissingExpiry { .. } => "MISSING_EXPIRY",
            Self::InvalidDuration { .. } => "INVALID_DURATION",
            Self::DepthLimitExceeded { .. } => "DEPTH_LIMIT_EXCEEDED",
        }
    }
}

/// A single rejection: where it happened and which rule failed
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{path}: {kind}")]
pub struct ValidationError {
    path: String,
    kind: ValidationErrorKind,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, kind: ValidationErrorKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// JSON path of the failing node, e.g. `$.Steps[0].Expression`
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn kind(&self) -> &ValidationErrorKind {
        &self.kind
    }

    pub fn rule(&self) -> &'static str {
        self.kind.rule()
    }

    pub fn into_kind(self) -> ValidationErrorKind {
        self.kind
    }
}

/// One or more rejections for the same document, in discovery order
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    /// Returns `None` for an empty list; a rejection always names a violation.
    pub fn from_vec(errors: Vec<ValidationError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self { errors })
        }
    }

    pub fn first(&self) -> &ValidationError {
        &self.errors[0]
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.errors.iter()
    }

    pub fn into_first(self) -> ValidationError {
        let mut errors = self.errors;
        errors.swap_remove(0)
    }

    pub fn into_vec(self) -> Vec<ValidationError> {
        self.errors
    }

    pub(crate) fn extend(&mut self, more: ValidationErrors) {
        self.errors.extend(more.errors);
    }

    /// Whether any contained error matches the given rule code
    pub fn has_rule(&self, rule: &str) -> bool {
        self.errors.iter().any(|e| e.rule() == rule)
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.len() == 1 {
            return write!(f, "{}", self.errors[0]);
        }
        write!(f, "{} validation errors: ", self.errors.len())?;
        for (idx, error) in self.errors.iter().enumerate() {
            if idx > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Failure to turn JSON text into a validated payload
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Invalid(#[from] ValidationErrors),
}

impl From<ValidationError> for PayloadError {
    fn from(error: ValidationError) -> Self {
        PayloadError::Invalid(error.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_type_of() {
        assert_eq!(JsonType::of(&json!(null)), JsonType::Null);
        assert_eq!(JsonType::of(&json!(true)), JsonType::Bool);
        assert_eq!(JsonType::of(&json!(3)), JsonType::Integer);
        assert_eq!(JsonType::of(&json!(3.5)), JsonType::Number);
        assert_eq!(JsonType::of(&json!("x")), JsonType::String);
        assert_eq!(JsonType::of(&json!([])), JsonType::Array);
        assert_eq!(JsonType::of(&json!({})), JsonType::Object);
    }

    #[test]
    fn test_error_display() {
        let err = ValidationError::new(
            "$.Steps[0].Expression.AttributeCondition",
            ValidationErrorKind::MissingField { field: "Name" },
        );
        assert_eq!(
            err.to_string(),
            "$.Steps[0].Expression.AttributeCondition: missing required field 'Name'"
        );
        assert_eq!(err.rule(), "MISSING_FIELD");

        let mismatch = ValidationErrorKind::from(FieldOperatorMismatch::ForbiddenPresent {
            operator: ComparisonOperator::Range,
            field: ConditionField::ProficiencyLevel,
        });
        assert_eq!(
            mismatch.to_string(),
            "ProficiencyLevel must not be set when ComparisonOperator is 'Range'"
        );
        assert_eq!(mismatch.rule(), "FIELD_OPERATOR_MISMATCH_FORBIDDEN_PRESENT");
    }

    #[test]
    fn test_enum_value_message_lists_literals() {
        let kind = ValidationErrorKind::InvalidEnumValue {
            field: "ComparisonOperator",
            value: "INVALID_OP".to_string(),
            expected: ComparisonOperator::LITERALS,
        };
        assert_eq!(
            kind.to_string(),
            "invalid ComparisonOperator 'INVALID_OP'; expected one of: Range, NumberGreaterOrEqualTo"
        );
    }

    #[test]
    fn test_validation_errors_collection() {
        assert!(ValidationErrors::from_vec(Vec::new()).is_none());

        let errors = ValidationErrors::from_vec(vec![
            ValidationError::new("$.Steps[0]", ValidationErrorKind::MissingExpiry { step_index: 0 }),
            ValidationError::new(
                "$.Steps[1].Expiry.DurationInSeconds",
                ValidationErrorKind::InvalidDuration { value: -1 },
            ),
        ])
        .unwrap();

        assert_eq!(errors.len(), 2);
        assert!(errors.has_rule("MISSING_EXPIRY"));
        assert!(errors.has_rule("INVALID_DURATION"));
        assert!(!errors.has_rule("INVALID_RANGE"));
        assert!(errors.to_string().starts_with("2 validation errors: $.Steps[0]"));
        assert_eq!(errors.into_first().path(), "$.Steps[0]");
    }
}
