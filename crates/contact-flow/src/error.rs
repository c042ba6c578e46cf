//! Field-level decoding errors for contact-flow events

use serde_json::error::Category;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactFlowErrorKind {
    /// A required field is absent
    MissingField,
    /// An enum field holds a literal outside its allowed set
    InvalidEnumValue,
    /// A field holds the wrong JSON type
    WrongType,
    /// The input is not a JSON document at all
    Malformed,
}

impl ContactFlowErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactFlowErrorKind::MissingField => "MISSING_FIELD",
            ContactFlowErrorKind::InvalidEnumValue => "INVALID_ENUM_VALUE",
            ContactFlowErrorKind::WrongType => "WRONG_TYPE",
            ContactFlowErrorKind::Malformed => "MALFORMED",
        }
    }
}

/// Rejection of a contact-flow event
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ContactFlowError {
    kind: ContactFlowErrorKind,
    field: Option<String>,
    message: String,
}

impl ContactFlowError {
    pub fn kind(&self) -> ContactFlowErrorKind {
        self.kind
    }

    /// Field or enum the error refers to, when the decoder names one
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<serde_json::Error> for ContactFlowError {
    fn from(err: serde_json::Error) -> Self {
        let message = err.to_string();
        let (kind, field) = match err.classify() {
            Category::Io | Category::Syntax | Category::Eof => (ContactFlowErrorKind::Malformed, None),
            Category::Data => classify_data_error(&message),
        };
        ContactFlowError {
            kind,
            field,
            message,
        }
    }
}

fn classify_data_error(message: &str) -> (ContactFlowErrorKind, Option<String>) {
    if let Some(rest) = message.strip_prefix("missing field ") {
        return (ContactFlowErrorKind::MissingField, backticked(rest));
    }
    if let Some(rest) = message.strip_prefix("invalid value for ") {
        let name = rest.split(':').next().map(str::to_string);
        return (ContactFlowErrorKind::InvalidEnumValue, name);
    }
    if message.starts_with("invalid type") || message.starts_with("invalid length") {
        return (ContactFlowErrorKind::WrongType, None);
    }
    (ContactFlowErrorKind::Malformed, None)
}

/// First `name` quoted in backticks
fn backticked(text: &str) -> Option<String> {
    let start = text.find('`')? + 1;
    let len = text[start..].find('`')?;
    Some(text[start..start + len].to_string())
}
