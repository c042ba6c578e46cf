//! Canonical JSON form of a validated payload
//!
//! Serialization writes the document shape the validator accepts, omitting
//! fields that do not apply (the unused comparison operand, a missing
//! expiry). Deserialization always goes through the validator.

use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::PayloadError;
use crate::parser::parse;
use crate::types::{
    keys, AttributeCondition, Comparison, Expression, ExpiryRule, RangeSpec, RoutingPayload, Step,
};

impl Serialize for RangeSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(keys::MIN_PROFICIENCY_LEVEL, &self.min_proficiency_level())?;
        map.serialize_entry(keys::MAX_PROFICIENCY_LEVEL, &self.max_proficiency_level())?;
        map.end()
    }
}

impl Serialize for ExpiryRule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(keys::DURATION_IN_SECONDS, &self.duration_in_seconds())?;
        map.end()
    }
}

impl Serialize for AttributeCondition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(4))?;
        map.serialize_entry(keys::NAME, self.name())?;
        map.serialize_entry(keys::VALUE, self.value())?;
        map.serialize_entry(keys::COMPARISON_OPERATOR, self.comparison_operator().as_str())?;
        match self.comparison() {
            Comparison::NumberGreaterOrEqualTo { proficiency_level } => {
                map.serialize_entry(keys::PROFICIENCY_LEVEL, proficiency_level)?
            }
            Comparison::Range(range) => map.serialize_entry(keys::RANGE, range)?,
        }
        map.end()
    }
}

impl Serialize for Expression {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            Expression::AttributeCondition(condition)
            | Expression::NotAttributeCondition(condition) => {
                map.serialize_entry(self.discriminator(), condition)?
            }
            Expression::Compound(compound) => {
                map.serialize_entry(self.discriminator(), compound.operands())?
            }
        }
        map.end()
    }
}

impl Serialize for Step {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(if self.has_expiry() { 2 } else { 1 }))?;
        map.serialize_entry(keys::EXPRESSION, self.expression())?;
        if let Some(expiry) = self.expiry() {
            map.serialize_entry(keys::EXPIRY, expiry)?;
        }
        map.end()
    }
}

impl Serialize for RoutingPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(keys::STEPS, self.steps())?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for RoutingPayload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let document = Value::deserialize(deserializer)?;
        parse(&document).map_err(D::Error::custom)
    }
}

impl RoutingPayload {
    /// Decode JSON text and validate it, stopping at the first violation.
    pub fn from_json_str(text: &str) -> Result<Self, PayloadError> {
        let document: Value = serde_json::from_str(text)?;
        Ok(parse(&document)?)
    }

    /// The canonical document form
    pub fn to_json_value(&self) -> Value {
        // Every field is a string, number or map with string keys.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
