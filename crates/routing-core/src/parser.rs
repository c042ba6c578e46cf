//! Recursive-descent validator for routing payload documents
//!
//! Walks an already-decoded [`serde_json::Value`] once and builds the typed
//! tree from [`crate::types`]. The walk is pure: no I/O, no logging, no shared
//! state. In [`ErrorMode::Collect`] a failing subtree is kept aside and its
//! siblings are still visited; in [`ErrorMode::FailFast`] the first violation
//! aborts the whole walk.

use serde_json::{Map, Number, Value};

use crate::config::{ErrorMode, ValidatorConfig};
use crate::constraints::{missing_expiry_indices, operator_fields_consistent, range_is_ordered};
use crate::error::{
    CompoundAmbiguity, JsonType, ValidationError, ValidationErrorKind, ValidationErrors,
};
use crate::types::{
    keys, AttributeCondition, Comparison, ComparisonOperator, CompoundExpression, ExpiryRule,
    Expression, LogicalOperator, RangeSpec, RoutingPayload, Step,
};

/// Validate a routing payload, stopping at the first violation.
pub fn parse(document: &Value) -> Result<RoutingPayload, ValidationError> {
    parse_with(document, &ValidatorConfig::new()).map_err(ValidationErrors::into_first)
}

/// Validate a routing payload under the given settings.
pub fn parse_with(
    document: &Value,
    config: &ValidatorConfig,
) -> Result<RoutingPayload, ValidationErrors> {
    Parser::new(config).payload(document, &JsonPath::root())
}

/// Validate a single expression node, reporting paths relative to `$`.
pub fn parse_expression(
    node: &Value,
    config: &ValidatorConfig,
) -> Result<Expression, ValidationErrors> {
    Parser::new(config).expression(node, &JsonPath::root(), 1)
}

/// A failed sub-parse carries every violation found beneath it.
type Parsed<T> = Result<T, ValidationErrors>;

/// Combine two sibling outcomes, keeping violations in document order.
fn join<A, B>(first: Parsed<A>, second: Parsed<B>) -> Parsed<(A, B)> {
    match (first, second) {
        (Ok(a), Ok(b)) => Ok((a, b)),
        (Err(errors), Ok(_)) | (Ok(_), Err(errors)) => Err(errors),
        (Err(mut errors), Err(more)) => {
            errors.extend(more);
            Err(errors)
        }
    }
}

fn append<T>(items: Parsed<Vec<T>>, next: Parsed<T>) -> Parsed<Vec<T>> {
    join(items, next).map(|(mut items, item)| {
        items.push(item);
        items
    })
}

#[derive(Debug, Clone)]
struct JsonPath(String);

impl JsonPath {
    fn root() -> Self {
        JsonPath("$".to_string())
    }

    fn key(&self, key: &str) -> Self {
        JsonPath(format!("{}.{}", self.0, key))
    }

    fn index(&self, idx: usize) -> Self {
        JsonPath(format!("{}[{}]", self.0, idx))
    }

    fn error(&self, kind: ValidationErrorKind) -> ValidationErrors {
        ValidationError::new(self.0.clone(), kind).into()
    }
}

struct Parser<'c> {
    config: &'c ValidatorConfig,
}

impl<'c> Parser<'c> {
    fn new(config: &'c ValidatorConfig) -> Self {
        Self { config }
    }

    /// Fail-fast aborts on the first failure; collect mode hands it back so
    /// siblings can still be checked and joined.
    fn attempt<T>(&self, parsed: Parsed<T>) -> Parsed<Parsed<T>> {
        match (parsed, self.config.error_mode) {
            (Err(errors), ErrorMode::FailFast) => Err(errors),
            (parsed, _) => Ok(parsed),
        }
    }

    fn payload(&self, document: &Value, path: &JsonPath) -> Parsed<RoutingPayload> {
        let root = object(document, path)?;
        let steps_path = path.key(keys::STEPS);
        let steps = array(required(root, keys::STEPS, path)?, &steps_path)?;
        if steps.is_empty() {
            return Err(steps_path.error(ValidationErrorKind::EmptyCollection { field: keys::STEPS }));
        }

        let mut parsed_steps = Ok(Vec::with_capacity(steps.len()));
        for (idx, node) in steps.iter().enumerate() {
            let step = self.attempt(self.step(node, &steps_path.index(idx)))?;
            parsed_steps = append(parsed_steps, step);
        }

        // Judged on the raw documents so a broken step elsewhere does not hide a missing expiry.
        let has_expiry: Vec<bool> = steps
            .iter()
            .map(|node| optional(node.as_object(), keys::EXPIRY).is_some())
            .collect();
        for step_index in missing_expiry_indices(&has_expiry) {
            let missing = Err(steps_path
                .index(step_index)
                .error(ValidationErrorKind::MissingExpiry { step_index }));
            let missing: Parsed<()> = self.attempt(missing)?;
            parsed_steps = join(parsed_steps, missing).map(|(steps, ())| steps);
        }

        parsed_steps.map(RoutingPayload::from_validated)
    }

    fn step(&self, node: &Value, path: &JsonPath) -> Parsed<Step> {
        let step = object(node, path)?;

        let expression_path = path.key(keys::EXPRESSION);
        let expression = required(step, keys::EXPRESSION, path)
            .and_then(|value| self.expression(value, &expression_path, 1));
        let expression = self.attempt(expression)?;

        let expiry = match optional(Some(step), keys::EXPIRY) {
            Some(value) => expiry(value, &path.key(keys::EXPIRY)).map(Some),
            None => Ok(None),
        };
        let expiry = self.attempt(expiry)?;

        join(expression, expiry).map(|(expression, expiry)| Step::new(expression, expiry))
    }

    fn expression(&self, node: &Value, path: &JsonPath, depth: usize) -> Parsed<Expression> {
        if let Some(limit) = self.config.max_expression_depth {
            if depth > limit {
                return Err(path.error(ValidationErrorKind::DepthLimitExceeded { limit }));
            }
        }

        let fields = object(node, path)?;
        let present: Vec<&str> = keys::DISCRIMINATORS
            .iter()
            .copied()
            .filter(|key| optional(Some(fields), key).is_some())
            .collect();

        let has = |key: &str| present.iter().any(|found| *found == key);
        let leaf = has(keys::ATTRIBUTE_CONDITION) || has(keys::NOT_ATTRIBUTE_CONDITION);
        if leaf && present.len() > 1 {
            return Err(path.error(ValidationErrorKind::ConflictingDiscriminators {
                keys: present.iter().map(|key| key.to_string()).collect(),
            }));
        }

        if has(keys::ATTRIBUTE_CONDITION) {
            let condition = self.condition(
                &fields[keys::ATTRIBUTE_CONDITION],
                &path.key(keys::ATTRIBUTE_CONDITION),
            )?;
            return Ok(Expression::AttributeCondition(condition));
        }
        if has(keys::NOT_ATTRIBUTE_CONDITION) {
            let condition = self.condition(
                &fields[keys::NOT_ATTRIBUTE_CONDITION],
                &path.key(keys::NOT_ATTRIBUTE_CONDITION),
            )?;
            return Ok(Expression::NotAttributeCondition(condition));
        }
        if fields.contains_key(keys::AND_EXPRESSION) || fields.contains_key(keys::OR_EXPRESSION) {
            return self.compound(fields, path, depth).map(Expression::Compound);
        }

        Err(path.error(ValidationErrorKind::UnknownDiscriminator {
            keys: fields.keys().cloned().collect(),
        }))
    }

    fn compound(
        &self,
        fields: &Map<String, Value>,
        path: &JsonPath,
        depth: usize,
    ) -> Parsed<CompoundExpression> {
        let and = optional(Some(fields), keys::AND_EXPRESSION);
        let or = optional(Some(fields), keys::OR_EXPRESSION);
        let (operator, node) = match (and, or) {
            (Some(node), None) => (LogicalOperator::And, node),
            (None, Some(node)) => (LogicalOperator::Or, node),
            (Some(_), Some(_)) => {
                return Err(path.error(ValidationErrorKind::AmbiguousCompoundExpression {
                    ambiguity: CompoundAmbiguity::BothPresent,
                }))
            }
            (None, None) => {
                return Err(path.error(ValidationErrorKind::AmbiguousCompoundExpression {
                    ambiguity: CompoundAmbiguity::NonePresent,
                }))
            }
        };

        let operands_path = path.key(operator.key());
        let nodes = array(node, &operands_path)?;
        if nodes.is_empty() {
            return Err(operands_path.error(ValidationErrorKind::EmptyCollection {
                field: operator.key(),
            }));
        }

        let mut operands = Ok(Vec::with_capacity(nodes.len()));
        for (idx, operand) in nodes.iter().enumerate() {
            let parsed = self.expression(operand, &operands_path.index(idx), depth + 1);
            operands = append(operands, self.attempt(parsed)?);
        }

        CompoundExpression::new(operator, operands?).map_err(|kind| operands_path.error(kind))
    }

    fn condition(&self, node: &Value, path: &JsonPath) -> Parsed<AttributeCondition> {
        let fields = object(node, path)?;

        let name = required(fields, keys::NAME, path)
            .and_then(|value| string(value, &path.key(keys::NAME)));
        let name = self.attempt(name)?;
        let value = required(fields, keys::VALUE, path)
            .and_then(|value| string(value, &path.key(keys::VALUE)));
        let value = self.attempt(value)?;
        let operator = self.attempt(comparison_operator(fields, path))?;

        let ((name, value), operator) = join(join(name, value), operator)?;

        operator_fields_consistent(
            operator,
            optional(Some(fields), keys::PROFICIENCY_LEVEL),
            optional(Some(fields), keys::RANGE),
        )
        .map_err(|mismatch| path.error(mismatch.into()))?;

        let comparison = match operator {
            ComparisonOperator::NumberGreaterOrEqualTo => {
                let level = required(fields, keys::PROFICIENCY_LEVEL, path)?;
                Comparison::NumberGreaterOrEqualTo {
                    proficiency_level: number(level, &path.key(keys::PROFICIENCY_LEVEL))?,
                }
            }
            ComparisonOperator::Range => {
                let range = required(fields, keys::RANGE, path)?;
                Comparison::Range(range_spec(range, &path.key(keys::RANGE))?)
            }
        };

        AttributeCondition::new(name, value, comparison).map_err(|kind| path.error(kind))
    }
}

fn object<'v>(value: &'v Value, path: &JsonPath) -> Parsed<&'v Map<String, Value>> {
    value.as_object().ok_or_else(|| wrong_type(JsonType::Object, value, path))
}

fn array<'v>(value: &'v Value, path: &JsonPath) -> Parsed<&'v Vec<Value>> {
    value.as_array().ok_or_else(|| wrong_type(JsonType::Array, value, path))
}

fn string<'v>(value: &'v Value, path: &JsonPath) -> Parsed<&'v str> {
    value.as_str().ok_or_else(|| wrong_type(JsonType::String, value, path))
}

fn number(value: &Value, path: &JsonPath) -> Parsed<f64> {
    value.as_f64().ok_or_else(|| wrong_type(JsonType::Number, value, path))
}

fn wrong_type(expected: JsonType, found: &Value, path: &JsonPath) -> ValidationErrors {
    path.error(ValidationErrorKind::WrongType {
        expected,
        found: JsonType::of(found),
    })
}

/// Missing keys are reported against the enclosing object.
fn required<'v>(fields: &'v Map<String, Value>, key: &'static str, path: &JsonPath) -> Parsed<&'v Value> {
    fields
        .get(key)
        .ok_or_else(|| path.error(ValidationErrorKind::MissingField { field: key }))
}

/// Explicit `null` counts as absent.
fn optional<'v>(fields: Option<&'v Map<String, Value>>, key: &str) -> Option<&'v Value> {
    fields?.get(key).filter(|value| !value.is_null())
}

fn comparison_operator(fields: &Map<String, Value>, path: &JsonPath) -> Parsed<ComparisonOperator> {
    let field_path = path.key(keys::COMPARISON_OPERATOR);
    let literal = string(required(fields, keys::COMPARISON_OPERATOR, path)?, &field_path)?;
    literal.parse().map_err(|_| {
        field_path.error(ValidationErrorKind::InvalidEnumValue {
            field: keys::COMPARISON_OPERATOR,
            value: literal.to_string(),
            expected: ComparisonOperator::LITERALS,
        })
    })
}

fn range_spec(node: &Value, path: &JsonPath) -> Parsed<RangeSpec> {
    let fields = object(node, path)?;
    let min = number(
        required(fields, keys::MIN_PROFICIENCY_LEVEL, path)?,
        &path.key(keys::MIN_PROFICIENCY_LEVEL),
    )?;
    let max = number(
        required(fields, keys::MAX_PROFICIENCY_LEVEL, path)?,
        &path.key(keys::MAX_PROFICIENCY_LEVEL),
    )?;
    if !range_is_ordered(min, max) {
        return Err(path.error(ValidationErrorKind::InvalidRange { min, max }));
    }
    RangeSpec::new(min, max).map_err(|kind| path.error(kind))
}

fn expiry(node: &Value, path: &JsonPath) -> Parsed<ExpiryRule> {
    let fields = object(node, path)?;
    let duration_path = path.key(keys::DURATION_IN_SECONDS);
    let raw = required(fields, keys::DURATION_IN_SECONDS, path)?;
    match whole_seconds(raw) {
        Some(Seconds::Positive(seconds)) => {
            ExpiryRule::new(seconds).map_err(|kind| duration_path.error(kind))
        }
        Some(Seconds::NonPositive(value)) => {
            Err(duration_path.error(ValidationErrorKind::InvalidDuration { value }))
        }
        None => Err(wrong_type(JsonType::Integer, raw, &duration_path)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Seconds {
    Positive(u64),
    NonPositive(i64),
}

/// Integers, or floats with no fractional part such as `30.0`
///
/// Values outside `i64::MIN..=u64::MAX` are not whole seconds.
fn whole_seconds(value: &Value) -> Option<Seconds> {
    let Value::Number(number) = value else {
        return None;
    };
    integral(number).or_else(|| {
        let n = number.as_f64()?;
        if !n.is_finite() || n.fract() != 0.0 {
            return None;
        }
        // 2^64 is exactly representable; every integral float below it fits a u64.
        if n > 0.0 && n < u64::MAX as f64 {
            Some(Seconds::Positive(n as u64))
        } else if n <= 0.0 && n >= i64::MIN as f64 {
            Some(Seconds::NonPositive(n as i64))
        } else {
            None
        }
    })
}

fn integral(number: &Number) -> Option<Seconds> {
    match (number.as_u64(), number.as_i64()) {
        (Some(0), _) => Some(Seconds::NonPositive(0)),
        (Some(n), _) => Some(Seconds::Positive(n)),
        (None, Some(n)) => Some(Seconds::NonPositive(n)),
        (None, None) => None,
    }
}
