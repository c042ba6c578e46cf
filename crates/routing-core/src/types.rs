//! Typed model of a proficiency routing payload
//!
//! Values of these types only come out of the validator (or the checked
//! constructors below), so every invariant holds for as long as the value
//! exists. Nothing here is mutable after construction.
//!
//! ```text
//! RoutingPayload
//!  └── Step[1..]
//!       ├── Expression
//!       │    ├── AttributeCondition(AttributeCondition)
//!       │    ├── NotAttributeCondition(AttributeCondition)
//!       │    └── Compound { And | Or, operands: Expression[1..] }
//!       └── Expiry? { DurationInSeconds > 0 }
//! ```

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constraints::{expiry_sequence_valid, range_is_ordered};
use crate::error::{ValidationError, ValidationErrorKind};

/// Document key literals
pub mod keys {
    pub const STEPS: &str = "Steps";
    pub const EXPRESSION: &str = "Expression";
    pub const EXPIRY: &str = "Expiry";
    pub const DURATION_IN_SECONDS: &str = "DurationInSeconds";
    pub const ATTRIBUTE_CONDITION: &str = "AttributeCondition";
    pub const NOT_ATTRIBUTE_CONDITION: &str = "NotAttributeCondition";
    pub const AND_EXPRESSION: &str = "AndExpression";
    pub const OR_EXPRESSION: &str = "OrExpression";
    pub const NAME: &str = "Name";
    pub const VALUE: &str = "Value";
    pub const COMPARISON_OPERATOR: &str = "ComparisonOperator";
    pub const PROFICIENCY_LEVEL: &str = "ProficiencyLevel";
    pub const RANGE: &str = "Range";
    pub const MIN_PROFICIENCY_LEVEL: &str = "MinProficiencyLevel";
    pub const MAX_PROFICIENCY_LEVEL: &str = "MaxProficiencyLevel";

    /// Expression discriminators, in lookup precedence order
    pub const DISCRIMINATORS: [&str; 4] = [
        ATTRIBUTE_CONDITION,
        NOT_ATTRIBUTE_CONDITION,
        AND_EXPRESSION,
        OR_EXPRESSION,
    ];
}

/// Error returned when a string is not one of an enum's wire literals
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownLiteral {
    pub kind: &'static str,
    pub value: String,
}

/// How an attribute condition compares the agent's proficiency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonOperator {
    /// Proficiency must fall inside a [`RangeSpec`]
    Range,
    /// Proficiency must be at least `ProficiencyLevel`
    NumberGreaterOrEqualTo,
}

impl ComparisonOperator {
    /// Every accepted wire literal
    pub const LITERALS: &'static [&'static str] = &["Range", "NumberGreaterOrEqualTo"];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonOperator::Range => "Range",
            ComparisonOperator::NumberGreaterOrEqualTo => "NumberGreaterOrEqualTo",
        }
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComparisonOperator {
    type Err = UnknownLiteral;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Range" => Ok(ComparisonOperator::Range),
            "NumberGreaterOrEqualTo" => Ok(ComparisonOperator::NumberGreaterOrEqualTo),
            _ => Err(UnknownLiteral {
                kind: "ComparisonOperator",
                value: s.to_string(),
            }),
        }
    }
}

/// Boolean combinator of a compound expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOperator {
    And,
    Or,
}

impl LogicalOperator {
    /// The document key that selects this combinator
    pub fn key(&self) -> &'static str {
        match self {
            LogicalOperator::And => keys::AND_EXPRESSION,
            LogicalOperator::Or => keys::OR_EXPRESSION,
        }
    }
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalOperator::And => f.write_str("AND"),
            LogicalOperator::Or => f.write_str("OR"),
        }
    }
}

impl FromStr for LogicalOperator {
    type Err = UnknownLiteral;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AND" | "AndExpression" => Ok(LogicalOperator::And),
            "OR" | "OrExpression" => Ok(LogicalOperator::Or),
            _ => Err(UnknownLiteral {
                kind: "LogicalOperator",
                value: s.to_string(),
            }),
        }
    }
}

fn finite_level(field: &'static str, level: f64) -> Result<(), ValidationErrorKind> {
    if level.is_finite() {
        Ok(())
    } else {
        Err(ValidationErrorKind::NonFiniteLevel { field })
    }
}

/// Inclusive proficiency interval, `min <= max`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeSpec {
    min: f64,
    max: f64,
}

impl RangeSpec {
    /// `min == max` is a legal single-point range. Both bounds must be finite.
    pub fn new(min: f64, max: f64) -> Result<Self, ValidationErrorKind> {
        finite_level(keys::MIN_PROFICIENCY_LEVEL, min)?;
        finite_level(keys::MAX_PROFICIENCY_LEVEL, max)?;
        if range_is_ordered(min, max) {
            Ok(Self { min, max })
        } else {
            Err(ValidationErrorKind::InvalidRange { min, max })
        }
    }

    pub fn min_proficiency_level(&self) -> f64 {
        self.min
    }

    pub fn max_proficiency_level(&self) -> f64 {
        self.max
    }
}

/// How long a step stays applicable before routing advances to the next one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExpiryRule {
    duration_in_seconds: u64,
}

impl ExpiryRule {
    pub fn new(duration_in_seconds: u64) -> Result<Self, ValidationErrorKind> {
        if duration_in_seconds == 0 {
            return Err(ValidationErrorKind::InvalidDuration { value: 0 });
        }
        Ok(Self { duration_in_seconds })
    }

    pub fn duration_in_seconds(&self) -> u64 {
        self.duration_in_seconds
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.duration_in_seconds)
    }
}

/// The comparison half of a condition; the operator decides which operand exists
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Comparison {
    NumberGreaterOrEqualTo { proficiency_level: f64 },
    Range(RangeSpec),
}

impl Comparison {
    pub fn operator(&self) -> ComparisonOperator {
        match self {
            Comparison::NumberGreaterOrEqualTo { .. } => ComparisonOperator::NumberGreaterOrEqualTo,
            Comparison::Range(_) => ComparisonOperator::Range,
        }
    }
}

/// Leaf predicate over one named agent attribute
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeCondition {
    name: String,
    value: String,
    comparison: Comparison,
}

impl AttributeCondition {
    /// Fails if a `NumberGreaterOrEqualTo` level is NaN or infinite.
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
        comparison: Comparison,
    ) -> Result<Self, ValidationErrorKind> {
        if let Comparison::NumberGreaterOrEqualTo { proficiency_level } = comparison {
            finite_level(keys::PROFICIENCY_LEVEL, proficiency_level)?;
        }
        Ok(Self {
            name: name.into(),
            value: value.into(),
            comparison,
        })
    }

    /// `NumberGreaterOrEqualTo` condition
    pub fn at_least(
        name: impl Into<String>,
        value: impl Into<String>,
        proficiency_level: f64,
    ) -> Result<Self, ValidationErrorKind> {
        Self::new(name, value, Comparison::NumberGreaterOrEqualTo { proficiency_level })
    }

    /// `Range` condition
    pub fn within(name: impl Into<String>, value: impl Into<String>, range: RangeSpec) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            comparison: Comparison::Range(range),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn comparison(&self) -> &Comparison {
        &self.comparison
    }

    pub fn comparison_operator(&self) -> ComparisonOperator {
        self.comparison.operator()
    }

    /// Set only for `NumberGreaterOrEqualTo`
    pub fn proficiency_level(&self) -> Option<f64> {
        match self.comparison {
            Comparison::NumberGreaterOrEqualTo { proficiency_level } => Some(proficiency_level),
            Comparison::Range(_) => None,
        }
    }

    /// Set only for `Range`
    pub fn range(&self) -> Option<&RangeSpec> {
        match &self.comparison {
            Comparison::Range(range) => Some(range),
            Comparison::NumberGreaterOrEqualTo { .. } => None,
        }
    }
}

/// AND/OR over a non-empty operand list
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundExpression {
    operator: LogicalOperator,
    operands: Vec<Expression>,
}

impl CompoundExpression {
    pub fn new(operator: LogicalOperator, operands: Vec<Expression>) -> Result<Self, ValidationErrorKind> {
        if operands.is_empty() {
            return Err(ValidationErrorKind::EmptyCollection {
                field: operator.key(),
            });
        }
        Ok(Self { operator, operands })
    }

    pub fn operator(&self) -> LogicalOperator {
        self.operator
    }

    pub fn operands(&self) -> &[Expression] {
        &self.operands
    }
}

/// Boolean expression tree evaluated against an agent's proficiencies
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    AttributeCondition(AttributeCondition),
    NotAttributeCondition(AttributeCondition),
    Compound(CompoundExpression),
}

impl Expression {
    pub fn and(operands: Vec<Expression>) -> Result<Self, ValidationErrorKind> {
        CompoundExpression::new(LogicalOperator::And, operands).map(Expression::Compound)
    }

    pub fn or(operands: Vec<Expression>) -> Result<Self, ValidationErrorKind> {
        CompoundExpression::new(LogicalOperator::Or, operands).map(Expression::Compound)
    }

    /// The document key this node is encoded under
    pub fn discriminator(&self) -> &'static str {
        match self {
            Expression::AttributeCondition(_) => keys::ATTRIBUTE_CONDITION,
            Expression::NotAttributeCondition(_) => keys::NOT_ATTRIBUTE_CONDITION,
            Expression::Compound(compound) => compound.operator.key(),
        }
    }

    /// Nesting depth; a lone condition has depth 1
    pub fn depth(&self) -> usize {
        match self {
            Expression::AttributeCondition(_) | Expression::NotAttributeCondition(_) => 1,
            Expression::Compound(compound) => {
                1 + compound.operands.iter().map(Expression::depth).max().unwrap_or(0)
            }
        }
    }

    /// Leaf conditions in document order, paired with whether they are negated
    pub fn conditions(&self) -> Vec<(bool, &AttributeCondition)> {
        let mut out = Vec::new();
        self.collect_conditions(&mut out);
        out
    }

    fn collect_conditions<'a>(&'a self, out: &mut Vec<(bool, &'a AttributeCondition)>) {
        match self {
            Expression::AttributeCondition(condition) => out.push((false, condition)),
            Expression::NotAttributeCondition(condition) => out.push((true, condition)),
            Expression::Compound(compound) => {
                for operand in &compound.operands {
                    operand.collect_conditions(out);
                }
            }
        }
    }

    pub fn as_compound(&self) -> Option<&CompoundExpression> {
        match self {
            Expression::Compound(compound) => Some(compound),
            _ => None,
        }
    }
}

impl From<CompoundExpression> for Expression {
    fn from(compound: CompoundExpression) -> Self {
        Expression::Compound(compound)
    }
}

/// One stage of the routing decision
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    expression: Expression,
    expiry: Option<ExpiryRule>,
}

impl Step {
    pub fn new(expression: Expression, expiry: Option<ExpiryRule>) -> Self {
        Self { expression, expiry }
    }

    pub fn expression(&self) -> &Expression {
        &self.expression
    }

    /// `None` means the step stays active indefinitely
    pub fn expiry(&self) -> Option<&ExpiryRule> {
        self.expiry.as_ref()
    }

    pub fn has_expiry(&self) -> bool {
        self.expiry.is_some()
    }
}

/// A validated routing rule: at least one step, every non-final step expires
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingPayload {
    steps: Vec<Step>,
}

impl RoutingPayload {
    /// Build a payload from already-typed steps, enforcing the sequence rules.
    pub fn new(steps: Vec<Step>) -> Result<Self, ValidationError> {
        if steps.is_empty() {
            return Err(ValidationError::new(
                "$.Steps",
                ValidationErrorKind::EmptyCollection { field: keys::STEPS },
            ));
        }
        if let Some(step_index) = expiry_sequence_valid(&steps) {
            return Err(ValidationError::new(
                format!("$.Steps[{}]", step_index),
                ValidationErrorKind::MissingExpiry { step_index },
            ));
        }
        Ok(Self { steps })
    }

    /// Constructor for the parser, which has already checked the sequence rules
    pub(crate) fn from_validated(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// The step that applies once every earlier step has expired
    pub fn final_step(&self) -> &Step {
        &self.steps[self.steps.len() - 1]
    }

    /// Deepest expression tree across all steps
    pub fn max_depth(&self) -> usize {
        self.steps
            .iter()
            .map(|step| step.expression.depth())
            .max()
            .unwrap_or(0)
    }

    pub fn into_steps(self) -> Vec<Step> {
        self.steps
    }
}
