//! Cross-field rules shared by the parser and the typed constructors

use crate::error::{ConditionField, FieldOperatorMismatch};
use crate::types::{ComparisonOperator, Step};

/// `min == max` is accepted.
pub fn range_is_ordered(min: f64, max: f64) -> bool {
    min <= max
}

/// Indices of non-final steps that lack an expiry.
///
/// The last step is never reported, so a single-step payload always passes.
pub fn missing_expiry_indices(has_expiry: &[bool]) -> Vec<usize> {
    match has_expiry.split_last() {
        Some((_, leading)) => leading
            .iter()
            .enumerate()
            .filter(|(_, present)| !**present)
            .map(|(idx, _)| idx)
            .collect(),
        None => Vec::new(),
    }
}

/// First non-final step without an expiry, if any
pub fn expiry_sequence_valid(steps: &[Step]) -> Option<usize> {
    let flags: Vec<bool> = steps.iter().map(Step::has_expiry).collect();
    missing_expiry_indices(&flags).into_iter().next()
}

/// Check that exactly the field the operator needs is present.
///
/// A missing required field is reported ahead of a forbidden one.
pub fn operator_fields_consistent<P, R>(
    operator: ComparisonOperator,
    proficiency_level: Option<P>,
    range: Option<R>,
) -> Result<(), FieldOperatorMismatch> {
    let (required, required_present, forbidden, forbidden_present) = match operator {
        ComparisonOperator::NumberGreaterOrEqualTo => (
            ConditionField::ProficiencyLevel,
            proficiency_level.is_some(),
            ConditionField::Range,
            range.is_some(),
        ),
        ComparisonOperator::Range => (
            ConditionField::Range,
            range.is_some(),
            ConditionField::ProficiencyLevel,
            proficiency_level.is_some(),
        ),
    };

    if !required_present {
        return Err(FieldOperatorMismatch::RequiredMissing {
            operator,
            field: required,
        });
    }
    if forbidden_present {
        return Err(FieldOperatorMismatch::ForbiddenPresent {
            operator,
            field: forbidden,
        });
    }
    Ok(())
}
