//! Property tests for the routing payload validator

use connect_routing_core::{
    parse, AttributeCondition, ComparisonOperator, ExpiryRule, Expression, RangeSpec,
    RoutingPayload, Step, ValidationErrorKind,
};
use proptest::prelude::*;
use serde_json::{json, Map, Value};

fn level() -> impl Strategy<Value = f64> {
    (0u32..=40).prop_map(|n| f64::from(n) / 4.0)
}

fn attribute_condition() -> impl Strategy<Value = AttributeCondition> {
    let name = prop_oneof![Just("Language"), Just("Technology"), Just("Region")];
    let value = "[A-Za-z ]{1,12}";
    let threshold = (name.clone(), value, level()).prop_filter_map(
        "level must be finite",
        |(name, value, level)| AttributeCondition::at_least(name, value, level).ok(),
    );
    let ranged = (name, value, level(), level()).prop_filter_map(
        "range must be ordered",
        |(name, value, a, b)| {
            let range = RangeSpec::new(a.min(b), a.max(b)).ok()?;
            Some(AttributeCondition::within(name, value, range))
        },
    );
    prop_oneof![threshold, ranged]
}

fn expression() -> impl Strategy<Value = Expression> {
    let leaf = (any::<bool>(), attribute_condition()).prop_map(|(negated, condition)| {
        if negated {
            Expression::NotAttributeCondition(condition)
        } else {
            Expression::AttributeCondition(condition)
        }
    });
    leaf.prop_recursive(4, 24, 4, |inner| {
        (any::<bool>(), prop::collection::vec(inner, 1..4)).prop_filter_map(
            "operands are non-empty",
            |(and, operands)| {
                if and {
                    Expression::and(operands).ok()
                } else {
                    Expression::or(operands).ok()
                }
            },
        )
    })
}

fn payload() -> impl Strategy<Value = RoutingPayload> {
    (
        prop::collection::vec((expression(), 1u64..3600), 1..5),
        prop::option::of(1u64..3600),
    )
        .prop_filter_map("payload must satisfy sequence rules", |(steps, last_expiry)| {
            let count = steps.len();
            let steps = steps
                .into_iter()
                .enumerate()
                .map(|(idx, (expression, seconds))| {
                    let seconds = if idx + 1 == count { last_expiry } else { Some(seconds) };
                    let expiry = seconds.map(ExpiryRule::new).transpose().ok()?;
                    Some(Step::new(expression, expiry))
                })
                .collect::<Option<Vec<_>>>()?;
            RoutingPayload::new(steps).ok()
        })
}

fn threshold_step(expiry: bool) -> Value {
    let mut step = Map::new();
    step.insert(
        "Expression".to_string(),
        json!({
            "AttributeCondition": {
                "Name": "Language",
                "Value": "English",
                "ProficiencyLevel": 1,
                "ComparisonOperator": "NumberGreaterOrEqualTo"
            }
        }),
    );
    if expiry {
        step.insert("Expiry".to_string(), json!({ "DurationInSeconds": 30 }));
    }
    Value::Object(step)
}

proptest! {
    #[test]
    fn prop_canonical_form_round_trips(payload in payload()) {
        let document = payload.to_json_value();
        let reparsed = parse(&document).unwrap();
        prop_assert_eq!(reparsed, payload);
    }

    #[test]
    fn prop_parse_is_deterministic(payload in payload()) {
        let document = payload.to_json_value();
        prop_assert_eq!(parse(&document), parse(&document));
    }

    #[test]
    fn prop_only_the_last_step_may_skip_expiry(flags in prop::collection::vec(any::<bool>(), 1..8)) {
        let document = json!({ "Steps": flags.iter().map(|f| threshold_step(*f)).collect::<Vec<_>>() });
        let first_missing = flags[..flags.len() - 1].iter().position(|present| !present);

        match (parse(&document), first_missing) {
            (Ok(payload), None) => {
                prop_assert_eq!(payload.len(), flags.len());
            }
            (Err(err), Some(step_index)) => {
                prop_assert_eq!(err.into_kind(), ValidationErrorKind::MissingExpiry { step_index });
            }
            (result, expected) => {
                prop_assert!(false, "got {:?}, expected missing {:?}", result, expected);
            }
        }
    }

    #[test]
    fn prop_range_requires_min_not_above_max(min in -100.0f64..100.0, max in -100.0f64..100.0) {
        let document = json!({
            "Steps": [{
                "Expression": {
                    "AttributeCondition": {
                        "Name": "Language",
                        "Value": "English",
                        "ComparisonOperator": "Range",
                        "Range": { "MinProficiencyLevel": min, "MaxProficiencyLevel": max }
                    }
                }
            }]
        });

        match parse(&document) {
            Ok(_) => {
                prop_assert!(min <= max);
            }
            Err(err) => {
                prop_assert!(min > max);
                prop_assert_eq!(err.into_kind(), ValidationErrorKind::InvalidRange { min, max });
            }
        }
    }

    #[test]
    fn prop_operator_selects_exactly_one_field(
        range_operator in any::<bool>(),
        with_level in any::<bool>(),
        with_range in any::<bool>(),
    ) {
        let operator = if range_operator {
            ComparisonOperator::Range
        } else {
            ComparisonOperator::NumberGreaterOrEqualTo
        };
        let mut condition = json!({
            "Name": "Language",
            "Value": "English",
            "ComparisonOperator": operator.as_str()
        });
        if with_level {
            condition["ProficiencyLevel"] = json!(2);
        }
        if with_range {
            condition["Range"] = json!({ "MinProficiencyLevel": 1, "MaxProficiencyLevel": 3 });
        }

        let document = json!({ "Steps": [{ "Expression": { "AttributeCondition": condition } }] });
        let consistent = match operator {
            ComparisonOperator::Range => with_range && !with_level,
            ComparisonOperator::NumberGreaterOrEqualTo => with_level && !with_range,
        };

        match parse(&document) {
            Ok(payload) => {
                prop_assert!(consistent);
                let (_, parsed) = payload.steps()[0].expression().conditions()[0];
                prop_assert_eq!(parsed.comparison_operator(), operator);
                prop_assert_eq!(parsed.proficiency_level().is_some(), with_level);
                prop_assert_eq!(parsed.range().is_some(), with_range);
            }
            Err(err) => {
                prop_assert!(!consistent);
                prop_assert!(err.rule().starts_with("FIELD_OPERATOR_MISMATCH"));
            }
        }
    }
}
