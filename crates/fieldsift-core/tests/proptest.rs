//! Property-based tests for projection using proptest.

use fieldsift_core::{project, validate, FieldType, FilterCondition, FilterValue, Operator};
use proptest::prelude::*;
use serde_json::{json, Value};

// ============================================================================
// Test helpers
// ============================================================================

fn record_strategy() -> impl Strategy<Value = Value> {
    (
        "[a-zA-Z ]{0,12}",
        -1000i64..1000,
        prop::collection::vec(prop::sample::select(vec!["Go", "Rust", "Java", "Python"]), 0..4),
        any::<bool>(),
    )
        .prop_map(|(name, amount, skills, active)| {
            json!({
                "name": name,
                "amount": amount,
                "skills": skills,
                "active": active,
            })
        })
}

fn condition_strategy() -> impl Strategy<Value = FilterCondition> {
    prop_oneof![
        (
            prop::sample::select(FieldType::Text.operators().to_vec()),
            "[a-z]{0,3}"
        )
            .prop_map(|(op, text)| cond("name", FieldType::Text, op, FilterValue::text(text))),
        (
            prop::sample::select(FieldType::Number.operators().to_vec()),
            -1000i64..1000
        )
            .prop_map(|(op, n)| cond(
                "amount",
                FieldType::Number,
                op,
                FilterValue::number(n as f64)
            )),
        (
            prop::option::of(-1000i64..1000),
            prop::option::of(-1000i64..1000)
        )
            .prop_map(|(min, max)| cond(
                "amount",
                FieldType::Amount,
                Operator::Between,
                FilterValue::amount(min.map(|n| n as f64), max.map(|n| n as f64))
            )),
        (
            prop::sample::select(vec![Operator::In, Operator::NotIn]),
            prop::collection::vec(prop::sample::select(vec!["Go", "Rust", "Java"]), 0..3)
        )
            .prop_map(|(op, choices)| cond(
                "skills",
                FieldType::Multiselect,
                op,
                FilterValue::multi(choices)
            )),
        any::<bool>().prop_map(|b| cond(
            "active",
            FieldType::Boolean,
            Operator::Is,
            FilterValue::boolean(b)
        )),
    ]
}

fn cond(field: &str, field_type: FieldType, op: Operator, value: FilterValue) -> FilterCondition {
    FilterCondition::new("filter-1", field, field_type, op, value)
}

fn cloned(records: Vec<&Value>) -> Vec<Value> {
    records.into_iter().cloned().collect()
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// An empty condition set is the identity.
    #[test]
    fn empty_set_is_identity(records in prop::collection::vec(record_strategy(), 0..40)) {
        let out = cloned(project(&records, &[]));
        prop_assert_eq!(out, records);
    }

    /// Projection never grows the collection and keeps relative order.
    #[test]
    fn projection_is_ordered_subsequence(
        records in prop::collection::vec(record_strategy(), 0..40),
        conditions in prop::collection::vec(condition_strategy(), 0..4),
    ) {
        let out = project(&records, &conditions);
        prop_assert!(out.len() <= records.len());

        let mut cursor = records.iter();
        for kept in out {
            prop_assert!(cursor.any(|r| std::ptr::eq(r, kept)));
        }
    }

    /// Projecting twice equals projecting once through the concatenation,
    /// in either order.
    #[test]
    fn conjunction_composes(
        records in prop::collection::vec(record_strategy(), 0..40),
        first in prop::collection::vec(condition_strategy(), 0..3),
        second in prop::collection::vec(condition_strategy(), 0..3),
    ) {
        let stepwise = cloned(project(&cloned(project(&records, &first)), &second));

        let mut both = first.clone();
        both.extend(second.iter().cloned());
        let combined = cloned(project(&records, &both));

        let mut reversed = second.clone();
        reversed.extend(first.iter().cloned());
        let swapped = cloned(project(&records, &reversed));

        prop_assert_eq!(&stepwise, &combined);
        prop_assert_eq!(&combined, &swapped);
    }

    /// A field equal to the filter text matches every positive text operator.
    #[test]
    fn text_operators_are_reflexive(name in "[a-zA-Z0-9 ]{0,16}") {
        let records = vec![json!({"name": name.clone()})];
        for op in [Operator::Equals, Operator::Contains, Operator::StartsWith, Operator::EndsWith] {
            let c = cond("name", FieldType::Text, op, FilterValue::text(name.clone()));
            prop_assert_eq!(project(&records, &[c]).len(), 1);
        }
    }

    /// Range bounds are inclusive at both ends.
    #[test]
    fn amount_bounds_are_inclusive(min in -1000i64..1000, width in 0i64..1000) {
        let max = min + width;
        let records = vec![json!({"amount": min}), json!({"amount": max})];
        let c = cond(
            "amount",
            FieldType::Amount,
            Operator::Between,
            FilterValue::amount(Some(min as f64), Some(max as f64)),
        );
        prop_assert_eq!(project(&records, &[c]).len(), 2);
    }

    /// Number comparisons are inclusive for the "or equal" operators.
    #[test]
    fn number_or_equal_is_inclusive(n in -1000i64..1000) {
        let records = vec![json!({"amount": n})];
        for op in [Operator::Equals, Operator::GreaterThanOrEqual, Operator::LessThanOrEqual] {
            let c = cond("amount", FieldType::Number, op, FilterValue::number(n as f64));
            prop_assert_eq!(project(&records, &[c]).len(), 1);
        }
    }

    /// A date range with only a start is a no-op.
    #[test]
    fn open_date_range_matches_all(
        records in prop::collection::vec(record_strategy(), 0..20),
        year in 1990u32..2040,
    ) {
        let start = format!("{year}-01-01");
        let c = cond(
            "joinDate",
            FieldType::Date,
            Operator::Between,
            FilterValue::dates(Some(start.as_str()), None),
        );
        prop_assert_eq!(project(&records, &[c]).len(), records.len());
    }

    /// Multiselect with no choices: `notIn` keeps everything, `in` nothing.
    #[test]
    fn empty_choice_set(records in prop::collection::vec(record_strategy(), 0..20)) {
        let nothing = FilterValue::multi(Vec::<String>::new());
        let not_in = cond("skills", FieldType::Multiselect, Operator::NotIn, nothing.clone());
        let any_in = cond("skills", FieldType::Multiselect, Operator::In, nothing);
        prop_assert_eq!(project(&records, &[not_in]).len(), records.len());
        prop_assert_eq!(project(&records, &[any_in]).len(), 0);
    }

    /// Whitespace-only text never validates.
    #[test]
    fn blank_text_is_invalid(blank in "[ \t]{0,8}") {
        let c = cond("name", FieldType::Text, Operator::Contains, FilterValue::text(blank));
        prop_assert!(!validate(&c).valid);
    }
}
