//! End-to-end scenarios over a small employee dataset.

use fieldsift_core::{
    project, project_with, validate, ConditionSet, FieldDefinition, FieldOption, FieldType,
    FilterCondition, FilterValue, MatchOptions, Operator, Schema,
};
use serde_json::{json, Value};

// ============================================================================
// Fixtures
// ============================================================================

fn employees() -> Vec<Value> {
    vec![
        json!({
            "id": 1, "name": "Ana Ruiz", "department": "Engineering", "salary": 40000,
            "joinDate": "2019-03-11", "isActive": true, "skills": ["Python", "Go"],
            "address": {"city": "Lisbon", "country": "Portugal"}
        }),
        json!({
            "id": 2, "name": "Ben Ode", "department": "Sales", "salary": 60000,
            "joinDate": "2021-07-01", "isActive": false, "skills": ["Java"],
            "address": {"city": "Lagos", "country": "Nigeria"}
        }),
        json!({
            "id": 3, "name": "Chen Wu", "department": "Engineering", "salary": 80000,
            "joinDate": "2023-01-20", "isActive": true, "skills": ["Rust"],
            "address": null
        }),
    ]
}

fn schema() -> Schema {
    Schema::new([
        FieldDefinition::new("name", "Name", FieldType::Text),
        FieldDefinition::new("salary", "Salary", FieldType::Amount),
        FieldDefinition::new("joinDate", "Join Date", FieldType::Date),
        FieldDefinition::new("department", "Department", FieldType::Select).with_options([
            FieldOption::new("Engineering", "Engineering"),
            FieldOption::new("Sales", "Sales"),
        ]),
        FieldDefinition::new("skills", "Skills", FieldType::Multiselect).with_options([
            FieldOption::new("Go", "Go"),
            FieldOption::new("Rust", "Rust"),
        ]),
        FieldDefinition::new("isActive", "Active", FieldType::Boolean),
        FieldDefinition::new("address.city", "City", FieldType::Text),
    ])
    .unwrap()
}

fn ids(records: &[&Value]) -> Vec<i64> {
    records.iter().map(|r| r["id"].as_i64().unwrap()).collect()
}

fn condition(set: &ConditionSet, field: &str, value: FilterValue) -> FilterCondition {
    let schema = schema();
    FilterCondition::for_field(set.next_id(), schema.get(field).unwrap()).with_value(value)
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn salary_floor() {
    let schema = Schema::new([FieldDefinition::new("salary", "Salary", FieldType::Amount)
        .with_operators([Operator::Between])])
    .unwrap();
    let cond = FilterCondition::for_field("filter-1", schema.get("salary").unwrap())
        .with_value(FilterValue::amount(Some(50000.0), None));

    let records = employees();
    let out = project(&records, &[cond]);
    let salaries: Vec<i64> = out.iter().map(|r| r["salary"].as_i64().unwrap()).collect();
    assert_eq!(salaries, [60000, 80000]);
}

#[test]
fn skills_intersection() {
    let cond = FilterCondition::new(
        "filter-1",
        "skills",
        FieldType::Multiselect,
        Operator::In,
        FilterValue::multi(["Go", "Rust"]),
    );
    let records = employees();
    assert_eq!(ids(&project(&records, &[cond])), [1, 3]);
}

#[test]
fn built_up_condition_set() {
    let records = employees();
    let set = ConditionSet::new();
    let set = set.with_added(condition(
        &set,
        "department",
        FilterValue::select("Engineering"),
    ));
    let set = set.with_added(condition(&set, "isActive", FilterValue::boolean(true)));
    assert_eq!(ids(&project(&records, set.as_slice())), [1, 3]);

    let set = set.with_added(condition(
        &set,
        "joinDate",
        FilterValue::dates(Some("2020-01-01"), Some("2023-12-31")),
    ));
    assert_eq!(ids(&project(&records, set.as_slice())), [3]);

    let set = set.without("filter-1");
    assert_eq!(set.len(), 2);
    assert_eq!(ids(&project(&records, set.as_slice())), [3]);
}

#[test]
fn nested_field_through_null_parent() {
    let records = employees();
    let city = FilterCondition::new(
        "filter-1",
        "address.city",
        FieldType::Text,
        Operator::DoesNotContain,
        FilterValue::text("lis"),
    );
    // Chen has a null address: the city resolves to "" and does not contain "lis".
    assert_eq!(ids(&project(&records, &[city])), [2, 3]);
}

#[test]
fn fresh_conditions_are_invalid_but_still_evaluated() {
    let records = employees();
    let schema = schema();
    let set = ConditionSet::new().with_new_condition(&schema);
    let fresh = set.iter().next().unwrap();

    assert_eq!(fresh.operator, Operator::Equals);
    let report = validate(fresh);
    assert!(!report.valid);
    assert_eq!(report.message.as_deref(), Some("Enter text value"));

    // equals "" against non-empty names: nothing passes.
    assert!(project(&records, set.as_slice()).is_empty());
    // Skipping invalid conditions restores the full list.
    assert_eq!(
        project_with(&records, set.as_slice(), MatchOptions::skip_invalid()).len(),
        3
    );
}

#[test]
fn persisted_shape_round_trips() {
    let raw = json!([
        {"id": "filter-1", "field": "name", "fieldType": "text",
         "operator": "startsWith", "value": {"text": "ch"}},
        {"id": "filter-2", "field": "salary", "fieldType": "amount",
         "operator": "between", "value": {"amountMin": 50000, "amountMax": 90000}},
        {"id": "filter-3", "field": "isActive", "fieldType": "boolean",
         "operator": "is", "value": {"booleanValue": true}}
    ]);
    let set: ConditionSet = serde_json::from_value(raw).unwrap();
    let records = employees();
    assert_eq!(ids(&project(&records, set.as_slice())), [3]);

    let again: ConditionSet =
        serde_json::from_str(&serde_json::to_string(&set).unwrap()).unwrap();
    assert_eq!(again, set);
}

#[test]
fn unknown_field_type_is_rejected_on_load() {
    let raw = json!([{"id": "filter-1", "field": "x", "fieldType": "color",
                      "operator": "is", "value": {}}]);
    assert!(serde_json::from_value::<ConditionSet>(raw).is_err());
}
