//! The catalog of filterable fields.
//!
//! A [`Schema`] is supplied once per session from an external source and
//! stays immutable. It constrains which conditions can be built and is the
//! reference point for repairing conditions whose declared type snapshot has
//! drifted from the live definition.

use serde::{Deserialize, Serialize};

use crate::condition::{ConditionSet, FilterCondition};
use crate::error::{Result, SchemaError};
use crate::op::{FieldType, Operator};

/// One enumerated choice of a select or multiselect field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldOption {
    pub label: String,
    pub value: serde_json::Value,
}

impl FieldOption {
    pub fn new(label: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        FieldOption {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Definition of a single filterable field.
///
/// `name` is a dotted path into a record (e.g. `"address.city"`). `label`
/// is for display only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub operators: Vec<Operator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<FieldOption>>,
}

impl FieldDefinition {
    /// Creates a definition that allows every operator of its type.
    pub fn new(name: impl Into<String>, label: impl Into<String>, field_type: FieldType) -> Self {
        FieldDefinition {
            name: name.into(),
            label: label.into(),
            field_type,
            operators: field_type.operators().to_vec(),
            options: None,
        }
    }

    /// Restricts the operator list. The first entry becomes the default.
    pub fn with_operators(mut self, operators: impl IntoIterator<Item = Operator>) -> Self {
        self.operators = operators.into_iter().collect();
        self
    }

    /// Sets the enumerated choices.
    pub fn with_options(mut self, options: impl IntoIterator<Item = FieldOption>) -> Self {
        self.options = Some(options.into_iter().collect());
        self
    }

    /// The operator a fresh condition on this field starts with.
    pub fn default_operator(&self) -> Operator {
        self.operators
            .first()
            .copied()
            .unwrap_or_else(|| self.field_type.operators()[0])
    }

    /// Returns `true` if `op` is offered for this field.
    pub fn offers(&self, op: Operator) -> bool {
        self.operators.contains(&op)
    }

    fn check(&self) -> Result<()> {
        if self.operators.is_empty() {
            return Err(SchemaError::NoOperators(self.name.clone()));
        }
        if let Some(op) = self
            .operators
            .iter()
            .copied()
            .find(|op| !self.field_type.allows(*op))
        {
            return Err(SchemaError::InvalidOperatorForType {
                field: self.name.clone(),
                op,
                field_type: self.field_type,
            });
        }
        match (self.field_type.requires_options(), &self.options) {
            (true, None) => Err(SchemaError::MissingOptions {
                field: self.name.clone(),
                field_type: self.field_type,
            }),
            (false, Some(_)) => Err(SchemaError::UnexpectedOptions {
                field: self.name.clone(),
                field_type: self.field_type,
            }),
            _ => Ok(()),
        }
    }
}

/// A validated, ordered catalog of field definitions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    fields: Vec<FieldDefinition>,
}

impl Schema {
    /// Builds a schema, rejecting definitions that break the catalog rules:
    /// unique names, a non-empty operator list legal for the declared type,
    /// and options present exactly for select/multiselect fields.
    pub fn new(fields: impl IntoIterator<Item = FieldDefinition>) -> Result<Self> {
        let fields: Vec<FieldDefinition> = fields.into_iter().collect();
        for (i, def) in fields.iter().enumerate() {
            def.check()?;
            if fields[..i].iter().any(|other| other.name == def.name) {
                return Err(SchemaError::DuplicateField(def.name.clone()));
            }
        }
        Ok(Schema { fields })
    }

    pub fn get(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|def| def.name == name)
    }

    /// The first field, used for newly added conditions.
    pub fn first(&self) -> Option<&FieldDefinition> {
        self.fields.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    /// Brings a condition back in line with the live field definition.
    ///
    /// - Field unchanged and operator still offered: returned as is.
    /// - Declared type or operator drifted: rebuilt from the definition,
    ///   keeping only the id.
    /// - Field no longer in the schema: `None`.
    pub fn rehydrate(&self, condition: &FilterCondition) -> Option<FilterCondition> {
        let def = self.get(&condition.field)?;
        if def.field_type == condition.field_type && def.offers(condition.operator) {
            Some(condition.clone())
        } else {
            Some(FilterCondition::for_field(condition.id.clone(), def))
        }
    }

    /// Applies [`rehydrate`](Self::rehydrate) to a whole set, preserving
    /// order and the set's id watermark.
    pub fn reconcile(&self, set: &ConditionSet) -> ConditionSet {
        set.iter()
            .filter_map(|c| self.rehydrate(c))
            .collect::<ConditionSet>()
            .with_issued(set.issued())
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = &'a FieldDefinition;
    type IntoIter = std::slice::Iter<'a, FieldDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::FilterValue;
    use serde_json::json;

    fn department() -> FieldDefinition {
        FieldDefinition::new("department", "Department", FieldType::Select)
            .with_options([FieldOption::new("Engineering", "Engineering")])
    }

    #[test]
    fn accepts_valid_definitions() {
        let schema = Schema::new([
            FieldDefinition::new("name", "Name", FieldType::Text),
            department(),
        ])
        .unwrap();
        assert_eq!(schema.len(), 2);
        assert_eq!(schema.first().unwrap().name, "name");
        assert!(schema.get("department").is_some());
        assert!(schema.get("missing").is_none());
    }

    #[test]
    fn rejects_duplicate_names() {
        let err = Schema::new([
            FieldDefinition::new("name", "Name", FieldType::Text),
            FieldDefinition::new("name", "Other", FieldType::Text),
        ])
        .unwrap_err();
        assert_eq!(err, SchemaError::DuplicateField("name".into()));
    }

    #[test]
    fn rejects_foreign_operator() {
        let def = FieldDefinition::new("salary", "Salary", FieldType::Amount)
            .with_operators([Operator::Between, Operator::GreaterThan]);
        let err = Schema::new([def]).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::InvalidOperatorForType {
                op: Operator::GreaterThan,
                ..
            }
        ));
    }

    #[test]
    fn rejects_empty_operator_list() {
        let def = FieldDefinition::new("name", "Name", FieldType::Text).with_operators([]);
        assert_eq!(
            Schema::new([def]).unwrap_err(),
            SchemaError::NoOperators("name".into())
        );
    }

    #[test]
    fn options_required_iff_enumerated() {
        let missing = FieldDefinition::new("dept", "Dept", FieldType::Select);
        assert!(matches!(
            Schema::new([missing]).unwrap_err(),
            SchemaError::MissingOptions { .. }
        ));

        let unexpected = FieldDefinition::new("name", "Name", FieldType::Text)
            .with_options([FieldOption::new("a", "a")]);
        assert!(matches!(
            Schema::new([unexpected]).unwrap_err(),
            SchemaError::UnexpectedOptions { .. }
        ));
    }

    #[test]
    fn deserializes_wire_shape() {
        let def: FieldDefinition = serde_json::from_value(json!({
            "name": "address.city",
            "label": "City",
            "type": "text",
            "operators": ["contains", "equals"]
        }))
        .unwrap();
        assert_eq!(def.field_type, FieldType::Text);
        assert_eq!(def.default_operator(), Operator::Contains);
        assert!(def.options.is_none());
    }

    #[test]
    fn rehydrate_keeps_matching_condition() {
        let schema = Schema::new([FieldDefinition::new("name", "Name", FieldType::Text)]).unwrap();
        let cond = FilterCondition::for_field("filter-1", schema.get("name").unwrap())
            .with_value(FilterValue::text("ann"));
        assert_eq!(schema.rehydrate(&cond), Some(cond));
    }

    #[test]
    fn rehydrate_rebuilds_drifted_type() {
        let old = FieldDefinition::new("projects", "Projects", FieldType::Text);
        let cond = FilterCondition::for_field("filter-3", &old).with_value(FilterValue::text("4"));

        let schema =
            Schema::new([FieldDefinition::new("projects", "Projects", FieldType::Number)]).unwrap();
        let fixed = schema.rehydrate(&cond).unwrap();
        assert_eq!(fixed.id, "filter-3");
        assert_eq!(fixed.field_type, FieldType::Number);
        assert_eq!(fixed.operator, Operator::Equals);
        assert_eq!(fixed.value, FilterValue::default());
    }

    #[test]
    fn reconcile_drops_unknown_fields() {
        let schema = Schema::new([FieldDefinition::new("name", "Name", FieldType::Text)]).unwrap();
        let gone = FieldDefinition::new("nickname", "Nickname", FieldType::Text);
        let set = ConditionSet::new()
            .with_added(FilterCondition::for_field("filter-1", &gone))
            .with_added(FilterCondition::for_field("filter-2", schema.get("name").unwrap()));

        let reconciled = schema.reconcile(&set);
        assert_eq!(reconciled.len(), 1);
        assert_eq!(reconciled.iter().next().unwrap().id, "filter-2");
    }
}
