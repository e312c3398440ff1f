//! Filter conditions and condition sets.
//!
//! A [`FilterCondition`] is one field + operator + typed value triple. A
//! [`ConditionSet`] is the ordered collection of conditions combined by
//! logical AND; order is for display only.
//!
//! Both are value objects. Editing methods return a new value and leave the
//! receiver untouched, so an older snapshot stays valid for whoever holds it.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::op::{FieldType, Operator};
use crate::schema::{FieldDefinition, Schema};
use crate::value::FilterValue;

const ID_PREFIX: &str = "filter-";

/// A single predicate over one field.
///
/// `field_type` is a snapshot of the field's declared type at creation time.
/// Use [`Schema::rehydrate`] to repair a condition whose field changed type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCondition {
    pub id: String,
    pub field: String,
    pub field_type: FieldType,
    pub operator: Operator,
    #[serde(default)]
    pub value: FilterValue,
}

impl FilterCondition {
    /// Creates a condition with every part given explicitly.
    pub fn new(
        id: impl Into<String>,
        field: impl Into<String>,
        field_type: FieldType,
        operator: Operator,
        value: FilterValue,
    ) -> Self {
        FilterCondition {
            id: id.into(),
            field: field.into(),
            field_type,
            operator,
            value,
        }
    }

    /// Creates a fresh condition for a field: its default operator and an
    /// empty value.
    pub fn for_field(id: impl Into<String>, def: &FieldDefinition) -> Self {
        FilterCondition {
            id: id.into(),
            field: def.name.clone(),
            field_type: def.field_type,
            operator: def.default_operator(),
            value: FilterValue::default(),
        }
    }

    /// Points the condition at another field. Operator and value reset.
    pub fn with_field(&self, def: &FieldDefinition) -> Self {
        FilterCondition::for_field(self.id.clone(), def)
    }

    /// Changes the operator. The value resets.
    pub fn with_operator(&self, operator: Operator) -> Self {
        FilterCondition {
            operator,
            value: FilterValue::default(),
            ..self.clone()
        }
    }

    /// Replaces the value payload.
    pub fn with_value(&self, value: FilterValue) -> Self {
        FilterCondition {
            value,
            ..self.clone()
        }
    }
}

/// Ordered conjunction of conditions.
///
/// Storage is shared between clones; editing copies it. An empty set means
/// "no filtering".
///
/// The set also remembers the highest `filter-N` number it has issued or
/// seen, so removing a condition never frees its id for reuse. Only the
/// conditions take part in equality and serialization; a set read back from
/// its plain array form knows the ids present in it, and
/// [`with_issued`](Self::with_issued) restores a watermark kept elsewhere.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<FilterCondition>", into = "Vec<FilterCondition>")]
pub struct ConditionSet {
    conditions: Arc<Vec<FilterCondition>>,
    issued: u64,
}

fn id_number(id: &str) -> Option<u64> {
    id.strip_prefix(ID_PREFIX)?.parse().ok()
}

fn highest_id(conditions: &[FilterCondition]) -> u64 {
    conditions
        .iter()
        .filter_map(|c| id_number(&c.id))
        .max()
        .unwrap_or(0)
}

impl ConditionSet {
    pub fn new() -> Self {
        ConditionSet::default()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FilterCondition> {
        self.conditions.iter()
    }

    pub fn as_slice(&self) -> &[FilterCondition] {
        &self.conditions
    }

    pub fn get(&self, id: &str) -> Option<&FilterCondition> {
        self.conditions.iter().find(|c| c.id == id)
    }

    /// Highest `filter-N` number issued or seen so far.
    pub fn issued(&self) -> u64 {
        self.issued
    }

    /// Raises the id watermark to at least `issued`. Lowering is ignored.
    pub fn with_issued(&self, issued: u64) -> Self {
        ConditionSet {
            conditions: Arc::clone(&self.conditions),
            issued: self.issued.max(issued),
        }
    }

    /// Returns a fresh `filter-N` id that this set has never handed out.
    pub fn next_id(&self) -> String {
        format!("{ID_PREFIX}{}", self.issued + 1)
    }

    /// Appends a condition. A condition whose id is already present is
    /// ignored and the set comes back unchanged.
    pub fn with_added(&self, condition: FilterCondition) -> Self {
        if self.get(&condition.id).is_some() {
            log::warn!("ignoring condition with duplicate id '{}'", condition.id);
            return self.clone();
        }
        self.edited(|conditions| conditions.push(condition))
    }

    /// Appends a default condition on the schema's first field. Returns the
    /// set unchanged if the schema is empty.
    pub fn with_new_condition(&self, schema: &Schema) -> Self {
        match schema.first() {
            Some(def) => self.with_added(FilterCondition::for_field(self.next_id(), def)),
            None => self.clone(),
        }
    }

    /// Replaces the condition sharing the replacement's id. Unknown ids leave
    /// the set unchanged.
    pub fn with_replaced(&self, replacement: FilterCondition) -> Self {
        if self.get(&replacement.id).is_none() {
            return self.clone();
        }
        self.edited(|conditions| {
            for slot in conditions.iter_mut() {
                if slot.id == replacement.id {
                    *slot = replacement.clone();
                }
            }
        })
    }

    /// Drops the condition with the given id.
    pub fn without(&self, id: &str) -> Self {
        self.edited(|conditions| conditions.retain(|c| c.id != id))
    }

    /// Drops every condition. Issued ids stay retired.
    pub fn cleared(&self) -> Self {
        ConditionSet {
            conditions: Arc::default(),
            issued: self.issued,
        }
    }

    fn edited(&self, edit: impl FnOnce(&mut Vec<FilterCondition>)) -> Self {
        let mut conditions = Vec::clone(&self.conditions);
        edit(&mut conditions);
        let issued = self.issued.max(highest_id(&conditions));
        ConditionSet {
            conditions: Arc::new(conditions),
            issued,
        }
    }
}

impl PartialEq for ConditionSet {
    fn eq(&self, other: &Self) -> bool {
        self.conditions == other.conditions
    }
}

impl From<Vec<FilterCondition>> for ConditionSet {
    /// Later conditions repeating an earlier id are dropped.
    fn from(mut conditions: Vec<FilterCondition>) -> Self {
        let mut seen = HashSet::new();
        conditions.retain(|c| seen.insert(c.id.clone()));
        ConditionSet {
            issued: highest_id(&conditions),
            conditions: Arc::new(conditions),
        }
    }
}

impl From<ConditionSet> for Vec<FilterCondition> {
    fn from(set: ConditionSet) -> Self {
        Arc::try_unwrap(set.conditions).unwrap_or_else(|shared| (*shared).clone())
    }
}

impl FromIterator<FilterCondition> for ConditionSet {
    fn from_iter<I: IntoIterator<Item = FilterCondition>>(iter: I) -> Self {
        ConditionSet::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<'a> IntoIterator for &'a ConditionSet {
    type Item = &'a FilterCondition;
    type IntoIter = std::slice::Iter<'a, FilterCondition>;

    fn into_iter(self) -> Self::IntoIter {
        self.conditions.iter()
    }
}
