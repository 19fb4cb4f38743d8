use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use crate::enums::change_value::ChangeValue;
use crate::structs::field_path::FieldPath;

/// Field name → value mapping of a record or of proposed changes to it.
/// Keys keep the order of the wire payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub struct ChangeSet {
    fields: IndexMap<String, ChangeValue>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Any non-object payload yields an empty set.
    pub fn from_json(value: &Value) -> Self {
        Self::from(value.clone())
    }

    pub fn to_json(&self) -> Value {
        Value::from(self.clone())
    }

    pub fn get(&self, key: &str) -> Option<&ChangeValue> {
        self.fields.get(key)
    }

    pub fn get_path(&self, path: &FieldPath) -> Option<&ChangeValue> {
        let (last, parents) = path.segments().split_last()?;
        let mut current = self;
        for segment in parents {
            current = current.get(segment)?.as_nested()?;
        }
        current.get(last)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: ChangeValue) -> Option<ChangeValue> {
        self.fields.insert(key.into(), value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ChangeValue)> {
        self.fields.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.fields.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Recursive insert along `segments`. Intermediate keys that are absent
    /// or hold a non-object value become empty nested sets.
    pub(crate) fn assign_path(&mut self, segments: &[String], value: ChangeValue) {
        match segments {
            [] => {}
            [last] => {
                self.fields.insert(last.clone(), value);
            }
            [head, rest @ ..] => {
                let slot = self.fields
                    .entry(head.clone())
                    .or_insert_with(|| ChangeValue::Nested(ChangeSet::new()));
                if !matches!(slot, ChangeValue::Nested(_)) {
                    *slot = ChangeValue::Nested(ChangeSet::new());
                }
                if let ChangeValue::Nested(child) = slot {
                    child.assign_path(rest, value);
                }
            }
        }
    }
}

impl From<Value> for ChangeSet {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => map.into_iter()
                .map(|(key, value)| (key, ChangeValue::from(value)))
                .collect(),
            _ => Self::default(),
        }
    }
}

impl From<ChangeSet> for Value {
    fn from(set: ChangeSet) -> Self {
        let map: Map<String, Value> = set.fields
            .into_iter()
            .map(|(key, value)| (key, Value::from(value)))
            .collect();
        Value::Object(map)
    }
}

impl FromIterator<(String, ChangeValue)> for ChangeSet {
    fn from_iter<T: IntoIterator<Item = (String, ChangeValue)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}
