use std::collections::HashSet;
use crate::config::constants::DEFAULT_EXCLUDED_KEYS;
use crate::enums::change_value::ChangeValue;
use crate::enums::diff_annotation::DiffAnnotation;
use crate::enums::edit_field::{EditField, EditKind};
use crate::errors::{ReviewError, ReviewResult};
use crate::structs::change_set::ChangeSet;
use crate::structs::field_path::FieldPath;

/// Field-level diff between a catalog record and a proposed change set,
/// plus the path-based editing used while a reviewer rewrites the changes.
#[derive(Debug, Clone)]
pub struct DiffEngine {
    excluded_keys: HashSet<String>,
}

impl Default for DiffEngine {
    fn default() -> Self {
        Self::new(DEFAULT_EXCLUDED_KEYS.iter().map(|key| key.to_string()))
    }
}

impl DiffEngine {
    pub fn new<I>(excluded_keys: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            excluded_keys: excluded_keys.into_iter().collect(),
        }
    }

    pub fn excluded_keys(&self) -> &HashSet<String> {
        &self.excluded_keys
    }

    /// Diffs from the root path. A missing original is treated as `{}`.
    pub fn annotate(&self, original: Option<&ChangeSet>, changes: &ChangeSet) -> Vec<DiffAnnotation> {
        let empty = ChangeSet::new();
        Self::diff(original.unwrap_or(&empty), changes, &self.excluded_keys, &FieldPath::root())
    }

    /// Annotations come out in the key order of `changes`. Fields without a
    /// detected difference, and excluded keys at any depth, produce nothing.
    pub fn diff(
        original: &ChangeSet,
        changes: &ChangeSet,
        excluded_keys: &HashSet<String>,
        path: &FieldPath,
    ) -> Vec<DiffAnnotation> {
        changes.iter()
            .filter(|(key, _)| !excluded_keys.contains(key.as_str()))
            .filter_map(|(key, new_value)| {
                let field_path = path.child(key);
                let old_value = original.get(key);
                match new_value {
                    ChangeValue::Sequence(items) => Self::diff_sequence(field_path, old_value, items),
                    ChangeValue::Nested(nested) => {
                        let empty = ChangeSet::new();
                        let nested_original = old_value.and_then(ChangeValue::as_nested).unwrap_or(&empty);
                        let children = Self::diff(nested_original, nested, excluded_keys, &field_path);
                        if children.is_empty() {
                            None
                        } else {
                            Some(DiffAnnotation::NestedGroup { path: field_path, children })
                        }
                    }
                    ChangeValue::Scalar(scalar) => {
                        let unchanged = matches!(old_value, Some(ChangeValue::Scalar(old)) if old == scalar);
                        if unchanged {
                            None
                        } else {
                            Some(DiffAnnotation::ScalarChange {
                                path: field_path,
                                old_value: old_value.cloned(),
                                new_value: scalar.clone(),
                            })
                        }
                    }
                }
            })
            .collect()
    }

    fn diff_sequence(path: FieldPath, old_value: Option<&ChangeValue>, items: &[ChangeValue]) -> Option<DiffAnnotation> {
        // Sequences of objects or lists are not compared.
        if items.iter().any(ChangeValue::is_structured) {
            log::debug!("Skipping structured sequence at {}", path);
            return None;
        }

        match old_value {
            Some(ChangeValue::Sequence(old_items)) => {
                let added: Vec<ChangeValue> = items.iter()
                    .filter(|item| !old_items.contains(item))
                    .cloned()
                    .collect();
                let removed: Vec<ChangeValue> = old_items.iter()
                    .filter(|item| !items.contains(item))
                    .cloned()
                    .collect();

                if added.is_empty() && removed.is_empty() {
                    None
                } else {
                    Some(DiffAnnotation::ArrayDelta { path, added, removed })
                }
            }
            _ => Some(DiffAnnotation::ArrayDelta {
                path,
                added: items.to_vec(),
                removed: Vec::new(),
            }),
        }
    }

    /// Assigns `value` at `path` inside `root`, creating empty nested sets
    /// for missing intermediate keys. A non-object intermediate value is
    /// replaced by an empty set. Sibling branches are left as they are.
    pub fn set_by_path(root: &mut ChangeSet, path: &FieldPath, value: ChangeValue) -> ReviewResult<()> {
        if path.is_empty() {
            return Err(ReviewError::validation_error(
                "path",
                "",
                "field path must not be empty",
                Some("Address a field, e.g. 'notes.top_notes'"),
            ));
        }
        root.assign_path(path.segments(), value);
        Ok(())
    }

    /// Builds edit descriptors for every field of `changes`, nested sets
    /// becoming labelled groups.
    pub fn render_edit_fields(changes: &ChangeSet, path: &FieldPath) -> Vec<EditField> {
        changes.iter()
            .map(|(key, value)| {
                let field_path = path.child(key);
                match value {
                    ChangeValue::Nested(nested) => EditField::Group {
                        label: key.clone(),
                        children: Self::render_edit_fields(nested, &field_path),
                        path: field_path,
                    },
                    ChangeValue::Sequence(_) => EditField::Text {
                        label: key.clone(),
                        path: field_path,
                        kind: EditKind::Sequence,
                        value: value.to_string(),
                        template: None,
                    },
                    ChangeValue::Scalar(scalar) => EditField::Text {
                        label: key.clone(),
                        path: field_path,
                        kind: EditKind::Scalar,
                        value: scalar.display_value(),
                        template: Some(scalar.clone()),
                    },
                }
            })
            .collect()
    }
}
