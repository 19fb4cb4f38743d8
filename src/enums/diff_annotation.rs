use serde::{Deserialize, Serialize};
use crate::enums::change_value::{ChangeValue, Scalar};
use crate::structs::field_path::FieldPath;

/// One detected difference between an original record and its change set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiffAnnotation {
    ScalarChange {
        path: FieldPath,
        /// `None` when the original record has no such field.
        old_value: Option<ChangeValue>,
        new_value: Scalar,
    },
    ArrayDelta {
        path: FieldPath,
        added: Vec<ChangeValue>,
        removed: Vec<ChangeValue>,
    },
    NestedGroup {
        path: FieldPath,
        children: Vec<DiffAnnotation>,
    },
}

impl DiffAnnotation {
    pub fn path(&self) -> &FieldPath {
        match self {
            DiffAnnotation::ScalarChange { path, .. }
            | DiffAnnotation::ArrayDelta { path, .. }
            | DiffAnnotation::NestedGroup { path, .. } => path,
        }
    }

    /// Number of leaf annotations, counting through nested groups.
    pub fn leaf_count(&self) -> usize {
        match self {
            DiffAnnotation::NestedGroup { children, .. } => children.iter().map(DiffAnnotation::leaf_count).sum(),
            _ => 1,
        }
    }
}
