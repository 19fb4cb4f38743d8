use serde::{Deserialize, Serialize};
use crate::enums::change_value::{ChangeValue, Scalar};
use crate::errors::ReviewResult;
use crate::services::diff_engine::DiffEngine;
use crate::structs::change_set::ChangeSet;
use crate::structs::field_path::FieldPath;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditKind {
    /// Comma-separated list; input is split on `,` and trimmed.
    Sequence,
    Scalar,
}

/// Editable field descriptor produced for a change set under review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EditField {
    Group {
        label: String,
        path: FieldPath,
        children: Vec<EditField>,
    },
    Text {
        label: String,
        path: FieldPath,
        kind: EditKind,
        value: String,
        /// Type template for scalar input; `None` for sequences.
        #[serde(skip)]
        template: Option<Scalar>,
    },
}

impl EditField {
    pub fn label(&self) -> &str {
        match self {
            EditField::Group { label, .. } | EditField::Text { label, .. } => label,
        }
    }

    pub fn path(&self) -> &FieldPath {
        match self {
            EditField::Group { path, .. } | EditField::Text { path, .. } => path,
        }
    }

    /// Writes `input` into `target` at this field's full path.
    /// Groups are not editable themselves and leave `target` unchanged.
    pub fn apply(&self, target: &mut ChangeSet, input: &str) -> ReviewResult<()> {
        match self {
            EditField::Group { .. } => Ok(()),
            EditField::Text { path, kind: EditKind::Sequence, .. } => {
                DiffEngine::set_by_path(target, path, Self::split_sequence(input))
            }
            EditField::Text { path, kind: EditKind::Scalar, template, .. } => {
                let scalar = template.as_ref()
                    .map_or_else(|| Scalar::text(input), |template| template.coerce_input(input));
                DiffEngine::set_by_path(target, path, ChangeValue::Scalar(scalar))
            }
        }
    }

    /// Depth-first search for the text field bound to `path`.
    pub fn find<'a>(fields: &'a [EditField], path: &FieldPath) -> Option<&'a EditField> {
        for field in fields {
            match field {
                EditField::Text { path: field_path, .. } if field_path == path => return Some(field),
                EditField::Group { children, .. } => {
                    if let Some(found) = Self::find(children, path) {
                        return Some(found);
                    }
                }
                EditField::Text { .. } => {}
            }
        }
        None
    }

    fn split_sequence(input: &str) -> ChangeValue {
        ChangeValue::sequence_of_text(input.split(',').map(str::trim))
    }
}
