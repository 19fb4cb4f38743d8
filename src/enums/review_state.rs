use std::fmt;
use serde::{Deserialize, Serialize};

/// Per-request review state: `Viewing → Editing → Submitting → Viewing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewState {
    Viewing,
    Editing,
    Submitting,
}

impl fmt::Display for ReviewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Viewing => write!(f, "viewing"),
            Self::Editing => write!(f, "editing"),
            Self::Submitting => write!(f, "submitting"),
        }
    }
}
