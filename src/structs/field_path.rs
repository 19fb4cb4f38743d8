use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::errors::ReviewError;

/// Ordered key sequence addressing a value inside a nested change set,
/// e.g. `["notes", "top_notes"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Returns a new path with `key` appended; `self` is left untouched.
    pub fn child(&self, key: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(key.to_string());
        Self(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

impl FromStr for FieldPath {
    type Err = ReviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let segments: Vec<String> = s.split('.').map(|segment| segment.trim().to_string()).collect();
        if segments.iter().any(String::is_empty) {
            return Err(ReviewError::user_input_error(
                s,
                "a dot-separated field path",
                "Use a path like 'notes.top_notes'",
            ));
        }
        Ok(Self(segments))
    }
}

impl From<Vec<String>> for FieldPath {
    fn from(segments: Vec<String>) -> Self {
        Self(segments)
    }
}
