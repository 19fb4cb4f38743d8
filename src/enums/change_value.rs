use std::fmt;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use crate::structs::change_set::ChangeSet;

/// Leaf value of a change set. Equality is strict: no coercion between
/// variants, numbers compare by numeric value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(Number),
    Text(String),
}

impl Scalar {
    pub fn text(value: &str) -> Self {
        Self::Text(value.to_string())
    }

    /// Value shown in an edit box. `null` renders as an empty field.
    pub fn display_value(&self) -> String {
        match self {
            Self::Null => String::new(),
            other => other.to_string(),
        }
    }

    /// Parses edit input, keeping this scalar's type when the input fits it.
    pub fn coerce_input(&self, input: &str) -> Scalar {
        match self {
            Self::Number(_) => {
                if let Ok(int) = input.parse::<i64>() {
                    return Self::Number(Number::from(int));
                }
                input.parse::<f64>()
                    .ok()
                    .and_then(Number::from_f64)
                    .map_or_else(|| Self::text(input), Self::Number)
            }
            Self::Bool(_) => match input {
                "true" => Self::Bool(true),
                "false" => Self::Bool(false),
                _ => Self::text(input),
            },
            Self::Null | Self::Text(_) => Self::text(input),
        }
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => numbers_equal(a, b),
            (Self::Text(a), Self::Text(b)) => a == b,
            _ => false,
        }
    }
}

fn numbers_equal(a: &Number, b: &Number) -> bool {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x == y;
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x == y;
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(value) => write!(f, "{}", value),
            Self::Number(value) => write!(f, "{}", value),
            Self::Text(value) => write!(f, "{}", value),
        }
    }
}

impl TryFrom<Value> for Scalar {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Null => Ok(Self::Null),
            Value::Bool(flag) => Ok(Self::Bool(flag)),
            Value::Number(number) => Ok(Self::Number(number)),
            Value::String(text) => Ok(Self::Text(text)),
            other => Err(format!("expected a scalar, found {}", other)),
        }
    }
}

impl From<Scalar> for Value {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::Null => Value::Null,
            Scalar::Bool(flag) => Value::Bool(flag),
            Scalar::Number(number) => Value::Number(number),
            Scalar::Text(text) => Value::String(text),
        }
    }
}

/// A node of a change set: a scalar, an ordered sequence, or a nested set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum ChangeValue {
    Scalar(Scalar),
    Sequence(Vec<ChangeValue>),
    Nested(ChangeSet),
}

impl ChangeValue {
    pub fn text(value: &str) -> Self {
        Self::Scalar(Scalar::text(value))
    }

    pub fn sequence_of_text<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::Sequence(items.into_iter().map(|item| Self::text(item.as_ref())).collect())
    }

    /// Structured values are sequences and nested sets; `null` is a scalar.
    pub fn is_structured(&self) -> bool {
        matches!(self, Self::Sequence(_) | Self::Nested(_))
    }

    pub fn as_nested(&self) -> Option<&ChangeSet> {
        match self {
            Self::Nested(set) => Some(set),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        Value::from(self.clone())
    }
}

impl fmt::Display for ChangeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(scalar) => write!(f, "{}", scalar),
            Self::Sequence(items) => {
                let rendered: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "{}", rendered.join(", "))
            }
            Self::Nested(set) => write!(f, "{}", set.to_json()),
        }
    }
}

impl From<Value> for ChangeValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Scalar(Scalar::Null),
            Value::Bool(flag) => Self::Scalar(Scalar::Bool(flag)),
            Value::Number(number) => Self::Scalar(Scalar::Number(number)),
            Value::String(text) => Self::Scalar(Scalar::Text(text)),
            Value::Array(items) => Self::Sequence(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => Self::Nested(ChangeSet::from(Value::Object(map))),
        }
    }
}

impl From<ChangeValue> for Value {
    fn from(value: ChangeValue) -> Self {
        match value {
            ChangeValue::Scalar(scalar) => Value::from(scalar),
            ChangeValue::Sequence(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            ChangeValue::Nested(set) => Value::from(set),
        }
    }
}
