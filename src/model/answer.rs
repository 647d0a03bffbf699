use serde::{Deserialize, Serialize};
use std::fmt;

/// A parsed answer as stored in the history.
///
/// The variant is decided by the kind of the node that parsed it. Serialization is
/// untagged, so the JSON form of an answer is the plain JSON value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Bool(bool),
    Int(i64),
    Text(String),
    List(Vec<String>),
    /// Answers of custom kinds and raw input that could not be parsed.
    Value(serde_json::Value),
}

impl Answer {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Answer::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Answer::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Answer::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Answer::List(items) => Some(items),
            _ => None,
        }
    }

    /// The JSON value the answer serializes to, used to feed it back through a parser.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Answer::Bool(b) => serde_json::Value::Bool(*b),
            Answer::Int(n) => serde_json::Value::from(*n),
            Answer::Text(text) => serde_json::Value::String(text.clone()),
            Answer::List(items) => serde_json::Value::from(items.clone()),
            Answer::Value(value) => value.clone(),
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Bool(b) => write!(f, "{}", b),
            Answer::Int(n) => write!(f, "{}", n),
            Answer::Text(text) => write!(f, "{}", text),
            Answer::List(items) => write!(f, "[{}]", items.join(", ")),
            Answer::Value(value) => write!(f, "{}", value),
        }
    }
}

impl From<&str> for Answer {
    fn from(value: &str) -> Self {
        Answer::Text(value.to_string())
    }
}

impl From<String> for Answer {
    fn from(value: String) -> Self {
        Answer::Text(value)
    }
}

impl From<bool> for Answer {
    fn from(value: bool) -> Self {
        Answer::Bool(value)
    }
}

impl From<i64> for Answer {
    fn from(value: i64) -> Self {
        Answer::Int(value)
    }
}
