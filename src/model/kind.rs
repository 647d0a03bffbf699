use super::{Answer, ContextExchange};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Contract for user defined node kinds.
///
/// `parse` turns the raw payload of an exchange into a typed answer, or `None`
/// when the payload is not acceptable for this kind. `encode`/`decode` form the
/// string codec used when a history is persisted as text.
pub trait AnswerParser: Send + Sync {
    fn type_name(&self) -> &str;

    fn parse(&self, exchange: &ContextExchange<'_>) -> Option<Answer>;

    fn encode(&self, answer: &Answer) -> Result<String, serde_json::Error> {
        serde_json::to_string(answer)
    }

    fn decode(&self, raw: &str) -> Option<Answer> {
        if raw.trim().is_empty() {
            return None;
        }
        let payload: Value = serde_json::from_str(raw).ok()?;
        self.parse(&ContextExchange::new(payload))
    }
}

/// The runtime type of a flow node: what answers it accepts and how they are stored.
///
/// Two nodes have the same type iff their kinds report the same `type_name`.
#[derive(Clone)]
pub enum AnswerKind {
    Text,
    Bool,
    Int,
    Long,
    List,
    Custom(Arc<dyn AnswerParser>),
}

/// Defines the built-in kinds, their type names, and their parse functions in one place.
macro_rules! define_builtin_kinds {
    ( $( ($variant:ident, $type_name:literal, $parse:ident) ),* $(,)? ) => {
        impl AnswerKind {
            pub fn type_name(&self) -> &str {
                match self {
                    $( AnswerKind::$variant => $type_name, )*
                    AnswerKind::Custom(parser) => parser.type_name(),
                }
            }

            /// Parses the payload carried by the exchange.
            pub fn parse(&self, exchange: &ContextExchange<'_>) -> Option<Answer> {
                match self {
                    $( AnswerKind::$variant => $parse(exchange.payload()), )*
                    AnswerKind::Custom(parser) => parser.parse(exchange),
                }
            }

            /// Looks up a built-in kind by its type name.
            pub fn builtin(type_name: &str) -> Option<AnswerKind> {
                match type_name {
                    $( $type_name => Some(AnswerKind::$variant), )*
                    _ => None,
                }
            }

            pub fn builtins() -> Vec<AnswerKind> {
                vec![ $( AnswerKind::$variant ),* ]
            }
        }
    };
}

define_builtin_kinds! {
    (Text, "Question", parse_text),
    (Bool, "QuestionBool", parse_bool),
    (Int, "QuestionInt", parse_int),
    (Long, "QuestionLong", parse_long),
    (List, "QuestionList", parse_list),
}

impl AnswerKind {
    pub fn custom<P: AnswerParser + 'static>(parser: P) -> Self {
        AnswerKind::Custom(Arc::new(parser))
    }

    pub fn same_type(&self, other: &AnswerKind) -> bool {
        self.type_name() == other.type_name()
    }

    pub fn encode(&self, answer: &Answer) -> Result<String, serde_json::Error> {
        match self {
            AnswerKind::Custom(parser) => parser.encode(answer),
            _ => serde_json::to_string(answer),
        }
    }

    /// Decodes a persisted answer; `None` when the text is not a valid answer of this kind.
    pub fn decode(&self, raw: &str) -> Option<Answer> {
        match self {
            AnswerKind::Custom(parser) => parser.decode(raw),
            _ => {
                if raw.trim().is_empty() {
                    return None;
                }
                let payload: Value = serde_json::from_str(raw).ok()?;
                self.parse(&ContextExchange::new(payload))
            }
        }
    }
}

impl fmt::Debug for AnswerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

const FALSE_WORDS: &[&str] = &[
    "0", "no", "false", "reject", "disagree", "cancel", "abort", "refuse", "forbid", "fail",
    "failed", "error",
];
const TRUE_WORDS: &[&str] = &[
    "1", "yes", "true", "agree", "ok", "continue", "succeed", "success", "done",
];

/// Text form of a payload, as a user would have typed it.
fn text_of(payload: &Value) -> String {
    match payload {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn truncated(payload: &Value) -> Option<i64> {
    payload
        .as_i64()
        .or_else(|| payload.as_f64().map(|n| n.trunc() as i64))
}

fn parse_text(payload: &Value) -> Option<Answer> {
    payload.as_str().map(|s| Answer::Text(s.to_string()))
}

fn parse_bool(payload: &Value) -> Option<Answer> {
    match payload {
        Value::Bool(b) => return Some(Answer::Bool(*b)),
        Value::Number(_) => match truncated(payload) {
            Some(1) => return Some(Answer::Bool(true)),
            Some(0) => return Some(Answer::Bool(false)),
            _ => {}
        },
        _ => {}
    }
    let text = text_of(payload);
    if FALSE_WORDS.iter().any(|w| w.eq_ignore_ascii_case(&text)) {
        Some(Answer::Bool(false))
    } else if TRUE_WORDS.iter().any(|w| w.eq_ignore_ascii_case(&text)) {
        Some(Answer::Bool(true))
    } else {
        None
    }
}

fn parse_int(payload: &Value) -> Option<Answer> {
    let value = match payload {
        Value::Number(_) => truncated(payload)?,
        other => text_of(other).parse::<i32>().ok()?.into(),
    };
    i32::try_from(value).ok().map(|n| Answer::Int(n.into()))
}

fn parse_long(payload: &Value) -> Option<Answer> {
    match payload {
        Value::Number(_) => truncated(payload).map(Answer::Int),
        other => text_of(other).parse::<i64>().ok().map(Answer::Int),
    }
}

fn parse_list(payload: &Value) -> Option<Answer> {
    match payload {
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
            .map(Answer::List),
        Value::String(s) => serde_json::from_str::<Vec<String>>(s)
            .ok()
            .map(Answer::List),
        _ => None,
    }
}
