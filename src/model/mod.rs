//! Value types shared by flows and sessions: answers, conditions, routes,
//! node kinds, history entries and the parse exchange.

mod answer;
mod condition;
mod exchange;
mod history;
mod kind;
mod route;

pub use answer::Answer;
pub use condition::{Condition, Predicate};
pub use exchange::ContextExchange;
pub use history::{HistoryItem, HistoryItemBase, HistoryItemJson, ItemState};
pub use kind::{AnswerKind, AnswerParser};
pub use route::Route;
