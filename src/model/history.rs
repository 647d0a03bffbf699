use super::Answer;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// Where a history entry stands in the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ItemState {
    /// Reverted by a back transition, or holding input that failed to parse.
    Draft,
    /// The node the session is currently positioned on.
    #[default]
    Current,
    Answered,
}

/// One answered (or pending) question of a session.
///
/// Entries are identified by their label: equality and hashing ignore the
/// answer, the timestamp and the state. The natural order sorts the newest
/// entry first and entries without a timestamp last.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryItemBase<A> {
    pub label: String,
    pub answer: Option<A>,
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub state: ItemState,
}

/// A history entry holding a parsed answer.
pub type HistoryItem = HistoryItemBase<Answer>;

/// A history entry holding an answer in its persisted text form.
pub type HistoryItemJson = HistoryItemBase<String>;

impl<A> HistoryItemBase<A> {
    pub fn new(label: impl Into<String>, answer: Option<A>, state: ItemState) -> Self {
        Self {
            label: label.into(),
            answer,
            created_at: Some(Utc::now()),
            state,
        }
    }

    /// A fresh entry marking the session position.
    pub fn current(label: impl Into<String>) -> Self {
        Self::new(label, None, ItemState::Current)
    }

    pub fn answered(label: impl Into<String>, answer: A) -> Self {
        Self::new(label, Some(answer), ItemState::Answered)
    }

    pub fn with_created_at(mut self, created_at: Option<DateTime<Utc>>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn is_draft(&self) -> bool {
        self.state == ItemState::Draft
    }

    pub fn is_answered(&self) -> bool {
        self.state == ItemState::Answered
    }

    /// Entry with the answer mapped into another representation.
    pub fn map_answer<B>(self, f: impl FnOnce(A) -> Option<B>) -> HistoryItemBase<B> {
        HistoryItemBase {
            label: self.label,
            answer: self.answer.and_then(f),
            created_at: self.created_at,
            state: self.state,
        }
    }
}

impl<A> PartialEq for HistoryItemBase<A> {
    fn eq(&self, other: &Self) -> bool {
        self.label == other.label
    }
}

impl<A> Eq for HistoryItemBase<A> {}

impl<A> Hash for HistoryItemBase<A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.label.hash(state);
    }
}

impl<A> PartialOrd for HistoryItemBase<A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Ordering is by timestamp only, so it is not consistent with label equality.
impl<A> Ord for HistoryItemBase<A> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (&self.created_at, &other.created_at) {
            (Some(a), Some(b)) => b.cmp(a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}
