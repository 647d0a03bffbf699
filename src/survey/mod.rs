//! Sessions walking a flow.
//!
//! A `Survey` keeps the current position and the answer history of one session.
//! The flow itself is shared read-only through an `Arc`, so any number of
//! sessions may run against the same graph.

mod transition;

use crate::error::FlowError;
use crate::flow::{Flow, FlowNode};
use crate::model::{Answer, ContextExchange, HistoryItem, HistoryItemJson, ItemState};
use chrono::Utc;
use itertools::Itertools;
use serde_json::Value;
use std::any::Any;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct Survey {
    flow: Arc<Flow>,
    flow_start: String,
    last: String,
    history: Vec<HistoryItem>,
    auto_back_transition: bool,
}

impl Survey {
    /// Starts a session at the root of `flow`.
    pub fn init(flow: impl Into<Arc<Flow>>) -> Self {
        let flow = flow.into();
        let start = flow.root_label().to_string();
        Self::started(flow, start)
    }

    /// Starts a session at any node of `flow`.
    pub fn init_at(flow: impl Into<Arc<Flow>>, label: &str) -> Result<Self, FlowError> {
        let flow = flow.into();
        flow.require(label)?;
        Ok(Self::started(flow, label.to_string()))
    }

    /// Resumes a session from a previously captured history.
    ///
    /// Entries whose label is not part of the flow are dropped. The session
    /// resumes at the entry marked current, else at the first entry that is not
    /// answered, else at the last entry, and starts at the node of the first entry.
    pub fn init_with_history<I>(flow: impl Into<Arc<Flow>>, history: I) -> Self
    where
        I: IntoIterator<Item = HistoryItem>,
    {
        let flow = flow.into();
        let mut resumed: Vec<HistoryItem> = Vec::new();
        for item in history {
            if !flow.contains(&item.label) {
                warn!(label = %item.label, flow = %flow.root_label(), "dropping history item not found in flow");
                continue;
            }
            if resumed.iter().any(|existing| existing == &item) {
                warn!(label = %item.label, "dropping duplicate history item");
                continue;
            }
            resumed.push(item);
        }

        let Some(first) = resumed.first() else {
            return Self::init(flow);
        };
        let flow_start = first.label.clone();
        let last = resumed
            .iter()
            .find(|item| item.state == ItemState::Current)
            .or_else(|| resumed.iter().find(|item| !item.is_answered()))
            .or(resumed.last())
            .map(|item| item.label.clone())
            .unwrap_or_else(|| flow_start.clone());

        debug!(start = %flow_start, last = %last, entries = resumed.len(), "resumed survey from history");
        Self {
            flow,
            flow_start,
            last,
            history: resumed,
            auto_back_transition: true,
        }
    }

    /// Resumes a session from a history whose answers are in their persisted text form.
    ///
    /// Each answer is decoded with the codec of its node; entries that fail to
    /// decode are dropped.
    pub fn init_with_encoded_history<I>(flow: impl Into<Arc<Flow>>, history: I) -> Self
    where
        I: IntoIterator<Item = HistoryItemJson>,
    {
        let flow = flow.into();
        let decoded: Vec<HistoryItem> = history
            .into_iter()
            .filter_map(|item| {
                let Some(node) = flow.get(&item.label) else {
                    warn!(label = %item.label, "dropping history item not found in flow");
                    return None;
                };
                let decoded = match &item.answer {
                    None => None,
                    Some(raw) => {
                        let Some(answer) = node.kind().decode(raw) else {
                            warn!(label = %item.label, "dropping history item with undecodable answer");
                            return None;
                        };
                        Some(answer)
                    }
                };
                Some(item.map_answer(|_| decoded))
            })
            .collect();
        Self::init_with_history(flow, decoded)
    }

    fn started(flow: Arc<Flow>, start: String) -> Self {
        let mut survey = Self {
            flow,
            flow_start: start.clone(),
            last: start.clone(),
            history: Vec::new(),
            auto_back_transition: true,
        };
        survey.mark_current(&start);
        survey
    }

    /// Answers the current node.
    ///
    /// A payload the node cannot parse is stored as a draft and the session stays
    /// where it is.
    pub fn answer(&mut self, payload: impl Into<Value>) -> &mut Self {
        self.apply_answer(payload.into(), None)
    }

    /// Answers the current node, handing `context` to the node's parse hook.
    pub fn answer_with_context(
        &mut self,
        payload: impl Into<Value>,
        context: Arc<dyn Any + Send + Sync>,
    ) -> &mut Self {
        self.apply_answer(payload.into(), Some(context))
    }

    fn apply_answer(
        &mut self,
        payload: Value,
        context: Option<Arc<dyn Any + Send + Sync>>,
    ) -> &mut Self {
        let label = self.last.clone();
        let (parsed, next) = {
            let node = self.get();
            let exchange = ContextExchange::new(payload.clone())
                .with_survey(self)
                .with_context(context)
                .with_target(label.clone());
            let parsed = node.parse(&exchange);
            let next = parsed
                .as_ref()
                .and_then(|answer| node.answer(answer))
                .map(str::to_string);
            (parsed, next)
        };

        let Some(answer) = parsed else {
            debug!(label = %label, "answer could not be parsed, keeping it as draft");
            let entry = self.entry_mut(&label);
            entry.answer = Some(Answer::Value(payload));
            entry.state = ItemState::Draft;
            return self;
        };

        debug!(label = %label, answer = %answer, next = ?next, "answered");
        self.mark_answered(&label, answer, true);
        if let Some(next) = next {
            self.last = next;
            if !self.is_ended() {
                let current = self.last.clone();
                self.mark_current(&current);
            }
        }
        self
    }

    /// The node the session is positioned on.
    pub fn get(&self) -> &FlowNode {
        self.flow
            .node(&self.last)
            .unwrap_or_else(|| self.flow.root())
    }

    /// Looks up a node of the session's flow.
    pub fn get_label(&self, label: &str) -> Option<&FlowNode> {
        self.flow.get_from(&self.flow_start, label)
    }

    /// The node the session started at.
    pub fn get_first(&self) -> &FlowNode {
        self.flow
            .node(&self.flow_start)
            .unwrap_or_else(|| self.flow.root())
    }

    /// The first parent of the current node whose entry is answered.
    pub fn get_previous(&self) -> Option<&FlowNode> {
        self.get()
            .parents()
            .find(|parent| {
                self.history
                    .iter()
                    .any(|item| item.label == *parent && item.is_answered())
            })
            .and_then(|parent| self.flow.node(parent))
    }

    /// True once the current node has no forward route and its entry is answered.
    pub fn is_ended(&self) -> bool {
        !self.get().has_targets()
            && self
                .history
                .iter()
                .any(|item| item.label == self.last && item.is_answered())
    }

    pub fn flow(&self) -> &Arc<Flow> {
        &self.flow
    }

    pub fn history(&self) -> &[HistoryItem] {
        &self.history
    }

    pub fn history_size(&self) -> usize {
        self.history.len()
    }

    /// The answer recorded for `label`, if its entry is answered.
    pub fn answer_of(&self, label: &str) -> Result<&Answer, FlowError> {
        self.history
            .iter()
            .find(|item| item.label == label && item.is_answered())
            .and_then(|item| item.answer.as_ref())
            .ok_or_else(|| FlowError::NotInHistory {
                label: label.to_string(),
                flow: self.flow_start.clone(),
            })
    }

    /// The history with every answer encoded by the codec of its node.
    pub fn history_encoded(&self) -> Result<Vec<HistoryItemJson>, FlowError> {
        self.history
            .iter()
            .map(|item| {
                let node = self.flow.require(&item.label)?;
                let answer = item
                    .answer
                    .as_ref()
                    .map(|answer| node.kind().encode(answer))
                    .transpose()
                    .map_err(|e| FlowError::Codec {
                        label: item.label.clone(),
                        message: e.to_string(),
                    })?;
                Ok(HistoryItemJson {
                    label: item.label.clone(),
                    answer,
                    created_at: item.created_at,
                    state: item.state,
                })
            })
            .collect()
    }

    /// Milliseconds between consecutive committed answers, newest first.
    ///
    /// Each pair is keyed by the label of the more recent answer.
    pub fn durations_ms(&self) -> Vec<(String, i64)> {
        self.history
            .iter()
            .filter(|item| item.is_answered() && item.created_at.is_some())
            .sorted()
            .tuple_windows()
            .filter_map(|(newer, older)| {
                let gap = newer.created_at? - older.created_at?;
                Some((newer.label.clone(), gap.num_milliseconds()))
            })
            .collect()
    }

    pub fn auto_back_transition(&self) -> bool {
        self.auto_back_transition
    }

    /// Whether nodes without backward routes may be reverted by a back transition.
    pub fn set_auto_back_transition(&mut self, enabled: bool) -> &mut Self {
        self.auto_back_transition = enabled;
        self
    }

    /// Lifecycle state of `label` in this session, for diagram styling.
    pub fn state_of(&self, label: &str) -> Option<ItemState> {
        if label == self.last {
            return Some(ItemState::Current);
        }
        self.history
            .iter()
            .find(|item| item.label == label)
            .map(|item| item.state)
    }

    fn entry_mut(&mut self, label: &str) -> &mut HistoryItem {
        let index = match self.history.iter().position(|item| item.label == label) {
            Some(index) => index,
            None => {
                self.history
                    .push(HistoryItem::new(label, None, ItemState::Current));
                self.history.len() - 1
            }
        };
        &mut self.history[index]
    }

    fn mark_current(&mut self, label: &str) {
        self.entry_mut(label).state = ItemState::Current;
    }

    /// Stores `answer` as committed; the timestamp is only refreshed when
    /// `refresh` is set or the entry had no answer yet.
    fn mark_answered(&mut self, label: &str, answer: Answer, refresh: bool) {
        let entry = self.entry_mut(label);
        if refresh || entry.answer.is_none() {
            entry.created_at = Some(Utc::now());
        }
        entry.state = ItemState::Answered;
        entry.answer = Some(answer);
    }
}
