use super::Survey;
use crate::error::{FlowError, TransitionError};
use crate::flow::{FlowItem, FlowNode};
use crate::model::{Answer, ContextExchange, ItemState};
use ahash::{AHashMap, AHashSet};
use tracing::{debug, info, warn};

/// The answers a forward replay commits, computed before anything is changed.
struct ReplayPlan {
    steps: Vec<(String, Answer)>,
    target_answer: Option<Answer>,
}

impl Survey {
    /// Moves the session to `label`.
    ///
    /// If the label holds a committed history entry the session unwinds back to
    /// it and returns `Ok(false)` when a node on the way refuses the back
    /// transition. Otherwise the recorded answers are replayed from the start
    /// until the label is reached.
    pub fn transit_to(&mut self, label: &str) -> Result<bool, TransitionError> {
        if label == self.last {
            return Ok(true);
        }
        if self.flow.get_from(&self.flow_start, label).is_none() {
            return Err(FlowError::NodeNotFound {
                label: label.to_string(),
                flow: self.flow_start.clone(),
            }
            .into());
        }

        let committed = self
            .history
            .iter()
            .any(|item| item.label == label && !item.is_draft());
        if committed {
            Ok(self.unwind(label))
        } else {
            self.replay(label)?;
            Ok(true)
        }
    }

    /// Like `transit_to`, but also checks the type of the target node.
    pub fn transit_to_item(&mut self, item: &FlowItem) -> Result<bool, TransitionError> {
        if self.flow.find_from(&self.flow_start, item)?.is_none() {
            return Err(FlowError::NodeNotFound {
                label: item.label().to_string(),
                flow: self.flow_start.clone(),
            }
            .into());
        }
        self.transit_to(item.label())
    }

    /// Walks the history newest first, reverting entries until `target` is reached.
    ///
    /// Every entry on the way is checked before any is changed, so a blocked
    /// transition leaves the session as it was.
    fn unwind(&mut self, target: &str) -> bool {
        let mut discarded = Vec::new();
        let mut reverted = Vec::new();
        let mut reached = None;

        for (index, item) in self.history.iter().enumerate().rev() {
            if item.label == target {
                reached = Some(index);
                break;
            }
            if item.state == ItemState::Current && item.answer.is_none() {
                discarded.push(index);
                continue;
            }
            let allowed = item
                .answer
                .as_ref()
                .and_then(|answer| {
                    self.flow
                        .node(&item.label)
                        .and_then(|node| node.revert(answer))
                })
                .unwrap_or(self.auto_back_transition);
            if !allowed {
                warn!(label = %item.label, to = %target, "back transition blocked");
                return false;
            }
            reverted.push(index);
        }

        let origin = self.last.clone();
        for &index in &reverted {
            debug!(label = %self.history[index].label, "reverted to draft");
            self.history[index].state = ItemState::Draft;
        }
        match reached {
            Some(index) => {
                self.history[index].state = ItemState::Current;
                self.last = target.to_string();
            }
            None => {
                if let Some(&index) = reverted.last() {
                    self.last = self.history[index].label.clone();
                }
            }
        }
        // Indices were collected newest first, so earlier removals keep the rest valid.
        for index in discarded {
            self.history.remove(index);
        }
        if reached.is_none() {
            let current = self.last.clone();
            self.mark_current(&current);
        }
        info!(from = %origin, to = %self.last, "back transition completed");
        true
    }

    fn replay(&mut self, target: &str) -> Result<(), TransitionError> {
        let plan = self.plan_replay(target)?;
        let steps = plan.steps.len();
        for (label, answer) in plan.steps {
            self.mark_answered(&label, answer, false);
        }
        self.last = target.to_string();
        if let Some(answer) = plan.target_answer {
            self.mark_answered(target, answer, false);
        }
        if !self.is_ended() {
            self.mark_current(target);
        }
        info!(to = %target, steps, "forward transition completed");
        Ok(())
    }

    /// Walks the flow from the start using the recorded answers, without
    /// touching the session.
    fn plan_replay(&self, target: &str) -> Result<ReplayPlan, TransitionError> {
        let recorded: AHashMap<&str, &Answer> = self
            .history
            .iter()
            .filter_map(|item| item.answer.as_ref().map(|answer| (item.label.as_str(), answer)))
            .collect();

        let mut visited: AHashSet<&str> = AHashSet::new();
        let mut steps = Vec::new();
        let mut label = self.flow_start.as_str();
        visited.insert(label);

        while label != target {
            let unresolved = |at: &str| TransitionError::Unresolved {
                label: at.to_string(),
                target: target.to_string(),
            };
            let recorded_answer =
                recorded
                    .get(label)
                    .ok_or_else(|| TransitionError::InsufficientHistory {
                        label: label.to_string(),
                        target: target.to_string(),
                    })?;
            let node = self.flow.require(label)?;
            let answer = self
                .reparse(node, recorded_answer)
                .ok_or_else(|| unresolved(label))?;
            let next = node.answer(&answer).ok_or_else(|| unresolved(label))?;
            steps.push((label.to_string(), answer));
            if !visited.insert(next) {
                return Err(unresolved(next));
            }
            label = next;
        }

        let target_answer = match recorded.get(target) {
            Some(answer) => self.reparse(self.flow.require(target)?, answer),
            None => None,
        };
        Ok(ReplayPlan {
            steps,
            target_answer,
        })
    }

    fn reparse(&self, node: &FlowNode, answer: &Answer) -> Option<Answer> {
        let exchange = ContextExchange::new(answer.to_json())
            .with_survey(self)
            .with_target(node.label());
        node.parse(&exchange)
    }
}
