use super::{FlowItem, TransitionSet};
use crate::model::{Answer, AnswerKind, ContextExchange, HistoryItemBase, Route};

/// A labeled, typed vertex of a flow.
///
/// Nodes live in the arena of their `Flow`. Routes point to targets by label and
/// `parents` lists the labels of the nodes that route to this one.
#[derive(Debug, Clone)]
pub struct FlowNode {
    label: String,
    kind: AnswerKind,
    transitions: TransitionSet,
    parents: Vec<String>,
}

impl FlowNode {
    pub(crate) fn new(item: FlowItem) -> Self {
        let (label, kind) = item.into_parts();
        Self {
            label,
            kind,
            transitions: TransitionSet::new(),
            parents: Vec::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> &AnswerKind {
        &self.kind
    }

    pub fn type_name(&self) -> &str {
        self.kind.type_name()
    }

    /// The detached descriptor of this node.
    pub fn item(&self) -> FlowItem {
        FlowItem::from_parts(self.label.clone(), self.kind.clone())
    }

    pub fn transitions(&self) -> &TransitionSet {
        &self.transitions
    }

    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.transitions.iter()
    }

    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.transitions.forward_targets()
    }

    pub fn has_targets(&self) -> bool {
        self.transitions.forward_routes().next().is_some()
    }

    pub fn parents(&self) -> impl Iterator<Item = &str> {
        self.parents.iter().map(String::as_str)
    }

    pub fn is_same_type(&self, item: &FlowItem) -> bool {
        self.kind.same_type(item.kind())
    }

    pub fn matches<A>(&self, entry: &HistoryItemBase<A>) -> bool {
        entry.label == self.label
    }

    /// Runs the kind's parse hook on the exchange payload.
    pub fn parse(&self, exchange: &ContextExchange<'_>) -> Option<Answer> {
        self.kind.parse(exchange)
    }

    /// Label of the next node for `answer`.
    ///
    /// Conditioned forward routes are tried first, in insertion order; the
    /// unconditioned route is the fallback.
    pub fn answer(&self, answer: &Answer) -> Option<&str> {
        self.transitions
            .forward_routes()
            .filter(|route| route.has_condition())
            .find(|route| route.apply(answer))
            .or_else(|| {
                self.transitions
                    .forward_routes()
                    .find(|route| !route.has_condition())
            })
            .and_then(Route::target)
    }

    /// Whether a back transition over this node is allowed for `answer`.
    ///
    /// `None` when the node has no backward route, `Some(false)` when backward
    /// routes exist but none applies.
    pub fn revert(&self, answer: &Answer) -> Option<bool> {
        let mut routes = self.transitions.backward_routes().peekable();
        routes.peek()?;
        Some(routes.any(|route| route.apply(answer)))
    }

    pub(crate) fn transitions_mut(&mut self) -> &mut TransitionSet {
        &mut self.transitions
    }

    pub(crate) fn add_parent(&mut self, parent: &str) {
        if !self.parents.iter().any(|existing| existing == parent) {
            self.parents.push(parent.to_string());
        }
    }

    pub(crate) fn remove_parent(&mut self, parent: &str) {
        self.parents.retain(|existing| existing != parent);
    }

    /// Folds the routes and parents of a same-labeled node into this one.
    pub(crate) fn merge(&mut self, other: &FlowNode) {
        self.transitions.merge(&other.transitions);
        for parent in &other.parents {
            self.add_parent(parent);
        }
    }
}
