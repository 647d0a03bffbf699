//! The flow graph: an arena of labeled nodes connected by routes.
//!
//! A `Flow` owns every node reachable from its root. Nodes refer to each other by
//! label only, so linking two partial graphs is a merge of two arenas: nodes that
//! share a label with a node already reachable from the link source are folded
//! into that node, everything else is moved over.

mod node;
mod transitions;

pub use node::FlowNode;
pub use transitions::TransitionSet;

use crate::error::FlowError;
use crate::model::{Answer, AnswerKind, AnswerParser, Condition, Predicate, Route};
use ahash::{AHashMap, AHashSet};
use tracing::debug;

/// A detached node descriptor: a validated label and an answer kind.
///
/// Items are the building blocks handed to `Flow::new` and to the cursor's
/// `target`/`link` calls. Two items are equal when their labels are equal.
#[derive(Debug, Clone)]
pub struct FlowItem {
    label: String,
    kind: AnswerKind,
}

impl FlowItem {
    pub fn new(label: impl Into<String>, kind: AnswerKind) -> Result<Self, FlowError> {
        let label = label.into();
        if !is_valid_label(&label) {
            return Err(FlowError::InvalidLabel(label));
        }
        Ok(Self { label, kind })
    }

    pub fn question(label: impl Into<String>) -> Result<Self, FlowError> {
        Self::new(label, AnswerKind::Text)
    }

    pub fn question_bool(label: impl Into<String>) -> Result<Self, FlowError> {
        Self::new(label, AnswerKind::Bool)
    }

    pub fn question_int(label: impl Into<String>) -> Result<Self, FlowError> {
        Self::new(label, AnswerKind::Int)
    }

    pub fn question_long(label: impl Into<String>) -> Result<Self, FlowError> {
        Self::new(label, AnswerKind::Long)
    }

    pub fn question_list(label: impl Into<String>) -> Result<Self, FlowError> {
        Self::new(label, AnswerKind::List)
    }

    pub fn custom<P: AnswerParser + 'static>(
        label: impl Into<String>,
        parser: P,
    ) -> Result<Self, FlowError> {
        Self::new(label, AnswerKind::custom(parser))
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

    pub(crate) fn from_parts(label: String, kind: AnswerKind) -> Self {
        Self { label, kind }
    }

    pub(crate) fn into_parts(self) -> (String, AnswerKind) {
        (self.label, self.kind)
    }
}

impl PartialEq for FlowItem {
    fn eq(&self, other: &Self) -> bool {
        self.label == other.label
    }
}

impl Eq for FlowItem {}

fn is_valid_label(label: &str) -> bool {
    label
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

/// A flow graph rooted at one node.
///
/// Lookups only see nodes reachable from the root, following forward targets and
/// parent links. Arena slots left unreachable by a replaced route are reused when
/// the same label is linked again.
#[derive(Debug, Clone)]
pub struct Flow {
    root: String,
    nodes: AHashMap<String, FlowNode>,
}

impl Flow {
    pub fn new(root: FlowItem) -> Self {
        let label = root.label().to_string();
        let mut nodes = AHashMap::new();
        nodes.insert(label.clone(), FlowNode::new(root));
        Self { root: label, nodes }
    }

    pub fn root(&self) -> &FlowNode {
        &self.nodes[self.root.as_str()]
    }

    pub fn root_label(&self) -> &str {
        &self.root
    }

    /// Labels reachable from the root, in depth-first order starting at the root.
    pub fn labels(&self) -> Vec<&str> {
        self.reachable(&self.root)
    }

    pub fn len(&self) -> usize {
        self.labels().len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels().is_empty()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.get(label).is_some()
    }

    /// Looks up a node reachable from the root.
    pub fn get(&self, label: &str) -> Option<&FlowNode> {
        self.search(&self.root, label)
    }

    /// Looks up a node reachable from `from`.
    pub fn get_from(&self, from: &str, label: &str) -> Option<&FlowNode> {
        self.search(from, label)
    }

    /// Like `get`, but fails when the label is missing.
    pub fn require(&self, label: &str) -> Result<&FlowNode, FlowError> {
        self.get(label).ok_or_else(|| FlowError::NodeNotFound {
            label: label.to_string(),
            flow: self.root.clone(),
        })
    }

    /// Looks up the node for `item`, checking that it has the item's type.
    pub fn find(&self, item: &FlowItem) -> Result<Option<&FlowNode>, FlowError> {
        self.find_from(&self.root, item)
    }

    pub fn find_from(&self, from: &str, item: &FlowItem) -> Result<Option<&FlowNode>, FlowError> {
        match self.search(from, item.label()) {
            Some(node) if !node.is_same_type(item) => Err(FlowError::TypeMismatch {
                label: item.label().to_string(),
                defined: node.type_name().to_string(),
                requested: item.type_name().to_string(),
            }),
            found => Ok(found),
        }
    }

    /// A building cursor positioned on `label`.
    pub fn at(&mut self, label: &str) -> Result<FlowCursor<'_>, FlowError> {
        self.require(label)?;
        Ok(FlowCursor {
            flow: self,
            label: label.to_string(),
        })
    }

    /// Merges a partial graph that shares at least one label with this flow.
    ///
    /// Nothing is changed when a shared label has a different type.
    pub fn merge(&mut self, other: impl Into<Flow>) -> Result<(), FlowError> {
        let other = other.into();
        let known = self.reachable_owned(&self.root);
        if !other.labels().iter().any(|label| known.contains(*label)) {
            return Err(FlowError::NodeNotFound {
                label: other.root.clone(),
                flow: self.root.clone(),
            });
        }
        self.check_types(&known, &other)?;
        self.absorb(&known, other);
        Ok(())
    }

    /// Depth-first walk over forward targets and parents, each label once.
    pub fn reachable<'a>(&'a self, from: &str) -> Vec<&'a str> {
        let mut visited: AHashSet<&str> = AHashSet::new();
        let mut order = Vec::new();
        let mut stack = vec![from];
        while let Some(label) = stack.pop() {
            let Some(node) = self.nodes.get(label) else {
                continue;
            };
            if !visited.insert(node.label()) {
                continue;
            }
            order.push(node.label());
            let next: Vec<&str> = node.targets().chain(node.parents()).collect();
            stack.extend(next.into_iter().rev());
        }
        order
    }

    pub(crate) fn node(&self, label: &str) -> Option<&FlowNode> {
        self.nodes.get(label)
    }

    fn search<'a>(&'a self, from: &str, label: &str) -> Option<&'a FlowNode> {
        let mut visited: AHashSet<&str> = AHashSet::new();
        let mut stack = vec![from];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get(current) else {
                continue;
            };
            if node.label() == label {
                return Some(node);
            }
            if visited.insert(node.label()) {
                stack.extend(node.targets().chain(node.parents()));
            }
        }
        None
    }

    fn reachable_owned(&self, from: &str) -> AHashSet<String> {
        self.reachable(from)
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    fn into_reachable_nodes(mut self) -> Vec<FlowNode> {
        let labels: Vec<String> = self
            .labels()
            .into_iter()
            .map(str::to_string)
            .collect();
        labels
            .iter()
            .filter_map(|label| self.nodes.remove(label))
            .collect()
    }

    fn check_types(&self, known: &AHashSet<String>, other: &Flow) -> Result<(), FlowError> {
        for label in other.labels() {
            let (Some(existing), Some(incoming)) = (self.nodes.get(label), other.nodes.get(label))
            else {
                continue;
            };
            if known.contains(label) && !existing.kind().same_type(incoming.kind()) {
                return Err(FlowError::TypeMismatch {
                    label: label.to_string(),
                    defined: existing.type_name().to_string(),
                    requested: incoming.type_name().to_string(),
                });
            }
        }
        Ok(())
    }

    fn absorb(&mut self, known: &AHashSet<String>, other: Flow) {
        for node in other.into_reachable_nodes() {
            match self.nodes.get_mut(node.label()) {
                Some(existing) if known.contains(node.label()) => {
                    debug!(label = %node.label(), "merging flow item into existing node");
                    existing.merge(&node);
                }
                _ => {
                    self.nodes.insert(node.label().to_string(), node);
                }
            }
        }
    }

    /// Links `source` to the root of `next` and returns the canonical target label.
    fn link(
        &mut self,
        source: &str,
        next: Flow,
        predicate: Option<Predicate>,
    ) -> Result<String, FlowError> {
        let target = next.root.clone();
        let known = self.reachable_owned(source);
        self.check_types(&known, &next)?;

        if predicate.is_none() {
            let stale = match self.nodes.get_mut(source) {
                Some(node) => node.transitions_mut().remove_unconditioned(false),
                None => Vec::new(),
            };
            for old in stale {
                debug!(source = %source, to = %old, "replacing unconditioned route");
                self.detach(source, &old);
            }
        }

        self.absorb(&known, next);

        let displaced = match self.nodes.get_mut(source) {
            Some(node) => node
                .transitions_mut()
                .insert(Route::forward(target.clone(), predicate)),
            None => None,
        };
        if let Some(old) = displaced {
            self.detach(source, &old);
        }
        if let Some(node) = self.nodes.get_mut(&target) {
            node.add_parent(source);
        }
        debug!(source = %source, to = %target, "linked flow item");
        Ok(target)
    }

    fn add_back_route(&mut self, label: &str, predicate: Predicate) {
        if let Some(node) = self.nodes.get_mut(label) {
            node.transitions_mut().insert(Route::backward(predicate));
        }
    }

    /// Drops `source` from the parents of `target` unless a route still connects them.
    fn detach(&mut self, source: &str, target: &str) {
        let still_linked = self
            .nodes
            .get(source)
            .is_some_and(|node| node.transitions().targets(target));
        if still_linked {
            return;
        }
        if let Some(node) = self.nodes.get_mut(target) {
            node.remove_parent(source);
        }
    }
}

impl From<FlowItem> for Flow {
    fn from(item: FlowItem) -> Self {
        Flow::new(item)
    }
}

/// Fluent builder positioned on one node of a flow.
///
/// `target*` calls move the cursor to the canonical target so chains read
/// depth first; `link*` calls stay on the current node.
pub struct FlowCursor<'a> {
    flow: &'a mut Flow,
    label: String,
}

impl<'a> FlowCursor<'a> {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn node(&self) -> &FlowNode {
        &self.flow.nodes[self.label.as_str()]
    }

    pub fn target(self, next: impl Into<Flow>) -> Result<Self, FlowError> {
        self.target_with(next, None)
    }

    pub fn target_when<F>(self, next: impl Into<Flow>, condition: F) -> Result<Self, FlowError>
    where
        F: Fn(&Answer) -> bool + Send + Sync + 'static,
    {
        self.target_with(next, Some(Predicate::function(condition)))
    }

    pub fn target_on<C: Condition + 'static>(
        self,
        next: impl Into<Flow>,
        condition: C,
    ) -> Result<Self, FlowError> {
        self.target_with(next, Some(Predicate::condition(condition)))
    }

    pub fn target_with(
        self,
        next: impl Into<Flow>,
        predicate: Option<Predicate>,
    ) -> Result<Self, FlowError> {
        let label = self.flow.link(&self.label, next.into(), predicate)?;
        Ok(FlowCursor {
            flow: self.flow,
            label,
        })
    }

    pub fn link(self, next: impl Into<Flow>) -> Result<Self, FlowError> {
        self.link_with(next, None)
    }

    pub fn link_when<F>(self, next: impl Into<Flow>, condition: F) -> Result<Self, FlowError>
    where
        F: Fn(&Answer) -> bool + Send + Sync + 'static,
    {
        self.link_with(next, Some(Predicate::function(condition)))
    }

    pub fn link_on<C: Condition + 'static>(
        self,
        next: impl Into<Flow>,
        condition: C,
    ) -> Result<Self, FlowError> {
        self.link_with(next, Some(Predicate::condition(condition)))
    }

    pub fn link_with(
        self,
        next: impl Into<Flow>,
        predicate: Option<Predicate>,
    ) -> Result<Self, FlowError> {
        self.flow.link(&self.label, next.into(), predicate)?;
        Ok(self)
    }

    /// Gates back transitions over this node with a bare function.
    pub fn on_back_when<F>(self, condition: F) -> Self
    where
        F: Fn(&Answer) -> bool + Send + Sync + 'static,
    {
        self.on_back_with(Predicate::function(condition))
    }

    pub fn on_back<C: Condition + 'static>(self, condition: C) -> Self {
        self.on_back_with(Predicate::condition(condition))
    }

    pub fn on_back_with(self, predicate: Predicate) -> Self {
        self.flow.add_back_route(&self.label, predicate);
        self
    }

    /// Moves the cursor to another node of the same flow.
    pub fn at(self, label: &str) -> Result<FlowCursor<'a>, FlowError> {
        let flow = self.flow;
        flow.require(label)?;
        Ok(FlowCursor {
            flow,
            label: label.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_validated() {
        assert!(FlowItem::question("Q_1").is_ok());
        assert!(FlowItem::question("").is_ok());
        assert_eq!(
            FlowItem::question("q1"),
            Err(FlowError::InvalidLabel("q1".to_string()))
        );
        assert!(FlowItem::question("Q-1").is_err());
    }

    #[test]
    fn reachable_walks_targets_and_parents_once() {
        let mut flow = Flow::new(FlowItem::question("A").unwrap());
        flow.at("A")
            .unwrap()
            .target(FlowItem::question("B").unwrap())
            .unwrap()
            .target(FlowItem::question("A").unwrap())
            .unwrap();
        assert_eq!(flow.labels(), vec!["A", "B"]);
        assert_eq!(flow.reachable("B"), vec!["B", "A"]);
    }
}
