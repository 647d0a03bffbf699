use super::conversion::IntoFlowDefinition;
use super::definition::{FlowDefinition, FlowEdgeDefinition};
use crate::error::ImportError;
use crate::flow::{Flow, FlowItem};
use crate::model::{AnswerKind, AnswerParser, Condition, Predicate};
use ahash::AHashMap;
use std::sync::Arc;
use tracing::debug;

type KindFactory = Arc<dyn Fn() -> AnswerKind + Send + Sync>;
type ConditionFactory = Arc<dyn Fn() -> Arc<dyn Condition> + Send + Sync>;

/// Rebuilds flows from `FlowDefinition`s.
///
/// Type names and condition names are resolved through an explicit registry.
/// The graph is built with the same cursor calls a hand-written flow uses.
#[derive(Clone)]
pub struct FlowImporter {
    kinds: AHashMap<String, KindFactory>,
    conditions: AHashMap<String, ConditionFactory>,
}

pub struct FlowImporterBuilder {
    kinds: AHashMap<String, KindFactory>,
    conditions: AHashMap<String, ConditionFactory>,
}

impl FlowImporterBuilder {
    /// A builder with the built-in kinds registered.
    pub fn new() -> Self {
        let mut kinds: AHashMap<String, KindFactory> = AHashMap::new();
        for kind in AnswerKind::builtins() {
            let name = kind.type_name().to_string();
            kinds.insert(name, Arc::new(move || kind.clone()));
        }
        Self {
            kinds,
            conditions: AHashMap::new(),
        }
    }

    /// Maps a type name of a foreign format onto a built-in kind.
    pub fn with_type_mapping(mut self, user_type_name: &str, kotae_type_name: &str) -> Self {
        if let Some(kind) = AnswerKind::builtin(kotae_type_name) {
            self.kinds
                .insert(user_type_name.to_string(), Arc::new(move || kind.clone()));
        }
        self
    }

    pub fn with_type<F>(mut self, type_name: &str, factory: F) -> Self
    where
        F: Fn() -> AnswerKind + Send + Sync + 'static,
    {
        self.kinds.insert(type_name.to_string(), Arc::new(factory));
        self
    }

    /// Registers a custom parser under its own type name.
    pub fn with_parser<P: AnswerParser + 'static>(mut self, parser: P) -> Self {
        let kind = AnswerKind::custom(parser);
        let name = kind.type_name().to_string();
        self.kinds.insert(name, Arc::new(move || kind.clone()));
        self
    }

    /// Registers a condition; every edge using it gets a fresh instance.
    pub fn with_condition<C, F>(mut self, name: &str, factory: F) -> Self
    where
        C: Condition + 'static,
        F: Fn() -> C + Send + Sync + 'static,
    {
        self.conditions.insert(
            condition_key(name),
            Arc::new(move || Arc::new(factory()) as Arc<dyn Condition>),
        );
        self
    }

    pub fn build(self) -> FlowImporter {
        FlowImporter {
            kinds: self.kinds,
            conditions: self.conditions,
        }
    }
}

impl Default for FlowImporterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn condition_key(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

impl FlowImporter {
    pub fn builder() -> FlowImporterBuilder {
        FlowImporterBuilder::new()
    }

    pub fn import_from<T: IntoFlowDefinition>(&self, source: T) -> Result<Flow, ImportError> {
        self.import(&source.into_flow_definition()?)
    }

    pub fn import(&self, definition: &FlowDefinition) -> Result<Flow, ImportError> {
        let root = definition.root().ok_or(ImportError::EmptyDefinition)?;

        let mut items: AHashMap<&str, FlowItem> = AHashMap::new();
        for node in &definition.nodes {
            let factory =
                self.kinds
                    .get(&node.type_name)
                    .ok_or_else(|| ImportError::UnknownType {
                        label: node.label.clone(),
                        type_name: node.type_name.clone(),
                    })?;
            items.insert(&node.label, FlowItem::new(node.label.clone(), factory())?);
        }

        for edge in &definition.edges {
            for label in [&edge.source, &edge.target] {
                if !items.contains_key(label.as_str()) {
                    return Err(ImportError::UnknownNode {
                        missing: label.to_string(),
                        source_label: edge.source.clone(),
                    });
                }
            }
            if let Some(name) = &edge.condition {
                self.condition(name)?;
            }
        }
        for node in &definition.nodes {
            for name in &node.back_conditions {
                self.condition(name)?;
            }
        }

        let mut flow = Flow::new(items[root.label.as_str()].clone());
        let mut pending: Vec<&FlowEdgeDefinition> = definition.edges.iter().collect();
        while !pending.is_empty() {
            let before = pending.len();
            let mut deferred = Vec::new();
            for edge in pending {
                if flow.contains(&edge.source) {
                    flow.at(&edge.source)?
                        .link_with(items[edge.target.as_str()].clone(), self.predicate(edge)?)?;
                } else if flow.contains(&edge.target) {
                    let mut partial = Flow::new(items[edge.source.as_str()].clone());
                    partial
                        .at(&edge.source)?
                        .link_with(items[edge.target.as_str()].clone(), self.predicate(edge)?)?;
                    flow.merge(partial)?;
                } else {
                    deferred.push(edge);
                }
            }
            if deferred.len() == before {
                return Err(ImportError::Unreachable {
                    label: deferred[0].source.clone(),
                    root: root.label.clone(),
                });
            }
            pending = deferred;
        }

        for node in &definition.nodes {
            if !flow.contains(&node.label) {
                return Err(ImportError::Unreachable {
                    label: node.label.clone(),
                    root: root.label.clone(),
                });
            }
            let mut cursor = flow.at(&node.label)?;
            for name in &node.back_conditions {
                cursor = cursor.on_back_with(Predicate::Condition(self.condition(name)?));
            }
        }

        debug!(root = %root.label, nodes = definition.nodes.len(), edges = definition.edges.len(), "imported flow");
        Ok(flow)
    }

    fn condition(&self, name: &str) -> Result<Arc<dyn Condition>, ImportError> {
        self.conditions
            .get(&condition_key(name))
            .map(|factory| factory())
            .ok_or_else(|| ImportError::UnknownCondition(name.to_string()))
    }

    fn predicate(&self, edge: &FlowEdgeDefinition) -> Result<Option<Predicate>, ImportError> {
        edge.condition
            .as_deref()
            .map(|name| self.condition(name).map(Predicate::Condition))
            .transpose()
    }
}
