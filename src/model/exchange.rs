use crate::flow::FlowNode;
use crate::survey::Survey;
use ahash::AHashMap;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::any::Any;
use std::sync::Arc;
use uuid::Uuid;

/// Carries a raw answer payload into a node's parse hook.
///
/// Besides the payload, an exchange gives the parser access to the session it
/// was created from, an arbitrary caller context, the node being targeted, and
/// free-form metadata.
pub struct ContextExchange<'a> {
    id: Uuid,
    created_at: DateTime<Utc>,
    payload: Value,
    survey: Option<&'a Survey>,
    context: Option<Arc<dyn Any + Send + Sync>>,
    target: Option<String>,
    metadata: AHashMap<String, Value>,
}

impl<'a> ContextExchange<'a> {
    pub fn new(payload: Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            payload,
            survey: None,
            context: None,
            target: None,
            metadata: AHashMap::new(),
        }
    }

    pub fn with_survey(mut self, survey: &'a Survey) -> Self {
        self.survey = Some(survey);
        self
    }

    pub fn with_context(mut self, context: Option<Arc<dyn Any + Send + Sync>>) -> Self {
        self.context = context;
        self
    }

    pub fn with_target(mut self, label: impl Into<String>) -> Self {
        self.target = Some(label.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    /// The payload deserialized into `T`, if it has that shape.
    pub fn payload_as<T: DeserializeOwned>(&self) -> Option<T> {
        serde_json::from_value(self.payload.clone()).ok()
    }

    pub fn survey(&self) -> Option<&'a Survey> {
        self.survey
    }

    pub fn context(&self) -> Option<&(dyn Any + Send + Sync)> {
        self.context.as_deref()
    }

    pub fn context_as<T: Any>(&self) -> Option<&T> {
        self.context.as_deref().and_then(|ctx| ctx.downcast_ref::<T>())
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn metadata(&self) -> &AHashMap<String, Value> {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut AHashMap<String, Value> {
        &mut self.metadata
    }

    pub fn metadata_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.metadata
            .get(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// Current position of the originating session.
    pub fn current(&self) -> Option<&'a FlowNode> {
        self.survey.map(Survey::get)
    }

    /// Start node of the originating session.
    pub fn flow(&self) -> Option<&'a FlowNode> {
        self.survey.map(Survey::get_first)
    }
}
