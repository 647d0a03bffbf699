use super::definition::FlowDefinition;
use crate::error::ImportError;

/// A trait for custom graph formats that can be converted into a `FlowDefinition`.
///
/// Implement it on the structs your own format parses into, then hand them to
/// `FlowImporter::import_from`.
///
/// # Example
///
/// ```rust
/// use kotae::prelude::*;
///
/// struct Step { name: String, next: Option<String> }
/// struct Script { steps: Vec<Step> }
///
/// impl IntoFlowDefinition for Script {
///     fn into_flow_definition(self) -> std::result::Result<FlowDefinition, ImportError> {
///         let mut definition = FlowDefinition::default();
///         for step in self.steps {
///             if let Some(next) = &step.next {
///                 definition.edges.push(FlowEdgeDefinition {
///                     source: step.name.clone(),
///                     target: next.clone(),
///                     condition: None,
///                 });
///             }
///             definition.nodes.push(FlowNodeDefinition {
///                 label: step.name,
///                 type_name: "Question".to_string(),
///                 back_conditions: vec![],
///                 state: None,
///             });
///         }
///         Ok(definition)
///     }
/// }
///
/// let script = Script {
///     steps: vec![
///         Step { name: "NAME".into(), next: Some("AGE".into()) },
///         Step { name: "AGE".into(), next: None },
///     ],
/// };
/// let flow = FlowImporter::builder().build().import_from(script).unwrap();
/// assert_eq!(flow.labels(), vec!["NAME", "AGE"]);
/// ```
pub trait IntoFlowDefinition {
    /// Consumes the object and converts it into a flow definition.
    fn into_flow_definition(self) -> Result<FlowDefinition, ImportError>;
}

impl IntoFlowDefinition for FlowDefinition {
    fn into_flow_definition(self) -> Result<FlowDefinition, ImportError> {
        Ok(self)
    }
}

impl IntoFlowDefinition for serde_json::Value {
    fn into_flow_definition(self) -> Result<FlowDefinition, ImportError> {
        serde_json::from_value(self).map_err(|e| ImportError::Conversion(e.to_string()))
    }
}

impl IntoFlowDefinition for &str {
    fn into_flow_definition(self) -> Result<FlowDefinition, ImportError> {
        serde_json::from_str(self).map_err(|e| ImportError::Conversion(e.to_string()))
    }
}
