use super::definition::{FlowDefinition, FlowEdgeDefinition, FlowNodeDefinition};
use crate::flow::Flow;
use crate::survey::Survey;

/// Walks a flow from its root and describes it as a `FlowDefinition`.
///
/// Every reachable node and every forward route is emitted exactly once, root
/// first. Bare function predicates have no name, so their edges are exported
/// without a condition.
pub struct FlowExporter<'a> {
    flow: &'a Flow,
    survey: Option<&'a Survey>,
}

impl<'a> FlowExporter<'a> {
    pub fn new(flow: &'a Flow) -> Self {
        Self { flow, survey: None }
    }

    /// Exports the flow of `survey`, annotating each node with its session state.
    pub fn for_survey(survey: &'a Survey) -> Self {
        Self {
            flow: survey.flow(),
            survey: Some(survey),
        }
    }

    pub fn export(&self) -> FlowDefinition {
        let mut definition = FlowDefinition::default();
        for label in self.flow.labels() {
            let Some(node) = self.flow.get(label) else {
                continue;
            };
            definition.nodes.push(FlowNodeDefinition {
                label: label.to_string(),
                type_name: node.type_name().to_string(),
                back_conditions: node
                    .transitions()
                    .backward_routes()
                    .filter_map(|route| route.condition_name().map(str::to_string))
                    .collect(),
                state: self.survey.and_then(|survey| survey.state_of(label)),
            });
            definition
                .edges
                .extend(node.transitions().forward_routes().filter_map(|route| {
                    Some(FlowEdgeDefinition {
                        source: label.to_string(),
                        target: route.target()?.to_string(),
                        condition: route.condition_name().map(str::to_string),
                    })
                }));
        }
        definition
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.export())
    }
}
