//! Common test utilities for building flows and sessions.
use kotae::prelude::*;
use std::sync::Arc;

/// Shorthand for a text question used by most fixtures.
#[allow(dead_code)]
pub fn question(label: &str) -> FlowItem {
    FlowItem::question(label).expect("Invalid label")
}

/// Creates the unconditioned chain `START -> Q1 -> Q2 -> Q3 -> END` of text questions.
#[allow(dead_code)]
pub fn simple_chain() -> Flow {
    let mut flow = Flow::new(question("START"));
    flow.at("START")
        .and_then(|cursor| cursor.target(question("Q1")))
        .and_then(|cursor| cursor.target(question("Q2")))
        .and_then(|cursor| cursor.target(question("Q3")))
        .and_then(|cursor| cursor.target(question("END")))
        .expect("Failed to build chain");
    flow
}

#[allow(dead_code)]
pub fn simple_survey() -> Survey {
    Survey::init(simple_chain())
}

/// Creates a branching flow:
///
/// `START -> CONSENT` then `CONSENT -(IsYes)-> DETAILS -> END` and
/// `CONSENT -(IsNo)-> REASON -> END`.
#[allow(dead_code)]
pub fn branching_flow() -> Flow {
    let mut flow = Flow::new(question("START"));
    flow.at("START")
        .and_then(|cursor| cursor.target(FlowItem::question_bool("CONSENT")?))
        .and_then(|cursor| cursor.link_on(question("DETAILS"), IsYes))
        .and_then(|cursor| cursor.link_on(question("REASON"), IsNo))
        .expect("Failed to build branches");
    flow.at("DETAILS")
        .and_then(|cursor| cursor.target(question("END")))
        .expect("Failed to link details");
    flow.at("REASON")
        .and_then(|cursor| cursor.target(question("END")))
        .expect("Failed to link reason");
    flow
}

/// Answers `survey` once per payload.
#[allow(dead_code)]
pub fn answer_all(survey: &mut Survey, answers: &[&str]) {
    for answer in answers {
        survey.answer(*answer);
    }
}

#[allow(dead_code)]
pub fn drafts(survey: &Survey) -> usize {
    survey.history().iter().filter(|item| item.is_draft()).count()
}

#[allow(dead_code)]
pub fn committed(survey: &Survey) -> usize {
    survey.history().iter().filter(|item| !item.is_draft()).count()
}

#[allow(dead_code)]
pub fn labels(survey: &Survey) -> Vec<String> {
    survey.history().iter().map(|item| item.label.clone()).collect()
}

/// Routes on a `true` answer.
#[allow(dead_code)]
pub struct IsYes;

impl Condition for IsYes {
    fn apply(&self, answer: &Answer) -> bool {
        answer.as_bool() == Some(true)
    }

    fn label(&self) -> Option<&str> {
        Some("yes")
    }
}

/// Routes on a `false` answer.
#[allow(dead_code)]
pub struct IsNo;

impl Condition for IsNo {
    fn apply(&self, answer: &Answer) -> bool {
        answer.as_bool() == Some(false)
    }
}

/// Allows a back transition only when the stored answer was `"undo"`.
#[allow(dead_code)]
pub struct AllowsUndo;

impl Condition for AllowsUndo {
    fn apply(&self, answer: &Answer) -> bool {
        answer.as_text() == Some("undo")
    }
}

/// Imports `definition` with the fixture conditions registered.
#[allow(dead_code)]
pub fn importer() -> FlowImporter {
    FlowImporter::builder()
        .with_condition("IsYes", || IsYes)
        .with_condition("IsNo", || IsNo)
        .with_condition("AllowsUndo", || AllowsUndo)
        .build()
}

#[allow(dead_code)]
pub fn shared(flow: Flow) -> Arc<Flow> {
    Arc::new(flow)
}
