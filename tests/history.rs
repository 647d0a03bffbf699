//! Tests for persisting and resuming session histories.
mod common;
use common::*;
use kotae::prelude::*;
use std::sync::Arc;

fn assert_same_position(left: &Survey, right: &Survey) {
    assert_eq!(left.get().label(), right.get().label());
    assert_eq!(
        left.get_previous().map(FlowNode::label),
        right.get_previous().map(FlowNode::label)
    );
    assert_eq!(left.is_ended(), right.is_ended());
}

#[test]
fn test_resume_of_partial_session_is_idempotent() {
    let flow = Arc::new(simple_chain());
    let mut survey = Survey::init(flow.clone());
    answer_all(&mut survey, &["a", "b"]);

    let resumed = Survey::init_with_history(flow, survey.history().to_vec());
    assert_same_position(&survey, &resumed);
    assert_eq!(resumed.get().label(), "Q2");
    assert_eq!(resumed.get_first().label(), "START");
}

#[test]
fn test_resume_of_finished_session_is_idempotent() {
    let flow = Arc::new(simple_chain());
    let mut survey = Survey::init(flow.clone());
    answer_all(&mut survey, &["1", "2", "3", "4", "5"]);

    let resumed = Survey::init_with_history(flow, survey.history().to_vec());
    assert_same_position(&survey, &resumed);
    assert!(resumed.is_ended());
}

#[test]
fn test_resume_after_back_transition_keeps_position() {
    let flow = Arc::new(simple_chain());
    let mut survey = Survey::init(flow.clone());
    answer_all(&mut survey, &["1", "2", "3", "4", "5"]);
    assert!(survey.transit_to("Q1").expect("Failed to go back"));

    let mut resumed = Survey::init_with_history(flow, survey.history().to_vec());
    assert_same_position(&survey, &resumed);
    assert_eq!(drafts(&resumed), 3);

    // The drafts can be replayed after resuming.
    assert!(resumed.transit_to("END").expect("Failed to go forward"));
    assert!(resumed.is_ended());
}

#[test]
fn test_resumed_session_keeps_answering() {
    let flow = Arc::new(simple_chain());
    let mut survey = Survey::init(flow.clone());
    answer_all(&mut survey, &["a", "b"]);

    let mut resumed = Survey::init_with_history(flow, survey.history().to_vec());
    resumed.answer("c");
    assert_eq!(resumed.get().label(), "Q3");
    assert_eq!(resumed.history_size(), 4);
}

#[test]
fn test_history_survives_json() {
    let flow = Arc::new(branching_flow());
    let mut survey = Survey::init(flow.clone());
    answer_all(&mut survey, &["hi", "yes"]);

    let stored = serde_json::to_string(survey.history()).expect("Failed to serialize history");
    let history: Vec<HistoryItem> =
        serde_json::from_str(&stored).expect("Failed to deserialize history");
    assert_eq!(history[1].answer, Some(Answer::Bool(true)));
    assert_eq!(history[1].state, ItemState::Answered);

    let resumed = Survey::init_with_history(flow, history);
    assert_same_position(&survey, &resumed);
    assert_eq!(resumed.get().label(), "DETAILS");
}

#[test]
fn test_encoded_history_uses_node_codecs() {
    let flow = Arc::new(branching_flow());
    let mut survey = Survey::init(flow.clone());
    answer_all(&mut survey, &["hi", "yes"]);

    let encoded = survey.history_encoded().expect("Failed to encode history");
    assert_eq!(encoded[0].answer.as_deref(), Some("\"hi\""));
    assert_eq!(encoded[1].answer.as_deref(), Some("true"));
    assert_eq!(encoded[2].answer, None);
    assert_eq!(encoded[1].created_at, survey.history()[1].created_at);

    let resumed = Survey::init_with_encoded_history(flow, encoded);
    assert_same_position(&survey, &resumed);
    assert_eq!(resumed.history()[1].answer, Some(Answer::Bool(true)));
}

#[test]
fn test_undecodable_answers_are_dropped() {
    let history = vec![
        HistoryItemJson::answered("START", "\"hi\"".to_string()),
        HistoryItemJson::answered("CONSENT", "\"perhaps\"".to_string()),
        HistoryItemJson::answered("GHOST", "\"boo\"".to_string()),
    ];
    let survey = Survey::init_with_encoded_history(branching_flow(), history);
    assert_eq!(labels(&survey), vec!["START"]);
    assert_eq!(survey.get().label(), "START");
}

#[test]
fn test_unknown_and_duplicate_entries_are_dropped() {
    let history = vec![
        HistoryItem::answered("START", Answer::from("a")),
        HistoryItem::answered("GHOST", Answer::from("boo")),
        HistoryItem::current("Q1"),
        HistoryItem::answered("START", Answer::from("again")),
    ];
    let survey = Survey::init_with_history(simple_chain(), history);
    assert_eq!(labels(&survey), vec!["START", "Q1"]);
    assert_eq!(survey.history()[0].answer, Some(Answer::from("a")));
    assert_eq!(survey.get().label(), "Q1");
}

#[test]
fn test_empty_history_starts_fresh() {
    let survey = Survey::init_with_history(simple_chain(), Vec::new());
    let fresh = simple_survey();
    assert_same_position(&survey, &fresh);
    assert_eq!(survey.history_size(), 1);
    assert_eq!(survey.history()[0].state, ItemState::Current);
}

#[test]
fn test_history_may_start_mid_flow() {
    let history = vec![
        HistoryItem::answered("Q2", Answer::from("b")),
        HistoryItem::current("Q3"),
    ];
    let survey = Survey::init_with_history(simple_chain(), history);
    assert_eq!(survey.get_first().label(), "Q2");
    assert_eq!(survey.get().label(), "Q3");
    assert_eq!(survey.get_previous().map(FlowNode::label), Some("Q2"));
}

#[test]
fn test_resume_after_switching_branches_keeps_position() {
    let flow = Arc::new(branching_flow());
    let mut survey = Survey::init(flow.clone());
    answer_all(&mut survey, &["hi", "no", "busy"]);
    assert!(survey.transit_to("CONSENT").expect("Failed to go back"));
    survey.answer("yes");
    assert_eq!(survey.get().label(), "DETAILS");
    assert_eq!(survey.state_of("REASON"), Some(ItemState::Draft));

    let resumed = Survey::init_with_history(flow.clone(), survey.history().to_vec());
    assert_same_position(&survey, &resumed);

    let again = Survey::init_with_history(flow, resumed.history().to_vec());
    assert_same_position(&resumed, &again);
    assert_eq!(again.get().label(), "DETAILS");
}
