//! Tests for answers, exchanges and predicates.
mod common;
use common::*;
use kotae::prelude::*;
use serde_json::json;
use std::sync::Arc;

#[test]
fn test_answer_accessors_and_display() {
    let list = Answer::List(vec!["a".to_string(), "b".to_string()]);
    assert_eq!(list.to_string(), "[a, b]");
    assert_eq!(list.as_list().map(<[String]>::len), Some(2));
    assert_eq!(list.as_text(), None);

    assert_eq!(Answer::from(true).as_bool(), Some(true));
    assert_eq!(Answer::from(7i64).as_int(), Some(7));
    assert_eq!(Answer::from("hi").to_string(), "hi");
    assert_eq!(Answer::Value(json!({"x": 1})).to_json(), json!({"x": 1}));
}

#[test]
fn test_answers_serialize_as_plain_json() {
    let answers = vec![
        Answer::Bool(false),
        Answer::Int(3),
        Answer::from("text"),
        Answer::List(vec!["x".to_string()]),
    ];
    let json = serde_json::to_value(&answers).expect("Failed to serialize answers");
    assert_eq!(json, json!([false, 3, "text", ["x"]]));

    let back: Vec<Answer> = serde_json::from_value(json).expect("Failed to deserialize answers");
    assert_eq!(back, answers);
}

#[test]
fn test_exchange_carries_payload_context_and_metadata() {
    struct Locale(&'static str);

    let mut exchange = ContextExchange::new(json!([1, 2, 3]))
        .with_context(Some(Arc::new(Locale("de"))))
        .with_target("Q1")
        .with_metadata("attempt", json!(2));
    exchange
        .metadata_mut()
        .insert("source".to_string(), json!("web"));

    assert_eq!(exchange.payload_as::<Vec<u8>>(), Some(vec![1, 2, 3]));
    assert_eq!(exchange.payload_as::<String>(), None);
    assert_eq!(exchange.context_as::<Locale>().map(|l| l.0), Some("de"));
    assert!(exchange.context_as::<String>().is_none());
    assert_eq!(exchange.target(), Some("Q1"));
    assert_eq!(exchange.metadata_as::<u32>("attempt"), Some(2));
    assert_eq!(exchange.metadata().len(), 2);
    assert!(exchange.survey().is_none());
    assert!(exchange.current().is_none());
}

#[test]
fn test_exchanges_are_distinct() {
    let first = ContextExchange::new(json!(null));
    let second = ContextExchange::new(json!(null));
    assert_ne!(first.id(), second.id());
}

#[test]
fn test_exchange_sees_the_session() {
    let mut survey = simple_survey();
    answer_all(&mut survey, &["a"]);

    let exchange = ContextExchange::new(json!("b")).with_survey(&survey);
    assert_eq!(exchange.current().map(FlowNode::label), Some("Q1"));
    assert_eq!(exchange.flow().map(FlowNode::label), Some("START"));
}

#[test]
fn test_predicates_expose_names_and_labels() {
    let named = Predicate::condition(IsYes);
    assert_eq!(named.condition_name(), Some("IsYes"));
    assert_eq!(named.label(), Some("yes"));
    assert!(named.apply(&Answer::Bool(true)));

    let unnamed = Predicate::condition(IsNo);
    assert_eq!(unnamed.label(), Some("IsNo"));

    let function = Predicate::function(|answer: &Answer| answer.as_int() == Some(1));
    assert_eq!(function.condition_name(), None);
    assert!(function.apply(&Answer::Int(1)));
    assert!(function.same(&function.clone()));
    assert!(!function.same(&Predicate::function(|_: &Answer| true)));
}
