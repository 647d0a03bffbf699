//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the kotae crate.
//! Import this module to get access to the core functionality without having to import
//! each type individually.
//!
//! # Example
//!
//! ```rust
//! use kotae::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let mut flow = Flow::new(FlowItem::question_int("AGE")?);
//! flow.at("AGE")?.target(FlowItem::question("DONE")?)?;
//!
//! let mut survey = Survey::init(flow);
//! survey.answer(42);
//! assert_eq!(survey.get().label(), "DONE");
//! # Ok(())
//! # }
//! # run_example().unwrap();
//! ```

// Graph building
pub use crate::flow::{Flow, FlowCursor, FlowItem, FlowNode, TransitionSet};

// Answers, conditions and history
pub use crate::model::{
    Answer, AnswerKind, AnswerParser, Condition, ContextExchange, HistoryItem, HistoryItemBase,
    HistoryItemJson, ItemState, Predicate, Route,
};

// Sessions
pub use crate::survey::Survey;

// Export and import
pub use crate::export::{
    FlowDefinition, FlowEdgeDefinition, FlowExporter, FlowImporter, FlowImporterBuilder,
    FlowNodeDefinition, IntoFlowDefinition,
};

// Error types
pub use crate::error::{FlowError, ImportError, TransitionError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
