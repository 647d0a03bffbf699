//! # Kotae - Branching Question Flows with Resumable Sessions
//!
//! **Kotae** builds branching question/answer flows (directed, possibly cyclic
//! graphs of typed questions connected by conditional routes) and drives
//! sessions through them: advancing on answers, jumping back to any answered
//! question with automatic or custom undo rules, jumping forward by replaying
//! recorded answers, and resuming a session from a persisted answer history.
//!
//! ## Core Workflow
//!
//! 1.  **Build a Flow**: Create a `Flow` from a root `FlowItem` and connect further
//!     items with the fluent cursor (`flow.at(label)?.target(..)?`). Linking an item
//!     whose label is already part of the flow reuses the existing node.
//! 2.  **Share it**: Wrap the finished flow in an `Arc`; it is read-only from here on
//!     and any number of sessions can use it.
//! 3.  **Run a Survey**: `Survey::init` starts a session. Call `answer` for the
//!     current question and `transit_to` to move back or forward.
//! 4.  **Persist and Resume**: Store `survey.history()` (or `history_encoded()`) with
//!     any serde format and hand it to `Survey::init_with_history` later.
//!
//! Flows can also be exported to and imported from a format-neutral
//! `FlowDefinition` (see the `export` module).
//!
//! ## Quick Start
//!
//! ```rust
//! use kotae::prelude::*;
//! use std::sync::Arc;
//!
//! fn main() -> Result<()> {
//!     // 1. Build the flow: START -> LIKES_RUST -> (yes) WHY / (no) WHY_NOT -> END
//!     let mut flow = Flow::new(FlowItem::question("START")?);
//!     let end = FlowItem::question("END")?;
//!     flow.at("START")?
//!         .target(FlowItem::question_bool("LIKES_RUST")?)?
//!         .link_when(FlowItem::question("WHY")?, |a| a.as_bool() == Some(true))?
//!         .link_when(FlowItem::question("WHY_NOT")?, |a| a.as_bool() == Some(false))?;
//!     flow.at("WHY")?.target(end.clone())?;
//!     flow.at("WHY_NOT")?.target(end)?;
//!
//!     // 2. Share it and start a session.
//!     let flow = Arc::new(flow);
//!     let mut survey = Survey::init(flow.clone());
//!
//!     // 3. Answer and move around.
//!     survey.answer("hello").answer("yes");
//!     assert_eq!(survey.get().label(), "WHY");
//!
//!     assert!(survey.transit_to("LIKES_RUST")?);
//!     survey.answer("no");
//!     assert_eq!(survey.get().label(), "WHY_NOT");
//!
//!     // 4. Persist and resume.
//!     let stored = serde_json::to_string(survey.history())?;
//!     let history: Vec<HistoryItem> = serde_json::from_str(&stored)?;
//!     let resumed = Survey::init_with_history(flow, history);
//!     assert_eq!(resumed.get().label(), "WHY_NOT");
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod export;
pub mod flow;
pub mod model;
pub mod prelude;
pub mod survey;
