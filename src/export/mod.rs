//! Export and import of flow graphs through a format-neutral `FlowDefinition`.
//!
//! Concrete diagram formats live outside this crate: a renderer reads the
//! definition produced by `FlowExporter`, a parser produces a definition (or
//! implements `IntoFlowDefinition`) for `FlowImporter`.

pub mod conversion;
pub mod definition;
pub mod exporter;
pub mod importer;

pub use conversion::*;
pub use definition::*;
pub use exporter::*;
pub use importer::*;
