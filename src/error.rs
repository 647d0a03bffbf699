use thiserror::Error;

/// Errors raised while building or querying a flow graph.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    #[error("Label '{0}' should only contain enum able characters like [A-Z_0-9]")]
    InvalidLabel(String),

    #[error("Flow item [{label}] was not found in flow [{flow}]")]
    NodeNotFound { label: String, flow: String },

    #[error(
        "Question [{label}] is defined with different type [{defined}] than requested [{requested}]"
    )]
    TypeMismatch {
        label: String,
        defined: String,
        requested: String,
    },

    #[error("History item [{label}] was not found in flow [{flow}]")]
    NotInHistory { label: String, flow: String },

    #[error("Unable to convert answer of [{label}]: {message}")]
    Codec { label: String, message: String },
}

/// Errors raised by `Survey::transit_to` when the recorded history cannot be replayed.
///
/// A blocked back transition is not an error; it is reported as `Ok(false)`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Unable to transition to [{target}]: no answer recorded for [{label}]")]
    InsufficientHistory { label: String, target: String },

    #[error(
        "Unable to transition to [{target}]: answer from the history did not resolve [{label}]"
    )]
    Unresolved { label: String, target: String },

    #[error(transparent)]
    Flow(#[from] FlowError),
}

/// Errors that can occur when rebuilding a flow from a `FlowDefinition`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    #[error("No type registered for [{type_name}] used by node [{label}]")]
    UnknownType { label: String, type_name: String },

    #[error("Condition [{0}] found, please register first")]
    UnknownCondition(String),

    #[error("Edge references node [{missing}] from [{source_label}] which is not defined")]
    UnknownNode {
        missing: String,
        source_label: String,
    },

    #[error("Node [{label}] is not connected to root [{root}]")]
    Unreachable { label: String, root: String },

    #[error("Flow definition does not contain any node")]
    EmptyDefinition,

    #[error("Invalid custom data: {0}")]
    Conversion(String),

    #[error(transparent)]
    Flow(#[from] FlowError),
}
