use super::{Answer, Predicate};

/// An edge descriptor owned by the source node's transition set.
///
/// Forward routes always carry a target label and may be unconditioned.
/// Backward routes carry no target, the node they unwind to is decided by the
/// history, and always carry a predicate.
#[derive(Debug, Clone)]
pub struct Route {
    target: Option<String>,
    predicate: Option<Predicate>,
    backwards: bool,
}

impl Route {
    pub fn forward(target: impl Into<String>, predicate: Option<Predicate>) -> Self {
        Self {
            target: Some(target.into()),
            predicate,
            backwards: false,
        }
    }

    pub fn backward(predicate: Predicate) -> Self {
        Self {
            target: None,
            predicate: Some(predicate),
            backwards: true,
        }
    }

    /// An unconditioned route never applies on its own; it is only taken as fallback.
    pub fn apply(&self, answer: &Answer) -> bool {
        self.predicate
            .as_ref()
            .is_some_and(|predicate| predicate.apply(answer))
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn predicate(&self) -> Option<&Predicate> {
        self.predicate.as_ref()
    }

    pub fn has_condition(&self) -> bool {
        self.predicate.is_some()
    }

    pub fn is_backward(&self) -> bool {
        self.backwards
    }

    pub fn is_forward(&self) -> bool {
        !self.backwards
    }

    /// Label shown on diagrams for this edge.
    pub fn label(&self) -> Option<&str> {
        self.predicate.as_ref().and_then(Predicate::label)
    }

    pub fn condition_name(&self) -> Option<&str> {
        self.predicate.as_ref().and_then(Predicate::condition_name)
    }
}

// Equality ignores the target: a node holds at most one route per (predicate, direction).
impl PartialEq for Route {
    fn eq(&self, other: &Self) -> bool {
        self.backwards == other.backwards
            && match (&self.predicate, &other.predicate) {
                (None, None) => true,
                (Some(a), Some(b)) => a.same(b),
                _ => false,
            }
    }
}
