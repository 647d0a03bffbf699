use super::Answer;
use std::fmt;
use std::sync::Arc;

/// A named predicate that gates a route.
///
/// Conditions are compared by instance: two conditions with the same label are
/// still distinct routes. `name` identifies the condition kind to exporters and
/// importers and defaults to the Rust type name without its module path.
pub trait Condition: Send + Sync {
    fn apply(&self, answer: &Answer) -> bool;

    fn label(&self) -> Option<&str> {
        None
    }

    fn name(&self) -> &str {
        let full = std::any::type_name::<Self>();
        full.rsplit("::").next().unwrap_or(full)
    }
}

type PredicateFn = dyn Fn(&Answer) -> bool + Send + Sync;

/// The gate of a route: a bare function or a `Condition`.
#[derive(Clone)]
pub enum Predicate {
    Function(Arc<PredicateFn>),
    Condition(Arc<dyn Condition>),
}

impl Predicate {
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&Answer) -> bool + Send + Sync + 'static,
    {
        Predicate::Function(Arc::new(f))
    }

    pub fn condition<C: Condition + 'static>(condition: C) -> Self {
        Predicate::Condition(Arc::new(condition))
    }

    pub fn apply(&self, answer: &Answer) -> bool {
        match self {
            Predicate::Function(f) => f(answer),
            Predicate::Condition(c) => c.apply(answer),
        }
    }

    /// Name of the backing condition; bare functions are anonymous.
    pub fn condition_name(&self) -> Option<&str> {
        match self {
            Predicate::Function(_) => None,
            Predicate::Condition(c) => Some(c.name()),
        }
    }

    /// Display label: the condition label, falling back to its name.
    pub fn label(&self) -> Option<&str> {
        match self {
            Predicate::Function(_) => None,
            Predicate::Condition(c) => c.label().or_else(|| Some(c.name())),
        }
    }

    /// Identity comparison, the equality routes are de-duplicated by.
    pub fn same(&self, other: &Predicate) -> bool {
        match (self, other) {
            (Predicate::Function(a), Predicate::Function(b)) => Arc::ptr_eq(a, b),
            (Predicate::Condition(a), Predicate::Condition(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<Arc<dyn Condition>> for Predicate {
    fn from(condition: Arc<dyn Condition>) -> Self {
        Predicate::Condition(condition)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Function(_) => write!(f, "Function"),
            Predicate::Condition(c) => write!(f, "Condition({})", c.name()),
        }
    }
}
