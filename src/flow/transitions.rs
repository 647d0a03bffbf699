use crate::model::Route;
use itertools::Itertools;

/// The routes owned by one node, forward and backward, in insertion order.
///
/// Holds at most one route per (predicate, direction) and therefore at most one
/// unconditioned forward route.
#[derive(Debug, Clone, Default)]
pub struct TransitionSet {
    routes: Vec<Route>,
}

impl TransitionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// All routes, forward routes first.
    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.forward_routes().chain(self.backward_routes())
    }

    pub fn forward_routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter().filter(|route| route.is_forward())
    }

    pub fn backward_routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter().filter(|route| route.is_backward())
    }

    /// Distinct forward target labels.
    pub fn forward_targets(&self) -> impl Iterator<Item = &str> {
        self.forward_routes().filter_map(Route::target).unique()
    }

    pub fn targets(&self, label: &str) -> bool {
        self.forward_routes().any(|route| route.target() == Some(label))
    }

    /// Removes the unconditioned routes of one direction and returns the labels
    /// they pointed to.
    pub(crate) fn remove_unconditioned(&mut self, backwards: bool) -> Vec<String> {
        let (removed, kept): (Vec<Route>, Vec<Route>) = self
            .routes
            .drain(..)
            .partition(|route| route.is_backward() == backwards && !route.has_condition());
        self.routes = kept;
        removed
            .into_iter()
            .filter_map(|route| route.target().map(str::to_string))
            .collect()
    }

    /// Inserts a route, replacing an equal one in place.
    ///
    /// Returns the target of the replaced route when it differs from the new one.
    pub(crate) fn insert(&mut self, route: Route) -> Option<String> {
        match self.routes.iter_mut().find(|existing| **existing == route) {
            Some(existing) => {
                let displaced = existing
                    .target()
                    .filter(|old| Some(*old) != route.target())
                    .map(str::to_string);
                *existing = route;
                displaced
            }
            None => {
                self.routes.push(route);
                None
            }
        }
    }

    /// Adds the routes of `other` that have no equal route here yet.
    pub(crate) fn merge(&mut self, other: &TransitionSet) {
        for route in &other.routes {
            if !self.routes.contains(route) {
                self.routes.push(route.clone());
            }
        }
    }
}

impl<'a> IntoIterator for &'a TransitionSet {
    type Item = &'a Route;
    type IntoIter = std::slice::Iter<'a, Route>;

    fn into_iter(self) -> Self::IntoIter {
        self.routes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Answer, Predicate};

    #[test]
    fn unconditioned_route_is_unique_per_direction() {
        let mut set = TransitionSet::new();
        set.insert(Route::forward("A", None));
        let displaced = set.insert(Route::forward("B", None));
        assert_eq!(displaced.as_deref(), Some("A"));
        assert_eq!(set.len(), 1);
        assert_eq!(set.forward_targets().collect::<Vec<_>>(), vec!["B"]);
    }

    #[test]
    fn conditioned_routes_are_kept_by_identity() {
        let yes = Predicate::function(|answer: &Answer| answer.as_bool() == Some(true));
        let also_yes = Predicate::function(|answer: &Answer| answer.as_bool() == Some(true));
        let mut set = TransitionSet::new();
        set.insert(Route::forward("A", Some(yes.clone())));
        set.insert(Route::forward("B", Some(also_yes)));
        set.insert(Route::forward("A", Some(yes)));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn remove_unconditioned_reports_old_targets() {
        let mut set = TransitionSet::new();
        set.insert(Route::forward("A", None));
        set.insert(Route::backward(Predicate::function(|_| true)));
        assert_eq!(set.remove_unconditioned(false), vec!["A".to_string()]);
        assert_eq!(set.len(), 1);
        assert!(set.remove_unconditioned(true).is_empty());
    }

    #[test]
    fn forward_routes_iterate_before_backward() {
        let mut set = TransitionSet::new();
        set.insert(Route::backward(Predicate::function(|_| true)));
        set.insert(Route::forward("A", None));
        let directions: Vec<bool> = set.iter().map(Route::is_backward).collect();
        assert_eq!(directions, vec![false, true]);
    }
}
