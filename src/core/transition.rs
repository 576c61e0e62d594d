//! Outgoing edge sets.

use super::state::{State, StateRef};
use std::sync::Arc;

/// The complete set of permitted destinations from one source state.
///
/// An entry whose source is `None` is the reserved initial entry: its
/// destinations are the states a machine may be started in.
///
/// Lookups never fail loudly; a miss is reported as `None` or `false`.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use waypoint::{State, StateTransition};
///
/// let idle = Arc::new(State::new("idle"));
/// let running = Arc::new(State::new("running"));
///
/// let edges = StateTransition::new(Arc::clone(&idle), [Arc::clone(&running)]);
///
/// assert!(edges.is_valid_transition_for(&"running"));
/// assert!(edges.next_state_for(&"idle").is_none());
/// ```
#[derive(Debug)]
pub struct StateTransition<S> {
    from: Option<StateRef<S>>,
    to: Vec<StateRef<S>>,
}

impl<S> StateTransition<S> {
    /// Edges leaving `from`.
    pub fn new<I>(from: StateRef<S>, to: I) -> Self
    where
        I: IntoIterator<Item = StateRef<S>>,
    {
        Self {
            from: Some(from),
            to: to.into_iter().collect(),
        }
    }

    /// The reserved initial entry listing the legal start states.
    pub fn initial<I>(to: I) -> Self
    where
        I: IntoIterator<Item = StateRef<S>>,
    {
        Self {
            from: None,
            to: to.into_iter().collect(),
        }
    }

    /// Source state, `None` for the initial entry.
    pub fn from(&self) -> Option<&StateRef<S>> {
        self.from.as_ref()
    }

    pub fn from_identity(&self) -> Option<&S> {
        self.from.as_ref().map(|state| state.identity())
    }

    /// Ordered destination table.
    pub fn to(&self) -> &[StateRef<S>] {
        &self.to
    }

    pub fn is_initial(&self) -> bool {
        self.from.is_none()
    }

    /// Whether this entry's source is exactly `source` (pointer identity).
    pub(crate) fn is_keyed_by(&self, source: Option<&StateRef<S>>) -> bool {
        match (&self.from, source) {
            (None, None) => true,
            (Some(from), Some(source)) => Arc::ptr_eq(from, source),
            _ => false,
        }
    }
}

impl<S: PartialEq> StateTransition<S> {
    /// Destination whose identity equals `candidate`'s identity.
    pub fn next_state(&self, candidate: &State<S>) -> Option<&StateRef<S>> {
        self.next_state_for(candidate.identity())
    }

    /// Destination whose identity equals `identity`.
    pub fn next_state_for(&self, identity: &S) -> Option<&StateRef<S>> {
        self.to.iter().find(|state| state.identity() == identity)
    }

    pub fn is_valid_transition(&self, candidate: &State<S>) -> bool {
        self.next_state(candidate).is_some()
    }

    pub fn is_valid_transition_for(&self, identity: &S) -> bool {
        self.next_state_for(identity).is_some()
    }

    /// Whether this entry's source identity equals `identity`.
    pub(crate) fn has_source_identity(&self, identity: Option<&S>) -> bool {
        self.from_identity() == identity
    }
}

impl<S> Clone for StateTransition<S> {
    fn clone(&self) -> Self {
        Self {
            from: self.from.clone(),
            to: self.to.clone(),
        }
    }
}
