//! State wrapper carrying an identity plus hierarchy metadata.

use std::fmt::Debug;
use std::sync::Arc;

/// Shared handle to a declared [`State`].
///
/// Transition resolution treats two handles as "the same state" only when
/// they point at the same allocation (`Arc::ptr_eq`), so every declared
/// state should be allocated once and the handle cloned into each table
/// that references it.
pub type StateRef<S> = Arc<State<S>>;

/// One state identity with optional parent and child identities.
///
/// The parent/child metadata is descriptive: the transition algorithm
/// never consults it.
///
/// Equality compares `identity` and `parent` by value but the child table
/// by pointer, so two states built from separate but equal child lists
/// are not equal. Clones share the child table and stay equal.
///
/// # Example
///
/// ```rust
/// use waypoint::State;
///
/// let parent = State::new("engine").with_children(["idle", "running"]);
/// let child = State::new("idle").with_parent("engine");
///
/// assert_eq!(parent.children(), Some(&["idle", "running"][..]));
/// assert_eq!(child.parent(), Some(&"engine"));
/// assert_eq!(parent.clone(), parent);
/// ```
#[derive(Clone, Debug)]
pub struct State<S> {
    identity: S,
    parent: Option<S>,
    children: Option<Arc<[S]>>,
}

impl<S> State<S> {
    /// Wrap an identity with no hierarchy metadata.
    pub fn new(identity: S) -> Self {
        Self {
            identity,
            parent: None,
            children: None,
        }
    }

    /// Set the parent identity.
    pub fn with_parent(mut self, parent: S) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Set the ordered child identities.
    pub fn with_children<I>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = S>,
    {
        self.children = Some(children.into_iter().collect());
        self
    }

    /// Share an existing child table with this state.
    pub fn with_shared_children(mut self, children: Arc<[S]>) -> Self {
        self.children = Some(children);
        self
    }

    pub fn identity(&self) -> &S {
        &self.identity
    }

    pub fn parent(&self) -> Option<&S> {
        self.parent.as_ref()
    }

    pub fn children(&self) -> Option<&[S]> {
        self.children.as_deref()
    }

    /// The shared child table, if any.
    pub fn shared_children(&self) -> Option<&Arc<[S]>> {
        self.children.as_ref()
    }
}

impl<S: PartialEq> PartialEq for State<S> {
    fn eq(&self, other: &Self) -> bool {
        let same_children = match (&self.children, &other.children) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        };
        self.identity == other.identity && self.parent == other.parent && same_children
    }
}
