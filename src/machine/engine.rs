//! The transition engine.

use crate::core::{State, StateHistory, StateRef, StateTransition, TransitionRecord, Trigger};
use crate::machine::config::MachineConfig;
use crate::validation::{validate_tables, TableViolation};
use chrono::Utc;
use parking_lot::ReentrantMutex;
use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use uuid::Uuid;

/// Mutable part of the machine, only touched with the lock held.
struct Inner<S> {
    current: Option<StateRef<S>>,
    history: StateHistory<S>,
}

/// A state machine over declared state and transition tables.
///
/// The tables are fixed at construction. The only mutable data is the
/// current state (and its history), guarded by a reentrant lock so hooks
/// may call back into the machine on the same thread.
///
/// Operations that depend on the current state take the lock. Operations
/// keyed by an explicit state or identity read only the immutable tables
/// and do not.
///
/// Lookups never return errors: a missing state, transition or
/// destination is reported as `None` or `false`.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use waypoint::{State, StateMachine, StateTransition, Trigger};
///
/// #[derive(Clone, Copy, PartialEq, Debug)]
/// enum Job {
///     Queued,
///     Running,
/// }
///
/// impl Trigger for Job {
///     type Context = ();
///     fn on_entry(&self, _: &StateMachine<Self>, _: &State<Self>, _: Option<&State<Self>>, _: &()) {}
///     fn on_exit(&self, _: &StateMachine<Self>, _: &State<Self>, _: &State<Self>, _: &()) {}
/// }
///
/// let queued = Arc::new(State::new(Job::Queued));
/// let running = Arc::new(State::new(Job::Running));
/// let machine = StateMachine::new(
///     vec![Arc::clone(&queued), Arc::clone(&running)],
///     vec![
///         StateTransition::initial([Arc::clone(&queued)]),
///         StateTransition::new(queued, [running]),
///     ],
/// );
///
/// assert!(machine.start(&Job::Queued, &()));
/// assert!(machine.change_state(&Job::Running, &()));
/// assert!(!machine.change_state(&Job::Queued, &()));
/// assert_eq!(machine.current_identity(), Some(Job::Running));
/// ```
pub struct StateMachine<S: Trigger> {
    id: Uuid,
    config: MachineConfig,
    roots: Arc<[StateRef<S>]>,
    transitions: Arc<[StateTransition<S>]>,
    inner: ReentrantMutex<RefCell<Inner<S>>>,
}

impl<S: Trigger> StateMachine<S> {
    /// Create an unstarted machine with the default config.
    pub fn new(
        roots: impl Into<Arc<[StateRef<S>]>>,
        transitions: impl Into<Arc<[StateTransition<S>]>>,
    ) -> Self {
        Self::with_config(roots, transitions, MachineConfig::default())
    }

    /// Create an unstarted machine.
    ///
    /// The tables are used as given; see
    /// [`MachineBuilder`](crate::builder::MachineBuilder) for construction
    /// with validation.
    pub fn with_config(
        roots: impl Into<Arc<[StateRef<S>]>>,
        transitions: impl Into<Arc<[StateTransition<S>]>>,
        config: MachineConfig,
    ) -> Self {
        let history = StateHistory::with_capacity(config.history_capacity);
        Self {
            id: Uuid::new_v4(),
            config,
            roots: roots.into(),
            transitions: transitions.into(),
            inner: ReentrantMutex::new(RefCell::new(Inner {
                current: None,
                history,
            })),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    /// Declared states, in declaration order.
    pub fn roots(&self) -> &[StateRef<S>] {
        &self.roots
    }

    /// Declared transition entries, in declaration order.
    pub fn transitions(&self) -> &[StateTransition<S>] {
        &self.transitions
    }

    fn label(&self) -> &str {
        self.config.label.as_deref().unwrap_or("")
    }

    /// Start the machine in `target`.
    ///
    /// The current state is cleared first, without firing `on_exit`, and
    /// `target` must then be a destination of the initial entry. Returns
    /// whether the machine entered `target`; on failure it is left
    /// unstarted.
    pub fn start(&self, target: &S, context: &S::Context) -> bool {
        let guard = self.inner.lock();
        guard.borrow_mut().current = None;
        tracing::debug!(machine = %self.id, label = self.label(), target = ?target, "starting");
        self.transition_locked(&guard, target, context)
    }

    /// Return the machine to the unstarted state.
    ///
    /// No hooks fire. Takes the same lock as [`start`](Self::start) and
    /// [`change_state`](Self::change_state).
    pub fn stop(&self) {
        let guard = self.inner.lock();
        guard.borrow_mut().current = None;
        tracing::debug!(machine = %self.id, label = self.label(), "stopped");
    }

    /// Move to `target` if it is a destination of the current state.
    ///
    /// Returns `true` when the machine is in `target` afterwards. A request
    /// for the state the machine is already in succeeds without firing
    /// hooks. Hooks run with the lock held. If `on_exit` itself moves the
    /// machine, that move stands: this call then returns `false` without
    /// entering `target` or firing `on_entry`.
    pub fn change_state(&self, target: &S, context: &S::Context) -> bool {
        let guard = self.inner.lock();
        self.transition_locked(&guard, target, context)
    }

    fn transition_locked(&self, cell: &RefCell<Inner<S>>, target: &S, context: &S::Context) -> bool {
        let current = cell.borrow().current.clone();

        // First entry keyed by exactly this state governs
        let Some(entry) = self
            .transitions
            .iter()
            .find(|t| t.is_keyed_by(current.as_ref()))
        else {
            tracing::trace!(
                machine = %self.id,
                from = ?current.as_ref().map(|s| s.identity()),
                "no transition entry for current state"
            );
            return false;
        };

        let Some(next) = entry.next_state_for(target) else {
            tracing::trace!(
                machine = %self.id,
                from = ?current.as_ref().map(|s| s.identity()),
                to = ?target,
                "target is not a permitted destination"
            );
            return false;
        };

        if current.as_ref().is_some_and(|c| Arc::ptr_eq(c, next)) {
            tracing::trace!(machine = %self.id, state = ?target, "already in target state");
            return true;
        }

        let next = Arc::clone(next);
        if let Some(previous) = &current {
            previous.identity().on_exit(self, previous, &next, context);
        }

        {
            let mut inner = cell.borrow_mut();
            // on_exit may have moved the machine itself; that transition stands
            let unchanged = match (&inner.current, &current) {
                (Some(now), Some(before)) => Arc::ptr_eq(now, before),
                (None, None) => true,
                _ => false,
            };
            if !unchanged {
                tracing::debug!(
                    machine = %self.id,
                    label = self.label(),
                    to = ?next.identity(),
                    now = ?inner.current.as_ref().map(|s| s.identity()),
                    "transition superseded by exit hook"
                );
                return false;
            }
            inner.current = Some(Arc::clone(&next));
            inner.history.record(TransitionRecord {
                from: current.as_ref().map(|s| s.identity().clone()),
                to: next.identity().clone(),
                timestamp: Utc::now(),
            });
        }

        tracing::debug!(
            machine = %self.id,
            label = self.label(),
            from = ?current.as_ref().map(|s| s.identity()),
            to = ?next.identity(),
            "state changed"
        );

        next.identity()
            .on_entry(self, &next, current.as_deref(), context);
        true
    }

    /// The current state, or `None` when unstarted.
    pub fn current_state(&self) -> Option<StateRef<S>> {
        let guard = self.inner.lock();
        let current = guard.borrow().current.clone();
        current
    }

    /// Identity of the current state.
    pub fn current_identity(&self) -> Option<S> {
        self.current_state().map(|s| s.identity().clone())
    }

    pub fn is_started(&self) -> bool {
        self.current_state().is_some()
    }

    /// Snapshot of the applied-transition history.
    pub fn history(&self) -> StateHistory<S> {
        let guard = self.inner.lock();
        let history = guard.borrow().history.clone();
        history
    }

    /// Declared state with the given identity.
    pub fn state(&self, identity: &S) -> Option<StateRef<S>> {
        self.find(identity).cloned()
    }

    fn find(&self, identity: &S) -> Option<&StateRef<S>> {
        self.roots.iter().find(|s| s.identity() == identity)
    }

    /// Transition entry whose source identity matches the current state.
    ///
    /// When unstarted this is the initial entry.
    pub fn state_transition(&self) -> Option<&StateTransition<S>> {
        let current = self.current_state();
        self.state_transition_for(current.as_ref().map(|s| s.identity()))
    }

    /// Transition entry whose source identity matches `state`'s identity.
    pub fn state_transition_from(&self, state: &State<S>) -> Option<&StateTransition<S>> {
        self.state_transition_for(Some(state.identity()))
    }

    /// Transition entry keyed by `identity`; `None` selects the initial entry.
    pub fn state_transition_for(&self, identity: Option<&S>) -> Option<&StateTransition<S>> {
        self.transitions
            .iter()
            .find(|t| t.has_source_identity(identity))
    }

    /// Destinations reachable from the current state.
    pub fn valid_to_states(&self) -> Option<&[StateRef<S>]> {
        self.state_transition().map(StateTransition::to)
    }

    pub fn valid_to_states_from(&self, state: &State<S>) -> Option<&[StateRef<S>]> {
        self.state_transition_from(state).map(StateTransition::to)
    }

    pub fn valid_to_states_for(&self, identity: Option<&S>) -> Option<&[StateRef<S>]> {
        self.state_transition_for(identity).map(StateTransition::to)
    }

    /// Whether `target` is a destination of the current state's entry.
    pub fn is_valid_transition(&self, target: &S) -> bool {
        self.state_transition()
            .is_some_and(|t| t.next_state_for(target).is_some())
    }

    /// Declared parent identity of `identity`.
    pub fn parent_of(&self, identity: &S) -> Option<&S> {
        self.find(identity).and_then(|s| s.parent())
    }

    /// Declared child identities of `identity`.
    pub fn children_of(&self, identity: &S) -> Option<&[S]> {
        self.find(identity).and_then(|s| s.children())
    }

    /// Parent chain of `identity`, nearest first.
    ///
    /// The walk ends at a state with no parent, at a parent that is not
    /// declared (which is still included), or when a cycle is detected.
    pub fn ancestors(&self, identity: &S) -> Vec<&S> {
        let mut chain: Vec<&S> = Vec::new();
        let mut cursor = self.parent_of(identity);
        while let Some(parent) = cursor {
            if parent == identity || chain.contains(&parent) {
                break;
            }
            chain.push(parent);
            cursor = self.parent_of(parent);
        }
        chain
    }

    pub fn is_descendant_of(&self, identity: &S, ancestor: &S) -> bool {
        self.ancestors(identity).contains(&ancestor)
    }

    /// Check the machine's tables, accumulating every violation.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<TableViolation>> {
        validate_tables(&self.roots, &self.transitions)
    }
}

impl<S: Trigger> fmt::Debug for StateMachine<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("id", &self.id)
            .field("label", &self.config.label)
            .field("states", &self.roots.len())
            .field("transitions", &self.transitions.len())
            .field("current", &self.current_identity())
            .finish()
    }
}
