//! Builder for constructing state machines.

use crate::builder::error::BuildError;
use crate::core::{State, StateRef, StateTransition, Trigger};
use crate::machine::{MachineConfig, StateMachine};
use crate::validation::{collect_violations, validate_tables, ValidationMode};
use std::sync::Arc;

/// Builder for constructing state machines with a fluent API.
///
/// Transitions are declared by identity. At build time every declared
/// state is allocated exactly once and each transition is resolved to
/// those shared handles, so the engine's pointer-identity source lookup
/// always agrees with identity equality.
///
/// # Example
///
/// ```rust
/// use waypoint::builder::MachineBuilder;
/// use waypoint::{State, StateMachine, Trigger};
///
/// #[derive(Clone, Copy, PartialEq, Debug)]
/// enum Light {
///     Red,
///     Green,
/// }
///
/// impl Trigger for Light {
///     type Context = ();
///     fn on_entry(&self, _: &StateMachine<Self>, _: &State<Self>, _: Option<&State<Self>>, _: &()) {}
///     fn on_exit(&self, _: &StateMachine<Self>, _: &State<Self>, _: &State<Self>, _: &()) {}
/// }
///
/// let machine = MachineBuilder::new()
///     .state(State::new(Light::Red))
///     .state(State::new(Light::Green))
///     .initial([Light::Red])
///     .transition(Light::Red, [Light::Green])
///     .transition(Light::Green, [Light::Red])
///     .build()
///     .unwrap();
///
/// assert!(machine.start(&Light::Red, &()));
/// assert!(machine.change_state(&Light::Green, &()));
/// ```
pub struct MachineBuilder<S: Trigger> {
    config: MachineConfig,
    states: Vec<State<S>>,
    entries: Vec<(Option<S>, Vec<S>)>,
}

impl<S: Trigger> MachineBuilder<S> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            config: MachineConfig::default(),
            states: Vec::new(),
            entries: Vec::new(),
        }
    }

    /// Replace the machine config.
    pub fn config(mut self, config: MachineConfig) -> Self {
        self.config = config;
        self
    }

    /// Declare a state.
    pub fn state(mut self, state: State<S>) -> Self {
        self.states.push(state);
        self
    }

    /// Declare several states at once.
    pub fn states<I>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = State<S>>,
    {
        self.states.extend(states);
        self
    }

    /// Declare the states the machine may be started in.
    pub fn initial<I>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
    {
        self.entries.push((None, targets.into_iter().collect()));
        self
    }

    /// Declare the permitted destinations of `from`.
    pub fn transition<I>(mut self, from: S, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
    {
        self.entries.push((Some(from), targets.into_iter().collect()));
        self
    }

    /// Build the state machine.
    ///
    /// Fails if a state is declared twice or a transition names an
    /// undeclared identity. Remaining table problems are handled per the
    /// config's [`ValidationMode`].
    pub fn build(self) -> Result<StateMachine<S>, BuildError> {
        let mut roots: Vec<StateRef<S>> = Vec::with_capacity(self.states.len());
        for state in self.states {
            if roots.iter().any(|r| r.identity() == state.identity()) {
                return Err(BuildError::DuplicateState {
                    identity: format!("{:?}", state.identity()),
                });
            }
            roots.push(Arc::new(state));
        }

        let mut transitions = Vec::with_capacity(self.entries.len());
        for (from, targets) in &self.entries {
            let to = targets
                .iter()
                .map(|identity| resolve(&roots, identity))
                .collect::<Result<Vec<_>, _>>()?;
            let entry = match from {
                Some(from) => StateTransition::new(resolve(&roots, from)?, to),
                None => StateTransition::initial(to),
            };
            transitions.push(entry);
        }

        match self.config.validation {
            ValidationMode::Off => {}
            ValidationMode::Warn => {
                for violation in collect_violations(&validate_tables(&roots, &transitions)) {
                    tracing::warn!(
                        label = self.config.label.as_deref().unwrap_or(""),
                        %violation,
                        "transition table violation"
                    );
                }
            }
            ValidationMode::Strict => {
                let found = collect_violations(&validate_tables(&roots, &transitions));
                if !found.is_empty() {
                    return Err(BuildError::InvalidTables(found));
                }
            }
        }

        Ok(StateMachine::with_config(roots, transitions, self.config))
    }
}

fn resolve<S: Trigger>(roots: &[StateRef<S>], identity: &S) -> Result<StateRef<S>, BuildError> {
    roots
        .iter()
        .find(|r| r.identity() == identity)
        .cloned()
        .ok_or_else(|| BuildError::UnknownState {
            identity: format!("{identity:?}"),
        })
}

impl<S: Trigger> Default for MachineBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}
