//! The trigger capability implemented by state identities.
//!
//! Every state identity type carries the pair of hooks the engine fires
//! when a transition enters or leaves one of its states.

use super::state::State;
use crate::machine::StateMachine;
use std::fmt::Debug;

/// Entry/exit hooks for a state identity type.
///
/// The identity type is usually a fieldless enum: values are compared
/// with `==`, so each logical state should have exactly one value.
///
/// Hooks run synchronously on the caller's thread while the machine's
/// lock is held. The lock is reentrant, so a hook may query or drive the
/// same machine again. A panic inside a hook propagates to the caller of
/// [`StateMachine::start`] or [`StateMachine::change_state`].
///
/// # Example
///
/// ```rust
/// use waypoint::{State, StateMachine, Trigger};
///
/// #[derive(Clone, Copy, PartialEq, Debug)]
/// enum Door {
///     Open,
///     Closed,
/// }
///
/// impl Trigger for Door {
///     type Context = ();
///
///     fn on_entry(
///         &self,
///         _machine: &StateMachine<Self>,
///         entered: &State<Self>,
///         _from: Option<&State<Self>>,
///         _context: &(),
///     ) {
///         println!("entered {:?}", entered.identity());
///     }
///
///     fn on_exit(
///         &self,
///         _machine: &StateMachine<Self>,
///         _current: &State<Self>,
///         _to: &State<Self>,
///         _context: &(),
///     ) {
///     }
/// }
/// ```
pub trait Trigger: Clone + PartialEq + Debug + Send + Sync + 'static {
    /// Opaque payload threaded through every hook invocation.
    type Context;

    /// Fired immediately after the machine's current state becomes `entered`.
    ///
    /// `from` is the previous state, or `None` when the machine was started.
    fn on_entry(
        &self,
        machine: &StateMachine<Self>,
        entered: &State<Self>,
        from: Option<&State<Self>>,
        context: &Self::Context,
    );

    /// Fired immediately before the machine leaves `current` for `to`.
    fn on_exit(
        &self,
        machine: &StateMachine<Self>,
        current: &State<Self>,
        to: &State<Self>,
        context: &Self::Context,
    );
}
