//! Waypoint: a hierarchical finite-state-machine engine.
//!
//! A machine is built from two immutable tables: the declared states and,
//! for each source state, the set of states it may move to. Driving the
//! machine fires entry/exit hooks supplied by the state identity type.
//!
//! # Core Concepts
//!
//! - **Trigger**: the entry/exit hook pair a state identity implements
//! - **State**: an identity plus optional parent/child metadata
//! - **StateTransition**: every permitted destination of one source state,
//!   with a reserved initial entry listing the legal start states
//! - **StateMachine**: holds the current state behind a reentrant lock
//!
//! # Example
//!
//! ```rust
//! use waypoint::builder::MachineBuilder;
//! use waypoint::{State, StateMachine, Trigger};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! #[derive(Clone, Copy, PartialEq, Debug)]
//! enum Phase {
//!     Idle,
//!     Running,
//!     Stopped,
//! }
//!
//! impl Trigger for Phase {
//!     type Context = AtomicUsize;
//!
//!     fn on_entry(
//!         &self,
//!         _machine: &StateMachine<Self>,
//!         _entered: &State<Self>,
//!         _from: Option<&State<Self>>,
//!         entries: &AtomicUsize,
//!     ) {
//!         entries.fetch_add(1, Ordering::SeqCst);
//!     }
//!
//!     fn on_exit(
//!         &self,
//!         _machine: &StateMachine<Self>,
//!         _current: &State<Self>,
//!         _to: &State<Self>,
//!         _entries: &AtomicUsize,
//!     ) {
//!     }
//! }
//!
//! let machine = MachineBuilder::new()
//!     .states([
//!         State::new(Phase::Idle),
//!         State::new(Phase::Running),
//!         State::new(Phase::Stopped),
//!     ])
//!     .initial([Phase::Idle])
//!     .transition(Phase::Idle, [Phase::Running])
//!     .transition(Phase::Running, [Phase::Idle, Phase::Stopped])
//!     .build()
//!     .unwrap();
//!
//! let entries = AtomicUsize::new(0);
//! assert!(machine.start(&Phase::Idle, &entries));
//! assert!(machine.change_state(&Phase::Running, &entries));
//! assert!(machine.change_state(&Phase::Stopped, &entries));
//! assert!(!machine.change_state(&Phase::Idle, &entries));
//! assert_eq!(entries.load(Ordering::SeqCst), 3);
//! ```

pub mod builder;
pub mod core;
pub mod machine;
pub mod validation;

// Re-export commonly used types
pub use self::core::{State, StateHistory, StateRef, StateTransition, TransitionRecord, Trigger};
pub use machine::{ConfigError, MachineConfig, StateMachine};
pub use validation::{TableViolation, ValidationMode};
