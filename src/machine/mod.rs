//! The state machine and its configuration.
//!
//! # Locking
//!
//! Each machine owns one reentrant lock guarding its current state.
//! `start`, `stop`, `change_state`, `current_state` and the no-argument
//! queries take it; lookups keyed by an explicit state or identity only
//! read the immutable tables and skip it.
//!
//! Hooks run while the lock is held. Because the lock is reentrant, a hook
//! may call back into the same machine on its own thread; other threads
//! block until the outermost call returns.

mod config;
mod engine;

pub use config::{ConfigError, MachineConfig, DEFAULT_HISTORY_CAPACITY};
pub use engine::StateMachine;
