//! Core state model.
//!
//! This module contains the building blocks the engine operates on:
//! - The `Trigger` trait implemented by state identities
//! - `State` wrappers with hierarchy metadata
//! - `StateTransition` edge sets
//! - Bounded transition history
//!
//! Nothing in this module takes a lock; all of these values are immutable
//! once handed to a machine, except the history the machine owns.

mod history;
mod state;
mod transition;
mod trigger;

pub use history::{StateHistory, TransitionRecord};
pub use state::{State, StateRef};
pub use transition::StateTransition;
pub use trigger::Trigger;
