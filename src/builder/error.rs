//! Build errors for machine construction.

use crate::validation::TableViolation;
use thiserror::Error;

/// Errors that can occur when building a state machine.
#[derive(Debug, Error, PartialEq)]
pub enum BuildError {
    #[error("State {identity} is declared more than once")]
    DuplicateState { identity: String },

    #[error("Transition references undeclared state {identity}. Call .state() for it first")]
    UnknownState { identity: String },

    #[error("Transition tables failed validation with {} violation(s)", .0.len())]
    InvalidTables(Vec<TableViolation>),
}
