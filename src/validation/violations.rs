//! Table violations and how builders react to them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Problems found in a machine's state or transition tables.
///
/// Identities are rendered with their `Debug` form.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TableViolation {
    #[error("No initial transition entry; start() can never succeed")]
    MissingInitialEntry,

    #[error("Multiple transition entries for source {from}; only the first is used")]
    DuplicateSource { from: String },

    #[error("Transition source {from} is not a declared state")]
    UndeclaredSource { from: String },

    #[error("Destination {to} of source {from} is not a declared state")]
    UndeclaredDestination { from: String, to: String },

    #[error("State {state} names undeclared parent {parent}")]
    UnknownParent { state: String, parent: String },

    #[error("State {state} names undeclared child {child}")]
    UnknownChild { state: String, child: String },
}

/// What a builder does with table violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Skip validation entirely
    Off,

    /// Log each violation and build anyway
    #[default]
    Warn,

    /// Refuse to build
    Strict,
}
