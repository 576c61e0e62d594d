//! Builder API for state machine construction.
//!
//! The builder declares states once and refers to them by identity
//! afterwards, producing tables in which every reference to a state shares
//! the same handle.

pub mod error;
pub mod machine;

pub use error::BuildError;
pub use machine::MachineBuilder;
