//! Accumulating validation of state and transition tables.
//!
//! Uses Stillwater's `Validation` type so a single pass reports every
//! problem in the tables instead of stopping at the first one.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use waypoint::validation::{collect_violations, validate_tables, TableViolation};
//! use waypoint::{State, StateTransition};
//!
//! let idle = Arc::new(State::new("idle"));
//! let roots = vec![Arc::clone(&idle)];
//! let transitions = vec![StateTransition::new(Arc::clone(&idle), [idle])];
//!
//! let result = validate_tables(&roots, &transitions);
//! assert_eq!(collect_violations(&result), vec![TableViolation::MissingInitialEntry]);
//! ```

pub mod rules;
pub mod violations;

pub use rules::{collect_violations, validate_tables};
pub use violations::{TableViolation, ValidationMode};
