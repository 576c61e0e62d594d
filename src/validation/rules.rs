//! Table checks that accumulate every violation.

use crate::core::{StateRef, StateTransition};
use crate::validation::violations::TableViolation;
use std::fmt::Debug;
use std::sync::Arc;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

type Check = Validation<(), NonEmptyVec<TableViolation>>;

fn render<S: Debug>(identity: Option<&S>) -> String {
    match identity {
        Some(identity) => format!("{identity:?}"),
        None => "<initial>".to_string(),
    }
}

fn is_declared<S>(roots: &[StateRef<S>], state: &StateRef<S>) -> bool {
    roots.iter().any(|root| Arc::ptr_eq(root, state))
}

fn names_declared<S: PartialEq>(roots: &[StateRef<S>], identity: &S) -> bool {
    roots.iter().any(|root| root.identity() == identity)
}

/// Check both tables, returning ALL violations found.
///
/// Validation is advisory: none of these conditions change how the
/// engine resolves transitions.
pub fn validate_tables<S>(roots: &[StateRef<S>], transitions: &[StateTransition<S>]) -> Check
where
    S: PartialEq + Debug,
{
    let mut checks: Vec<Check> = Vec::new();

    if !transitions.iter().any(|t| t.is_initial()) {
        checks.push(Validation::fail(TableViolation::MissingInitialEntry));
    }

    // Report each duplicated source once, at its second occurrence
    for (index, entry) in transitions.iter().enumerate() {
        let source = entry.from_identity();
        let earlier = transitions[..index]
            .iter()
            .filter(|t| t.has_source_identity(source))
            .count();
        if earlier == 1 {
            checks.push(Validation::fail(TableViolation::DuplicateSource {
                from: render(source),
            }));
        }
    }

    for entry in transitions {
        let from = render(entry.from_identity());
        if let Some(source) = entry.from() {
            if !is_declared(roots, source) {
                checks.push(Validation::fail(TableViolation::UndeclaredSource {
                    from: from.clone(),
                }));
            }
        }
        for destination in entry.to() {
            if !is_declared(roots, destination) {
                checks.push(Validation::fail(TableViolation::UndeclaredDestination {
                    from: from.clone(),
                    to: render(Some(destination.identity())),
                }));
            }
        }
    }

    for state in roots {
        if let Some(parent) = state.parent() {
            if !names_declared(roots, parent) {
                checks.push(Validation::fail(TableViolation::UnknownParent {
                    state: render(Some(state.identity())),
                    parent: render(Some(parent)),
                }));
            }
        }
        for child in state.children().unwrap_or_default() {
            if !names_declared(roots, child) {
                checks.push(Validation::fail(TableViolation::UnknownChild {
                    state: render(Some(state.identity())),
                    child: render(Some(child)),
                }));
            }
        }
    }

    Validation::all_vec(checks).map(|_| ())
}

/// Flatten a validation result into a plain list of violations.
pub fn collect_violations(result: &Check) -> Vec<TableViolation> {
    match result {
        Validation::Success(_) => Vec::new(),
        Validation::Failure(errors) => errors.iter().cloned().collect(),
    }
}
