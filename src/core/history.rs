//! Bounded record of applied transitions.
//!
//! History is kept in memory for diagnostics only. Rejected transitions
//! and self-transition no-ops are never recorded.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Record of a single applied transition.
///
/// `from` is `None` when the transition started the machine.
///
/// # Example
///
/// ```rust
/// use chrono::Utc;
/// use waypoint::TransitionRecord;
///
/// let record = TransitionRecord {
///     from: None,
///     to: "idle",
///     timestamp: Utc::now(),
/// };
/// assert!(record.is_start());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord<S> {
    /// The state being left, if the machine was running
    pub from: Option<S>,
    /// The state entered
    pub to: S,
    /// When `current` was updated
    pub timestamp: DateTime<Utc>,
}

impl<S> TransitionRecord<S> {
    pub fn is_start(&self) -> bool {
        self.from.is_none()
    }
}

/// Ordered, bounded history of transitions.
///
/// Once `capacity` records are held, recording a new one evicts the
/// oldest. A capacity of zero keeps nothing.
///
/// # Example
///
/// ```rust
/// use chrono::Utc;
/// use waypoint::{StateHistory, TransitionRecord};
///
/// let mut history = StateHistory::with_capacity(8);
/// history.record(TransitionRecord { from: None, to: "start", timestamp: Utc::now() });
/// history.record(TransitionRecord { from: Some("start"), to: "end", timestamp: Utc::now() });
///
/// assert_eq!(history.path(), vec![&"start", &"end"]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StateHistory<S> {
    capacity: usize,
    records: VecDeque<TransitionRecord<S>>,
}

impl<S> StateHistory<S> {
    /// Create an empty history holding at most `capacity` records.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            records: VecDeque::with_capacity(capacity.min(1024)),
        }
    }

    /// Append a record, evicting the oldest when full.
    pub fn record(&mut self, record: TransitionRecord<S>) {
        if self.capacity == 0 {
            return;
        }
        if self.records.len() == self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    /// Drop every record.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// States traversed, oldest first.
    ///
    /// Starts with the `from` of the oldest retained record when it has
    /// one, followed by the `to` of every record.
    pub fn path(&self) -> Vec<&S> {
        let mut path = Vec::with_capacity(self.records.len() + 1);
        if let Some(from) = self.records.front().and_then(|r| r.from.as_ref()) {
            path.push(from);
        }
        path.extend(self.records.iter().map(|r| &r.to));
        path
    }

    /// Time between the oldest and newest retained records.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.records.front()?, self.records.back()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    pub fn records(&self) -> impl Iterator<Item = &TransitionRecord<S>> {
        self.records.iter()
    }

    pub fn last(&self) -> Option<&TransitionRecord<S>> {
        self.records.back()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
