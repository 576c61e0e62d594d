//! Machine configuration.

use crate::validation::ValidationMode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default number of transitions kept in a machine's history.
pub const DEFAULT_HISTORY_CAPACITY: usize = 64;

/// Errors loading a [`MachineConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse machine config: {0}")]
    Parse(String),
}

/// Tunables for a [`StateMachine`](crate::StateMachine).
///
/// None of these settings change which transitions are legal.
///
/// # Example
///
/// ```rust
/// use waypoint::{MachineConfig, ValidationMode};
///
/// let config = MachineConfig::from_json(r#"{ "label": "door", "validation": "strict" }"#).unwrap();
///
/// assert_eq!(config.label.as_deref(), Some("door"));
/// assert_eq!(config.validation, ValidationMode::Strict);
/// assert_eq!(config.history_capacity, 64);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MachineConfig {
    /// Human-readable name attached to log events
    pub label: Option<String>,

    /// How builders treat table violations
    pub validation: ValidationMode,

    /// Maximum transitions kept in history; zero disables history
    pub history_capacity: usize,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            label: None,
            validation: ValidationMode::default(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

impl MachineConfig {
    /// Parse a config from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_validation(mut self, mode: ValidationMode) -> Self {
        self.validation = mode;
        self
    }

    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }
}
