//! Digital output abstraction for the gate pin.
//!
//! The gate is driven by exactly one digital output. Platform crates implement
//! [`DigitalOutput`] over their GPIO driver; tests use [`MockOutput`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

/// Logical level of the gate output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Active level: the MOSFET conducts.
    Asserted,
    /// Inactive level: the MOSFET is off. This is the power-on state.
    #[default]
    Deasserted,
}

impl Level {
    /// Whether this is the active level.
    pub fn is_asserted(self) -> bool {
        matches!(self, Level::Asserted)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Asserted => write!(f, "asserted"),
            Level::Deasserted => write!(f, "deasserted"),
        }
    }
}

/// A digital output capable of driving the gate.
///
/// Writes are treated as infallible. Implementations backed by real drivers
/// report driver errors through logging rather than to the caller.
pub trait DigitalOutput {
    /// Drive the output to `level`.
    fn write(&mut self, level: Level);
}

impl<T: DigitalOutput + ?Sized> DigitalOutput for Box<T> {
    fn write(&mut self, level: Level) {
        (**self).write(level)
    }
}

/// In-memory output that records every write.
///
/// Clones share the same history, so a test can keep one clone while the
/// switch owns another.
#[derive(Debug, Clone, Default)]
pub struct MockOutput {
    writes: Arc<Mutex<Vec<Level>>>,
}

impl MockOutput {
    /// Create an output with an empty write history.
    pub fn new() -> Self {
        Self::default()
    }

    /// All levels written so far, oldest first.
    pub fn writes(&self) -> Vec<Level> {
        self.history().clone()
    }

    /// The most recently written level, if any write happened.
    pub fn last(&self) -> Option<Level> {
        self.history().last().copied()
    }

    fn history(&self) -> MutexGuard<'_, Vec<Level>> {
        self.writes.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl DigitalOutput for MockOutput {
    fn write(&mut self, level: Level) {
        self.history().push(level);
    }
}
