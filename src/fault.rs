//! Recoverable error accumulation
//!
//! Long-running passes over a catalog should not abort because one entry is
//! malformed. Callers hand such passes a [`Bus`]; each problem is recorded
//! as a recoverable error and processing continues. A bus created in
//! fail-fast mode promotes the first recoverable error to the bus failure,
//! which tells the pass to stop.
//!
//! The bus is shared by reference and guards its state with a mutex, so a
//! parallel pass may record errors from several threads.

use crate::error::SelectorError;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default)]
struct BusState {
    failure: Option<SelectorError>,
    recovered: Vec<SelectorError>,
}

/// Collector for recoverable errors and the single hard failure
#[derive(Debug, Default)]
pub struct Bus {
    fail_fast: bool,
    state: Mutex<BusState>,
}

impl Bus {
    /// Create a bus; in fail-fast mode the first recoverable error fails it
    pub fn new(fail_fast: bool) -> Self {
        Self {
            fail_fast,
            state: Mutex::new(BusState::default()),
        }
    }

    /// True if recoverable errors should stop processing
    pub fn is_fail_fast(&self) -> bool {
        self.fail_fast
    }

    /// Record a hard failure; only the first one is kept
    pub fn fail(&self, err: SelectorError) {
        let mut state = self.state.lock();
        if state.failure.is_none() {
            state.failure = Some(err);
        }
    }

    /// Record an error that does not stop processing
    pub fn add_recoverable(&self, err: SelectorError) {
        let mut state = self.state.lock();
        if self.fail_fast && state.failure.is_none() {
            state.failure = Some(err.clone());
        }
        state.recovered.push(err);
    }

    /// The hard failure, if one was recorded
    pub fn failure(&self) -> Option<SelectorError> {
        self.state.lock().failure.clone()
    }

    /// Every recoverable error in recording order
    pub fn recovered(&self) -> Vec<SelectorError> {
        self.state.lock().recovered.clone()
    }

    /// Serializable snapshot of the bus contents
    pub fn errors(&self) -> Errors {
        let state = self.state.lock();
        Errors {
            failure: state.failure.as_ref().map(ToString::to_string),
            recovered: state.recovered.iter().map(ToString::to_string).collect(),
            fail_fast: self.fail_fast,
        }
    }
}

/// Point-in-time copy of a [`Bus`], suitable for reports
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Errors {
    /// The hard failure message, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
    /// Recoverable error messages
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub recovered: Vec<String>,
    /// Whether the bus was in fail-fast mode
    pub fail_fast: bool,
}
