//! In-memory accumulator for the current accounting period.
//!
//! Maps an activity identity (app name, or `"{app} - {title}"`) to the
//! seconds attributed to it since the last minute flush. Owned exclusively
//! by the tracking loop; the minute accountant drains it at each boundary.

use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct SessionTracker {
    current: HashMap<String, f64>,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds duration to an activity. No-op for an empty identity or a
    /// non-positive duration.
    pub fn add_activity(&mut self, identity: &str, duration: f64) {
        if identity.is_empty() || duration <= 0.0 {
            return;
        }
        *self.current.entry(identity.to_string()).or_insert(0.0) += duration;
    }

    /// Snapshot of the current accumulator without clearing it.
    pub fn session_data(&self) -> HashMap<String, f64> {
        self.current.clone()
    }

    /// Takes and clears the accumulator in one step. A second call before
    /// any further `add_activity` returns an empty map.
    pub fn drain(&mut self) -> HashMap<String, f64> {
        std::mem::take(&mut self.current)
    }

    /// Total seconds tracked in the open period.
    pub fn total_time(&self) -> f64 {
        self.current.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }
}
