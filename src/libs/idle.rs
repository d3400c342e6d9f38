//! Idle state machine.
//!
//! Converts the raw "seconds since last input" reading into a two-state
//! ACTIVE/IDLE machine. `check_idle_state` is edge-triggered: it returns
//! `true` only on a transition, so callers can react exactly once per
//! direction change while polling every tick.

use crate::libs::detect::IdleProbe;

pub struct IdleDetector {
    threshold: f64,
    probe: Box<dyn IdleProbe>,
    is_idle: bool,
    idle_start_time: Option<f64>,
}

impl IdleDetector {
    pub fn new(threshold: f64, probe: Box<dyn IdleProbe>) -> Self {
        Self {
            threshold,
            probe,
            is_idle: false,
            idle_start_time: None,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn is_idle(&self) -> bool {
        self.is_idle
    }

    /// Epoch timestamp at which the current idle period was detected.
    pub fn idle_start_time(&self) -> Option<f64> {
        self.idle_start_time
    }

    /// Current idle reading from the probe.
    pub fn idle_seconds(&self) -> f64 {
        self.probe.idle_seconds()
    }

    /// Advances the state machine one step against the current idle
    /// reading. Returns `true` only on an ACTIVE→IDLE or IDLE→ACTIVE edge.
    ///
    /// `now` is the caller's epoch timestamp so the transition instant is
    /// consistent with the rest of the tick's arithmetic.
    pub fn check_idle_state(&mut self, now: f64) -> bool {
        let idle_time = self.idle_seconds();

        if idle_time >= self.threshold {
            if !self.is_idle {
                self.is_idle = true;
                self.idle_start_time = Some(now);
                return true; // Just became idle
            }
            false // Already idle
        } else {
            if self.is_idle {
                self.is_idle = false;
                self.idle_start_time = None;
                return true; // Just became active
            }
            false // Already active
        }
    }
}
