//! Core activity monitoring logic.
//!
//! [`ActivityMonitor`] owns the debounce state, the idle state machine, and
//! the session accumulator, and turns raw probe readings into committed
//! activity segments. It is deliberately free of any notion of wall-clock
//! "now": every method takes the caller's epoch timestamp, which keeps the
//! debounce and idle arithmetic deterministic under test.
//!
//! Two commitment paths exist:
//!
//! - a confirmed app switch commits the previous app's segment
//!   (`check_app_change`), and
//! - an ACTIVE→IDLE edge retroactively commits the time up to the idle
//!   onset instant (`handle_idle_transition`), so time spent before the
//!   user walked away is credited and idle time is not.

use crate::libs::config::TrackerConfig;
use crate::libs::detect::{AppProbe, IdleProbe};
use crate::libs::idle::IdleDetector;
use crate::libs::messages::Message;
use crate::libs::session::SessionTracker;
use crate::libs::title::TitleCleaner;
use crate::msg_info;
use std::collections::HashMap;

pub struct ActivityMonitor {
    config: TrackerConfig,
    app_probe: Box<dyn AppProbe>,
    idle_detector: IdleDetector,
    title_cleaner: TitleCleaner,
    session_tracker: SessionTracker,

    // Debounce state: the last confirmed app and the instant a differing
    // observation first appeared (None = no pending switch).
    last_stable_app: Option<String>,
    app_change_time: Option<f64>,
}

impl ActivityMonitor {
    pub fn new(config: TrackerConfig, app_probe: Box<dyn AppProbe>, idle_probe: Box<dyn IdleProbe>) -> Self {
        let idle_detector = IdleDetector::new(config.idle_threshold as f64, idle_probe);
        Self {
            config,
            app_probe,
            idle_detector,
            title_cleaner: TitleCleaner::new(),
            session_tracker: SessionTracker::new(),
            last_stable_app: None,
            app_change_time: None,
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn is_idle(&self) -> bool {
        self.idle_detector.is_idle()
    }

    /// Composes the activity identity for the current poll: the app name,
    /// or `"{app} - {cleaned title}"` in detailed mode.
    pub fn current_activity(&self) -> Option<String> {
        let app_name = self.app_probe.active_application()?;

        if !self.config.include_window_titles {
            return Some(app_name);
        }

        if let Some(title) = self.app_probe.window_title(&app_name) {
            let clean_title = self.title_cleaner.clean_title(&title);
            let full_name = format!("{} - {}", app_name, clean_title);
            return Some(self.title_cleaner.normalize_app_name(&full_name));
        }

        Some(app_name)
    }

    /// Handles idle state transitions, returning the new segment start.
    ///
    /// On the ACTIVE→IDLE edge the idle-seconds reading tells us how long
    /// ago the user actually stopped interacting, so the segment is
    /// committed only up to that onset instant. A negative or zero duration
    /// means the segment start was reset (e.g. by a minute flush) after
    /// idleness truly began; that is an expected race and dropped silently.
    pub fn handle_idle_transition(&mut self, current_app: Option<&str>, start_time: f64, now: f64) -> f64 {
        let was_idle_since = self.idle_detector.idle_start_time();

        if !self.idle_detector.check_idle_state(now) {
            return start_time;
        }

        if self.idle_detector.is_idle() {
            // Just became idle.
            let idle_time = self.idle_detector.idle_seconds();
            if let Some(app) = current_app {
                let idle_onset_timestamp = now - idle_time;
                let active_duration = idle_onset_timestamp - start_time;

                if active_duration > 0.0 && active_duration <= self.config.max_segment_duration {
                    self.session_tracker.add_activity(app, active_duration);
                }
            }
            msg_info!(Message::IdleDetected(idle_time));
            now
        } else {
            // Just became active - a fresh segment begins.
            let idle_duration = was_idle_since.map(|t| now - t).unwrap_or(0.0);
            msg_info!(Message::ActivityResumed(idle_duration));
            now
        }
    }

    /// Debounced app-change detection.
    ///
    /// Returns the (possibly updated) stable app and its segment start. A
    /// differing observation starts a pending timer; only once it has
    /// persisted for the debounce delay is the switch confirmed and the
    /// previous app's segment committed. Observations that revert before
    /// the delay elapses leave the stable app untouched, which is what
    /// absorbs momentary focus-stealing flicker.
    pub fn check_app_change(
        &mut self,
        current_app: Option<&str>,
        active_app: Option<&str>,
        start_time: f64,
        now: f64,
    ) -> (Option<String>, f64) {
        if self.last_stable_app.as_deref() != active_app {
            match self.app_change_time {
                None => {
                    self.app_change_time = Some(now);
                }
                Some(pending_since) if now - pending_since >= self.config.debounce_delay => {
                    // Switch confirmed: record the previous app's duration.
                    if let Some(prev) = current_app {
                        if active_app != Some(prev) {
                            let duration = now - start_time;
                            if duration > 0.0 && duration <= self.config.max_segment_duration {
                                self.session_tracker.add_activity(prev, duration);
                            }
                        }
                    }

                    self.last_stable_app = active_app.map(str::to_string);
                    self.app_change_time = None;
                    return (active_app.map(str::to_string), now);
                }
                Some(_) => {}
            }
        } else {
            self.app_change_time = None;
        }

        (current_app.map(str::to_string), start_time)
    }

    /// Seeds the debouncer with the first-ever observation; no debounce is
    /// needed because there is no previous segment to protect.
    pub fn set_initial_app(&mut self, app: &str) {
        self.last_stable_app = Some(app.to_string());
        self.app_change_time = None;
    }

    /// Adds a finished segment directly to the accumulator (used for the
    /// final flush on shutdown).
    pub fn record_activity(&mut self, app: &str, duration: f64) {
        self.session_tracker.add_activity(app, duration);
    }

    /// Total seconds accumulated in the open accounting period.
    pub fn session_total_time(&self) -> f64 {
        self.session_tracker.total_time()
    }

    /// Atomically takes and clears the open period's accumulator.
    pub fn drain_session(&mut self) -> HashMap<String, f64> {
        self.session_tracker.drain()
    }
}
