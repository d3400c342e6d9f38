//! The tracking loop orchestrator.
//!
//! [`ActivityTracker`] drives the whole pipeline once per poll tick: idle
//! edge handling, foreground detection, debounced app-change accounting,
//! and the minute-boundary flush. All mutable state is owned by the loop;
//! the outside world interacts through a [`TrackerHandle`], which carries a
//! stop flag (checked every iteration, so a stop request is observed within
//! one poll interval) and an eventually-consistent status snapshot.
//!
//! The loop is resilient by construction: any error inside one iteration is
//! logged and followed by a backoff sleep, and a shutdown always flushes
//! the still-open segment before exiting so no activity time is lost.

use crate::libs::config::TrackerConfig;
use crate::libs::detect::{AppProbe, IdleProbe, InputIdleProbe, OsAppProbe};
use crate::libs::messages::Message;
use crate::libs::minute::{epoch, MinuteLedger};
use crate::libs::monitor::ActivityMonitor;
use crate::libs::store::ActivityStore;
use crate::{msg_info, msg_print, msg_warning};
use anyhow::Result;
use chrono::{DateTime, Local};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::time::{self, Duration};

/// Coarse sleep while the user is idle; detection is skipped entirely.
const IDLE_POLL: Duration = Duration::from_secs(1);

/// Backoff after an iteration-level error.
const ERROR_BACKOFF: Duration = Duration::from_secs(5);

/// Point-in-time view of the tracker for display purposes.
#[derive(Debug, Clone, Default)]
pub struct TrackerStatus {
    pub is_running: bool,
    pub current_app: Option<String>,
    pub session_total_seconds: f64,
}

/// Shared handle for stopping the loop and reading its status from another
/// task or thread. Status reads are eventually-consistent snapshots.
#[derive(Clone)]
pub struct TrackerHandle {
    running: Arc<AtomicBool>,
    status: Arc<Mutex<TrackerStatus>>,
}

impl TrackerHandle {
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn status(&self) -> TrackerStatus {
        self.status.lock().clone()
    }
}

enum Tick {
    Polled,
    Idle,
}

pub struct ActivityTracker {
    monitor: ActivityMonitor,
    store: ActivityStore,
    ledger: MinuteLedger,
    running: Arc<AtomicBool>,
    status: Arc<Mutex<TrackerStatus>>,

    // The open-segment cursor: which app the time since `segment_start`
    // belongs to once the segment closes.
    current_app: Option<String>,
    segment_start: f64,
}

impl ActivityTracker {
    /// Tracker wired to the OS probes and the default data directory.
    pub fn new(config: TrackerConfig) -> Result<Self> {
        let app_probe = Box::new(OsAppProbe::new());
        let idle_probe = Box::new(InputIdleProbe::spawn());
        let store = ActivityStore::new()?;
        Ok(Self::with_parts(config, app_probe, idle_probe, store))
    }

    /// Tracker with injected probes and store (tests, embedding).
    pub fn with_parts(
        config: TrackerConfig,
        app_probe: Box<dyn AppProbe>,
        idle_probe: Box<dyn IdleProbe>,
        store: ActivityStore,
    ) -> Self {
        let now = Local::now();
        let tolerance = config.minute_overflow_tolerance;
        Self {
            monitor: ActivityMonitor::new(config, app_probe, idle_probe),
            store,
            ledger: MinuteLedger::new(now, tolerance),
            running: Arc::new(AtomicBool::new(false)),
            status: Arc::new(Mutex::new(TrackerStatus::default())),
            current_app: None,
            segment_start: epoch(&now),
        }
    }

    pub fn handle(&self) -> TrackerHandle {
        TrackerHandle {
            running: self.running.clone(),
            status: self.status.clone(),
        }
    }

    /// Runs the tracking loop until the handle requests a stop. The final
    /// partial segment is flushed before this returns.
    pub async fn run(&mut self) -> Result<()> {
        self.running.store(true, Ordering::SeqCst);
        self.current_app = None;
        self.segment_start = epoch(&Local::now());

        let mode = if self.monitor.config().include_window_titles {
            "detailed mode: app + window titles"
        } else {
            "fast mode: app names only"
        };
        msg_print!(Message::TrackingStarted(mode.to_string()));

        let poll_interval = Duration::from_secs_f64(self.monitor.config().poll_interval);

        while self.running.load(Ordering::SeqCst) {
            match self.tick() {
                Ok(Tick::Idle) => time::sleep(IDLE_POLL).await,
                Ok(Tick::Polled) => time::sleep(poll_interval).await,
                Err(e) => {
                    msg_warning!(Message::TrackerLoopError(e.to_string()));
                    time::sleep(ERROR_BACKOFF).await;
                }
            }
        }

        let result = self.flush_final();
        msg_print!(Message::TrackingStopped);
        result
    }

    /// One iteration of the loop.
    fn tick(&mut self) -> Result<Tick> {
        let now_dt = Local::now();
        let now = epoch(&now_dt);

        // Idle edges first: the ACTIVE→IDLE edge retroactively commits the
        // time up to the idle onset and resets the segment cursor.
        self.segment_start = self
            .monitor
            .handle_idle_transition(self.current_app.as_deref(), self.segment_start, now);

        if self.monitor.is_idle() {
            // No detection and no accounting while idle.
            self.publish_status();
            return Ok(Tick::Idle);
        }

        let active_app = self.monitor.current_activity();

        let (stable_app, new_start) = self.monitor.check_app_change(
            self.current_app.as_deref(),
            active_app.as_deref(),
            self.segment_start,
            now,
        );

        if stable_app != self.current_app {
            if let (Some(old), Some(new)) = (self.current_app.as_ref(), stable_app.as_ref()) {
                msg_info!(Message::AppSwitch(old.clone(), now - self.segment_start, new.clone()));
            }
        }
        self.current_app = stable_app;
        self.segment_start = new_start;

        // First-ever observation needs no debounce; there is no previous
        // segment to protect.
        if self.current_app.is_none() {
            if let Some(app) = active_app {
                self.monitor.set_initial_app(&app);
                msg_info!(Message::InitialApp(app.clone()));
                self.current_app = Some(app);
                self.segment_start = epoch(&Local::now());
            }
        }

        self.check_minute_boundary(now_dt)?;
        self.publish_status();
        Ok(Tick::Polled)
    }

    /// Flushes the closed minute when the wall-clock minute rolls over.
    ///
    /// A failed persist must not lose the drained accumulator: the entries
    /// are re-queued so they ride along with the next successful flush.
    pub fn check_minute_boundary(&mut self, now: DateTime<Local>) -> Result<()> {
        if !self.ledger.boundary_crossed(&now) {
            return Ok(());
        }

        let prior_segments = self.monitor.drain_session();
        let minute_data = self
            .ledger
            .close_minute(prior_segments, self.current_app.as_deref(), self.segment_start, now);

        // The next segment must not double-count time already flushed.
        self.segment_start = epoch(&now);

        if minute_data.is_empty() {
            return Ok(());
        }

        let total: f64 = minute_data.values().sum();
        if let Err(e) = self.store.merge_and_save(&minute_data, &now) {
            // Requeue the drained data so a failed write is retried as
            // part of the next successful flush.
            let entries = minute_data.len();
            for (app, duration) in minute_data {
                self.monitor.record_activity(&app, duration);
            }
            msg_warning!(Message::PersistRequeued(entries));
            return Err(e);
        }

        msg_info!(Message::MinuteSaved(total));
        Ok(())
    }

    /// Adds a finished segment directly to the open accumulator.
    pub fn record_activity(&mut self, app: &str, duration: f64) {
        self.monitor.record_activity(app, duration);
    }

    /// Total seconds currently held in the open accumulator.
    pub fn session_total_seconds(&self) -> f64 {
        self.monitor.session_total_time()
    }

    /// Flushes the still-open segment and drains the accumulator to disk.
    fn flush_final(&mut self) -> Result<()> {
        let now_dt = Local::now();
        let now = epoch(&now_dt);

        if let Some(app) = self.current_app.clone() {
            self.monitor.record_activity(&app, now - self.segment_start);
        }

        let session_data = self.monitor.drain_session();
        self.store.merge_and_save(&session_data, &now_dt)?;
        self.publish_status();
        Ok(())
    }

    fn publish_status(&self) {
        *self.status.lock() = TrackerStatus {
            is_running: self.running.load(Ordering::SeqCst),
            current_app: self.current_app.clone(),
            session_total_seconds: self.monitor.session_total_time(),
        };
    }
}
