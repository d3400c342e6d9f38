//! Display implementation for application messages.
//!
//! Converts structured `Message` values into the text shown to the user.
//! All wording lives here; the `msg_*!` macros handle routing between plain
//! console output and the tracing subscriber.

use super::types::Message;
use std::fmt;

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            // === TRACKING MESSAGES ===
            Message::TrackingStarted(mode) => format!("Tracking started - watching for app switches ({})", mode),
            Message::TrackingStopped => "Tracking stopped".to_string(),
            Message::InitialApp(app) => format!("Initial app: {}", app),
            Message::AppSwitch(old, duration, new) => format!("Switch: {} ({:.1}s) -> {}", old, duration, new),
            Message::IdleDetected(secs) => format!("User idle detected (no input for {:.0}s) - pausing tracking", secs),
            Message::ActivityResumed(secs) => format!("User activity resumed (was idle for {:.0}s) - resuming tracking", secs),
            Message::MinuteSaved(total) => format!("Minute boundary - saving {:.1}s of data", total),
            Message::TrackerLoopError(e) => format!("Error in tracking loop: {}", e),
            Message::PersistRequeued(n) => format!("Persist failed - {} entries re-queued for the next flush", n),

            // === DETECTION MESSAGES ===
            Message::AppDetectionFailed(e) => format!("Failed to detect active application: {}", e),
            Message::WindowTitleFailed(app, e) => format!("Failed to get window title for {}: {}", app, e),
            Message::InputListenerFailed(e) => format!("Failed to listen for input events: {}. Retrying in 1 second...", e),

            // === WATCHER / DAEMON MESSAGES ===
            Message::WatcherStarted(pid) => format!("Watcher started in background with PID {}", pid),
            Message::WatcherStopped(pid) => format!("Stopped watcher with PID {}", pid),
            Message::WatcherNotRunning => "Watcher is not running".to_string(),
            Message::WatcherNotRunningPidNotFound => "Watcher not running (PID file not found)".to_string(),
            Message::WatcherStoppingExisting(pid) => format!("Stopping existing watcher (PID {})", pid),
            Message::WatcherFailedToStopExisting(e) => format!("Failed to stop existing watcher: {}", e),
            Message::WatcherFailedToStop(pid) => format!("Failed to stop watcher process {}", pid),
            Message::InvalidPidFileContent => "Invalid PID file content".to_string(),
            Message::WatcherReceivedSigterm => "Received SIGTERM, shutting down...".to_string(),
            Message::WatcherReceivedSigint => "Received SIGINT, shutting down...".to_string(),
            Message::WatcherReceivedCtrlC => "Received Ctrl+C, shutting down...".to_string(),
            Message::WatcherCtrlCListenFailed(e) => format!("Failed to listen for Ctrl+C: {}", e),
            Message::WatcherSignalHandlingNotSupported => "Signal handling is not supported on this platform".to_string(),
            Message::TrackerExitedNormally => "Tracker exited normally".to_string(),
            Message::TrackerError(e) => format!("Tracker error: {}", e),
            Message::TrackerTaskPanicked(e) => format!("Tracker task panicked: {}", e),
            Message::TrackerShuttingDown => "Shutting down tracker...".to_string(),
            Message::DaemonModeNotSupported => "Daemon mode is not supported on this platform".to_string(),
            Message::ProcessTerminationNotSupported => "Process termination is not supported on this platform".to_string(),
            Message::FailedToOpenProcess(code) => format!("Failed to open process (error {})", code),
            Message::FailedToTerminateProcess(code) => format!("Failed to terminate process (error {})", code),
            Message::FailedToGetCurrentExecutable => "Failed to get current executable path".to_string(),
            Message::FailedToCreateSignalHandler => "Failed to create signal handler".to_string(),
            Message::DaemonRunning(pid) => format!("Watcher running with PID {}", pid),
            Message::DaemonNotRunning => "Watcher not running".to_string(),
            Message::DaemonStalePidfile => "Watcher not running (stale PID file removed)".to_string(),

            // === CONFIG MESSAGES ===
            Message::ConfigSaved => "Configuration saved".to_string(),
            Message::PromptSelectModules => "Select modules to configure".to_string(),
            Message::ConfigModuleTracker => "Tracker configuration".to_string(),
            Message::ConfigModuleSync => "Sync configuration".to_string(),
            Message::PromptIdleThreshold => "Idle threshold in seconds".to_string(),
            Message::PromptDebounceDelay => "App switch debounce delay in seconds".to_string(),
            Message::PromptPollInterval => "Poll interval in seconds".to_string(),
            Message::PromptMaxSegmentDuration => "Maximum single segment duration in seconds".to_string(),
            Message::PromptIncludeWindowTitles => "Include window titles in tracked identities?".to_string(),
            Message::PromptSyncEndpoint => "Sync endpoint URL".to_string(),
            Message::PromptSyncInterval => "Sync interval in seconds".to_string(),
            Message::ConfigInvalidEnvValue(var, value) => format!("Invalid value for {}: {}", var, value),

            // === SYNC MESSAGES ===
            Message::SyncNotConfigured => "Sync is not configured. Run 'traq init' to set an endpoint.".to_string(),
            Message::SyncNoFiles => "No activity files found to sync".to_string(),
            Message::SyncStarting(hours) => format!("Syncing {} hours of data...", hours),
            Message::SyncHourOk(hour, total, files) => format!("Synced {}: {:.1}s across {} files", hour, total, files),
            Message::SyncHourFailed(hour, e) => format!("Sync failed for {}: {}", hour, e),
            Message::SyncHourAlreadySynced(hour) => format!("Hour {} already synced (use --force to resync)", hour),
            Message::SyncSummary(synced, failed, skipped) => {
                format!("Sync completed: {} synced, {} failed, {} skipped", synced, failed, skipped)
            }
            Message::SyncStateSaveFailed(e) => format!("Could not save sync state: {}", e),
            Message::SyncStatusReport(device, total, synced, pending) => {
                format!("Device: {}\nTotal hours available: {}\nAlready synced: {}\nPending sync: {}", device, total, synced, pending)
            }

            // === SUM MESSAGES ===
            Message::SumNoData(date) => format!("No activity data recorded for {}", date),
            Message::SumTotal(total) => format!("Total: {:.1} seconds", total),
        };
        write!(f, "{}", text)
    }
}
