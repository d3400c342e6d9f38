/// All user-facing messages emitted by the application.
///
/// Centralizing message text behind an enum keeps wording consistent and
/// makes every message grep-able from one place. Formatting lives in the
/// `Display` implementation in `display.rs`.
#[derive(Debug, Clone)]
pub enum Message {
    // === TRACKING MESSAGES ===
    TrackingStarted(String),
    TrackingStopped,
    InitialApp(String),
    AppSwitch(String, f64, String),
    IdleDetected(f64),
    ActivityResumed(f64),
    MinuteSaved(f64),
    TrackerLoopError(String),
    PersistRequeued(usize),

    // === DETECTION MESSAGES ===
    AppDetectionFailed(String),
    WindowTitleFailed(String, String),
    InputListenerFailed(String),

    // === WATCHER / DAEMON MESSAGES ===
    WatcherStarted(u32),
    WatcherStopped(u32),
    WatcherNotRunning,
    WatcherNotRunningPidNotFound,
    WatcherStoppingExisting(String),
    WatcherFailedToStopExisting(String),
    WatcherFailedToStop(u32),
    InvalidPidFileContent,
    WatcherReceivedSigterm,
    WatcherReceivedSigint,
    WatcherReceivedCtrlC,
    WatcherCtrlCListenFailed(String),
    WatcherSignalHandlingNotSupported,
    TrackerExitedNormally,
    TrackerError(String),
    TrackerTaskPanicked(String),
    TrackerShuttingDown,
    DaemonModeNotSupported,
    ProcessTerminationNotSupported,
    FailedToOpenProcess(u32),
    FailedToTerminateProcess(u32),
    FailedToGetCurrentExecutable,
    FailedToCreateSignalHandler,
    DaemonRunning(u32),
    DaemonNotRunning,
    DaemonStalePidfile,

    // === CONFIG MESSAGES ===
    ConfigSaved,
    PromptSelectModules,
    ConfigModuleTracker,
    ConfigModuleSync,
    PromptIdleThreshold,
    PromptDebounceDelay,
    PromptPollInterval,
    PromptMaxSegmentDuration,
    PromptIncludeWindowTitles,
    PromptSyncEndpoint,
    PromptSyncInterval,
    ConfigInvalidEnvValue(String, String),

    // === SYNC MESSAGES ===
    SyncNotConfigured,
    SyncNoFiles,
    SyncStarting(usize),
    SyncHourOk(String, f64, usize),
    SyncHourFailed(String, String),
    SyncHourAlreadySynced(String),
    SyncSummary(usize, usize, usize),
    SyncStateSaveFailed(String),
    SyncStatusReport(String, usize, usize, usize),

    // === SUM MESSAGES ===
    SumNoData(String),
    SumTotal(f64),
}
