//! Daemon lifecycle management for the watch command.
//!
//! Handles spawning the tracker as a detached background process, stopping
//! it via the pidfile, reporting liveness, and running the foreground loop
//! with signal handling so a SIGTERM/Ctrl-C still flushes the final
//! partial segment.

use crate::api::sync::SyncManager;
use crate::libs::config::Config;
use crate::libs::data_storage::DataStorage;
use crate::libs::messages::Message;
use crate::libs::tracker::ActivityTracker;
use crate::{msg_bail_anyhow, msg_error, msg_error_anyhow, msg_info, msg_warning};
use anyhow::Result;
use std::time::Duration;

const PID_FILE: &str = "traq-watch.pid";

/// Runs the tracker in the foreground with signal handling for graceful
/// shutdown. When sync is configured, a background task pushes pending
/// hours on the configured interval.
pub async fn run_with_signal_handling() -> Result<()> {
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    #[cfg(unix)]
    {
        tokio::spawn(async move {
            use tokio::signal::unix::{signal, SignalKind};

            let mut sigterm = signal(SignalKind::terminate()).expect(&Message::FailedToCreateSignalHandler.to_string());
            let mut sigint = signal(SignalKind::interrupt()).expect(&Message::FailedToCreateSignalHandler.to_string());

            tokio::select! {
                _ = sigterm.recv() => {
                    msg_info!(Message::WatcherReceivedSigterm);
                }
                _ = sigint.recv() => {
                    msg_info!(Message::WatcherReceivedSigint);
                }
            }

            let _ = shutdown_tx.send(());
        });
    }

    #[cfg(windows)]
    {
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    msg_info!(Message::WatcherReceivedCtrlC);
                }
                Err(e) => {
                    msg_error!(Message::WatcherCtrlCListenFailed(e.to_string()));
                }
            }

            let _ = shutdown_tx.send(());
        });
    }

    #[cfg(not(any(unix, windows)))]
    {
        msg_warning!(Message::WatcherSignalHandlingNotSupported);
    }

    let config = Config::read()?;
    let mut tracker = ActivityTracker::new(config.tracker.clone().unwrap_or_default())?;
    let handle = tracker.handle();

    // Periodic upload of pending hours, independent of the tracking loop.
    let sync_task = config.sync.clone().map(|sync_config| {
        tokio::spawn(async move {
            let data_dir = match DataStorage::new().base_dir() {
                Ok(dir) => dir,
                Err(e) => {
                    msg_warning!(Message::SyncStateSaveFailed(e.to_string()));
                    return;
                }
            };
            let mut manager = SyncManager::new(&sync_config, data_dir);
            let mut interval = tokio::time::interval(Duration::from_secs(sync_config.sync_interval.max(60)));
            interval.tick().await; // the first tick completes immediately
            loop {
                interval.tick().await;
                manager.sync_all(false, None).await;
            }
        })
    });

    let mut tracker_task = tokio::spawn(async move { tracker.run().await });

    tokio::select! {
        result = &mut tracker_task => {
            match result {
                Ok(Ok(())) => msg_info!(Message::TrackerExitedNormally),
                Ok(Err(e)) => msg_error!(Message::TrackerError(e.to_string())),
                Err(e) => msg_error!(Message::TrackerTaskPanicked(e.to_string())),
            }
        }
        _ = shutdown_rx => {
            msg_info!(Message::TrackerShuttingDown);
            handle.stop();
            // Wait for the loop to notice the flag and flush its final
            // segment before exiting.
            match tracker_task.await {
                Ok(Ok(())) => msg_info!(Message::TrackerExitedNormally),
                Ok(Err(e)) => msg_error!(Message::TrackerError(e.to_string())),
                Err(e) => msg_error!(Message::TrackerTaskPanicked(e.to_string())),
            }
        }
    }

    if let Some(task) = sync_task {
        task.abort();
    }

    // Clean up PID file on exit
    let pid_path = DataStorage::new().get_path(PID_FILE)?;
    if pid_path.exists() {
        let _ = std::fs::remove_file(&pid_path);
    }

    Ok(())
}

/// Spawns the watcher as a detached background process. An already-running
/// watcher is stopped first.
pub fn spawn() -> Result<()> {
    let pid_path = DataStorage::new().get_path(PID_FILE)?;

    if pid_path.exists() {
        if let Ok(pid_str) = std::fs::read_to_string(&pid_path) {
            msg_info!(Message::WatcherStoppingExisting(pid_str.trim().to_string()));
            if let Err(e) = stop_internal() {
                msg_warning!(Message::WatcherFailedToStopExisting(e.to_string()));
                let _ = std::fs::remove_file(&pid_path);
            }
            // Give the old process time to clean up
            std::thread::sleep(Duration::from_millis(1000));
        }
    }

    let current_exe = std::env::current_exe().map_err(|_| msg_error_anyhow!(Message::FailedToGetCurrentExecutable))?;

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        let child = unsafe {
            std::process::Command::new(current_exe)
                .args(["watch", "--foreground"])
                .pre_exec(|| {
                    // Detach from the current session to become a daemon.
                    nix::unistd::setsid()?;
                    Ok(())
                })
                .spawn()?
        };
        let pid = child.id();
        std::fs::write(pid_path, pid.to_string())?;
        msg_info!(Message::WatcherStarted(pid));
    }

    #[cfg(windows)]
    {
        use std::os::windows::process::CommandExt;
        const CREATE_NO_WINDOW: u32 = 0x08000000;
        let child = std::process::Command::new(current_exe)
            .args(["watch", "--foreground"])
            .creation_flags(CREATE_NO_WINDOW)
            .spawn()?;
        let pid = child.id();
        std::fs::write(pid_path, pid.to_string())?;
        msg_info!(Message::WatcherStarted(pid));
    }

    #[cfg(not(any(unix, windows)))]
    {
        msg_bail_anyhow!(Message::DaemonModeNotSupported);
    }

    Ok(())
}

/// Finds and stops the running watcher process.
pub fn stop() -> Result<()> {
    match stop_internal() {
        Ok(()) => Ok(()),
        Err(e) => {
            // A watcher that was not running is not an error for `stop`.
            if e.to_string().contains("not found") || e.to_string().contains("not running") {
                msg_info!(Message::WatcherNotRunning);
                Ok(())
            } else {
                Err(e)
            }
        }
    }
}

/// Reports whether the watcher is alive according to the pidfile.
pub fn status() -> Result<()> {
    let pid_path = DataStorage::new().get_path(PID_FILE)?;
    if !pid_path.exists() {
        msg_info!(Message::DaemonNotRunning);
        return Ok(());
    }

    let pid_str = std::fs::read_to_string(&pid_path)?;
    let pid: u32 = pid_str.trim().parse().map_err(|_| msg_error_anyhow!(Message::InvalidPidFileContent))?;

    if process_exists(pid)? {
        msg_info!(Message::DaemonRunning(pid));
    } else {
        let _ = std::fs::remove_file(&pid_path);
        msg_info!(Message::DaemonStalePidfile);
    }
    Ok(())
}

fn stop_internal() -> Result<()> {
    let pid_path = DataStorage::new().get_path(PID_FILE)?;
    if !pid_path.exists() {
        msg_bail_anyhow!(Message::WatcherNotRunningPidNotFound);
    }

    let pid_str = std::fs::read_to_string(&pid_path)?;
    let pid: u32 = pid_str.trim().parse().map_err(|_| msg_error_anyhow!(Message::InvalidPidFileContent))?;

    let killed = kill_process(pid)?;

    // Clean up the PID file regardless of whether the process was found.
    std::fs::remove_file(pid_path)?;

    if killed {
        msg_info!(Message::WatcherStopped(pid));
        Ok(())
    } else {
        msg_bail_anyhow!(Message::WatcherFailedToStop(pid));
    }
}

#[cfg(unix)]
fn process_exists(pid: u32) -> Result<bool> {
    use std::process::Command;
    let output = Command::new("ps").arg("-p").arg(pid.to_string()).output()?;
    Ok(output.status.success())
}

#[cfg(windows)]
fn process_exists(pid: u32) -> Result<bool> {
    use winapi::um::handleapi::CloseHandle;
    use winapi::um::processthreadsapi::OpenProcess;
    use winapi::um::winnt::PROCESS_TERMINATE;

    unsafe {
        let handle = OpenProcess(PROCESS_TERMINATE, 0, pid);
        if handle.is_null() {
            return Ok(false);
        }
        CloseHandle(handle);
        Ok(true)
    }
}

#[cfg(not(any(unix, windows)))]
fn process_exists(_pid: u32) -> Result<bool> {
    Ok(false)
}

/// Cross-platform process termination: graceful first, forceful after a
/// grace period.
#[cfg(unix)]
fn kill_process(pid: u32) -> Result<bool> {
    use std::process::Command;

    if !process_exists(pid)? {
        return Ok(false);
    }

    // SIGTERM lets the watcher flush its final segment.
    Command::new("kill").arg("-TERM").arg(pid.to_string()).output()?;

    for _ in 0..10 {
        std::thread::sleep(Duration::from_millis(100));
        if !process_exists(pid)? {
            return Ok(true);
        }
    }

    // Did not terminate gracefully, force kill.
    Command::new("kill").arg("-9").arg(pid.to_string()).output()?;

    std::thread::sleep(Duration::from_millis(100));
    Ok(true)
}

#[cfg(windows)]
fn kill_process(pid: u32) -> Result<bool> {
    use winapi::um::errhandlingapi::GetLastError;
    use winapi::um::handleapi::CloseHandle;
    use winapi::um::processthreadsapi::{OpenProcess, TerminateProcess};
    use winapi::um::winnt::PROCESS_TERMINATE;

    unsafe {
        let handle = OpenProcess(PROCESS_TERMINATE, 0, pid);
        if handle.is_null() {
            let error = GetLastError();
            if error == 87 {
                // ERROR_INVALID_PARAMETER - process doesn't exist
                return Ok(false);
            }
            msg_bail_anyhow!(Message::FailedToOpenProcess(error));
        }

        let result = TerminateProcess(handle, 0);
        CloseHandle(handle);

        if result == 0 {
            let error = GetLastError();
            msg_bail_anyhow!(Message::FailedToTerminateProcess(error));
        } else {
            std::thread::sleep(Duration::from_millis(100));
            Ok(true)
        }
    }
}

#[cfg(not(any(unix, windows)))]
fn kill_process(_pid: u32) -> Result<bool> {
    msg_bail_anyhow!(Message::ProcessTerminationNotSupported);
}
