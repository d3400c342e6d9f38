use crate::libs::daemon;
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Stop the running watcher
    #[arg(long)]
    stop: bool,

    /// Report whether the watcher is running
    #[arg(long)]
    status: bool,

    /// Run in the foreground instead of detaching
    #[arg(long, hide = true)]
    foreground: bool,
}

/// Entry point for the watch command.
///
/// Without flags the watcher is (re)started as a detached background
/// process; the hidden `--foreground` flag is what the spawned child runs
/// with, and is also handy for debugging under `TRAQ_DEBUG`.
pub async fn cmd(args: WatchArgs) -> Result<()> {
    if args.stop {
        return daemon::stop();
    }
    if args.status {
        return daemon::status();
    }
    if args.foreground {
        return daemon::run_with_signal_handling().await;
    }
    daemon::spawn()
}
