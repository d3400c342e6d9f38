use crate::api::sync::{device_name, SyncManager};
use crate::libs::config::Config;
use crate::libs::data_storage::DataStorage;
use crate::libs::messages::Message;
use crate::{msg_print, msg_warning};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct SyncArgs {
    /// Show sync status without sending anything
    #[arg(long)]
    status: bool,

    /// Re-send hours already marked as synced
    #[arg(long)]
    force: bool,

    /// Only sync the most recent N hours
    #[arg(long, value_name = "N")]
    recent: Option<usize>,
}

/// Manually pushes pending hourly aggregates to the configured endpoint.
pub async fn cmd(args: SyncArgs) -> Result<()> {
    let config = Config::read()?;
    let Some(sync_config) = config.sync else {
        msg_warning!(Message::SyncNotConfigured);
        return Ok(());
    };

    let data_dir = DataStorage::new().base_dir()?;
    let mut manager = SyncManager::new(&sync_config, data_dir);

    if args.status {
        let stats = manager.statistics();
        msg_print!(Message::SyncStatusReport(
            device_name(),
            stats.total_hours,
            stats.synced_hours,
            stats.pending_hours
        ));
        return Ok(());
    }

    let report = manager.sync_all(args.force, args.recent).await;
    msg_print!(Message::SyncSummary(report.synced, report.failed, report.skipped));
    Ok(())
}
