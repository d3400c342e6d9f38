//! HTTP synchronization with the remote activity endpoint.
//!
//! Hourly aggregates are pushed as JSON. Delivery is at-least-once: the
//! sync-state ledger prevents re-sending hours that were acknowledged, but
//! a crash between acknowledgement and ledger write simply re-sends the
//! hour next run.

use crate::libs::aggregator::{DataAggregator, HourSummary, SyncState, SyncStatistics};
use crate::libs::config::SyncConfig;
use crate::libs::messages::Message;
use crate::{msg_debug, msg_error, msg_info, msg_print, msg_success};
use chrono::NaiveDateTime;
use reqwest::{Client, StatusCode};
use serde_json::json;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("endpoint returned HTTP {0}")]
    Status(StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Host name used to identify this machine in sync payloads. macOS
/// hostnames carry a `.local` suffix that is stripped for readability.
pub fn device_name() -> String {
    sysinfo::System::host_name()
        .map(|name| name.strip_suffix(".local").unwrap_or(&name).to_string())
        .filter(|name| !name.is_empty() && name != "localhost")
        .unwrap_or_else(|| format!("{}-{}", std::env::consts::OS, std::env::consts::ARCH))
}

pub struct HttpSyncClient {
    client: Client,
    endpoint: String,
}

impl HttpSyncClient {
    pub fn new(endpoint: &str) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            endpoint: endpoint.to_string(),
        }
    }

    /// Payload format consumed by the remote collector; field names are a
    /// wire contract.
    pub fn build_payload(hour_key: &str, summary: &HourSummary) -> serde_json::Value {
        let timestamp = NaiveDateTime::parse_from_str(&format!("{}_00", hour_key), "%Y-%m-%d_%H_%M")
            .map(|dt| dt.format("%Y-%m-%dT%H:%M:%S").to_string())
            .unwrap_or_else(|_| hour_key.to_string());

        json!({
            "timestamp": timestamp,
            "hour": hour_key,
            "data": summary,
            "source": "traq",
            "device": device_name(),
            "version": env!("CARGO_PKG_VERSION"),
        })
    }

    /// Posts one hour of aggregated data to the endpoint.
    pub async fn sync_hour(&self, hour_key: &str, summary: &HourSummary) -> Result<(), SyncError> {
        let payload = Self::build_payload(hour_key, summary);
        let response = self.client.post(&self.endpoint).json(&payload).send().await?;

        match response.status() {
            StatusCode::OK | StatusCode::CREATED => Ok(()),
            status => Err(SyncError::Status(status)),
        }
    }
}

/// Outcome counts for one sync run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncReport {
    pub synced: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Orchestrates aggregation, upload, and sync-state bookkeeping.
pub struct SyncManager {
    aggregator: DataAggregator,
    state: SyncState,
    client: HttpSyncClient,
}

impl SyncManager {
    pub fn new(config: &SyncConfig, data_dir: PathBuf) -> Self {
        let state = SyncState::load(&data_dir);
        Self {
            aggregator: DataAggregator::new(data_dir),
            state,
            client: HttpSyncClient::new(&config.endpoint),
        }
    }

    /// Syncs all pending hours, oldest first. `force` re-sends hours the
    /// ledger already marks as synced; `max_hours` limits the run to the
    /// most recent N hours.
    pub async fn sync_all(&mut self, force: bool, max_hours: Option<usize>) -> SyncReport {
        let files_by_hour = self.aggregator.group_files_by_hour();
        if files_by_hour.is_empty() {
            msg_info!(Message::SyncNoFiles);
            return SyncReport::default();
        }

        let mut hours: Vec<String> = files_by_hour.keys().cloned().collect();
        if let Some(max) = max_hours {
            if hours.len() > max {
                hours = hours.split_off(hours.len() - max);
            }
        }

        msg_print!(Message::SyncStarting(hours.len()));

        let mut report = SyncReport::default();
        for hour_key in hours {
            if !force && self.state.is_hour_synced(&hour_key) {
                msg_debug!("{}", Message::SyncHourAlreadySynced(hour_key.clone()));
                report.skipped += 1;
                continue;
            }

            let file_paths = &files_by_hour[&hour_key];
            let summary = self.aggregator.aggregate_hour(file_paths);

            match self.client.sync_hour(&hour_key, &summary).await {
                Ok(()) => {
                    self.state.mark_hour_synced(&hour_key);
                    msg_success!(Message::SyncHourOk(hour_key, summary.total_time, summary.files_processed));
                    report.synced += 1;
                }
                Err(e) => {
                    msg_error!(Message::SyncHourFailed(hour_key, e.to_string()));
                    report.failed += 1;
                }
            }
        }

        report
    }

    /// Sync statistics over the hours currently on disk.
    pub fn statistics(&self) -> SyncStatistics {
        let available: Vec<String> = self.aggregator.group_files_by_hour().keys().cloned().collect();
        self.state.statistics(&available)
    }
}
