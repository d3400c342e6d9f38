//! Hourly aggregation of per-minute activity buckets.
//!
//! Minute bucket files are grouped by the hour they belong to and folded
//! into a single [`HourSummary`] per hour for upload. The sync-state ledger
//! records which hours have already been pushed so repeated `sync` runs do
//! not re-send data unless forced.

use crate::libs::messages::Message;
use crate::libs::store::BUCKET_PREFIX;
use crate::msg_warning;
use anyhow::Result;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

const SYNC_STATE_FILE: &str = "synced_hours.json";

/// Parses `activity_YYYYMMDD_HHMM.json` into its timestamp. Returns `None`
/// for anything that is not a minute bucket file.
pub fn parse_bucket_filename(filename: &str) -> Option<NaiveDateTime> {
    let stem = filename.strip_prefix(BUCKET_PREFIX)?.strip_suffix(".json")?;
    NaiveDateTime::parse_from_str(stem, "%Y%m%d_%H%M").ok()
}

/// Hour key format shared with the sync endpoint: `YYYY-MM-DD_HH`.
pub fn hour_key(dt: &NaiveDateTime) -> String {
    dt.format("%Y-%m-%d_%H").to_string()
}

/// Aggregated activity for one hour of bucket files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HourSummary {
    pub applications: HashMap<String, f64>,
    pub total_time: f64,
    pub files_processed: usize,
}

pub struct DataAggregator {
    data_dir: PathBuf,
}

impl DataAggregator {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Groups minute bucket files by hour key, sorted chronologically.
    pub fn group_files_by_hour(&self) -> BTreeMap<String, Vec<PathBuf>> {
        let mut files_by_hour: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();

        let entries = match fs::read_dir(&self.data_dir) {
            Ok(entries) => entries,
            Err(_) => return files_by_hour,
        };

        for entry in entries.flatten() {
            let path = entry.path();
            let Some(filename) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if let Some(dt) = parse_bucket_filename(filename) {
                files_by_hour.entry(hour_key(&dt)).or_default().push(path);
            }
        }

        files_by_hour
    }

    /// Folds a set of minute files into one hour summary. Unreadable files
    /// are skipped with a warning; they do not count as processed.
    pub fn aggregate_hour(&self, file_paths: &[PathBuf]) -> HourSummary {
        let mut aggregated: HashMap<String, f64> = HashMap::new();
        let mut total_files = 0usize;

        for path in file_paths {
            match read_bucket(path) {
                Ok(data) => {
                    total_files += 1;
                    for (app, duration) in data {
                        *aggregated.entry(app).or_insert(0.0) += duration;
                    }
                }
                Err(e) => {
                    msg_warning!(Message::SyncHourFailed(path.display().to_string(), e.to_string()));
                }
            }
        }

        let total_time = aggregated.values().sum();
        HourSummary {
            applications: aggregated,
            total_time,
            files_processed: total_files,
        }
    }
}

fn read_bucket(path: &Path) -> Result<HashMap<String, f64>> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Sync statistics for status reporting.
#[derive(Debug, Clone)]
pub struct SyncStatistics {
    pub total_hours: usize,
    pub synced_hours: usize,
    pub pending_hours: usize,
}

/// Persistent record of which hours have been uploaded.
pub struct SyncState {
    synced: HashSet<String>,
    path: PathBuf,
}

impl SyncState {
    /// Loads the ledger from the data directory; a missing or corrupt file
    /// means nothing has been synced yet.
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join(SYNC_STATE_FILE);
        let synced = fs::read_to_string(&path)
            .ok()
            .and_then(|text| serde_json::from_str::<Vec<String>>(&text).ok())
            .map(|hours| hours.into_iter().collect())
            .unwrap_or_default();
        Self { synced, path }
    }

    pub fn save(&self) -> Result<()> {
        let hours: Vec<&String> = self.synced.iter().collect();
        fs::write(&self.path, serde_json::to_string(&hours)?)?;
        Ok(())
    }

    pub fn is_hour_synced(&self, hour_key: &str) -> bool {
        self.synced.contains(hour_key)
    }

    /// Marks an hour as synced and persists the ledger. A failed save is
    /// reported but not fatal; the hour would simply be re-sent next run.
    pub fn mark_hour_synced(&mut self, hour_key: &str) {
        self.synced.insert(hour_key.to_string());
        if let Err(e) = self.save() {
            msg_warning!(Message::SyncStateSaveFailed(e.to_string()));
        }
    }

    pub fn statistics(&self, available_hours: &[String]) -> SyncStatistics {
        let total_hours = available_hours.len();
        let synced_hours = available_hours.iter().filter(|h| self.synced.contains(*h)).count();
        SyncStatistics {
            total_hours,
            synced_hours,
            pending_hours: total_hours - synced_hours,
        }
    }
}
