//! Per-minute activity bucket persistence.
//!
//! Each wall-clock minute gets its own JSON file named
//! `activity_{YYYYMMDD_HHMM}.json` mapping activity identity to seconds.
//! The key format is a storage contract: the aggregator and sync tooling
//! parse these filenames, so it must be preserved exactly. Writes merge
//! additively with any existing bucket for the same minute, round to two
//! decimals, and drop sub-0.01 s noise.

use crate::libs::data_storage::DataStorage;
use anyhow::Result;
use chrono::{DateTime, Local};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

pub const BUCKET_PREFIX: &str = "activity_";

pub struct ActivityStore {
    data_dir: PathBuf,
}

impl ActivityStore {
    pub fn new() -> Result<Self> {
        Ok(Self {
            data_dir: DataStorage::new().base_dir()?,
        })
    }

    /// Store rooted at an explicit directory (tests, custom data dirs).
    pub fn with_dir(data_dir: PathBuf) -> Result<Self> {
        if !data_dir.exists() {
            fs::create_dir_all(&data_dir)?;
        }
        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &PathBuf {
        &self.data_dir
    }

    /// Bucket filename for the given instant.
    pub fn minute_filename(now: &DateTime<Local>) -> String {
        format!("{}{}.json", BUCKET_PREFIX, now.format("%Y%m%d_%H%M"))
    }

    /// Loads a bucket file, returning an empty map when the file is absent
    /// or corrupt. A half-written bucket is treated as missing rather than
    /// failing the flush that wants to merge into it.
    pub fn load(&self, filename: &str) -> HashMap<String, f64> {
        let filepath = self.data_dir.join(filename);
        if !filepath.exists() {
            return HashMap::new();
        }

        fs::read_to_string(&filepath)
            .ok()
            .and_then(|text| serde_json::from_str(&text).ok())
            .unwrap_or_default()
    }

    fn save(&self, data: &HashMap<String, f64>, filename: &str) -> Result<()> {
        if data.is_empty() {
            return Ok(());
        }
        let filepath = self.data_dir.join(filename);
        let json = serde_json::to_string_pretty(data)?;
        fs::write(&filepath, json)?;
        Ok(())
    }

    /// Merges session data into the bucket for `now` and writes it back.
    /// Values are rounded to two decimals after the merge; entries below
    /// 0.01 s are dropped.
    pub fn merge_and_save(&self, session_data: &HashMap<String, f64>, now: &DateTime<Local>) -> Result<()> {
        if session_data.is_empty() {
            return Ok(());
        }

        let filename = Self::minute_filename(now);
        let mut existing = self.load(&filename);

        for (app, duration) in session_data {
            *existing.entry(app.clone()).or_insert(0.0) += duration;
        }

        let merged: HashMap<String, f64> = existing
            .into_iter()
            .map(|(app, duration)| (app, round2(duration)))
            .filter(|(_, duration)| *duration >= 0.01)
            .collect();

        self.save(&merged, &filename)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
