use crate::libs::aggregator::parse_bucket_filename;
use crate::libs::data_storage::DataStorage;
use crate::libs::messages::Message;
use crate::{msg_info, msg_print};
use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::Args;
use prettytable::{row, Table};
use std::collections::HashMap;
use std::fs;

#[derive(Debug, Args)]
pub struct SumArgs {
    /// Date to summarize (YYYY-MM-DD), defaults to today
    #[arg(short, long)]
    date: Option<String>,
}

/// Prints a per-application summary of one day's minute buckets.
pub fn cmd(args: SumArgs) -> Result<()> {
    let date = match args.date {
        Some(ref raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")?,
        None => Local::now().date_naive(),
    };

    let totals = collect_day(date)?;
    if totals.is_empty() {
        msg_info!(Message::SumNoData(date.to_string()));
        return Ok(());
    }

    let mut rows: Vec<(String, f64)> = totals.into_iter().collect();
    rows.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    let total: f64 = rows.iter().map(|(_, secs)| secs).sum();

    let mut table = Table::new();
    table.add_row(row!["APPLICATION", "TIME", "SHARE"]);
    for (app, secs) in &rows {
        table.add_row(row![app, format_duration(*secs), format!("{:.1}%", secs / total * 100.0)]);
    }
    table.printstd();

    msg_print!(Message::SumTotal(total));
    Ok(())
}

/// Sums every minute bucket recorded on the given date.
fn collect_day(date: NaiveDate) -> Result<HashMap<String, f64>> {
    let data_dir = DataStorage::new().base_dir()?;
    let mut totals: HashMap<String, f64> = HashMap::new();

    let entries = match fs::read_dir(&data_dir) {
        Ok(entries) => entries,
        Err(_) => return Ok(totals),
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let Some(filename) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(dt) = parse_bucket_filename(filename) else {
            continue;
        };
        if dt.date() != date {
            continue;
        }
        // Unreadable or malformed buckets are skipped silently; partial
        // sums are better than none for a display command.
        if let Ok(text) = fs::read_to_string(&path) {
            if let Ok(data) = serde_json::from_str::<HashMap<String, f64>>(&text) {
                for (app, secs) in data {
                    *totals.entry(app).or_insert(0.0) += secs;
                }
            }
        }
    }

    Ok(totals)
}

fn format_duration(secs: f64) -> String {
    let whole = secs.round() as u64;
    format!("{:02}:{:02}:{:02}", whole / 3600, (whole % 3600) / 60, whole % 60)
}
