#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};
    use traq::libs::aggregator::{hour_key, parse_bucket_filename, DataAggregator, SyncState};

    struct AggregatorTestContext {
        temp_dir: TempDir,
    }

    impl TestContext for AggregatorTestContext {
        fn setup() -> Self {
            AggregatorTestContext {
                temp_dir: tempfile::tempdir().unwrap(),
            }
        }
    }

    fn write_bucket(ctx: &AggregatorTestContext, name: &str, data: &HashMap<String, f64>) {
        fs::write(ctx.temp_dir.path().join(name), serde_json::to_string(data).unwrap()).unwrap();
    }

    fn bucket(app: &str, secs: f64) -> HashMap<String, f64> {
        let mut data = HashMap::new();
        data.insert(app.to_string(), secs);
        data
    }

    #[test]
    fn test_parse_bucket_filename() {
        let dt = parse_bucket_filename("activity_20250602_0905.json").unwrap();
        assert_eq!(hour_key(&dt), "2025-06-02_09");

        assert!(parse_bucket_filename("config.json").is_none());
        assert!(parse_bucket_filename("activity_garbage.json").is_none());
        assert!(parse_bucket_filename("activity_20250602_0905.txt").is_none());
    }

    #[test_context(AggregatorTestContext)]
    #[test]
    fn test_group_files_by_hour(ctx: &mut AggregatorTestContext) {
        write_bucket(ctx, "activity_20250602_0905.json", &bucket("Code", 60.0));
        write_bucket(ctx, "activity_20250602_0930.json", &bucket("Code", 60.0));
        write_bucket(ctx, "activity_20250602_1000.json", &bucket("Slack", 30.0));
        // Non-bucket files in the same directory are ignored.
        fs::write(ctx.temp_dir.path().join("config.json"), "{}").unwrap();

        let aggregator = DataAggregator::new(ctx.temp_dir.path().to_path_buf());
        let groups = aggregator.group_files_by_hour();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups["2025-06-02_09"].len(), 2);
        assert_eq!(groups["2025-06-02_10"].len(), 1);

        // BTreeMap keys come out chronologically.
        let hours: Vec<&String> = groups.keys().collect();
        assert_eq!(hours, ["2025-06-02_09", "2025-06-02_10"]);
    }

    #[test_context(AggregatorTestContext)]
    #[test]
    fn test_aggregate_hour_sums_across_files(ctx: &mut AggregatorTestContext) {
        write_bucket(ctx, "activity_20250602_0905.json", &bucket("Code", 45.0));
        let mut mixed = bucket("Code", 15.0);
        mixed.insert("Slack".to_string(), 30.0);
        write_bucket(ctx, "activity_20250602_0906.json", &mixed);

        let aggregator = DataAggregator::new(ctx.temp_dir.path().to_path_buf());
        let files = aggregator.group_files_by_hour().remove("2025-06-02_09").unwrap();
        let summary = aggregator.aggregate_hour(&files);

        assert_eq!(summary.files_processed, 2);
        assert!((summary.applications["Code"] - 60.0).abs() < 1e-9);
        assert!((summary.applications["Slack"] - 30.0).abs() < 1e-9);
        assert!((summary.total_time - 90.0).abs() < 1e-9);
    }

    #[test_context(AggregatorTestContext)]
    #[test]
    fn test_aggregate_hour_skips_unreadable_files(ctx: &mut AggregatorTestContext) {
        write_bucket(ctx, "activity_20250602_0905.json", &bucket("Code", 45.0));
        fs::write(ctx.temp_dir.path().join("activity_20250602_0906.json"), "{broken").unwrap();

        let aggregator = DataAggregator::new(ctx.temp_dir.path().to_path_buf());
        let files = aggregator.group_files_by_hour().remove("2025-06-02_09").unwrap();
        let summary = aggregator.aggregate_hour(&files);

        assert_eq!(summary.files_processed, 1);
        assert!((summary.total_time - 45.0).abs() < 1e-9);
    }

    #[test_context(AggregatorTestContext)]
    #[test]
    fn test_missing_data_dir_yields_no_groups(_ctx: &mut AggregatorTestContext) {
        let aggregator = DataAggregator::new("/nonexistent/traq-test-dir".into());
        assert!(aggregator.group_files_by_hour().is_empty());
    }

    #[test_context(AggregatorTestContext)]
    #[test]
    fn test_sync_state_roundtrip(ctx: &mut AggregatorTestContext) {
        let mut state = SyncState::load(ctx.temp_dir.path());
        assert!(!state.is_hour_synced("2025-06-02_09"));

        state.mark_hour_synced("2025-06-02_09");
        assert!(state.is_hour_synced("2025-06-02_09"));

        // A fresh load sees the persisted ledger.
        let reloaded = SyncState::load(ctx.temp_dir.path());
        assert!(reloaded.is_hour_synced("2025-06-02_09"));
        assert!(!reloaded.is_hour_synced("2025-06-02_10"));
    }

    #[test_context(AggregatorTestContext)]
    #[test]
    fn test_sync_state_corrupt_file_starts_empty(ctx: &mut AggregatorTestContext) {
        fs::write(ctx.temp_dir.path().join("synced_hours.json"), "not json").unwrap();
        let state = SyncState::load(ctx.temp_dir.path());
        assert!(!state.is_hour_synced("2025-06-02_09"));
    }

    #[test_context(AggregatorTestContext)]
    #[test]
    fn test_sync_statistics(ctx: &mut AggregatorTestContext) {
        let mut state = SyncState::load(ctx.temp_dir.path());
        state.mark_hour_synced("2025-06-02_09");

        let available = vec!["2025-06-02_09".to_string(), "2025-06-02_10".to_string()];
        let stats = state.statistics(&available);
        assert_eq!(stats.total_hours, 2);
        assert_eq!(stats.synced_hours, 1);
        assert_eq!(stats.pending_hours, 1);
    }
}
