#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use traq::api::sync::{device_name, HttpSyncClient, SyncReport};
    use traq::libs::aggregator::HourSummary;

    fn summary() -> HourSummary {
        let mut applications = HashMap::new();
        applications.insert("Code".to_string(), 90.0);
        applications.insert("Slack".to_string(), 30.0);
        HourSummary {
            applications,
            total_time: 120.0,
            files_processed: 2,
        }
    }

    #[test]
    fn test_payload_wire_format() {
        let payload = HttpSyncClient::build_payload("2025-06-02_09", &summary());

        assert_eq!(payload["hour"], "2025-06-02_09");
        assert_eq!(payload["timestamp"], "2025-06-02T09:00:00");
        assert_eq!(payload["source"], "traq");
        assert_eq!(payload["version"], env!("CARGO_PKG_VERSION"));
        assert!(!payload["device"].as_str().unwrap().is_empty());

        assert_eq!(payload["data"]["total_time"], 120.0);
        assert_eq!(payload["data"]["files_processed"], 2);
        assert_eq!(payload["data"]["applications"]["Code"], 90.0);
    }

    #[test]
    fn test_payload_with_unparseable_hour_key() {
        // A malformed key falls back to the key itself as the timestamp
        // rather than failing the upload.
        let payload = HttpSyncClient::build_payload("garbage", &summary());
        assert_eq!(payload["timestamp"], "garbage");
        assert_eq!(payload["hour"], "garbage");
    }

    #[test]
    fn test_device_name_is_usable() {
        let name = device_name();
        assert!(!name.is_empty());
        assert_ne!(name, "localhost");
        assert!(!name.ends_with(".local"));
    }

    #[test]
    fn test_report_starts_empty() {
        let report = SyncReport::default();
        assert_eq!(report.synced, 0);
        assert_eq!(report.failed, 0);
        assert_eq!(report.skipped, 0);
    }
}
