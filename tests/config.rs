#[cfg(test)]
mod tests {
    use std::sync::{Mutex, MutexGuard, OnceLock};
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};
    use traq::libs::config::{Config, SyncConfig, TrackerConfig};

    /// Config tests mutate process-wide environment variables, so the whole
    /// setup-to-teardown span is serialized through a shared lock held by
    /// the context.
    fn env_lock() -> MutexGuard<'static, ()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(())).lock().unwrap_or_else(|e| e.into_inner())
    }

    struct ConfigTestContext {
        _guard: MutexGuard<'static, ()>,
        _temp_dir: TempDir,
    }

    impl TestContext for ConfigTestContext {
        fn setup() -> Self {
            let guard = env_lock();
            let temp_dir = tempfile::tempdir().unwrap();
            std::env::set_var("TRAQ_DATA_DIR", temp_dir.path());
            std::env::remove_var("TRAQ_IDLE_THRESHOLD");
            std::env::remove_var("TRAQ_FAST_MODE");
            std::env::remove_var("TRAQ_ENDPOINT");
            ConfigTestContext {
                _guard: guard,
                _temp_dir: temp_dir,
            }
        }
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_default_config(_ctx: &mut ConfigTestContext) {
        let config = Config::default();
        assert!(config.tracker.is_none());
        assert!(config.sync.is_none());
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_tracker_defaults(_ctx: &mut ConfigTestContext) {
        let tracker = TrackerConfig::default();
        assert!(tracker.include_window_titles);
        assert_eq!(tracker.idle_threshold, 300);
        assert!((tracker.debounce_delay - 1.0).abs() < f64::EPSILON);
        assert!((tracker.poll_interval - 0.5).abs() < f64::EPSILON);
        assert!((tracker.max_segment_duration - 120.0).abs() < f64::EPSILON);
        assert!((tracker.minute_overflow_tolerance - 65.0).abs() < f64::EPSILON);
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_fast_mode_profile(_ctx: &mut ConfigTestContext) {
        let tracker = TrackerConfig::fast();
        assert!(!tracker.include_window_titles);
        assert!((tracker.debounce_delay - 0.3).abs() < f64::EPSILON);
        // Everything else keeps its default.
        assert_eq!(tracker.idle_threshold, 300);
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_read_without_file_returns_defaults(_ctx: &mut ConfigTestContext) {
        let config = Config::read().unwrap();
        assert!(config.tracker.is_none());
        assert!(config.sync.is_none());
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_save_and_read_roundtrip(_ctx: &mut ConfigTestContext) {
        let config = Config {
            tracker: Some(TrackerConfig {
                idle_threshold: 120,
                ..Default::default()
            }),
            sync: Some(SyncConfig {
                endpoint: "https://collector.example.com/activity".to_string(),
                sync_interval: 1800,
            }),
        };
        config.save().unwrap();

        let loaded = Config::read().unwrap();
        assert_eq!(loaded.tracker.unwrap().idle_threshold, 120);
        let sync = loaded.sync.unwrap();
        assert_eq!(sync.endpoint, "https://collector.example.com/activity");
        assert_eq!(sync.sync_interval, 1800);
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_partial_file_fills_defaults(_ctx: &mut ConfigTestContext) {
        let config = Config {
            tracker: Some(TrackerConfig::default()),
            sync: None,
        };
        config.save().unwrap();

        let loaded = Config::read().unwrap();
        assert!(loaded.tracker.is_some());
        assert!(loaded.sync.is_none());
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_env_override_idle_threshold(_ctx: &mut ConfigTestContext) {
        std::env::set_var("TRAQ_IDLE_THRESHOLD", "60");
        let config = Config::read().unwrap();
        std::env::remove_var("TRAQ_IDLE_THRESHOLD");

        assert_eq!(config.tracker.unwrap().idle_threshold, 60);
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_env_override_fast_mode(_ctx: &mut ConfigTestContext) {
        std::env::set_var("TRAQ_FAST_MODE", "1");
        let config = Config::read().unwrap();
        std::env::remove_var("TRAQ_FAST_MODE");

        let tracker = config.tracker.unwrap();
        assert!(!tracker.include_window_titles);
        assert!((tracker.debounce_delay - 0.3).abs() < f64::EPSILON);
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_env_override_endpoint_creates_sync_section(_ctx: &mut ConfigTestContext) {
        std::env::set_var("TRAQ_ENDPOINT", "https://env.example.com");
        let config = Config::read().unwrap();
        std::env::remove_var("TRAQ_ENDPOINT");

        let sync = config.sync.unwrap();
        assert_eq!(sync.endpoint, "https://env.example.com");
        assert_eq!(sync.sync_interval, 3600);
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_invalid_env_value_is_ignored(_ctx: &mut ConfigTestContext) {
        std::env::set_var("TRAQ_IDLE_THRESHOLD", "not-a-number");
        let config = Config::read().unwrap();
        std::env::remove_var("TRAQ_IDLE_THRESHOLD");

        // The invalid override leaves the section untouched.
        assert!(config.tracker.is_none());
    }
}
