#[cfg(test)]
mod tests {
    use parking_lot::Mutex;
    use std::sync::Arc;
    use traq::libs::config::TrackerConfig;
    use traq::libs::detect::{AppProbe, IdleProbe};
    use traq::libs::monitor::ActivityMonitor;

    /// Probe returning whatever the test last stored.
    struct FakeAppProbe {
        app: Arc<Mutex<Option<String>>>,
        title: Arc<Mutex<Option<String>>>,
    }

    impl AppProbe for FakeAppProbe {
        fn active_application(&self) -> Option<String> {
            self.app.lock().clone()
        }

        fn window_title(&self, _app_name: &str) -> Option<String> {
            self.title.lock().clone()
        }
    }

    struct FakeIdleProbe {
        idle: Arc<Mutex<f64>>,
    }

    impl IdleProbe for FakeIdleProbe {
        fn idle_seconds(&self) -> f64 {
            *self.idle.lock()
        }
    }

    struct Fixture {
        monitor: ActivityMonitor,
        app: Arc<Mutex<Option<String>>>,
        title: Arc<Mutex<Option<String>>>,
        idle: Arc<Mutex<f64>>,
    }

    fn fixture(config: TrackerConfig) -> Fixture {
        let app = Arc::new(Mutex::new(None));
        let title = Arc::new(Mutex::new(None));
        let idle = Arc::new(Mutex::new(0.0));

        let app_probe = FakeAppProbe {
            app: app.clone(),
            title: title.clone(),
        };
        let idle_probe = FakeIdleProbe { idle: idle.clone() };
        let monitor = ActivityMonitor::new(config, Box::new(app_probe), Box::new(idle_probe));

        Fixture { monitor, app, title, idle }
    }

    #[test]
    fn test_current_activity_fast_mode_uses_bare_app_name() {
        let fx = fixture(TrackerConfig::fast());
        *fx.app.lock() = Some("Code".to_string());
        *fx.title.lock() = Some("main.rs".to_string());
        assert_eq!(fx.monitor.current_activity(), Some("Code".to_string()));
    }

    #[test]
    fn test_current_activity_detailed_mode_composes_identity() {
        let fx = fixture(TrackerConfig::default());
        *fx.app.lock() = Some("Code".to_string());
        *fx.title.lock() = Some("main.rs — Visual Studio Code".to_string());
        assert_eq!(fx.monitor.current_activity(), Some("Code - main.rs".to_string()));
    }

    #[test]
    fn test_current_activity_collapses_transient_helper_title() {
        let fx = fixture(TrackerConfig::default());
        *fx.app.lock() = Some("Terminal".to_string());
        *fx.title.lock() = Some("osascript".to_string());
        assert_eq!(fx.monitor.current_activity(), Some("Terminal".to_string()));
    }

    #[test]
    fn test_current_activity_none_when_detection_fails() {
        let fx = fixture(TrackerConfig::default());
        assert_eq!(fx.monitor.current_activity(), None);
    }

    #[test]
    fn test_debounce_absorbs_flicker() {
        let mut fx = fixture(TrackerConfig::default());
        fx.monitor.set_initial_app("Code");

        // A brief observation of Slack reverts before the debounce delay.
        let (app, start) = fx.monitor.check_app_change(Some("Code"), Some("Slack"), 0.0, 10.0);
        assert_eq!(app.as_deref(), Some("Code"));
        assert_eq!(start, 0.0);

        let (app, start) = fx.monitor.check_app_change(Some("Code"), Some("Code"), 0.0, 10.3);
        assert_eq!(app.as_deref(), Some("Code"));
        assert_eq!(start, 0.0);

        // Nothing was committed.
        assert!(fx.monitor.drain_session().is_empty());
    }

    #[test]
    fn test_debounce_confirms_sustained_switch() {
        let mut fx = fixture(TrackerConfig::default());
        fx.monitor.set_initial_app("Code");

        // Slack appears at t=10 and persists past the 1s delay.
        let (app, start) = fx.monitor.check_app_change(Some("Code"), Some("Slack"), 0.0, 10.0);
        assert_eq!(app.as_deref(), Some("Code"));
        assert_eq!(start, 0.0);

        let (app, _) = fx.monitor.check_app_change(Some("Code"), Some("Slack"), 0.0, 10.5);
        assert_eq!(app.as_deref(), Some("Code"));

        let (app, start) = fx.monitor.check_app_change(Some("Code"), Some("Slack"), 0.0, 11.2);
        assert_eq!(app.as_deref(), Some("Slack"));
        assert_eq!(start, 11.2);

        // The previous segment was committed with its full duration.
        let session = fx.monitor.drain_session();
        assert!((session["Code"] - 11.2).abs() < 1e-9);
    }

    #[test]
    fn test_debounce_flicker_then_real_switch() {
        let mut fx = fixture(TrackerConfig::default());
        fx.monitor.set_initial_app("Code");

        // Flicker to Slack and back clears the pending timer.
        fx.monitor.check_app_change(Some("Code"), Some("Slack"), 0.0, 10.0);
        fx.monitor.check_app_change(Some("Code"), Some("Code"), 0.0, 10.3);

        // The real switch needs a fresh full delay from its own start.
        fx.monitor.check_app_change(Some("Code"), Some("Slack"), 0.0, 20.0);
        let (app, _) = fx.monitor.check_app_change(Some("Code"), Some("Slack"), 0.0, 20.9);
        assert_eq!(app.as_deref(), Some("Code"));
        let (app, _) = fx.monitor.check_app_change(Some("Code"), Some("Slack"), 0.0, 21.0);
        assert_eq!(app.as_deref(), Some("Slack"));
    }

    #[test]
    fn test_oversized_segment_not_committed() {
        let mut fx = fixture(TrackerConfig::default());
        fx.monitor.set_initial_app("Code");

        // 200s exceeds the 120s segment cap; the switch still happens but
        // the implausible duration is discarded.
        fx.monitor.check_app_change(Some("Code"), Some("Slack"), 0.0, 199.0);
        let (app, _) = fx.monitor.check_app_change(Some("Code"), Some("Slack"), 0.0, 200.5);
        assert_eq!(app.as_deref(), Some("Slack"));
        assert!(fx.monitor.drain_session().is_empty());
    }

    #[test]
    fn test_idle_transition_credits_time_up_to_onset() {
        let mut fx = fixture(TrackerConfig::default());

        // User stopped interacting at t=600 (400s ago at t=1000); the
        // segment open since t=500 is credited only 100s.
        *fx.idle.lock() = 400.0;
        let new_start = fx.monitor.handle_idle_transition(Some("Code"), 500.0, 1000.0);
        assert_eq!(new_start, 1000.0);
        assert!(fx.monitor.is_idle());

        let session = fx.monitor.drain_session();
        assert!((session["Code"] - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_idle_transition_drops_negative_duration() {
        let mut fx = fixture(TrackerConfig::default());

        // Idle onset predates the segment start (a flush reset it after
        // idleness truly began): nothing is credited.
        *fx.idle.lock() = 400.0;
        fx.monitor.handle_idle_transition(Some("Code"), 700.0, 1000.0);
        assert!(fx.monitor.drain_session().is_empty());
    }

    #[test]
    fn test_idle_resume_resets_segment_start() {
        let mut fx = fixture(TrackerConfig::default());

        *fx.idle.lock() = 400.0;
        fx.monitor.handle_idle_transition(Some("Code"), 500.0, 1000.0);
        assert!(fx.monitor.is_idle());

        *fx.idle.lock() = 0.5;
        let new_start = fx.monitor.handle_idle_transition(Some("Code"), 1000.0, 1300.0);
        assert_eq!(new_start, 1300.0);
        assert!(!fx.monitor.is_idle());
        assert!(fx.monitor.drain_session().is_empty());
    }

    #[test]
    fn test_no_transition_keeps_segment_start() {
        let mut fx = fixture(TrackerConfig::default());
        *fx.idle.lock() = 2.0;
        let start = fx.monitor.handle_idle_transition(Some("Code"), 500.0, 1000.0);
        assert_eq!(start, 500.0);
        assert!(!fx.monitor.is_idle());
    }

    #[test]
    fn test_record_activity_and_total() {
        let mut fx = fixture(TrackerConfig::default());
        fx.monitor.record_activity("Code", 12.5);
        fx.monitor.record_activity("Slack", 7.5);
        assert!((fx.monitor.session_total_time() - 20.0).abs() < 1e-9);
    }
}
