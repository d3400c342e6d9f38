//! Detection adapters for the tracking core.
//!
//! The core consumes two capabilities through traits so tests can inject
//! deterministic fakes:
//!
//! - [`AppProbe`] answers "what is the foreground application right now"
//!   and "what is its window title". The OS implementation shells out to
//!   `osascript` on macOS; any failure yields `None` and is never fatal.
//! - [`IdleProbe`] answers "how long since the last user input". The
//!   implementation listens for keyboard, mouse, and scroll events on a
//!   background thread and reports the elapsed time since the last one.

use crate::libs::messages::Message;
use crate::msg_warning;
use parking_lot::Mutex;
use rdev::{listen, Event, EventType};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Foreground application and window title detection.
pub trait AppProbe: Send {
    /// Name of the currently focused application, `None` when detection
    /// fails or no application has focus.
    fn active_application(&self) -> Option<String>;

    /// Title of the frontmost window of the given application.
    fn window_title(&self, app_name: &str) -> Option<String>;
}

/// Seconds elapsed since the last user input event.
pub trait IdleProbe: Send {
    fn idle_seconds(&self) -> f64;
}

/// OS-backed application probe.
///
/// On macOS this queries System Events through `osascript`; on other
/// platforms it reports no observation, which the tracking loop treats the
/// same as a transient detection failure.
pub struct OsAppProbe;

impl OsAppProbe {
    pub fn new() -> Self {
        if !cfg!(target_os = "macos") {
            msg_warning!(Message::AppDetectionFailed(
                "foreground application detection is only implemented for macOS".to_string()
            ));
        }
        Self
    }
}

impl Default for OsAppProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl AppProbe for OsAppProbe {
    #[cfg(target_os = "macos")]
    fn active_application(&self) -> Option<String> {
        let script = r#"tell application "System Events" to get name of first application process whose frontmost is true"#;
        match run_osascript(script) {
            Ok(name) => name,
            Err(e) => {
                msg_warning!(Message::AppDetectionFailed(e.to_string()));
                None
            }
        }
    }

    #[cfg(not(target_os = "macos"))]
    fn active_application(&self) -> Option<String> {
        None
    }

    #[cfg(target_os = "macos")]
    fn window_title(&self, app_name: &str) -> Option<String> {
        // Process names may contain quotes; keep the script well-formed.
        let escaped = app_name.replace('\\', "\\\\").replace('"', "\\\"");
        let script = format!(
            "tell application \"System Events\"\n\
             try\n\
             tell process \"{}\" to get name of front window\n\
             end try\n\
             end tell",
            escaped
        );
        match run_osascript(&script) {
            Ok(title) => title,
            Err(e) => {
                msg_warning!(Message::WindowTitleFailed(app_name.to_string(), e.to_string()));
                None
            }
        }
    }

    #[cfg(not(target_os = "macos"))]
    fn window_title(&self, _app_name: &str) -> Option<String> {
        None
    }
}

#[cfg(target_os = "macos")]
fn run_osascript(script: &str) -> anyhow::Result<Option<String>> {
    let output = std::process::Command::new("osascript").arg("-e").arg(script).output()?;
    if !output.status.success() {
        return Ok(None);
    }
    let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if text.is_empty() || text == "missing value" {
        Ok(None)
    } else {
        Ok(Some(text))
    }
}

/// Idle probe backed by a global input listener.
///
/// A dedicated thread runs `rdev::listen` and stamps the shared timestamp on
/// every key press, button press, mouse move, or wheel event. The listener
/// is restarted after errors so a transient failure does not end idle
/// detection for the life of the daemon.
pub struct InputIdleProbe {
    last_input: Arc<Mutex<Instant>>,
}

impl InputIdleProbe {
    pub fn spawn() -> Self {
        let last_input = Arc::new(Mutex::new(Instant::now()));

        let shared = last_input.clone();
        std::thread::spawn(move || loop {
            let stamp = shared.clone();
            if let Err(e) = listen(move |event: Event| match event.event_type {
                EventType::KeyPress(_)
                | EventType::ButtonPress(_)
                | EventType::MouseMove { .. }
                | EventType::Wheel { .. } => {
                    *stamp.lock() = Instant::now();
                }
                _ => {}
            }) {
                msg_warning!(Message::InputListenerFailed(format!("{:?}", e)));
                std::thread::sleep(Duration::from_secs(1));
            } else {
                // listen() blocks forever in normal operation; a clean
                // return means the platform shut the hook down.
                break;
            }
        });

        Self { last_input }
    }
}

impl IdleProbe for InputIdleProbe {
    fn idle_seconds(&self) -> f64 {
        self.last_input.lock().elapsed().as_secs_f64()
    }
}
