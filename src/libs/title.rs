//! Window title normalization.
//!
//! Raw titles arrive with whatever Unicode the source application produced:
//! composed or decomposed accents, smart quotes, editor-specific suffixes,
//! and occasionally the name of the scripting helper used to query the title
//! in the first place. Everything recorded on disk goes through
//! [`TitleCleaner`] first so the same on-screen activity always maps to the
//! same identity string.

use unicode_normalization::UnicodeNormalization;

/// Substitutions applied after NFC normalization. Curly quotes collapse to
/// their ASCII equivalents; the remaining entries pin the canonical form of
/// characters that are allowed to pass through.
const UNICODE_REPLACEMENTS: &[(char, &str)] = &[
    ('\u{201c}', "\""), // Left double quotation mark
    ('\u{201d}', "\""), // Right double quotation mark
    ('\u{2018}', "'"),  // Left single quotation mark
    ('\u{2019}', "'"),  // Right single quotation mark
    ('\u{00b7}', "·"),  // Middle dot
    ('\u{2022}', "•"),  // Bullet point
    ('\u{2026}', "…"),  // Horizontal ellipsis
    ('\u{2013}', "–"),  // En dash
    ('\u{2014}', "—"),  // Em dash
    ('\u{2733}', "✳"),  // Eight spoked asterisk
    ('\u{25cf}', "●"),  // Black circle
    ('\u{25cb}', "○"),  // White circle
    ('\u{2713}', "✓"),  // Check mark
    ('\u{2717}', "✗"),  // Ballot X
];

/// Editor suffixes stripped from the end of a title. Exact-length suffix
/// match only, never substring removal elsewhere in the string.
const STRIP_SUFFIXES: &[&str] = &[" — Visual Studio Code", " - Visual Studio Code"];

/// Markers indicating the title was transiently read from the scripting
/// helper rather than a real window.
const TRANSIENT_MARKERS: &[&str] = &[" - osascript", " - AppleScript"];

#[derive(Default)]
pub struct TitleCleaner;

impl TitleCleaner {
    pub fn new() -> Self {
        Self
    }

    /// Cleans up a window title: NFC normalization, character
    /// substitutions, and editor suffix stripping.
    pub fn clean_title(&self, title: &str) -> String {
        if title.is_empty() {
            return title.to_string();
        }

        let mut cleaned: String = title.nfc().collect();

        for (from, to) in UNICODE_REPLACEMENTS {
            if cleaned.contains(*from) {
                cleaned = cleaned.replace(*from, to);
            }
        }

        for suffix in STRIP_SUFFIXES {
            if let Some(stripped) = cleaned.strip_suffix(suffix) {
                cleaned = stripped.to_string();
                break;
            }
        }

        cleaned
    }

    /// Collapses a combined `"{app} - {title}"` identity back to the bare
    /// app name when the title came from a transient scripting helper.
    /// Window-title detection sometimes observes the helper process used to
    /// run the query itself, and that spurious identity must not be
    /// recorded as a separate activity.
    pub fn normalize_app_name(&self, app_with_window: &str) -> String {
        if app_with_window.is_empty() {
            return app_with_window.to_string();
        }

        if TRANSIENT_MARKERS.iter().any(|m| app_with_window.contains(m)) {
            let app_name = app_with_window.split(" - ").next().unwrap_or(app_with_window);
            return app_name.to_string();
        }

        app_with_window.to_string()
    }
}
