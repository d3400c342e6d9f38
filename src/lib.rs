//! # Traq - Desktop Activity Tracker
//!
//! A command-line utility that records which application holds the
//! foreground, minute by minute, and optionally syncs hourly aggregates to
//! a remote endpoint.
//!
//! ## Features
//!
//! - **Foreground Tracking**: Polls the active application and window title
//!   with debounced switch detection
//! - **Idle Detection**: Pauses accounting while the user is away and
//!   retroactively trims the pre-idle segment
//! - **Minute Buckets**: Flushes per-app durations into one JSON file per
//!   wall-clock minute
//! - **Hourly Sync**: Aggregates minute buckets by hour and pushes them
//!   over HTTP with at-least-once delivery
//! - **Daemon Mode**: Runs detached in the background with pidfile control
//!
//! ## Usage
//!
//! ```rust,no_run
//! use traq::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod api;
pub mod commands;
pub mod libs;
