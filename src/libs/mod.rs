pub mod aggregator;
pub mod config;
pub mod daemon;
pub mod data_storage;
pub mod detect;
pub mod idle;
pub mod messages;
pub mod minute;
pub mod monitor;
pub mod session;
pub mod store;
pub mod title;
pub mod tracker;
