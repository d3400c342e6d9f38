pub mod init;
pub mod sum;
pub mod sync;
pub mod watch;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configuration initialization")]
    Init,
    #[command(about = "Watch foreground activity and record minute buckets")]
    Watch(watch::WatchArgs),
    #[command(about = "Get a daily summary of tracked time")]
    Sum(sum::SumArgs),
    #[command(about = "Push hourly aggregates to the sync endpoint")]
    Sync(sync::SyncArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Init => init::cmd(),
            Commands::Watch(args) => watch::cmd(args).await,
            Commands::Sum(args) => sum::cmd(args),
            Commands::Sync(args) => sync::cmd(args).await,
        }
    }
}
