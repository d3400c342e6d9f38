use traq::commands::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Structured logs only when explicitly requested; interactive runs get
    // plain console output through the message macros.
    if std::env::var("TRAQ_DEBUG").is_ok() || std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "traq=debug".into()))
            .init();
    }

    Cli::menu().await
}
