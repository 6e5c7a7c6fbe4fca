mod config;
mod fetcher;
mod notifier;
mod poller;
mod shipment;

use anyhow::{Context, Result};
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::fetcher::FeedFetcher;
use crate::notifier::TelegramNotifier;
use crate::poller::Poller;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,shipwatch=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load .env for local runs; ignored when absent
    dotenvy::dotenv().ok();

    let config = Config::from_env().context("Failed to load configuration from environment")?;

    info!("Configuration loaded successfully");
    info!("  Feed: {}", config.feed_url);
    info!("  Chat: {}", config.group_chat_id);
    info!("  Poll interval: {}s", config.poll_interval.as_secs());

    let fetcher = FeedFetcher::new(&config);
    let notifier = TelegramNotifier::new(&config.bot_token, config.group_chat_id);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown signal received");
            let _ = shutdown_tx.send(true);
        }
    });

    info!("Shipment watcher is starting...");
    let mut poller = Poller::new(fetcher, notifier, config.poll_interval);
    poller.run(shutdown_rx).await;

    info!("Shipment watcher stopped");
    Ok(())
}
