use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_FEED_URL: &str =
    "https://daedalus.citizenshipper.com/api/shipments/?feed=recommended";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

/// Process-wide configuration, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Telegram bot token used to deliver alerts.
    pub bot_token: String,
    /// Telegram chat the alerts are sent to.
    pub group_chat_id: i64,
    /// Bearer credential for the shipment feed.
    pub auth_bearer_token: String,
    /// Shipment feed endpoint.
    pub feed_url: String,
    /// Fixed delay between poll ticks.
    pub poll_interval: Duration,
}

impl Config {
    /// Load configuration from environment variables. Any missing or
    /// unparseable required value is a fatal startup error.
    pub fn from_env() -> Result<Self> {
        let bot_token = require("BOT_TOKEN")?;
        let group_chat_id = require("GROUP_CHAT_ID")?
            .parse::<i64>()
            .context("GROUP_CHAT_ID must be an integer chat identifier")?;
        let auth_bearer_token = require("AUTH_BEARER_TOKEN")?;

        let feed_url =
            std::env::var("FEED_URL").unwrap_or_else(|_| DEFAULT_FEED_URL.to_string());
        let poll_interval = match std::env::var("POLL_INTERVAL_SECS") {
            Ok(raw) => Duration::from_secs(
                raw.parse()
                    .context("POLL_INTERVAL_SECS must be a number of seconds")?,
            ),
            Err(_) => Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
        };

        Ok(Self {
            bot_token,
            group_chat_id,
            auth_bearer_token,
            feed_url,
            poll_interval,
        })
    }
}

fn require(name: &str) -> Result<String> {
    std::env::var(name).with_context(|| format!("Missing required environment variable: {}", name))
}
