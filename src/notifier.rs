use async_trait::async_trait;
use teloxide::payloads::SendMessageSetters;
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use tracing::{error, info};

use crate::shipment::Shipment;

/// Delivery of one formatted alert. Fire-and-forget: failures are logged
/// inside the sink and never propagate to the poll loop.
#[async_trait]
pub trait AlertSink: Send + Sync {
    async fn notify(&self, shipment: &Shipment);
}

/// Sends shipment alerts to a fixed Telegram group chat.
pub struct TelegramNotifier {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramNotifier {
    pub fn new(bot_token: &str, group_chat_id: i64) -> Self {
        Self {
            bot: Bot::new(bot_token),
            chat_id: ChatId(group_chat_id),
        }
    }
}

#[async_trait]
impl AlertSink for TelegramNotifier {
    async fn notify(&self, shipment: &Shipment) {
        let text = shipment.alert_text();
        match self
            .bot
            .send_message(self.chat_id, text)
            .parse_mode(ParseMode::Markdown)
            .await
        {
            Ok(_) => info!("Alert sent to group"),
            Err(e) => error!("Telegram send failed: {}", e),
        }
    }
}
