//! Outbound notification collaborators: Telegram, Discord, relay webhook.
//!
//! These are thin HTTP wrappers, not part of the ingestion core. The only
//! contract is: given a rendered message and the configured credentials,
//! attempt delivery on every channel and report per-channel success or
//! failure. Delivery problems are never thrown past the calling handler —
//! they come back as [`DeliveryReport`]s with `delivered: false`.

use std::time::Duration;

use serde::Serialize;

use crate::error::QxError;

/// Request timeout applied to every outbound delivery call.
const DELIVERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Outbound notification channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// Telegram Bot API (`sendMessage` with bot token + chat id).
    Telegram,
    /// Discord incoming webhook.
    Discord,
    /// Generic relay webhook (X/Twitter and catch-all).
    Relay,
}

impl Channel {
    /// Channel name as used in reports and logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Telegram => "telegram",
            Self::Discord => "discord",
            Self::Relay => "relay",
        }
    }
}

/// Outcome of one delivery attempt on one channel.
#[derive(Debug, Clone, Serialize)]
pub struct DeliveryReport {
    /// Channel the attempt targeted.
    pub channel: Channel,
    /// Whether delivery succeeded.
    pub delivered: bool,
    /// Failure detail, including "channel not configured" when the
    /// credentials for the channel are absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl DeliveryReport {
    fn ok(channel: Channel) -> Self {
        Self {
            channel,
            delivered: true,
            detail: None,
        }
    }

    fn failed(channel: Channel, detail: String) -> Self {
        Self {
            channel,
            delivered: false,
            detail: Some(detail),
        }
    }

    fn not_configured(channel: Channel) -> Self {
        Self::failed(channel, "channel not configured".to_string())
    }
}

/// Credentials and endpoints for the outbound channels.
///
/// All fields are optional; an unset channel reports "not configured"
/// instead of attempting delivery.
#[derive(Debug, Clone, Default)]
pub struct NotifyConfig {
    /// Telegram bot token from `@BotFather`.
    pub telegram_bot_token: Option<String>,
    /// Telegram chat id to send to.
    pub telegram_chat_id: Option<String>,
    /// Discord incoming webhook URL.
    pub discord_webhook_url: Option<String>,
    /// Generic relay webhook URL.
    pub relay_webhook_url: Option<String>,
    /// Sender name attached to Discord and relay messages.
    pub sender_name: String,
}

/// Dispatches rendered messages to all configured channels.
#[derive(Debug)]
pub struct NotificationHub {
    http: reqwest::Client,
    config: NotifyConfig,
}

impl NotificationHub {
    /// Creates a hub with the given channel configuration.
    ///
    /// # Errors
    ///
    /// Returns [`QxError::Internal`] if the HTTP client cannot be built.
    pub fn new(config: NotifyConfig) -> Result<Self, QxError> {
        let http = reqwest::Client::builder()
            .timeout(DELIVERY_TIMEOUT)
            .build()
            .map_err(|e| QxError::Internal(format!("http client: {e}")))?;
        Ok(Self { http, config })
    }

    /// Attempts delivery of `message` on every channel.
    ///
    /// Always returns one report per channel; never fails as a whole.
    pub async fn dispatch(&self, message: &str) -> Vec<DeliveryReport> {
        let telegram = match (&self.config.telegram_bot_token, &self.config.telegram_chat_id) {
            (Some(token), Some(chat_id)) => self
                .send_telegram(token, chat_id, message)
                .await
                .map_or_else(
                    |e| DeliveryReport::failed(Channel::Telegram, e.to_string()),
                    |()| DeliveryReport::ok(Channel::Telegram),
                ),
            _ => DeliveryReport::not_configured(Channel::Telegram),
        };

        let discord = match &self.config.discord_webhook_url {
            Some(url) => self.send_discord(url, message).await.map_or_else(
                |e| DeliveryReport::failed(Channel::Discord, e.to_string()),
                |()| DeliveryReport::ok(Channel::Discord),
            ),
            None => DeliveryReport::not_configured(Channel::Discord),
        };

        let relay = match &self.config.relay_webhook_url {
            Some(url) => self.send_relay(url, message).await.map_or_else(
                |e| DeliveryReport::failed(Channel::Relay, e.to_string()),
                |()| DeliveryReport::ok(Channel::Relay),
            ),
            None => DeliveryReport::not_configured(Channel::Relay),
        };

        for report in [&telegram, &discord, &relay] {
            if report.delivered {
                tracing::info!(channel = report.channel.as_str(), "notification delivered");
            } else {
                tracing::warn!(
                    channel = report.channel.as_str(),
                    detail = report.detail.as_deref().unwrap_or(""),
                    "notification not delivered"
                );
            }
        }

        vec![telegram, discord, relay]
    }

    async fn send_telegram(
        &self,
        bot_token: &str,
        chat_id: &str,
        text: &str,
    ) -> Result<(), QxError> {
        let url = format!("https://api.telegram.org/bot{bot_token}/sendMessage");
        let payload = serde_json::json!({
            "chat_id": chat_id,
            "text": text,
            "disable_web_page_preview": true,
        });
        self.post_json(&url, &payload, Channel::Telegram).await
    }

    async fn send_discord(&self, webhook_url: &str, text: &str) -> Result<(), QxError> {
        let payload = serde_json::json!({
            "content": text,
            "username": self.config.sender_name,
        });
        self.post_json(webhook_url, &payload, Channel::Discord).await
    }

    async fn send_relay(&self, webhook_url: &str, text: &str) -> Result<(), QxError> {
        let payload = serde_json::json!({
            "message": text,
            "source": self.config.sender_name,
        });
        self.post_json(webhook_url, &payload, Channel::Relay).await
    }

    async fn post_json(
        &self,
        url: &str,
        payload: &serde_json::Value,
        channel: Channel,
    ) -> Result<(), QxError> {
        let response = self
            .http
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(|e| QxError::Notification(format!("{}: {e}", channel.as_str())))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(QxError::Notification(format!(
                "{}: HTTP {status}",
                channel.as_str()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unconfigured_channels_report_without_network_calls() {
        let Ok(hub) = NotificationHub::new(NotifyConfig::default()) else {
            panic!("hub construction should succeed");
        };
        let reports = hub.dispatch("test message").await;
        assert_eq!(reports.len(), 3);
        for report in &reports {
            assert!(!report.delivered);
            assert_eq!(report.detail.as_deref(), Some("channel not configured"));
        }
    }

    #[tokio::test]
    async fn telegram_needs_both_token_and_chat_id() {
        let config = NotifyConfig {
            telegram_bot_token: Some("123:abc".to_string()),
            ..NotifyConfig::default()
        };
        let Ok(hub) = NotificationHub::new(config) else {
            panic!("hub construction should succeed");
        };
        let reports = hub.dispatch("test").await;
        let Some(telegram) = reports.iter().find(|r| r.channel == Channel::Telegram) else {
            panic!("expected a telegram report");
        };
        assert!(!telegram.delivered);
        assert_eq!(telegram.detail.as_deref(), Some("channel not configured"));
    }

    #[test]
    fn channel_names_are_stable() {
        assert_eq!(Channel::Telegram.as_str(), "telegram");
        assert_eq!(Channel::Discord.as_str(), "discord");
        assert_eq!(Channel::Relay.as_str(), "relay");
    }
}
