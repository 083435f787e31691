//! Telegram Bot API implementation of `BaseNotifier`.
//!
//! Thin wrapper over the `sendMessage` endpoint. The core treats
//! delivery failures as non-fatal and does not retry, so this adapter
//! only needs to surface a useful error message.

use anyhow::{bail, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::traits::BaseNotifier;

pub struct TelegramNotifier {
    client: Client,
    base_url: String,
}

impl TelegramNotifier {
    pub fn new(bot_token: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: format!("https://api.telegram.org/bot{bot_token}"),
        }
    }
}

#[derive(Serialize)]
struct SendMessageRequest<'a> {
    chat_id: i64,
    text: &'a str,
    disable_web_page_preview: bool,
}

#[derive(Deserialize)]
struct TelegramResponse {
    ok: bool,
    description: Option<String>,
}

#[async_trait]
impl BaseNotifier for TelegramNotifier {
    async fn send(&self, chat_id: i64, text: &str) -> Result<()> {
        let url = format!("{}/sendMessage", self.base_url);
        let body = SendMessageRequest {
            chat_id,
            text,
            disable_web_page_preview: true,
        };

        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let payload: TelegramResponse = response.json().await?;
        if !payload.ok {
            let description = payload
                .description
                .unwrap_or_else(|| "telegram sendMessage failed".to_string());
            bail!(description);
        }

        Ok(())
    }
}
