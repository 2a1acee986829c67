use std::time::Duration;

use anyhow::{Error, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};

use crate::{
    clients::MessageTransport,
    models::message::{EmailContext, EmailMessage, SendMessagesRequest},
};

pub struct MessagesClient {
    http_client: Client,
    base_url: String,
}

impl MessagesClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, Error> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|_| anyhow!("Failed to create HTTP client"))?;

        info!(base_url, "Messages client initialized");

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl MessageTransport for MessagesClient {
    async fn send_email(
        &self,
        message: &EmailMessage,
        reseller_id: i64,
        context: &EmailContext,
    ) -> Result<(), Error> {
        debug!(
            email_to = %message.email_to,
            reseller_id,
            event = %context.event,
            "Sending email"
        );

        let request = SendMessagesRequest {
            messages: vec![message],
            reseller_id,
            context,
        };

        let response = self
            .http_client
            .post(format!("{}/api/v1/messages", self.base_url))
            .json(&request)
            .send()
            .await?;

        if response.status().is_success() {
            info!(email_to = %message.email_to, "Email accepted by messages service");
            Ok(())
        } else {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            Err(anyhow!("Messages request failed ({}): {}", status, error_text))
        }
    }
}
