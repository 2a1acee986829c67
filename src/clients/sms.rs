use std::time::Duration;

use anyhow::{Error, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::{
    clients::SmsGateway,
    models::{
        message::{SmsOutcome, SmsRequest},
        notification::NotificationEvent,
        template::TemplateData,
    },
};

pub struct NotificationManagerClient {
    http_client: Client,
    base_url: String,
}

impl NotificationManagerClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, Error> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|_| anyhow!("Failed to create HTTP client"))?;

        info!(base_url, "Notification manager client initialized");

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn send_once(&self, request: &SmsRequest<'_>) -> Result<SmsOutcome, Error> {
        let response = self
            .http_client
            .post(format!("{}/api/v1/sms", self.base_url))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow!("SMS request failed ({}): {}", status, error_text));
        }

        Ok(response.json::<SmsOutcome>().await?)
    }
}

#[async_trait]
impl SmsGateway for NotificationManagerClient {
    async fn send(
        &self,
        reseller_id: i64,
        client_id: i64,
        event: NotificationEvent,
        status_code: i64,
        template_data: &TemplateData,
    ) -> Result<SmsOutcome, Error> {
        debug!(reseller_id, client_id, status_code, "Sending SMS notification");

        let request = SmsRequest {
            reseller_id,
            client_id,
            event,
            status_code,
            template_data,
        };

        match self.send_once(&request).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                warn!(client_id, error = %e, "Notification manager unreachable");
                Ok(SmsOutcome::failed(e.to_string()))
            }
        }
    }
}
