use std::time::Duration;

use anyhow::{Error, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::{
    clients::Localizer,
    models::template::{TemplateData, Translation, render_placeholders},
};

pub struct LocalizationClient {
    http_client: Client,
    base_url: String,
}

impl LocalizationClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, Error> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|_| anyhow!("Failed to create HTTP client"))?;

        info!(base_url, "Localization client initialized");

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn fetch_translation(
        &self,
        key: &str,
        reseller_id: i64,
    ) -> Result<Translation, Error> {
        let url = format!("{}/api/v1/translations/{}", self.base_url, key);

        debug!(key, reseller_id, "Fetching translation");

        let response = self
            .http_client
            .get(&url)
            .query(&[("reseller_id", reseller_id)])
            .send()
            .await
            .map_err(|e| anyhow!("Localization request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(key, reseller_id, %status, "Localization service rejected request");
            return Err(anyhow!("Localization service returned status {}", status));
        }

        response
            .json::<Translation>()
            .await
            .map_err(|e| anyhow!("Failed to parse translation JSON: {}", e))
    }
}

#[async_trait]
impl Localizer for LocalizationClient {
    async fn localize(
        &self,
        key: &str,
        params: Option<&TemplateData>,
        reseller_id: i64,
    ) -> Result<String, Error> {
        let translation = self.fetch_translation(key, reseller_id).await?;
        render_placeholders(&translation.text, params)
    }
}
