use std::time::Duration;

use anyhow::{Error, Result, anyhow};
use dotenvy::dotenv;
use serde::Deserialize;

#[derive(Clone, Deserialize, Debug)]
pub struct Config {
    pub database_url: String,

    pub localization_service_url: String,
    pub messages_service_url: String,
    pub notification_manager_url: String,

    #[serde(default)]
    pub reseller_email_from: String,

    #[serde(default = "default_permission_key")]
    pub employee_permission_key: String,

    #[serde(default = "default_http_timeout")]
    pub http_timeout_seconds: u64,

    pub server_port: u16,
}

fn default_permission_key() -> String {
    "tsGoodsReturn".to_string()
}

fn default_http_timeout() -> u64 {
    10
}

impl Config {
    pub fn load() -> Result<Self, Error> {
        dotenv().ok();

        let config = envy::from_env::<Self>()
            .map_err(|_| anyhow!("Invalid or missing environmental variable"))?;
        Ok(config)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_seconds)
    }
}
