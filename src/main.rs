use std::sync::Arc;

use anyhow::{Error, Result, anyhow};
use return_notification_service::{
    api::{AppState, run_api_server},
    clients::{
        database::DatabaseClient, health::HealthChecker, localization::LocalizationClient,
        messages::MessagesClient, sms::NotificationManagerClient,
    },
    config::Config,
    utils::ReturnNotificationOperation,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::load()?;
    info!("Configuration loaded");

    let database = Arc::new(
        DatabaseClient::connect(&config.database_url, config.reseller_email_from.clone()).await?,
    );
    let localizer = Arc::new(LocalizationClient::new(
        &config.localization_service_url,
        config.http_timeout(),
    )?);
    let transport = Arc::new(MessagesClient::new(
        &config.messages_service_url,
        config.http_timeout(),
    )?);
    let sms_gateway = Arc::new(NotificationManagerClient::new(
        &config.notification_manager_url,
        config.http_timeout(),
    )?);

    let operation = ReturnNotificationOperation::new(
        database.clone(),
        database.clone(),
        localizer,
        transport,
        sms_gateway,
    )
    .with_permission_key(config.employee_permission_key.clone());

    let state = Arc::new(AppState {
        operation,
        health_checker: HealthChecker::new(&config, Some(database))?,
    });

    run_api_server(&config, state)
        .await
        .map_err(|e| anyhow!("Server error: {}", e))
}
