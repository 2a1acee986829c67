use std::{sync::Arc, time::Instant};

use anyhow::{Error, Result, anyhow};
use reqwest::Client;
use tracing::{debug, warn};

use crate::{
    clients::database::DatabaseClient,
    config::Config,
    models::health::{Dependency, DependencyHealth, HealthReport},
};

pub struct HealthChecker {
    database: Option<Arc<DatabaseClient>>,
    http_client: Client,
    services: Vec<(Dependency, String)>,
}

impl HealthChecker {
    pub fn new(config: &Config, database: Option<Arc<DatabaseClient>>) -> Result<Self, Error> {
        let http_client = Client::builder()
            .timeout(config.http_timeout())
            .build()
            .map_err(|e| anyhow!("Failed to build health check HTTP client: {}", e))?;

        Ok(Self {
            database,
            http_client,
            services: vec![
                (
                    Dependency::Localization,
                    config.localization_service_url.clone(),
                ),
                (Dependency::Messages, config.messages_service_url.clone()),
                (
                    Dependency::NotificationManager,
                    config.notification_manager_url.clone(),
                ),
            ],
        })
    }

    pub async fn check_all(&self) -> HealthReport {
        let mut checks = vec![(Dependency::Database, self.check_database().await)];

        for (dependency, base_url) in &self.services {
            let health = self.check_http_service(*dependency, base_url).await;
            checks.push((*dependency, health));
        }

        HealthReport::from_checks(checks)
    }

    async fn check_database(&self) -> DependencyHealth {
        let Some(database) = &self.database else {
            return DependencyHealth::unreachable(
                Dependency::Database,
                "Database client not configured".to_string(),
            );
        };

        let start = Instant::now();

        match database.health_check().await {
            Ok(_) => {
                let elapsed = start.elapsed().as_millis() as u64;
                debug!(response_time_ms = elapsed, "Database health check passed");
                DependencyHealth::reachable(Dependency::Database, elapsed)
            }
            Err(e) => {
                warn!(error = %e, "Database health check failed");
                DependencyHealth::unreachable(
                    Dependency::Database,
                    format!("Health check query failed: {}", e),
                )
            }
        }
    }

    async fn check_http_service(&self, dependency: Dependency, base_url: &str) -> DependencyHealth {
        let service = dependency.name();
        let start = Instant::now();
        let url = format!("{}/health", base_url.trim_end_matches('/'));

        match self.http_client.get(&url).send().await {
            Ok(response) if response.status().is_success() => {
                let elapsed = start.elapsed().as_millis() as u64;
                debug!(service, response_time_ms = elapsed, "Service health check passed");
                DependencyHealth::reachable(dependency, elapsed)
            }
            Ok(response) => {
                warn!(service, status = %response.status(), "Service reported unhealthy");
                DependencyHealth::unreachable(
                    dependency,
                    format!("Service returned status {}", response.status()),
                )
            }
            Err(e) => {
                warn!(service, error = %e, "Service health check failed");
                DependencyHealth::unreachable(dependency, format!("Request failed: {}", e))
            }
        }
    }
}
