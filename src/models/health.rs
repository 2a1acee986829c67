use std::collections::BTreeMap;

use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Collaborators the return operation talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dependency {
    Database,
    Localization,
    Messages,
    NotificationManager,
}

impl Dependency {
    pub fn name(self) -> &'static str {
        match self {
            Dependency::Database => "database",
            Dependency::Localization => "localization_service",
            Dependency::Messages => "messages_service",
            Dependency::NotificationManager => "notification_manager",
        }
    }

    /// Entity lookups and the DIFFERENCES text must succeed before anything is sent.
    /// Delivery failures are absorbed per channel.
    pub fn is_critical(self) -> bool {
        matches!(self, Dependency::Database | Dependency::Localization)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencyHealth {
    pub status: HealthStatus,
    pub critical: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DependencyHealth {
    pub fn reachable(dependency: Dependency, response_time_ms: u64) -> Self {
        Self {
            status: HealthStatus::Healthy,
            critical: dependency.is_critical(),
            response_time_ms: Some(response_time_ms),
            error: None,
        }
    }

    pub fn unreachable(dependency: Dependency, error: String) -> Self {
        Self {
            status: HealthStatus::Unhealthy,
            critical: dependency.is_critical(),
            response_time_ms: None,
            error: Some(error),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub timestamp: DateTime<Utc>,
    pub checks: BTreeMap<String, DependencyHealth>,
}

impl HealthReport {
    /// A failing critical dependency makes the service Unhealthy, any other
    /// failure only Degraded.
    pub fn from_checks(checks: Vec<(Dependency, DependencyHealth)>) -> Self {
        let failing = |critical: bool| {
            checks.iter().any(|(_, health)| {
                health.critical == critical && health.status != HealthStatus::Healthy
            })
        };

        let status = if failing(true) {
            HealthStatus::Unhealthy
        } else if failing(false) {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        };

        Self {
            status,
            timestamp: Utc::now(),
            checks: checks
                .into_iter()
                .map(|(dependency, health)| (dependency.name().to_string(), health))
                .collect(),
        }
    }

    pub fn http_status(&self) -> StatusCode {
        match self.status {
            HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
            HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}
