use std::fmt::{Display, Formatter, Result};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationType {
    New,
    Change,
    Other(i64),
}

impl NotificationType {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => None,
            1 => Some(NotificationType::New),
            2 => Some(NotificationType::Change),
            other => Some(NotificationType::Other(other)),
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            NotificationType::New => 1,
            NotificationType::Change => 2,
            NotificationType::Other(code) => *code,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationEvent {
    ChangeReturnStatus,
}

impl Display for NotificationEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            NotificationEvent::ChangeReturnStatus => write!(f, "change_return_status"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSmsResult {
    pub is_sent: bool,
    pub message: String,
}

/// Per-channel outcome of one operation call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchResult {
    pub notification_employee_by_email: bool,
    pub notification_client_by_email: bool,
    pub notification_client_by_sms: ClientSmsResult,
}

impl DispatchResult {
    pub fn empty_reseller() -> Self {
        Self {
            notification_client_by_sms: ClientSmsResult {
                is_sent: false,
                message: "Empty resellerId".to_string(),
            },
            ..Self::default()
        }
    }
}
