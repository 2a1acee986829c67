use serde::{Deserialize, Serialize};

use crate::models::{notification::NotificationEvent, template::TemplateData};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailMessage {
    pub email_from: String,
    pub email_to: String,
    pub subject: String,
    pub message: String,
}

/// Routing details the messages service records alongside an email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailContext {
    pub event: NotificationEvent,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<i64>,
}

impl EmailContext {
    pub fn employee(event: NotificationEvent) -> Self {
        Self {
            event,
            client_id: None,
            status_code: None,
        }
    }

    pub fn client(event: NotificationEvent, client_id: i64, status_code: i64) -> Self {
        Self {
            event,
            client_id: Some(client_id),
            status_code: Some(status_code),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessagesRequest<'a> {
    pub messages: Vec<&'a EmailMessage>,
    pub reseller_id: i64,
    #[serde(flatten)]
    pub context: &'a EmailContext,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SmsRequest<'a> {
    pub reseller_id: i64,
    pub client_id: i64,
    pub event: NotificationEvent,
    pub status_code: i64,
    pub template_data: &'a TemplateData,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsOutcome {
    pub sent: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SmsOutcome {
    pub fn failed(error: String) -> Self {
        Self {
            sent: false,
            error: Some(error),
        }
    }
}
