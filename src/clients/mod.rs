//! Collaborators the return notification operation depends on, plus their adapters.

pub mod database;
pub mod health;
pub mod localization;
pub mod messages;
pub mod sms;

use anyhow::{Error, Result};
use async_trait::async_trait;

use crate::models::{
    entity::{Contractor, Employee, Seller},
    message::{EmailContext, EmailMessage, SmsOutcome},
    notification::NotificationEvent,
    template::TemplateData,
};

/// Lookup of sellers, contractors, employees and status names.
#[async_trait]
pub trait ReferenceStore: Send + Sync {
    async fn seller_by_id(&self, id: i64) -> Result<Option<Seller>, Error>;

    async fn contractor_by_id(&self, id: i64) -> Result<Option<Contractor>, Error>;

    async fn employee_by_id(&self, id: i64) -> Result<Option<Employee>, Error>;

    /// Human readable status name; empty when the code is unknown.
    async fn status_name(&self, code: i64) -> Result<String, Error>;
}

#[async_trait]
pub trait ResellerSettings: Send + Sync {
    async fn default_from_address(&self) -> Result<String, Error>;

    /// Employee addresses holding `permission` for the reseller, in stable order.
    async fn permitted_recipient_emails(
        &self,
        reseller_id: i64,
        permission: &str,
    ) -> Result<Vec<String>, Error>;
}

#[async_trait]
pub trait Localizer: Send + Sync {
    async fn localize(
        &self,
        key: &str,
        params: Option<&TemplateData>,
        reseller_id: i64,
    ) -> Result<String, Error>;
}

#[async_trait]
pub trait MessageTransport: Send + Sync {
    async fn send_email(
        &self,
        message: &EmailMessage,
        reseller_id: i64,
        context: &EmailContext,
    ) -> Result<(), Error>;
}

#[async_trait]
pub trait SmsGateway: Send + Sync {
    async fn send(
        &self,
        reseller_id: i64,
        client_id: i64,
        event: NotificationEvent,
        status_code: i64,
        template_data: &TemplateData,
    ) -> Result<SmsOutcome, Error>;
}
