use std::sync::Arc;

use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use crate::{
    clients::{Localizer, MessageTransport, ReferenceStore, ResellerSettings, SmsGateway},
    models::{
        entity::{Contractor, Employee, Seller},
        error::OperationError,
        message::{EmailContext, EmailMessage},
        notification::{DispatchResult, NotificationEvent, NotificationType},
        request::{OperationRequest, RequestData, to_int},
        template::{
            CLIENT_EMAIL_BODY, CLIENT_EMAIL_SUBJECT, EMPLOYEE_EMAIL_BODY, EMPLOYEE_EMAIL_SUBJECT,
            NEW_POSITION_ADDED, POSITION_STATUS_HAS_CHANGED, TemplateData, TemplateValue,
        },
        validation::{ensure_complete, is_blank, is_empty_like},
    },
};

pub const DEFAULT_PERMISSION_KEY: &str = "tsGoodsReturn";

struct ResolvedEntities {
    seller: Seller,
    client: Contractor,
    creator: Employee,
    expert: Employee,
}

/// Notifies employees and the client about a goods return being created or changing status.
///
/// Validation and entity resolution fail the whole call. Once the template is complete,
/// every channel runs independently and its outcome is reported in [`DispatchResult`].
pub struct ReturnNotificationOperation {
    references: Arc<dyn ReferenceStore>,
    settings: Arc<dyn ResellerSettings>,
    localizer: Arc<dyn Localizer>,
    transport: Arc<dyn MessageTransport>,
    sms_gateway: Arc<dyn SmsGateway>,
    permission_key: String,
}

impl ReturnNotificationOperation {
    pub fn new(
        references: Arc<dyn ReferenceStore>,
        settings: Arc<dyn ResellerSettings>,
        localizer: Arc<dyn Localizer>,
        transport: Arc<dyn MessageTransport>,
        sms_gateway: Arc<dyn SmsGateway>,
    ) -> Self {
        Self {
            references,
            settings,
            localizer,
            transport,
            sms_gateway,
            permission_key: DEFAULT_PERMISSION_KEY.to_string(),
        }
    }

    pub fn with_permission_key(mut self, permission_key: String) -> Self {
        self.permission_key = permission_key;
        self
    }

    pub async fn do_operation(
        &self,
        request: &OperationRequest,
    ) -> Result<DispatchResult, OperationError> {
        let trace_id = Uuid::new_v4();
        let span = info_span!("ts_return_operation", %trace_id);

        self.run(request).instrument(span).await
    }

    async fn run(&self, request: &OperationRequest) -> Result<DispatchResult, OperationError> {
        let data = RequestData::from_request(request);

        let notification_type = data
            .optional("notificationType")
            .map(to_int)
            .and_then(NotificationType::from_code)
            .ok_or_else(|| OperationError::InvalidInput("Empty notificationType".to_string()))?;

        let reseller_id = data.optional("resellerId").map(to_int).unwrap_or(0);
        if reseller_id == 0 {
            info!("Empty resellerId, skipping notifications");
            return Ok(DispatchResult::empty_reseller());
        }

        info!(
            reseller_id,
            notification_type = notification_type.code(),
            "Processing goods return notification"
        );

        let entities = self.resolve_entities(&data, reseller_id).await?;
        let differences = self
            .build_differences(&data, notification_type, reseller_id)
            .await?;
        let template_data = build_template_data(&data, &entities, differences)?;

        if let Err(e) = ensure_complete(&template_data) {
            warn!(reseller_id, error = %e, "Template data incomplete, nothing sent");
            return Err(e);
        }

        let mut result = DispatchResult::default();

        let email_from = match self.settings.default_from_address().await {
            Ok(address) => address,
            Err(e) => {
                warn!(reseller_id, error = %e, "Failed to load sender address");
                String::new()
            }
        };

        self.notify_employees(reseller_id, &email_from, &template_data, &mut result)
            .await;

        if notification_type == NotificationType::Change
            && let Some(status_code) = target_status(&data)
        {
            self.notify_client_by_email(
                reseller_id,
                &email_from,
                &entities.client,
                status_code,
                &template_data,
                &mut result,
            )
            .await;

            self.notify_client_by_sms(
                reseller_id,
                &entities.client,
                status_code,
                &template_data,
                &mut result,
            )
            .await;
        }

        info!(
            reseller_id,
            employee_email = result.notification_employee_by_email,
            client_email = result.notification_client_by_email,
            client_sms = result.notification_client_by_sms.is_sent,
            "Goods return notification processed"
        );

        Ok(result)
    }

    async fn resolve_entities(
        &self,
        data: &RequestData<'_>,
        reseller_id: i64,
    ) -> Result<ResolvedEntities, OperationError> {
        let seller = self
            .references
            .seller_by_id(reseller_id)
            .await?
            .ok_or_else(|| OperationError::NotFound("Seller not found!".to_string()))?;

        let client = self
            .references
            .contractor_by_id(data.int("clientId")?)
            .await?
            .filter(|client| client.is_customer_of(reseller_id))
            .ok_or_else(|| OperationError::NotFound("Client not found!".to_string()))?;

        let creator = self
            .references
            .employee_by_id(data.int("creatorId")?)
            .await?
            .ok_or_else(|| OperationError::NotFound("Creator not found!".to_string()))?;

        let expert = self
            .references
            .employee_by_id(data.int("expertId")?)
            .await?
            .ok_or_else(|| OperationError::NotFound("Expert not found!".to_string()))?;

        debug!(
            seller_id = seller.id,
            client_id = client.id,
            creator_id = creator.id,
            expert_id = expert.id,
            "Entities resolved"
        );

        Ok(ResolvedEntities {
            seller,
            client,
            creator,
            expert,
        })
    }

    async fn build_differences(
        &self,
        data: &RequestData<'_>,
        notification_type: NotificationType,
        reseller_id: i64,
    ) -> Result<String, OperationError> {
        match notification_type {
            NotificationType::New => Ok(self
                .localizer
                .localize(NEW_POSITION_ADDED, None, reseller_id)
                .await?),
            NotificationType::Change => {
                let differences = data.element("differences")?;
                if is_empty_like(differences) {
                    return Ok(String::new());
                }

                let differences = RequestData::new(differences);
                let from = differences.int("from")?;
                let to = differences.int("to")?;

                let mut params = TemplateData::new();
                params.insert(
                    "FROM",
                    TemplateValue::Text(self.references.status_name(from).await?),
                );
                params.insert(
                    "TO",
                    TemplateValue::Text(self.references.status_name(to).await?),
                );

                Ok(self
                    .localizer
                    .localize(POSITION_STATUS_HAS_CHANGED, Some(&params), reseller_id)
                    .await?)
            }
            NotificationType::Other(_) => Ok(String::new()),
        }
    }

    async fn notify_employees(
        &self,
        reseller_id: i64,
        email_from: &str,
        template_data: &TemplateData,
        result: &mut DispatchResult,
    ) {
        if is_blank(email_from) {
            debug!(reseller_id, "No sender address configured, skipping employee emails");
            return;
        }

        let emails = match self
            .settings
            .permitted_recipient_emails(reseller_id, &self.permission_key)
            .await
        {
            Ok(emails) => emails,
            Err(e) => {
                warn!(reseller_id, error = %e, "Failed to load employee recipients");
                return;
            }
        };

        let context = EmailContext::employee(NotificationEvent::ChangeReturnStatus);

        for email in &emails {
            if let Err(e) = self
                .send_templated_email(
                    email_from,
                    email,
                    (EMPLOYEE_EMAIL_SUBJECT, EMPLOYEE_EMAIL_BODY),
                    template_data,
                    reseller_id,
                    &context,
                )
                .await
            {
                warn!(reseller_id, email_to = %email, error = %e, "Employee email failed");
            }

            // Set per targeted recipient, not per confirmed delivery.
            result.notification_employee_by_email = true;
        }
    }

    async fn notify_client_by_email(
        &self,
        reseller_id: i64,
        email_from: &str,
        client: &Contractor,
        status_code: i64,
        template_data: &TemplateData,
        result: &mut DispatchResult,
    ) {
        if is_blank(email_from) || is_blank(&client.email) {
            debug!(client_id = client.id, "Client email channel not available");
            return;
        }

        let context = EmailContext::client(
            NotificationEvent::ChangeReturnStatus,
            client.id,
            status_code,
        );

        match self
            .send_templated_email(
                email_from,
                &client.email,
                (CLIENT_EMAIL_SUBJECT, CLIENT_EMAIL_BODY),
                template_data,
                reseller_id,
                &context,
            )
            .await
        {
            Ok(()) => result.notification_client_by_email = true,
            Err(e) => {
                warn!(client_id = client.id, error = %e, "Client email failed");
            }
        }
    }

    async fn notify_client_by_sms(
        &self,
        reseller_id: i64,
        client: &Contractor,
        status_code: i64,
        template_data: &TemplateData,
        result: &mut DispatchResult,
    ) {
        if is_blank(&client.mobile) {
            debug!(client_id = client.id, "Client has no mobile number, skipping SMS");
            return;
        }

        let outcome = self
            .sms_gateway
            .send(
                reseller_id,
                client.id,
                NotificationEvent::ChangeReturnStatus,
                status_code,
                template_data,
            )
            .await;

        let sms = &mut result.notification_client_by_sms;
        match outcome {
            Ok(outcome) => {
                if outcome.sent {
                    sms.is_sent = true;
                }
                if let Some(error) = outcome.error.filter(|error| !is_blank(error)) {
                    warn!(client_id = client.id, error = %error, "SMS gateway reported an error");
                    sms.message = error;
                }
            }
            Err(e) => {
                warn!(client_id = client.id, error = %e, "Client SMS failed");
                sms.message = e.to_string();
            }
        }
    }

    async fn send_templated_email(
        &self,
        email_from: &str,
        email_to: &str,
        (subject_key, body_key): (&str, &str),
        template_data: &TemplateData,
        reseller_id: i64,
        context: &EmailContext,
    ) -> anyhow::Result<()> {
        let subject = self
            .localizer
            .localize(subject_key, Some(template_data), reseller_id)
            .await?;
        let body = self
            .localizer
            .localize(body_key, Some(template_data), reseller_id)
            .await?;

        let message = EmailMessage {
            email_from: email_from.to_string(),
            email_to: email_to.to_string(),
            subject,
            message: body,
        };

        self.transport
            .send_email(&message, reseller_id, context)
            .await
    }
}

fn build_template_data(
    data: &RequestData<'_>,
    entities: &ResolvedEntities,
    differences: String,
) -> Result<TemplateData, OperationError> {
    let mut template_data = TemplateData::new();

    template_data.insert("COMPLAINT_ID", TemplateValue::Int(data.int("complaintId")?));
    template_data.insert(
        "COMPLAINT_NUMBER",
        TemplateValue::Text(data.text("complaintNumber")?),
    );
    template_data.insert("CREATOR_ID", TemplateValue::Int(data.int("creatorId")?));
    template_data.insert(
        "CREATOR_NAME",
        TemplateValue::Text(entities.creator.full_name.clone()),
    );
    template_data.insert("EXPERT_ID", TemplateValue::Int(data.int("expertId")?));
    template_data.insert(
        "EXPERT_NAME",
        TemplateValue::Text(entities.expert.full_name.clone()),
    );
    template_data.insert("CLIENT_ID", TemplateValue::Int(data.int("clientId")?));
    template_data.insert(
        "CLIENT_NAME",
        TemplateValue::Text(entities.client.display_name().to_string()),
    );
    template_data.insert(
        "CONSUMPTION_ID",
        TemplateValue::Int(data.int("consumptionId")?),
    );
    template_data.insert(
        "CONSUMPTION_NUMBER",
        TemplateValue::Text(data.text("consumptionNumber")?),
    );
    template_data.insert(
        "AGREEMENT_NUMBER",
        TemplateValue::Text(data.text("agreementNumber")?),
    );
    template_data.insert("DATE", TemplateValue::Text(data.text("date")?));
    template_data.insert("DIFFERENCES", TemplateValue::Text(differences));

    debug!(
        seller = %entities.seller.name,
        fields = template_data.len(),
        "Template data assembled"
    );

    Ok(template_data)
}

/// Status the return moved to, when the request carries a non-empty `differences.to`.
fn target_status(data: &RequestData<'_>) -> Option<i64> {
    data.optional("differences")
        .and_then(|differences| differences.get("to"))
        .filter(|to| !is_empty_like(to))
        .map(to_int)
}
