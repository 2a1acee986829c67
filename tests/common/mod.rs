#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use anyhow::{Error, Result, anyhow};
use async_trait::async_trait;
use return_notification_service::{
    clients::{Localizer, MessageTransport, ReferenceStore, ResellerSettings, SmsGateway},
    models::{
        entity::{Contractor, ContractorType, Employee, Seller},
        message::{EmailContext, EmailMessage, SmsOutcome},
        notification::NotificationEvent,
        request::OperationRequest,
        template::{TemplateData, render_placeholders},
    },
    utils::ReturnNotificationOperation,
};
use serde_json::{Value, json};

pub const RESELLER_ID: i64 = 1;
pub const CLIENT_ID: i64 = 10;
pub const CREATOR_ID: i64 = 20;
pub const EXPERT_ID: i64 = 21;
pub const EMAIL_FROM: &str = "noreply@shop.test";
pub const CLIENT_EMAIL: &str = "client@acme.test";

#[derive(Default)]
pub struct FakeReferences {
    pub sellers: Mutex<HashMap<i64, Seller>>,
    pub contractors: Mutex<HashMap<i64, Contractor>>,
    pub employees: Mutex<HashMap<i64, Employee>>,
    pub statuses: HashMap<i64, String>,
    pub lookups: AtomicUsize,
}

impl FakeReferences {
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn update_client(&self, update: impl FnOnce(&mut Contractor)) {
        let mut contractors = self.contractors.lock().unwrap();
        if let Some(client) = contractors.get_mut(&CLIENT_ID) {
            update(client);
        }
    }

    pub fn remove_employee(&self, id: i64) {
        self.employees.lock().unwrap().remove(&id);
    }
}

#[async_trait]
impl ReferenceStore for FakeReferences {
    async fn seller_by_id(&self, id: i64) -> Result<Option<Seller>, Error> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.sellers.lock().unwrap().get(&id).cloned())
    }

    async fn contractor_by_id(&self, id: i64) -> Result<Option<Contractor>, Error> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.contractors.lock().unwrap().get(&id).cloned())
    }

    async fn employee_by_id(&self, id: i64) -> Result<Option<Employee>, Error> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.employees.lock().unwrap().get(&id).cloned())
    }

    async fn status_name(&self, code: i64) -> Result<String, Error> {
        Ok(self.statuses.get(&code).cloned().unwrap_or_default())
    }
}

#[derive(Default)]
pub struct FakeSettings {
    pub email_from: Mutex<String>,
    pub recipients: Vec<String>,
    pub permissions_requested: Mutex<Vec<(i64, String)>>,
}

impl FakeSettings {
    pub fn set_email_from(&self, address: &str) {
        *self.email_from.lock().unwrap() = address.to_string();
    }
}

#[async_trait]
impl ResellerSettings for FakeSettings {
    async fn default_from_address(&self) -> Result<String, Error> {
        Ok(self.email_from.lock().unwrap().clone())
    }

    async fn permitted_recipient_emails(
        &self,
        reseller_id: i64,
        permission: &str,
    ) -> Result<Vec<String>, Error> {
        self.permissions_requested
            .lock()
            .unwrap()
            .push((reseller_id, permission.to_string()));
        Ok(self.recipients.clone())
    }
}

#[derive(Default)]
pub struct FakeLocalizer {
    pub texts: HashMap<String, String>,
    pub failing_keys: Mutex<HashSet<String>>,
}

impl FakeLocalizer {
    pub fn fail_on(&self, key: &str) {
        self.failing_keys.lock().unwrap().insert(key.to_string());
    }
}

#[async_trait]
impl Localizer for FakeLocalizer {
    async fn localize(
        &self,
        key: &str,
        params: Option<&TemplateData>,
        _reseller_id: i64,
    ) -> Result<String, Error> {
        if self.failing_keys.lock().unwrap().contains(key) {
            return Err(anyhow!("Localization service returned status 503"));
        }

        let text = self.texts.get(key).map(String::as_str).unwrap_or(key);
        render_placeholders(text, params)
    }
}

#[derive(Debug, Clone)]
pub struct SentEmail {
    pub message: EmailMessage,
    pub reseller_id: i64,
    pub context: EmailContext,
}

#[derive(Default)]
pub struct FakeTransport {
    pub sent: Mutex<Vec<SentEmail>>,
    pub failing_recipients: Mutex<HashSet<String>>,
}

impl FakeTransport {
    pub fn fail_for(&self, email: &str) {
        self.failing_recipients
            .lock()
            .unwrap()
            .insert(email.to_string());
    }

    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn recipients(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .map(|email| email.message.email_to)
            .collect()
    }
}

#[async_trait]
impl MessageTransport for FakeTransport {
    async fn send_email(
        &self,
        message: &EmailMessage,
        reseller_id: i64,
        context: &EmailContext,
    ) -> Result<(), Error> {
        self.sent.lock().unwrap().push(SentEmail {
            message: message.clone(),
            reseller_id,
            context: context.clone(),
        });

        if self
            .failing_recipients
            .lock()
            .unwrap()
            .contains(&message.email_to)
        {
            return Err(anyhow!("Messages request failed (502 Bad Gateway)"));
        }

        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct SentSms {
    pub reseller_id: i64,
    pub client_id: i64,
    pub event: NotificationEvent,
    pub status_code: i64,
    pub template_data: Value,
}

pub struct FakeSmsGateway {
    pub outcome: Mutex<Result<SmsOutcome, String>>,
    pub sent: Mutex<Vec<SentSms>>,
}

impl Default for FakeSmsGateway {
    fn default() -> Self {
        Self {
            outcome: Mutex::new(Ok(SmsOutcome {
                sent: true,
                error: None,
            })),
            sent: Mutex::new(Vec::new()),
        }
    }
}

impl FakeSmsGateway {
    pub fn respond_with(&self, outcome: Result<SmsOutcome, String>) {
        *self.outcome.lock().unwrap() = outcome;
    }

    pub fn sent(&self) -> Vec<SentSms> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl SmsGateway for FakeSmsGateway {
    async fn send(
        &self,
        reseller_id: i64,
        client_id: i64,
        event: NotificationEvent,
        status_code: i64,
        template_data: &TemplateData,
    ) -> Result<SmsOutcome, Error> {
        self.sent.lock().unwrap().push(SentSms {
            reseller_id,
            client_id,
            event,
            status_code,
            template_data: serde_json::to_value(template_data)?,
        });

        self.outcome.lock().unwrap().clone().map_err(|e| anyhow!(e))
    }
}

pub struct Harness {
    pub references: Arc<FakeReferences>,
    pub settings: Arc<FakeSettings>,
    pub localizer: Arc<FakeLocalizer>,
    pub transport: Arc<FakeTransport>,
    pub sms: Arc<FakeSmsGateway>,
}

impl Harness {
    /// Seller 1 with a customer client that has both email and mobile,
    /// two employees, two known statuses and two permitted recipients.
    pub fn new() -> Self {
        let references = FakeReferences {
            statuses: HashMap::from([
                (1, "Pending".to_string()),
                (2, "Approved".to_string()),
            ]),
            ..Default::default()
        };

        references.sellers.lock().unwrap().insert(
            RESELLER_ID,
            Seller {
                id: RESELLER_ID,
                name: "Shop".to_string(),
            },
        );
        references.contractors.lock().unwrap().insert(
            CLIENT_ID,
            Contractor {
                id: CLIENT_ID,
                contractor_type: ContractorType::Customer,
                seller_id: RESELLER_ID,
                name: "acme".to_string(),
                full_name: "Acme Ltd".to_string(),
                email: CLIENT_EMAIL.to_string(),
                mobile: "+15550100".to_string(),
            },
        );
        {
            let mut employees = references.employees.lock().unwrap();
            employees.insert(
                CREATOR_ID,
                Employee {
                    id: CREATOR_ID,
                    full_name: "Casey Creator".to_string(),
                },
            );
            employees.insert(
                EXPERT_ID,
                Employee {
                    id: EXPERT_ID,
                    full_name: "Eli Expert".to_string(),
                },
            );
        }

        let settings = FakeSettings {
            email_from: Mutex::new(EMAIL_FROM.to_string()),
            recipients: vec![
                "manager@shop.test".to_string(),
                "returns@shop.test".to_string(),
            ],
            ..Default::default()
        };

        let localizer = FakeLocalizer {
            texts: HashMap::from([
                (
                    "NewPositionAdded".to_string(),
                    "A new position was added".to_string(),
                ),
                (
                    "PositionStatusHasChanged".to_string(),
                    "Status changed from {{FROM}} to {{TO}}".to_string(),
                ),
                (
                    "complaintClientEmailSubject".to_string(),
                    "Return {{COMPLAINT_NUMBER}} updated".to_string(),
                ),
                (
                    "complaintEmployeeEmailSubject".to_string(),
                    "Return {{COMPLAINT_NUMBER}} for {{CLIENT_NAME}}".to_string(),
                ),
            ]),
            ..Default::default()
        };

        Self {
            references: Arc::new(references),
            settings: Arc::new(settings),
            localizer: Arc::new(localizer),
            transport: Arc::new(FakeTransport::default()),
            sms: Arc::new(FakeSmsGateway::default()),
        }
    }

    pub fn operation(&self) -> ReturnNotificationOperation {
        ReturnNotificationOperation::new(
            self.references.clone(),
            self.settings.clone(),
            self.localizer.clone(),
            self.transport.clone(),
            self.sms.clone(),
        )
    }
}

pub fn change_request() -> OperationRequest {
    OperationRequest {
        data: json!({
            "resellerId": RESELLER_ID,
            "notificationType": 2,
            "clientId": CLIENT_ID,
            "creatorId": CREATOR_ID,
            "expertId": EXPERT_ID,
            "complaintId": 100,
            "complaintNumber": "C-100",
            "consumptionId": 200,
            "consumptionNumber": "R-200",
            "agreementNumber": "A-300",
            "date": "2024-05-01",
            "differences": { "from": 1, "to": 2 }
        }),
    }
}

pub fn new_request() -> OperationRequest {
    let mut request = change_request();
    request.data["notificationType"] = json!(1);
    if let Some(fields) = request.data.as_object_mut() {
        fields.remove("differences");
    }
    request
}

pub fn with_field(mut request: OperationRequest, key: &str, value: Value) -> OperationRequest {
    request.data[key] = value;
    request
}

pub fn without_field(mut request: OperationRequest, key: &str) -> OperationRequest {
    if let Some(fields) = request.data.as_object_mut() {
        fields.remove(key);
    }
    request
}
