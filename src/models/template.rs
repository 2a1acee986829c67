use std::fmt::{Display, Formatter, Result as FmtResult};

use anyhow::{Error, Result, anyhow};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::models::validation::is_blank;

pub const NEW_POSITION_ADDED: &str = "NewPositionAdded";
pub const POSITION_STATUS_HAS_CHANGED: &str = "PositionStatusHasChanged";
pub const EMPLOYEE_EMAIL_SUBJECT: &str = "complaintEmployeeEmailSubject";
pub const EMPLOYEE_EMAIL_BODY: &str = "complaintEmployeeEmailBody";
pub const CLIENT_EMAIL_SUBJECT: &str = "complaintClientEmailSubject";
pub const CLIENT_EMAIL_BODY: &str = "complaintClientEmailBody";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TemplateValue {
    Int(i64),
    Text(String),
}

impl TemplateValue {
    pub fn is_empty(&self) -> bool {
        match self {
            TemplateValue::Int(n) => *n == 0,
            TemplateValue::Text(s) => is_blank(s),
        }
    }
}

impl Display for TemplateValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            TemplateValue::Int(n) => write!(f, "{}", n),
            TemplateValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Flat field map handed to localization and the SMS gateway.
/// Keeps insertion order so completeness failures always name the same field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TemplateData {
    fields: IndexMap<String, TemplateValue>,
}

impl TemplateData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str, value: TemplateValue) {
        self.fields.insert(key.to_string(), value);
    }

    pub fn get(&self, key: &str) -> Option<&TemplateValue> {
        self.fields.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TemplateValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Translation entry as returned by the localization service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Translation {
    pub key: String,
    pub text: String,
}

/// Replaces `{{NAME}}` placeholders with template values.
///
/// Only the translation text is scanned. Substituted values are copied as-is, so
/// braces inside user data are never treated as placeholders. An opening `{{`
/// without a closing `}}` is kept literally.
pub fn render_placeholders(text: &str, params: Option<&TemplateData>) -> Result<String, Error> {
    let mut rendered = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find("{{") {
        let Some(length) = rest[start + 2..].find("}}") else {
            break;
        };
        let name = &rest[start + 2..start + 2 + length];

        let value = params
            .and_then(|params| params.get(name))
            .ok_or_else(|| anyhow!("Missing variable in template: {{{{{}}}}}", name))?;

        rendered.push_str(&rest[..start]);
        rendered.push_str(&value.to_string());
        rest = &rest[start + length + 4..];
    }

    rendered.push_str(rest);
    Ok(rendered)
}
