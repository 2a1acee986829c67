use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::error::OperationError;

/// Body accepted by the operation endpoint; only `data` is read.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OperationRequest {
    #[serde(default)]
    pub data: Value,
}

/// Strict accessor over the loosely typed request payload.
#[derive(Debug, Clone)]
pub struct RequestData<'a> {
    fields: Option<&'a Map<String, Value>>,
}

impl<'a> RequestData<'a> {
    pub fn from_request(request: &'a OperationRequest) -> Self {
        Self::new(&request.data)
    }

    pub fn new(value: &'a Value) -> Self {
        Self {
            fields: value.as_object(),
        }
    }

    pub fn element(&self, key: &str) -> Result<&'a Value, OperationError> {
        self.optional(key)
            .ok_or_else(|| OperationError::MissingField(key.to_string()))
    }

    pub fn optional(&self, key: &str) -> Option<&'a Value> {
        self.fields.and_then(|fields| fields.get(key))
    }

    pub fn int(&self, key: &str) -> Result<i64, OperationError> {
        self.element(key).map(to_int)
    }

    pub fn text(&self, key: &str) -> Result<String, OperationError> {
        self.element(key).map(to_text)
    }
}

pub fn to_int(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Value::String(s) => leading_int(s),
        Value::Bool(true) => 1,
        _ => 0,
    }
}

pub fn to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(true) => "1".to_string(),
        _ => String::new(),
    }
}

fn leading_int(text: &str) -> i64 {
    let trimmed = text.trim_start();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());

    digits[..end]
        .parse::<i64>()
        .map(|n| sign * n)
        .unwrap_or(0)
}
