use serde_json::Value;

use crate::models::{error::OperationError, template::TemplateData};

/// Loose emptiness shared by request values, template fields and contact details:
/// null, `false`, numeric zero, `""`, `"0"` and empty collections all count as empty.
pub fn is_empty_like(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().map(|f| f == 0.0).unwrap_or(false),
        Value::String(s) => is_blank(s),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

pub fn is_blank(text: &str) -> bool {
    text.is_empty() || text == "0"
}

pub fn ensure_complete(template_data: &TemplateData) -> Result<(), OperationError> {
    match template_data.iter().find(|(_, value)| value.is_empty()) {
        Some((key, _)) => Err(OperationError::IncompleteTemplate(key.to_string())),
        None => Ok(()),
    }
}
