use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OperationError {
    #[error("Key {0} not found in array")]
    MissingField(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Template Data ({0}) is empty!")]
    IncompleteTemplate(String),

    #[error("Upstream service failed: {0}")]
    Upstream(#[from] anyhow::Error),
}

impl OperationError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            OperationError::MissingField(_)
            | OperationError::InvalidInput(_)
            | OperationError::NotFound(_) => StatusCode::BAD_REQUEST,
            OperationError::IncompleteTemplate(_) | OperationError::Upstream(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            OperationError::MissingField(_) => "missing_field",
            OperationError::InvalidInput(_) => "invalid_input",
            OperationError::NotFound(_) => "not_found",
            OperationError::IncompleteTemplate(_) => "incomplete_template",
            OperationError::Upstream(_) => "upstream",
        }
    }
}
