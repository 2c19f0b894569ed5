use actix_web::{
    error::ResponseError,
    http::{header, StatusCode},
    HttpResponse,
};
use derive_more::Display;
use serde::Serialize;

/// Everything that can stop a contact submission, in pipeline order.
#[derive(Debug, Display)]
pub enum ContactError {
    #[display("Malformed input: {_0}")]
    MalformedInput(String),

    #[display("Validation failed: {}", _0.join(", "))]
    ValidationFailed(Vec<String>),

    #[display("Rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[display("Dispatch failed: {_0}")]
    DispatchFailed(DispatchError),
}

#[derive(Debug, Display, Clone, PartialEq)]
pub enum DispatchError {
    #[display("Mail transport misconfigured: {_0}")]
    TransportMisconfigured(String),

    #[display("Mail provider rejected the message: {_0}")]
    Provider(String),

    #[display("Mail transport network error: {_0}")]
    Network(String),

    #[display("Invalid mail message: {_0}")]
    InvalidMessage(String),
}

impl std::error::Error for ContactError {}
impl std::error::Error for DispatchError {}

impl From<DispatchError> for ContactError {
    fn from(err: DispatchError) -> Self {
        ContactError::DispatchFailed(err)
    }
}

impl From<reqwest::Error> for DispatchError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => DispatchError::Provider(format!("{}: {}", status, err)),
            None => DispatchError::Network(err.to_string()),
        }
    }
}

impl From<lettre::error::Error> for DispatchError {
    fn from(err: lettre::error::Error) -> Self {
        DispatchError::InvalidMessage(err.to_string())
    }
}

impl From<lettre::address::AddressError> for DispatchError {
    fn from(err: lettre::address::AddressError) -> Self {
        DispatchError::InvalidMessage(format!("invalid address: {}", err))
    }
}

impl From<lettre::transport::smtp::Error> for DispatchError {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        if err.is_permanent() || err.is_transient() {
            DispatchError::Provider(err.to_string())
        } else {
            DispatchError::Network(err.to_string())
        }
    }
}

/// Body of every non-success response from the contact endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureBody {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u64>,
}

impl FailureBody {
    pub fn new(error: impl Into<String>) -> Self {
        FailureBody {
            success: false,
            error: error.into(),
            errors: None,
            retry_after: None,
        }
    }
}

impl ContactError {
    /// Client-facing message. Transport detail stays in the server logs.
    pub fn public_message(&self) -> &'static str {
        match self {
            ContactError::MalformedInput(_) => "Invalid request body",
            ContactError::ValidationFailed(_) => "Validation failed",
            ContactError::RateLimited { .. } => "Too many requests. Please try again later.",
            ContactError::DispatchFailed(_) => "Failed to send message. Please try again later.",
        }
    }

    pub fn body(&self) -> FailureBody {
        let mut body = FailureBody::new(self.public_message());
        match self {
            ContactError::ValidationFailed(errors) => body.errors = Some(errors.clone()),
            ContactError::RateLimited { retry_after_secs } => body.retry_after = Some(*retry_after_secs),
            _ => {}
        }
        body
    }
}

impl ResponseError for ContactError {
    fn error_response(&self) -> HttpResponse {
        let mut response = HttpResponse::build(self.status_code());
        if let ContactError::RateLimited { retry_after_secs } = self {
            response.insert_header((header::RETRY_AFTER, retry_after_secs.to_string()));
        }
        response.json(self.body())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ContactError::MalformedInput(_) => StatusCode::BAD_REQUEST,
            ContactError::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            ContactError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            ContactError::DispatchFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
