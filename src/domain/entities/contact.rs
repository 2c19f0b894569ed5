use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Raw contact form body as posted by the site.
///
/// Every field is optional at this stage so that missing or wrongly typed
/// values surface as validation messages instead of deserialization failures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmissionRequest {
    #[serde(default, deserialize_with = "string_or_none")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "string_or_none")]
    pub email: Option<String>,

    #[serde(default, deserialize_with = "string_or_none")]
    pub message: Option<String>,

    #[serde(default, deserialize_with = "string_or_none")]
    pub subject: Option<String>,
}

/// Any non-string JSON value is treated as absent.
fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

impl SubmissionRequest {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        SubmissionRequest {
            name: Some(name.into()),
            email: Some(email.into()),
            message: Some(message.into()),
            subject: None,
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }
}

/// A submission that passed validation, with every field trimmed and the
/// subject resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
    pub subject: String,
}

impl ContactSubmission {
    pub fn default_subject(name: &str) -> String {
        format!("New message from {}", name)
    }
}

impl From<SubmissionRequest> for ContactSubmission {
    fn from(request: SubmissionRequest) -> Self {
        let trimmed = |value: Option<String>| value.map(|v| v.trim().to_string()).unwrap_or_default();

        let name = trimmed(request.name);
        let subject = request
            .subject
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| ContactSubmission::default_subject(&name));

        ContactSubmission {
            email: trimmed(request.email),
            message: trimmed(request.message),
            subject,
            name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn from_errors(errors: Vec<String>) -> Self {
        ValidationResult {
            valid: errors.is_empty(),
            errors,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateLimitInfo {
    pub remaining: usize,
    /// Unix epoch milliseconds at which the oldest counted request leaves the window.
    pub reset: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<RateLimitInfo>,
}
