use once_cell::sync::Lazy;
use regex::Regex;

use crate::entities::contact::{SubmissionRequest, ValidationResult};

pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 100;
pub const MESSAGE_MIN_CHARS: usize = 10;
pub const MESSAGE_MAX_CHARS: usize = 2000;

static EMAIL_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

/// `local@domain.tld` shape check, nothing stricter.
pub fn is_email_shaped(value: &str) -> bool {
    EMAIL_SHAPE.is_match(value.trim())
}

/// Checks every field rule independently so all violations are reported
/// together, in field order: name, email, message.
pub fn validate_submission(request: &SubmissionRequest) -> ValidationResult {
    let mut errors = Vec::new();

    let name = trimmed(&request.name);
    let name_len = name.chars().count();
    if name_len < NAME_MIN_CHARS {
        errors.push(format!("Name must be at least {} characters long", NAME_MIN_CHARS));
    } else if name_len > NAME_MAX_CHARS {
        errors.push(format!("Name must be less than {} characters", NAME_MAX_CHARS));
    }

    if !is_email_shaped(trimmed(&request.email)) {
        errors.push("Please provide a valid email address".to_string());
    }

    let message_len = trimmed(&request.message).chars().count();
    if message_len < MESSAGE_MIN_CHARS {
        errors.push(format!("Message must be at least {} characters long", MESSAGE_MIN_CHARS));
    } else if message_len > MESSAGE_MAX_CHARS {
        errors.push(format!("Message must be less than {} characters", MESSAGE_MAX_CHARS));
    }

    ValidationResult::from_errors(errors)
}

fn trimmed(value: &Option<String>) -> &str {
    value.as_deref().map(str::trim).unwrap_or_default()
}
