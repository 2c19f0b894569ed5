use serde::Serialize;

/// A fully rendered email, ready to be handed to a transport.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MailMessage {
    pub from: String,
    pub to: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DispatchResult {
    pub provider: &'static str,
    pub provider_message_id: String,
}

impl DispatchResult {
    pub fn new(provider: &'static str, provider_message_id: impl Into<String>) -> Self {
        DispatchResult {
            provider,
            provider_message_id: provider_message_id.into(),
        }
    }
}
