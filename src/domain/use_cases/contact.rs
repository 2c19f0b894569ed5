use crate::{
    entities::contact::{ContactResponse, ContactSubmission, RateLimitInfo, SubmissionRequest},
    errors::ContactError,
    limiter::rate_limiter::{RateLimitPolicy, RateLimiter},
    mail::MailDispatcher,
    use_cases::validation::validate_submission,
};

pub const SUCCESS_MESSAGE: &str = "Thank you for your message! I'll get back to you soon.";

/// Runs one submission through validation, rate limiting and dispatch, in
/// that order. Earlier stages never trigger later side effects.
#[derive(Clone)]
pub struct ContactHandler {
    pub limiter: RateLimiter,
    pub dispatcher: MailDispatcher,
}

impl ContactHandler {
    pub fn new(limiter: RateLimiter, dispatcher: MailDispatcher) -> Self {
        ContactHandler { limiter, dispatcher }
    }

    pub fn policy(&self) -> RateLimitPolicy {
        self.limiter.policy()
    }

    /// Handles a contact form submission from `client_id`
    pub async fn submit(
        &self,
        request: SubmissionRequest,
        client_id: &str,
    ) -> Result<ContactResponse, ContactError> {
        let validation = validate_submission(&request);
        if !validation.valid {
            tracing::warn!(errors = validation.errors.len(), "Contact submission failed validation");
            return Err(ContactError::ValidationFailed(validation.errors));
        }

        let decision = self.limiter.check(client_id);
        if !decision.allowed {
            tracing::warn!(client = %client_id, "Contact submission rate limited");
            return Err(ContactError::RateLimited {
                retry_after_secs: decision.retry_after_secs,
            });
        }

        let submission = ContactSubmission::from(request);
        let result = self.dispatcher.send(&submission).await?;

        tracing::info!(
            client = %client_id,
            provider = result.provider,
            "Contact submission delivered"
        );

        Ok(ContactResponse {
            success: true,
            message: SUCCESS_MESSAGE.to_string(),
            rate_limit: Some(RateLimitInfo {
                remaining: decision.remaining,
                reset: decision.reset_at_ms,
            }),
        })
    }
}
