use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::{
    entities::mail::{DispatchResult, MailMessage},
    errors::DispatchError,
    settings::MailSettings,
};

use super::transport::MailTransport;

pub const PROVIDER_NAME: &str = "hosted-api";

/// JSON email API (Resend-compatible): bearer-authenticated POST that
/// answers with the provider's message id.
pub struct HostedApiTransport {
    client: reqwest::Client,
    api_url: String,
    api_key: Zeroizing<String>,
}

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
    subject: &'a str,
    html: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct SendEmailResponse {
    id: String,
}

impl HostedApiTransport {
    pub fn from_settings(client: reqwest::Client, settings: &MailSettings) -> Result<Self, DispatchError> {
        let api_key = settings
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| DispatchError::TransportMisconfigured("mail API key is not set".into()))?;

        if settings.api_url.trim().is_empty() {
            return Err(DispatchError::TransportMisconfigured("mail API url is not set".into()));
        }

        Ok(HostedApiTransport {
            client,
            api_url: settings.api_url.clone(),
            api_key,
        })
    }
}

#[async_trait]
impl MailTransport for HostedApiTransport {
    async fn send(&self, message: &MailMessage) -> Result<DispatchResult, DispatchError> {
        let request = SendEmailRequest {
            from: &message.from,
            to: [&message.to],
            reply_to: message.reply_to.as_deref(),
            subject: &message.subject,
            html: &message.html_body,
            text: &message.text_body,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(self.api_key.as_str())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DispatchError::Provider(format!("{}: {}", status, body)));
        }

        let sent: SendEmailResponse = response
            .json()
            .await
            .map_err(|e| DispatchError::Provider(format!("unexpected response body: {}", e)))?;

        Ok(DispatchResult::new(PROVIDER_NAME, sent.id))
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}
