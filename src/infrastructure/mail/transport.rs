use async_trait::async_trait;

use crate::{
    entities::mail::{DispatchResult, MailMessage},
    errors::DispatchError,
    settings::MailSettings,
};

use super::{hosted_api::HostedApiTransport, smtp::SmtpTransport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    HostedApi,
    Smtp,
}

/// Hosted API only when a key is configured AND the runtime is production.
/// Anything else goes through SMTP; there is no fallback between the two.
pub fn select_transport(settings: &MailSettings) -> TransportKind {
    if settings.has_api_key() && settings.is_production() {
        TransportKind::HostedApi
    } else {
        TransportKind::Smtp
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Single delivery attempt, no retries.
    async fn send(&self, message: &MailMessage) -> Result<DispatchResult, DispatchError>;

    fn provider_name(&self) -> &'static str;
}

#[cfg_attr(test, mockall::automock)]
pub trait TransportFactory: Send + Sync {
    /// Must fail with [`DispatchError::TransportMisconfigured`] without any
    /// network I/O when the selected transport lacks credentials.
    fn build(
        &self,
        kind: TransportKind,
        settings: &MailSettings,
    ) -> Result<Box<dyn MailTransport>, DispatchError>;
}

/// Builds the real transports from [`MailSettings`].
#[derive(Clone, Default)]
pub struct ConfiguredTransports {
    http: reqwest::Client,
}

impl ConfiguredTransports {
    pub fn new(http: reqwest::Client) -> Self {
        ConfiguredTransports { http }
    }
}

impl TransportFactory for ConfiguredTransports {
    fn build(
        &self,
        kind: TransportKind,
        settings: &MailSettings,
    ) -> Result<Box<dyn MailTransport>, DispatchError> {
        match kind {
            TransportKind::HostedApi => {
                let transport = HostedApiTransport::from_settings(self.http.clone(), settings)?;
                Ok(Box::new(transport))
            }
            TransportKind::Smtp => {
                let transport = SmtpTransport::from_settings(settings)?;
                Ok(Box::new(transport))
            }
        }
    }
}
