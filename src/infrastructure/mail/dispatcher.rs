use std::sync::Arc;

use chrono::Utc;

use crate::{
    entities::{contact::ContactSubmission, mail::DispatchResult},
    errors::DispatchError,
    settings::MailSettings,
};

use super::{
    templates::{owner_notification, sender_confirmation},
    transport::{select_transport, ConfiguredTransports, TransportFactory, TransportKind},
};

#[derive(Clone)]
pub struct MailDispatcher {
    settings: Arc<MailSettings>,
    transports: Arc<dyn TransportFactory>,
}

impl MailDispatcher {
    pub fn new(settings: MailSettings) -> Self {
        Self::with_transports(settings, Arc::new(ConfiguredTransports::default()))
    }

    pub fn with_transports(settings: MailSettings, transports: Arc<dyn TransportFactory>) -> Self {
        MailDispatcher {
            settings: Arc::new(settings),
            transports,
        }
    }

    pub fn settings(&self) -> &MailSettings {
        &self.settings
    }

    pub fn selected_transport(&self) -> TransportKind {
        select_transport(&self.settings)
    }

    /// Sends the owner notification, then the sender confirmation.
    ///
    /// Only the owner notification decides the outcome; a failed
    /// confirmation is logged and tolerated. Each message gets exactly one
    /// attempt.
    pub async fn send(&self, submission: &ContactSubmission) -> Result<DispatchResult, DispatchError> {
        let kind = self.selected_transport();
        let transport = self.transports.build(kind, &self.settings).map_err(|e| {
            tracing::error!("Mail transport unavailable ({:?}): {}", kind, e);
            e
        })?;

        tracing::info!(provider = transport.provider_name(), "Dispatching contact mail");

        let from = match kind {
            TransportKind::HostedApi => self.settings.branded_sender(),
            TransportKind::Smtp => self.settings.relay_sender(),
        }
        .map_err(|e| {
            tracing::error!("Sender address could not be built: {}", e);
            e
        })?;
        let received_at = Utc::now();
        let notification = owner_notification(submission, &self.settings, &from, received_at);
        let confirmation = sender_confirmation(submission, &self.settings, &from, received_at);

        let result = transport.send(&notification).await.map_err(|e| {
            tracing::error!(provider = transport.provider_name(), "Owner notification failed: {}", e);
            e
        })?;

        tracing::info!(
            provider = result.provider,
            message_id = %result.provider_message_id,
            "Owner notification sent"
        );

        if let Err(e) = transport.send(&confirmation).await {
            tracing::warn!(provider = transport.provider_name(), "Sender confirmation failed: {}", e);
        }

        Ok(result)
    }
}
