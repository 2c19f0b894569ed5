use async_trait::async_trait;
use lettre::{
    message::{Mailbox, MultiPart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use uuid::Uuid;

use crate::{
    entities::mail::{DispatchResult, MailMessage},
    errors::DispatchError,
    settings::MailSettings,
};

use super::transport::MailTransport;

pub const PROVIDER_NAME: &str = "smtp";

const IMPLICIT_TLS_PORT: u16 = 465;

pub struct SmtpTransport {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    message_id_domain: String,
}

impl SmtpTransport {
    /// Fails closed when host, user or password is missing. No connection is
    /// opened here.
    pub fn from_settings(settings: &MailSettings) -> Result<Self, DispatchError> {
        let smtp = &settings.smtp;
        let missing = |what: &str| DispatchError::TransportMisconfigured(format!("SMTP {} is not set", what));

        let host = smtp.host.as_deref().ok_or_else(|| missing("host"))?;
        let user = smtp.user.clone().ok_or_else(|| missing("user"))?;
        let password = smtp.password.as_ref().ok_or_else(|| missing("password"))?;

        let builder = if smtp.port == IMPLICIT_TLS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
        }
        .map_err(|e| DispatchError::TransportMisconfigured(format!("SMTP relay {}: {}", host, e)))?;

        let mailer = builder
            .port(smtp.port)
            .credentials(Credentials::new(user, password.as_str().to_owned()))
            .build();

        Ok(SmtpTransport {
            mailer,
            message_id_domain: settings.site_domain.clone(),
        })
    }
}

impl SmtpTransport {
    /// Builds the MIME message and its generated `Message-ID`.
    ///
    /// A reply-to lettre cannot parse is dropped rather than failing the
    /// send; the sender's address is already part of the body.
    fn compose(&self, message: &MailMessage) -> Result<(Message, String), DispatchError> {
        let message_id = format!("<{}@{}>", Uuid::new_v4(), self.message_id_domain);

        let mut builder = Message::builder()
            .from(message.from.parse::<Mailbox>()?)
            .to(message.to.parse::<Mailbox>()?)
            .subject(message.subject.clone())
            .message_id(Some(message_id.clone()));
        if let Some(reply_to) = &message.reply_to {
            match reply_to.parse::<Mailbox>() {
                Ok(mailbox) => builder = builder.reply_to(mailbox),
                Err(e) => tracing::warn!(reply_to = %reply_to, "Omitting unparsable Reply-To: {}", e),
            }
        }

        let email = builder.multipart(MultiPart::alternative_plain_html(
            message.text_body.clone(),
            message.html_body.clone(),
        ))?;

        Ok((email, message_id))
    }
}

#[async_trait]
impl MailTransport for SmtpTransport {
    async fn send(&self, message: &MailMessage) -> Result<DispatchResult, DispatchError> {
        let (email, message_id) = self.compose(message)?;

        self.mailer.send(email).await?;

        Ok(DispatchResult::new(PROVIDER_NAME, message_id))
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        settings::{AppEnvironment, SmtpSettings},
        use_cases::validation::is_email_shaped,
    };
    use zeroize::Zeroizing;

    fn settings(smtp: SmtpSettings) -> MailSettings {
        MailSettings {
            environment: AppEnvironment::Development,
            api_key: None,
            api_url: String::new(),
            owner_email: "owner@example.com".into(),
            site_name: "Portfolio".into(),
            site_domain: "example.com".into(),
            smtp,
        }
    }

    fn transport() -> SmtpTransport {
        SmtpTransport::from_settings(&settings(SmtpSettings {
            host: Some("smtp.example.com".into()),
            port: 587,
            user: Some("relay@example.com".into()),
            password: Some(Zeroizing::new("secret".into())),
        }))
        .unwrap()
    }

    fn notification(reply_to: &str) -> MailMessage {
        MailMessage {
            from: "Portfolio <relay@example.com>".into(),
            to: "owner@example.com".into(),
            reply_to: Some(reply_to.into()),
            subject: "[Portfolio Lead] Hi".into(),
            html_body: "<p>Hi</p>".into(),
            text_body: "Hi".into(),
        }
    }

    fn rendered(email: &Message) -> String {
        String::from_utf8_lossy(&email.formatted()).into_owned()
    }

    #[test]
    fn missing_password_fails_closed() {
        let err = SmtpTransport::from_settings(&settings(SmtpSettings {
            host: Some("smtp.example.com".into()),
            user: Some("relay@example.com".into()),
            ..SmtpSettings::default()
        }))
        .err()
        .unwrap();

        assert_eq!(err, DispatchError::TransportMisconfigured("SMTP password is not set".into()));
    }

    #[test]
    fn well_formed_reply_to_is_kept() {
        let (email, message_id) = transport().compose(&notification("a@b.co")).unwrap();

        let raw = rendered(&email);
        assert!(raw.contains("Reply-To: a@b.co"));
        assert!(message_id.ends_with("@example.com>"));
    }

    #[test]
    fn shape_valid_reply_to_that_lettre_rejects_is_omitted() {
        for address in ["john..doe@example.com", "a,b@c.de", "<a>@b.co"] {
            assert!(is_email_shaped(address));

            let (email, _) = transport().compose(&notification(address)).unwrap();

            let raw = rendered(&email);
            assert!(!raw.contains("Reply-To"), "{address} kept a Reply-To header");
            assert!(raw.contains("To: owner@example.com"));
        }
    }

    #[test]
    fn punctuated_display_name_in_sender_parses() {
        let mut message = notification("a@b.co");
        message.from = "\"Doe, J. Portfolio\" <relay@example.com>".into();

        assert!(transport().compose(&message).is_ok());
    }
}
