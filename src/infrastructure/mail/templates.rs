use ammonia::clean_text;
use chrono::{DateTime, Utc};

use crate::{
    entities::{contact::ContactSubmission, mail::MailMessage},
    settings::MailSettings,
};

pub const LEAD_SUBJECT_PREFIX: &str = "[Portfolio Lead]";

/// Mail to the site owner. Replying from the owner's inbox goes straight to
/// the sender.
pub fn owner_notification(
    submission: &ContactSubmission,
    settings: &MailSettings,
    from: &str,
    received_at: DateTime<Utc>,
) -> MailMessage {
    let received = format_timestamp(received_at);

    let html_body = format!(
        r#"<!DOCTYPE html>
<html>
  <body style="margin:0;padding:24px;background:#f4f4f7;font-family:Arial,Helvetica,sans-serif;color:#1f2933;">
    <div style="max-width:600px;margin:0 auto;background:#ffffff;border-radius:12px;overflow:hidden;box-shadow:0 4px 12px rgba(0,0,0,0.08);">
      <div style="background:linear-gradient(135deg,#6366f1,#8b5cf6);padding:24px;color:#ffffff;">
        <h1 style="margin:0;font-size:22px;">New contact form submission</h1>
        <p style="margin:8px 0 0;opacity:0.9;">{site}</p>
      </div>
      <div style="padding:24px;">
        <p style="margin:0 0 8px;"><strong>Name:</strong> {name}</p>
        <p style="margin:0 0 8px;"><strong>Email:</strong> <a href="mailto:{email}">{email}</a></p>
        <p style="margin:0 0 16px;"><strong>Subject:</strong> {subject}</p>
        <div style="padding:16px;background:#f9fafb;border-left:4px solid #6366f1;border-radius:6px;">{message}</div>
        <p style="margin:24px 0 0;font-size:12px;color:#6b7280;">Received {received}</p>
      </div>
    </div>
  </body>
</html>"#,
        site = clean_text(&settings.site_name),
        name = clean_text(&submission.name),
        email = clean_text(&submission.email),
        subject = clean_text(&submission.subject),
        message = html_paragraphs(&submission.message),
        received = received,
    );

    let text_body = format!(
        "New contact form submission ({site})\n\nName: {name}\nEmail: {email}\nSubject: {subject}\n\n{message}\n\nReceived {received}\n",
        site = settings.site_name,
        name = submission.name,
        email = submission.email,
        subject = submission.subject,
        message = submission.message,
        received = received,
    );

    MailMessage {
        from: from.to_string(),
        to: settings.owner_email.clone(),
        reply_to: Some(submission.email.clone()),
        subject: format!("{} {}", LEAD_SUBJECT_PREFIX, submission.subject),
        html_body,
        text_body,
    }
}

/// Acknowledgement sent back to the submitter. Replies reach the owner.
pub fn sender_confirmation(
    submission: &ContactSubmission,
    settings: &MailSettings,
    from: &str,
    received_at: DateTime<Utc>,
) -> MailMessage {
    let received = format_timestamp(received_at);

    let html_body = format!(
        r#"<!DOCTYPE html>
<html>
  <body style="margin:0;padding:24px;background:#f4f4f7;font-family:Arial,Helvetica,sans-serif;color:#1f2933;">
    <div style="max-width:600px;margin:0 auto;background:#ffffff;border-radius:12px;overflow:hidden;">
      <div style="background:linear-gradient(135deg,#6366f1,#8b5cf6);padding:24px;color:#ffffff;">
        <h1 style="margin:0;font-size:22px;">Thanks for reaching out, {name}!</h1>
      </div>
      <div style="padding:24px;">
        <p>Your message reached me and I will get back to you as soon as I can.</p>
        <p style="margin:16px 0 8px;"><strong>Subject:</strong> {subject}</p>
        <div style="padding:16px;background:#f9fafb;border-left:4px solid #6366f1;border-radius:6px;">{message}</div>
        <p style="margin:24px 0 0;font-size:12px;color:#6b7280;">Sent {received} via {site}</p>
      </div>
    </div>
  </body>
</html>"#,
        name = clean_text(&submission.name),
        subject = clean_text(&submission.subject),
        message = html_paragraphs(&submission.message),
        received = received,
        site = clean_text(&settings.site_name),
    );

    let text_body = format!(
        "Hi {name},\n\nThanks for reaching out! Your message reached me and I will get back to you as soon as I can.\n\nSubject: {subject}\n\n{message}\n\nSent {received} via {site}\n",
        name = submission.name,
        subject = submission.subject,
        message = submission.message,
        received = received,
        site = settings.site_name,
    );

    MailMessage {
        from: from.to_string(),
        to: submission.email.clone(),
        reply_to: Some(settings.owner_email.clone()),
        subject: format!("Thanks for reaching out, {}!", submission.name),
        html_body,
        text_body,
    }
}

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

fn html_paragraphs(text: &str) -> String {
    text.lines().map(clean_text).collect::<Vec<_>>().join("<br>")
}
