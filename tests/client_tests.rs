mod test_utils;

use portfolio_contact::client::{ContactClient, ContactFormData, NETWORK_ERROR};
use std::net::TcpListener;
use test_utils::*;

fn form(name: &str, email: &str, message: &str) -> ContactFormData {
    ContactFormData {
        name: name.into(),
        email: email.into(),
        message: message.into(),
        subject: Some("Hello".into()),
    }
}

fn valid_form() -> ContactFormData {
    form("Al", "a@b.co", "Hello there, this is a test message.")
}

#[actix_rt::test]
async fn successful_submission_is_reported() {
    let app = TestApp::spawn().await;
    let client = ContactClient::new(&app.address).unwrap();

    let result = client.send_contact_form(&valid_form()).await;

    assert!(result.success);
    assert!(result.message.is_some());
    assert_eq!(result.rate_limit.unwrap().remaining, 2);
    assert_eq!(app.outbox.messages()[0].subject, "[Portfolio Lead] Hello");
}

#[actix_rt::test]
async fn validation_errors_are_surfaced_verbatim() {
    let app = TestApp::spawn().await;
    let client = ContactClient::new(&app.address).unwrap();

    let result = client
        .send_contact_form(&form("A", "not-an-email", "short"))
        .await;

    assert!(!result.success);
    assert_eq!(result.error.as_deref(), Some("Validation failed"));
    assert_eq!(result.errors.unwrap().len(), 3);
}

#[actix_rt::test]
async fn rate_limit_is_surfaced_with_retry_after() {
    let app = TestApp::spawn().await;
    let client = ContactClient::new(&app.address).unwrap();

    for _ in 0..3 {
        assert!(client.send_contact_form(&valid_form()).await.success);
    }
    let result = client.send_contact_form(&valid_form()).await;

    assert!(!result.success);
    assert!(result.retry_after.unwrap() > 0);
}

#[actix_rt::test]
async fn unreachable_server_yields_connectivity_error() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = ContactClient::new(&format!("http://127.0.0.1:{}", port)).unwrap();

    let result = client.send_contact_form(&valid_form()).await;

    assert!(!result.success);
    assert_eq!(result.error.as_deref(), Some(NETWORK_ERROR));
    assert!(!client.is_reachable().await);
}

#[actix_rt::test]
async fn liveness_probe_is_reachable() {
    let app = TestApp::spawn().await;
    let client = ContactClient::new(&app.address).unwrap();

    assert!(client.is_reachable().await);
}
