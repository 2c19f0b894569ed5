#![allow(dead_code)]

use actix_web::{middleware::NormalizePath, web, App, HttpServer};
use async_trait::async_trait;
use portfolio_contact::{
    entities::mail::{DispatchResult, MailMessage},
    errors::DispatchError,
    mail::{MailDispatcher, MailTransport, TransportFactory, TransportKind},
    routes::configure_routes,
    settings::{AppConfig, AppEnvironment, MailSettings},
    AppState,
};
use reqwest::Client;
use serde_json::{json, Value};
use std::{
    net::TcpListener,
    sync::{Arc, Mutex},
    time::Duration,
};

pub struct TestApp {
    pub state: web::Data<AppState>,
    pub address: String,
    pub client: Client,
    pub outbox: Outbox,
}

impl TestApp {
    /// App whose mail goes into an in-memory outbox.
    pub async fn spawn() -> Self {
        let outbox = Outbox::default();
        let config = test_config();
        let dispatcher = MailDispatcher::with_transports(
            config.mail_settings(),
            Arc::new(RecordingTransports::new(outbox.clone())),
        );
        Self::spawn_with_state(AppState::with_dispatcher(&config, dispatcher), outbox).await
    }

    /// App wired with the real transports built from `config`.
    pub async fn spawn_with_config(config: AppConfig) -> Self {
        Self::spawn_with_state(AppState::new(&config), Outbox::default()).await
    }

    async fn spawn_with_state(state: AppState, outbox: Outbox) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let state = web::Data::new(state);
        let server_state = state.clone();
        let server = HttpServer::new(move || {
            App::new()
                .app_data(server_state.clone())
                .wrap(NormalizePath::trim())
                .configure(configure_routes)
        })
        .listen(listener)
        .expect("Failed to bind server")
        .workers(1)
        .run();

        tokio::spawn(server);

        let client = Client::new();
        while client.get(format!("{}/health", address)).send().await.is_err() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        Self {
            state,
            address,
            client,
            outbox,
        }
    }

    pub async fn post_contact(&self, body: &Value) -> reqwest::Response {
        self.client
            .post(format!("{}/api/contact", self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to post contact form")
    }

    pub async fn post_contact_from(&self, body: &Value, forwarded_for: &str) -> reqwest::Response {
        self.client
            .post(format!("{}/api/contact", self.address))
            .header("x-forwarded-for", forwarded_for)
            .json(body)
            .send()
            .await
            .expect("Failed to post contact form")
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        env: AppEnvironment::Testing,
        name: "Portfolio Contact Test".to_string(),
        port: 0,
        host: "127.0.0.1".to_string(),
        worker_count: 1,
        cors_allowed_origins: vec!["*".to_string()],
        trust_forwarded_headers: true,
        rate_limit_max_requests: 3,
        rate_limit_window_ms: 60_000,
        mail_api_key: None,
        mail_api_url: "http://127.0.0.1:9/emails".to_string(),
        owner_email: "owner@example.com".to_string(),
        site_name: "Test Portfolio".to_string(),
        site_domain: "example.com".to_string(),
        smtp_host: None,
        smtp_port: 587,
        smtp_user: None,
        smtp_password: None,
    }
}

pub fn valid_payload() -> Value {
    json!({
        "name": "Al",
        "email": "a@b.co",
        "message": "Hello there, this is a test message."
    })
}

/// Messages captured by [`RecordingTransports`].
#[derive(Clone, Default)]
pub struct Outbox(Arc<Mutex<Vec<MailMessage>>>);

impl Outbox {
    pub fn messages(&self) -> Vec<MailMessage> {
        self.0.lock().unwrap().clone()
    }

    fn push(&self, message: MailMessage) -> usize {
        let mut messages = self.0.lock().unwrap();
        messages.push(message);
        messages.len()
    }
}

pub struct RecordingTransports {
    outbox: Outbox,
}

impl RecordingTransports {
    pub fn new(outbox: Outbox) -> Self {
        RecordingTransports { outbox }
    }
}

impl TransportFactory for RecordingTransports {
    fn build(
        &self,
        _kind: TransportKind,
        _settings: &MailSettings,
    ) -> Result<Box<dyn MailTransport>, DispatchError> {
        Ok(Box::new(RecordingTransport {
            outbox: self.outbox.clone(),
        }))
    }
}

struct RecordingTransport {
    outbox: Outbox,
}

#[async_trait]
impl MailTransport for RecordingTransport {
    async fn send(&self, message: &MailMessage) -> Result<DispatchResult, DispatchError> {
        let n = self.outbox.push(message.clone());
        Ok(DispatchResult::new("recording", format!("rec-{}", n)))
    }

    fn provider_name(&self) -> &'static str {
        "recording"
    }
}
