use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use dotenv::dotenv;
use lettre::{message::Mailbox, Address};
use std::{env, fmt, str::FromStr};
use zeroize::Zeroizing;

use crate::{errors::DispatchError, use_cases::validation::is_email_shaped};

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    Development,
    Production,
    Testing,
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" => Ok(AppEnvironment::Development),
            "production" => Ok(AppEnvironment::Production),
            "testing" => Ok(AppEnvironment::Testing),
            _ => Err(ConfigError::Message(format!("Invalid environment: {}", s))),
        }
    }
}

#[derive(Deserialize, Clone)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    #[serde(default = "default_env")]
    pub env: AppEnvironment,

    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    #[serde(default = "default_cors_origins")]
    pub cors_allowed_origins: Vec<String>,

    #[serde(default = "default_trust_forwarded_headers")]
    pub trust_forwarded_headers: bool,

    #[serde(default = "default_rate_limit_max_requests")]
    pub rate_limit_max_requests: usize,

    #[serde(default = "default_rate_limit_window_ms")]
    pub rate_limit_window_ms: i64,

    #[serde(default)]
    pub mail_api_key: Option<String>,

    #[serde(default = "default_mail_api_url")]
    pub mail_api_url: String,

    #[serde(default = "default_owner_email")]
    pub owner_email: String,

    #[serde(default = "default_site_name")]
    pub site_name: String,

    #[serde(default = "default_site_domain")]
    pub site_domain: String,

    #[serde(default)]
    pub smtp_host: Option<String>,

    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    #[serde(default)]
    pub smtp_user: Option<String>,

    #[serde(default)]
    pub smtp_password: Option<String>,
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Development
}
fn default_name() -> String {
    "Portfolio-Contact".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_worker_count() -> usize {
    num_cpus::get()
}
fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}
fn default_trust_forwarded_headers() -> bool {
    true
}
fn default_rate_limit_max_requests() -> usize {
    3
}
fn default_rate_limit_window_ms() -> i64 {
    60_000
}
fn default_mail_api_url() -> String {
    "https://api.resend.com/emails".to_string()
}
fn default_owner_email() -> String {
    "hello@example.com".to_string()
}
fn default_site_name() -> String {
    "Portfolio".to_string()
}
fn default_site_domain() -> String {
    "example.com".to_string()
}
fn default_smtp_port() -> u16 {
    587
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok();

        let raw_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let env_name = AppEnvironment::from_str(&raw_env)
            .map_err(|_| ConfigError::Message(format!("Invalid APP_ENV value: {}", raw_env)))?;

        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env_name)).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .ignore_empty(true)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("cors_allowed_origins"),
            );

        let mut config: Self = builder.build()?.try_deserialize()?;

        config.env = env_name;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.rate_limit_max_requests == 0 {
            errors.push("RATE_LIMIT_MAX_REQUESTS must be greater than zero");
        }
        if self.rate_limit_window_ms <= 0 {
            errors.push("RATE_LIMIT_WINDOW_MS must be greater than zero");
        }
        if !is_email_shaped(&self.owner_email) {
            errors.push("OWNER_EMAIL must be a valid email address");
        }
        if self.is_production() && self.cors_origins().iter().any(|o| o == "*") {
            errors.push("Wildcard CORS (*) is not allowed in production");
        }
        if self.mail_settings().branded_sender().is_err() {
            errors.push("SITE_DOMAIN must form a valid sender address");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(errors.join(", ")))
        }
    }

    pub fn is_production(&self) -> bool {
        self.env == AppEnvironment::Production
    }

    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .iter()
            .flat_map(|origin| origin.split(','))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn mail_settings(&self) -> MailSettings {
        MailSettings::from(self)
    }
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Production => "production",
            AppEnvironment::Testing => "testing",
        };
        write!(f, "{s}")
    }
}

trait Redact {
    fn redact(&self) -> &str;
}

impl Redact for str {
    fn redact(&self) -> &str {
        if self.is_empty() {
            "[MISSING]"
        } else {
            "[REDACTED]"
        }
    }
}

impl Redact for Option<String> {
    fn redact(&self) -> &str {
        self.as_deref().unwrap_or_default().redact()
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("name", &self.name)
            .field("port", &self.port)
            .field("host", &self.host)
            .field("worker_count", &self.worker_count)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("trust_forwarded_headers", &self.trust_forwarded_headers)
            .field("rate_limit_max_requests", &self.rate_limit_max_requests)
            .field("rate_limit_window_ms", &self.rate_limit_window_ms)
            .field("mail_api_key", &self.mail_api_key.redact())
            .field("mail_api_url", &self.mail_api_url)
            .field("owner_email", &self.owner_email)
            .field("site_name", &self.site_name)
            .field("site_domain", &self.site_domain)
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_user", &self.smtp_user)
            .field("smtp_password", &self.smtp_password.redact())
            .finish()
    }
}

/// SMTP relay credentials. Every field is optional until the SMTP transport
/// is actually selected.
#[derive(Clone, Default)]
pub struct SmtpSettings {
    pub host: Option<String>,
    pub port: u16,
    pub user: Option<String>,
    pub password: Option<Zeroizing<String>>,
}

/// Mail configuration resolved once from [`AppConfig`], with every fallback
/// (owner mailbox, site name, domain) already applied.
#[derive(Clone)]
pub struct MailSettings {
    pub environment: AppEnvironment,
    pub api_key: Option<Zeroizing<String>>,
    pub api_url: String,
    pub owner_email: String,
    pub site_name: String,
    pub site_domain: String,
    pub smtp: SmtpSettings,
}

impl MailSettings {
    pub fn is_production(&self) -> bool {
        self.environment == AppEnvironment::Production
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.as_ref().is_some_and(|key| !key.trim().is_empty())
    }

    /// Branded sender bound to the site's domain, used with the hosted API.
    pub fn branded_sender(&self) -> Result<String, DispatchError> {
        self.sender(&format!("noreply@{}", self.site_domain))
    }

    /// Sender identity for the SMTP relay: the authenticated mailbox itself,
    /// or the owner mailbox when no SMTP user is known.
    pub fn relay_sender(&self) -> Result<String, DispatchError> {
        self.sender(self.smtp.user.as_deref().unwrap_or(&self.owner_email))
    }

    // Display name is quoted by lettre when it holds specials like `,` or `.`.
    fn sender(&self, address: &str) -> Result<String, DispatchError> {
        let address = address.parse::<Address>()?;
        Ok(Mailbox::new(Some(self.site_name.clone()), address).to_string())
    }
}

impl From<&AppConfig> for MailSettings {
    fn from(config: &AppConfig) -> Self {
        let non_blank = |value: &Option<String>| {
            value
                .as_ref()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        MailSettings {
            environment: config.env.clone(),
            api_key: non_blank(&config.mail_api_key).map(Zeroizing::new),
            api_url: config.mail_api_url.clone(),
            owner_email: config.owner_email.trim().to_string(),
            site_name: config.site_name.clone(),
            site_domain: config.site_domain.clone(),
            smtp: SmtpSettings {
                host: non_blank(&config.smtp_host),
                port: config.smtp_port,
                user: non_blank(&config.smtp_user),
                password: non_blank(&config.smtp_password).map(Zeroizing::new),
            },
        }
    }
}

impl fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl fmt::Debug for MailSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailSettings")
            .field("environment", &self.environment)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("api_url", &self.api_url)
            .field("owner_email", &self.owner_email)
            .field("site_name", &self.site_name)
            .field("site_domain", &self.site_domain)
            .field("smtp", &self.smtp)
            .finish()
    }
}
