mod domain;
mod interfaces;
mod infrastructure;
pub mod client;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;

pub use domain::{entities, use_cases};
pub use interfaces::{handlers, routes};
pub use infrastructure::{limiter, mail, utils};

use limiter::rate_limiter::{RateLimitPolicy, RateLimiter};
use mail::MailDispatcher;
use use_cases::contact::ContactHandler;

pub struct AppState {
    pub config: settings::AppConfig,
    pub contact_handler: ContactHandler,
}

impl AppState {
    pub fn new(config: &settings::AppConfig) -> Self {
        let dispatcher = MailDispatcher::new(config.mail_settings());
        Self::with_dispatcher(config, dispatcher)
    }

    /// Same as [`AppState::new`] but with a caller-provided dispatcher.
    pub fn with_dispatcher(config: &settings::AppConfig, dispatcher: MailDispatcher) -> Self {
        let limiter = RateLimiter::new(RateLimitPolicy {
            max_requests: config.rate_limit_max_requests,
            window_ms: config.rate_limit_window_ms,
        });

        AppState {
            config: config.clone(),
            contact_handler: ContactHandler::new(limiter, dispatcher),
        }
    }
}
