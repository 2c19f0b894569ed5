use actix_web::{error::JsonPayloadError, web};

use crate::errors::ContactError;

/// Unparseable bodies become `MalformedInput` instead of actix's plain-text 400.
pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        tracing::warn!("Rejected malformed JSON body: {}", err);
        ContactError::from(err).into()
    }));
}

impl From<JsonPayloadError> for ContactError {
    fn from(err: JsonPayloadError) -> Self {
        ContactError::MalformedInput(format!("JSON payload error: {}", err))
    }
}
