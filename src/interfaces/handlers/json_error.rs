use actix_web::{http::StatusCode, HttpResponse};

use crate::errors::FailureBody;

pub fn json_error(status: StatusCode, error: &str) -> HttpResponse {
    HttpResponse::build(status).json(FailureBody::new(error))
}

pub async fn not_found() -> HttpResponse {
    json_error(StatusCode::NOT_FOUND, "Not found")
}
