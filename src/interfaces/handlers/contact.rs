use actix_web::{get, post, web, HttpRequest, HttpResponse, Responder};

use crate::{
    constants::{RATE_LIMIT_LIMIT_HEADER, RATE_LIMIT_REMAINING_HEADER},
    entities::contact::SubmissionRequest,
    errors::ContactError,
    utils::get_client_ip::get_client_ip,
    AppState,
};

#[post("/contact")]
pub async fn submit_contact(
    req: HttpRequest,
    state: web::Data<AppState>,
    form: web::Json<SubmissionRequest>,
) -> Result<HttpResponse, ContactError> {
    let client_id = get_client_ip(&req, state.config.trust_forwarded_headers);
    let policy = state.contact_handler.policy();

    let response = state
        .contact_handler
        .submit(form.into_inner(), &client_id)
        .await?;

    let remaining = response.rate_limit.map(|r| r.remaining).unwrap_or_default();

    Ok(HttpResponse::Ok()
        .insert_header((RATE_LIMIT_LIMIT_HEADER, policy.max_requests.to_string()))
        .insert_header((RATE_LIMIT_REMAINING_HEADER, remaining.to_string()))
        .json(response))
}

/// Liveness probe for the contact endpoint.
#[get("/contact")]
pub async fn contact_status() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "service": "contact",
    }))
}
