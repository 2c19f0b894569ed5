use actix_web::{get, web, HttpResponse, Responder};

use crate::AppState;

#[get("/")]
pub async fn home(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Welcome to the {} contact API!", state.config.site_name),
        "status": "Ok",
        "service": state.config.name,
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": ["POST /api/contact", "GET /api/contact", "GET /health"]
    }))
}
