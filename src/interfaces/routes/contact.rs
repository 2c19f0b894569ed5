use actix_web::web;

use crate::handlers::contact::{contact_status, submit_contact};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(submit_contact)
        .service(contact_status);
}
