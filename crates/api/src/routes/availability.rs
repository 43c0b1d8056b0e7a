use axum::{Router, routing::get};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new().route(
        "/api/doctors/:id/slots",
        get(handlers::availability::get_doctor_slots),
    )
}
