use axum::response::Response;
use serde::Serialize;

use crate::utils::response::success;

pub mod blinks;
pub mod gift_cards;
pub mod payments;

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
}

pub async fn health_check() -> Response {
    let payload = HealthPayload {
        status: "ok",
        service: "bark-api",
    };

    success(payload, "Health check successful")
}
