use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, create_security_headers_layer};
use crate::handlers::{blinks, gift_cards, health_check, payments};
use crate::AppState;

pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(
            "/blinks",
            post(blinks::create_blink).get(blinks::list_blinks),
        )
        .route("/blinks/:id", get(blinks::get_blink))
        .route("/blinks/:id/transfers", post(blinks::transfer_blink))
        .route("/payments", post(payments::create_payment))
        .route("/gift-cards/purchase", post(gift_cards::purchase_gift_card))
        .route("/gift-cards/redeem", post(gift_cards::redeem_gift_card))
        .layer(TraceLayer::new_for_http())
        .layer(create_security_headers_layer())
        .layer(create_cors_layer())
        .with_state(state)
}
