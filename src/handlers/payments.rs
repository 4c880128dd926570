use axum::extract::State;
use axum::response::Response;
use axum::Json;

use crate::models::payment::PaymentRequest;
use crate::utils::error::AppError;
use crate::utils::response::success;
use crate::AppState;

pub async fn create_payment(
    State(state): State<AppState>,
    Json(body): Json<PaymentRequest>,
) -> Result<Response, AppError> {
    let prepared = state.payments.build(&body).await?;
    tracing::info!(
        transaction_id = %prepared.transaction_id,
        currency = %body.currency,
        "Payment transaction built"
    );
    Ok(success(prepared, "Transaction ready for signing"))
}
