use axum::extract::State;
use axum::response::Response;
use axum::Json;

use crate::models::gift_card::{
    GiftCard, GiftCardReceipt, PurchaseGiftCard, RedeemGiftCard, RedeemedAmount,
};
use crate::utils::error::AppError;
use crate::utils::response::success;
use crate::AppState;

pub async fn purchase_gift_card(
    State(state): State<AppState>,
    Json(body): Json<PurchaseGiftCard>,
) -> Result<Response, AppError> {
    let card = GiftCard::purchase(body)?;
    state.store.insert_gift_card(card.clone()).await?;
    tracing::info!(id = %card.id, amount = %card.amount, "Gift card purchased");
    let receipt = GiftCardReceipt {
        gift_code: card.code,
        amount: card.amount,
    };
    Ok(success(receipt, "Gift card purchased"))
}

pub async fn redeem_gift_card(
    State(state): State<AppState>,
    Json(body): Json<RedeemGiftCard>,
) -> Result<Response, AppError> {
    body.validate()?;
    let card = state
        .store
        .redeem_gift_card(&body.gift_code, &body.public_key)
        .await?;
    tracing::info!(id = %card.id, "Gift card redeemed");
    Ok(success(
        RedeemedAmount {
            amount: card.amount,
        },
        "Gift card redeemed",
    ))
}
