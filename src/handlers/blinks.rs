use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use uuid::Uuid;

use crate::models::blink::{Blink, CreateBlink, TransferRequest};
use crate::utils::error::AppError;
use crate::utils::response::{created, success};
use crate::AppState;

pub async fn create_blink(
    State(state): State<AppState>,
    Json(body): Json<CreateBlink>,
) -> Result<Response, AppError> {
    let blink = Blink::create(body)?;
    state.store.insert_blink(blink.clone()).await?;
    tracing::info!(id = %blink.id, amount = %blink.amount, "Blink created");
    Ok(created(blink, "Blink created"))
}

pub async fn list_blinks(State(state): State<AppState>) -> Result<Response, AppError> {
    let blinks = state.store.list_blinks().await?;
    let views: Vec<_> = blinks.iter().map(Blink::masked).collect();
    Ok(success(views, "Blinks retrieved"))
}

pub async fn get_blink(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let blink = state.store.find_blink(id).await?;
    Ok(success(blink.masked(), "Blink retrieved"))
}

pub async fn transfer_blink(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<TransferRequest>,
) -> Result<Response, AppError> {
    let blink = state.store.transition_blink(id, body.action).await?;
    tracing::info!(id = %blink.id, status = %blink.status, "Blink transitioned");
    Ok(success(blink, "Blink updated"))
}
