//! Given-gift handlers

use super::{parse_id, ApiResult};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use gift_core::{GiftSend, Page, UserGiftDetail, UserGiftId};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct SendResponse {
    user_gift_id: UserGiftId,
}

#[derive(Debug, Serialize)]
pub struct UserGiftResponse {
    user_gift: UserGiftDetail,
}

#[derive(Debug, Serialize)]
pub struct UserGiftListResponse {
    user_gifts: Vec<UserGiftDetail>,
}

pub async fn send(
    State(state): State<AppState>,
    Json(req): Json<GiftSend>,
) -> ApiResult<(StatusCode, Json<SendResponse>)> {
    let user_gift_id = state
        .gifts
        .send_gift(req.from, req.to, req.gift_id, req.message)
        .await?;
    Ok((StatusCode::CREATED, Json(SendResponse { user_gift_id })))
}

pub async fn list(
    State(state): State<AppState>,
    Query(page): Query<Page>,
) -> ApiResult<Json<UserGiftListResponse>> {
    let user_gifts = state.gifts.list_all_gifts(page).await?;
    Ok(Json(UserGiftListResponse { user_gifts }))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<UserGiftResponse>> {
    let user_gift = state.gifts.get_user_gift_by_param(&id).await?;
    Ok(Json(UserGiftResponse { user_gift }))
}

pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id: UserGiftId = parse_id(&id)?;
    state.gifts.mark_gift_read(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id: UserGiftId = parse_id(&id)?;
    state.gifts.remove_user_gift(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
