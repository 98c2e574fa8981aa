//! Per-recipient handlers: received gifts and the new-gift counter

use super::{parse_id, ApiResult};
use crate::services::tally::{CountSource, TallyStats};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use gift_core::{Page, UserGiftDetail, UserId};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ReceivedGiftsResponse {
    gifts: Vec<UserGiftDetail>,
    total: u64,
}

#[derive(Debug, Serialize)]
pub struct ClearResponse {
    changed: u64,
}

#[derive(Debug, Serialize)]
pub struct NewCountResponse {
    user_id: UserId,
    count: u64,
    source: CountSource,
}

pub async fn received(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(page): Query<Page>,
) -> ApiResult<Json<ReceivedGiftsResponse>> {
    let user_id: UserId = parse_id(&user_id)?;
    let gifts = state.gifts.list_user_gifts(user_id, page).await?;
    let total = state.gifts.gift_count_for_user(user_id).await?;
    Ok(Json(ReceivedGiftsResponse { gifts, total }))
}

pub async fn read_all(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<ClearResponse>> {
    let user_id: UserId = parse_id(&user_id)?;
    let changed = state.gifts.clear_all_user_gift_status(user_id).await?;
    Ok(Json(ClearResponse { changed }))
}

pub async fn new_count(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<NewCountResponse>> {
    let user_id: UserId = parse_id(&user_id)?;
    let lookup = state.tally.lookup(user_id).await?;
    Ok(Json(NewCountResponse {
        user_id,
        count: lookup.count,
        source: lookup.source,
    }))
}

pub async fn recount(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<NewCountResponse>> {
    let user_id: UserId = parse_id(&user_id)?;
    let count = state.tally.recount(user_id).await?;
    Ok(Json(NewCountResponse {
        user_id,
        count,
        source: CountSource::Storage,
    }))
}

pub async fn tally_stats(State(state): State<AppState>) -> Json<TallyStats> {
    Json(state.tally.stats())
}
