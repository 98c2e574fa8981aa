//! Gift catalog handlers

use super::{parse_id, ApiResult};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use gift_core::{GiftFields, GiftId, GiftRecord, Page};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct GiftListResponse {
    gifts: Vec<GiftRecord>,
}

#[derive(Debug, Serialize)]
pub struct GiftResponse {
    gift: GiftRecord,
}

pub async fn list(
    State(state): State<AppState>,
    Query(page): Query<Page>,
) -> ApiResult<Json<GiftListResponse>> {
    let gifts = state.catalog.list_gifts(page).await?;
    Ok(Json(GiftListResponse { gifts }))
}

pub async fn create(
    State(state): State<AppState>,
    Json(fields): Json<GiftFields>,
) -> ApiResult<(StatusCode, Json<GiftResponse>)> {
    let id = state.catalog.add_gift(fields).await?;
    let gift = state.catalog.get_gift(id).await?;
    Ok((StatusCode::CREATED, Json(GiftResponse { gift })))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<GiftResponse>> {
    let id: GiftId = parse_id(&id)?;
    let gift = state.catalog.get_gift(id).await?;
    Ok(Json(GiftResponse { gift }))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(fields): Json<GiftFields>,
) -> ApiResult<Json<GiftResponse>> {
    let id: GiftId = parse_id(&id)?;
    let gift = state.catalog.update_gift(id, fields).await?;
    Ok(Json(GiftResponse { gift }))
}
