use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

use crate::{
    error::AppError,
    ingest::{IngestReport, ingest},
    query::{list_days, samples_for_day},
    samples::Sample,
    state::AppState,
};

#[derive(Deserialize)]
pub struct DayParams {
    #[serde(rename = "userId")]
    user_id: Option<String>,
    date: Option<String>,
}

#[derive(Deserialize)]
pub struct PageParams {
    #[serde(rename = "userId")]
    user_id: Option<String>,
    #[serde(rename = "pageNumber")]
    page_number: Option<String>,
}

#[derive(Deserialize)]
pub struct UserParams {
    #[serde(rename = "userId")]
    user_id: Option<String>,
}

pub async fn ingest_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Value>,
) -> Result<Json<IngestReport>, AppError> {
    let report = ingest(state.samples.as_ref(), state.registry.as_ref(), &payload).await?;

    Ok(Json(report))
}

pub async fn day_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DayParams>,
) -> Result<Json<Vec<Sample>>, AppError> {
    let user_id = params
        .user_id
        .filter(|id| !id.is_empty())
        .ok_or(AppError::MissingDayParams)?;
    let day: NaiveDate = params
        .date
        .as_deref()
        .and_then(|date| date.parse().ok())
        .ok_or(AppError::MissingDayParams)?;

    let samples = samples_for_day(state.samples.as_ref(), &user_id, day).await?;

    Ok(Json(samples))
}

pub async fn days_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PageParams>,
) -> Result<Json<Vec<String>>, AppError> {
    let user_id = params
        .user_id
        .filter(|id| !id.is_empty())
        .ok_or(AppError::MissingPageParams)?;
    let page: u32 = params
        .page_number
        .as_deref()
        .and_then(|page| page.parse().ok())
        .ok_or(AppError::MissingPageParams)?;

    let days = list_days(state.samples.as_ref(), &user_id, page).await?;

    Ok(Json(days))
}

pub async fn registered_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<UserParams>,
) -> Result<Json<bool>, AppError> {
    let user_id = params
        .user_id
        .filter(|id| !id.is_empty())
        .ok_or(AppError::MissingUserId)?;

    let registered = state.registry.is_registered(&user_id).await?;

    Ok(Json(registered))
}
