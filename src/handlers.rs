use crate::analysis::analyze_patterns;
use crate::errors::AppError;
use crate::intake::{
    ensure_min_days, normalize_observation, prepare_observations, stored_observations,
    validate_observation,
};
use crate::models::{AnalysisResult, AnalyzeRequest, DailyObservation};
use crate::state::AppState;
use crate::storage::persist_data;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use tracing::info;

pub async fn list_observations(State(state): State<AppState>) -> Json<Vec<DailyObservation>> {
    let data = state.data.lock().await;
    Json(stored_observations(&data))
}

pub async fn get_observation(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
) -> Result<Json<DailyObservation>, AppError> {
    let data = state.data.lock().await;
    data.days
        .get(&date)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("no observation for {date}")))
}

pub async fn put_observation(
    State(state): State<AppState>,
    Json(payload): Json<DailyObservation>,
) -> Result<Json<DailyObservation>, AppError> {
    validate_observation(&payload)?;
    let observation = normalize_observation(payload);

    let mut data = state.data.lock().await;
    let replaced = data
        .days
        .insert(observation.date, observation.clone())
        .is_some();
    persist_data(&state.data_path, &data).await?;

    info!(date = %observation.date, replaced, "stored observation");
    Ok(Json(observation))
}

pub async fn delete_observation(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
) -> Result<StatusCode, AppError> {
    let mut data = state.data.lock().await;
    if data.days.remove(&date).is_none() {
        return Err(AppError::not_found(format!("no observation for {date}")));
    }
    persist_data(&state.data_path, &data).await?;

    info!(date = %date, "deleted observation");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_analysis(State(state): State<AppState>) -> Result<Json<AnalysisResult>, AppError> {
    // Copy the history out so the lock is not held while analysing.
    let observations = {
        let data = state.data.lock().await;
        stored_observations(&data)
    };

    ensure_min_days(observations.len(), &state.config)?;
    Ok(Json(analyze_patterns(&observations, &state.config)))
}

pub async fn analyze(
    State(state): State<AppState>,
    Json(payload): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisResult>, AppError> {
    let observations = prepare_observations(payload.observations);

    ensure_min_days(observations.len(), &state.config)?;
    Ok(Json(analyze_patterns(&observations, &state.config)))
}
