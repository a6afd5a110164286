//! Notification handlers.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::store::Notif;

use super::super::{error::ApiError, state::AppState};

pub async fn save_notif(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    body: Result<Json<Notif>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(notif) = body?;
    state.service().save_notif(&uid, notif).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn mark_all_as_read(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.service().mark_all_as_read(&uid).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn clear_notifs(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.service().clear_notifs(&uid).await?;
    Ok(StatusCode::NO_CONTENT)
}
