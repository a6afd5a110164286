//! Login, registration and profile handlers.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::service::{
    BasicDataUpdate, DashboardData, LoginRequest, RegisterUserRequest, UserHeaderData,
    UserIdResponse,
};
use crate::store::{Activity, BasicUserData, ThreadRef};

use super::super::{error::ApiError, state::AppState};

pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<UserIdResponse>, ApiError> {
    let Json(req) = body?;
    let user_id = state.service().login(req).await?;
    Ok(Json(UserIdResponse { user_id }))
}

pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserIdResponse>), ApiError> {
    let Json(req) = body?;
    let user_id = state.service().register_user(req).await?;
    Ok((StatusCode::CREATED, Json(UserIdResponse { user_id })))
}

pub async fn header(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> Result<Json<UserHeaderData>, ApiError> {
    Ok(Json(state.service().get_user_header_data(&uid).await?))
}

pub async fn basic(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> Result<Json<BasicUserData>, ApiError> {
    Ok(Json(state.service().get_basic_user_data(&uid).await?))
}

/// Partial profile update. Absent or empty fields are kept.
pub async fn update_basic(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    body: Result<Json<BasicDataUpdate>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(update) = body?;
    state.service().update_basic_user_data(&uid, update).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn following_ids(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(state.service().get_user_following_ids(&uid).await?))
}

pub async fn dashboard(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> Result<Json<DashboardData>, ApiError> {
    Ok(Json(state.service().get_dashboard_data(&uid).await?))
}

pub async fn recent_activity(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> Result<Json<Activity>, ApiError> {
    Ok(Json(state.service().recent_activity(&uid).await?))
}

pub async fn saved_threads(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> Result<Json<Vec<ThreadRef>>, ApiError> {
    Ok(Json(state.service().saved_threads(&uid).await?))
}
