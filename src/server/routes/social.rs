//! Follow graph handlers.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use serde::Deserialize;

use crate::service::{FollowRequest, UserCard, UserView};

use super::super::{error::ApiError, state::AppState};

/// Query parameters for a followers or following page.
#[derive(Debug, Deserialize)]
pub struct ViewQuery {
    pub context: String,
    #[serde(default)]
    pub offset: usize,
}

pub async fn view_users(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    query: Result<Query<ViewQuery>, QueryRejection>,
) -> Result<Json<Vec<UserCard>>, ApiError> {
    let Query(query) = query?;
    let users = state
        .service()
        .view_users(&uid, &query.context, query.offset)
        .await?;
    Ok(Json(users))
}

pub async fn view_user_by_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<UserView>, ApiError> {
    Ok(Json(state.service().view_user_by_username(&username).await?))
}

pub async fn follow(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    body: Result<Json<FollowRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(req) = body?;
    state.service().follow_user(&uid, &req.username).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn unfollow(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    body: Result<Json<FollowRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(req) = body?;
    state.service().unfollow_user(&uid, &req.username).await?;
    Ok(StatusCode::NO_CONTENT)
}
