//! Authored content and saved thread handlers.
//!
//! All of them answer `204 No Content` on success, including removals of
//! references that were not there.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::service::CreateThreadRequest;
use crate::store::{CommentRef, SubcommentRef, ThreadRef};

use super::super::{error::ApiError, state::AppState};

type Body<T> = Result<Json<T>, JsonRejection>;

pub async fn create_thread(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    body: Body<CreateThreadRequest>,
) -> Result<StatusCode, ApiError> {
    let Json(req) = body?;
    state
        .service()
        .create_thread(&uid, req.thread, req.publish_date)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_thread(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    body: Body<ThreadRef>,
) -> Result<StatusCode, ApiError> {
    let Json(thread) = body?;
    state.service().delete_thread(&uid, thread).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn old_thread(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    body: Body<ThreadRef>,
) -> Result<StatusCode, ApiError> {
    let Json(thread) = body?;
    state.service().old_thread(&uid, thread).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn comment(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    body: Body<CommentRef>,
) -> Result<StatusCode, ApiError> {
    let Json(comment) = body?;
    state.service().comment(&uid, comment).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_comment(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    body: Body<CommentRef>,
) -> Result<StatusCode, ApiError> {
    let Json(comment) = body?;
    state.service().delete_comment(&uid, comment).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn old_comment(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    body: Body<CommentRef>,
) -> Result<StatusCode, ApiError> {
    let Json(comment) = body?;
    state.service().old_comment(&uid, comment).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn subcomment(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    body: Body<SubcommentRef>,
) -> Result<StatusCode, ApiError> {
    let Json(subcomment) = body?;
    state.service().subcomment(&uid, subcomment).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_subcomment(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    body: Body<SubcommentRef>,
) -> Result<StatusCode, ApiError> {
    let Json(subcomment) = body?;
    state.service().delete_subcomment(&uid, subcomment).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn old_subcomment(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    body: Body<SubcommentRef>,
) -> Result<StatusCode, ApiError> {
    let Json(subcomment) = body?;
    state.service().old_subcomment(&uid, subcomment).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn save_thread(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    body: Body<ThreadRef>,
) -> Result<StatusCode, ApiError> {
    let Json(thread) = body?;
    state.service().save_thread(&uid, thread).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove_saved(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    body: Body<ThreadRef>,
) -> Result<StatusCode, ApiError> {
    let Json(thread) = body?;
    state.service().remove_saved(&uid, thread).await?;
    Ok(StatusCode::NO_CONTENT)
}
