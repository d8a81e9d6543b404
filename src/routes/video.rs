//! Routes forwarding like/dislike/comment actions to the video platform.
//!
//! Every handler resolves the caller's bearer token first (Authorization
//! header, else session cookie) and answers 401 before anything is
//! forwarded.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::HeaderMap,
    routing::post,
};

use crate::{
    dto::video::{ActionResponse, CommentRatingRequest, CommentRequest},
    error::AppError,
    services::{session_service, video_service::Rating},
    state::SharedState,
};

#[utoipa::path(
    post,
    path = "/video/{video_id}/like",
    tag = "video",
    params(("video_id" = String, Path, description = "Video to rate")),
    responses(
        (status = 200, description = "Rating forwarded", body = ActionResponse),
        (status = 401, description = "Missing or invalid credentials"),
        (status = 502, description = "Platform rejected the request")
    )
)]
/// Like a video on behalf of the caller.
pub async fn like_video(
    State(state): State<SharedState>,
    Path(video_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<ActionResponse>, AppError> {
    rate_video(&state, &headers, &video_id, Rating::Like).await
}

#[utoipa::path(
    post,
    path = "/video/{video_id}/dislike",
    tag = "video",
    params(("video_id" = String, Path, description = "Video to rate")),
    responses(
        (status = 200, description = "Rating forwarded", body = ActionResponse),
        (status = 401, description = "Missing or invalid credentials"),
        (status = 502, description = "Platform rejected the request")
    )
)]
/// Dislike a video on behalf of the caller.
pub async fn dislike_video(
    State(state): State<SharedState>,
    Path(video_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<ActionResponse>, AppError> {
    rate_video(&state, &headers, &video_id, Rating::Dislike).await
}

async fn rate_video(
    state: &SharedState,
    headers: &HeaderMap,
    video_id: &str,
    rating: Rating,
) -> Result<Json<ActionResponse>, AppError> {
    let token = session_service::bearer_token(state, headers).await?;
    state.platform().rate_video(&token, video_id, rating).await?;
    Ok(Json(ActionResponse::ok()))
}

#[utoipa::path(
    post,
    path = "/comment/like",
    tag = "video",
    request_body = CommentRatingRequest,
    responses(
        (status = 200, description = "Rating forwarded", body = ActionResponse),
        (status = 401, description = "Missing or invalid credentials"),
        (status = 502, description = "Platform rejected the request")
    )
)]
/// Like a comment on behalf of the caller.
pub async fn like_comment(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<CommentRatingRequest>,
) -> Result<Json<ActionResponse>, AppError> {
    rate_comment(&state, &headers, &body.comment_id, Rating::Like).await
}

#[utoipa::path(
    post,
    path = "/comment/dislike",
    tag = "video",
    request_body = CommentRatingRequest,
    responses(
        (status = 200, description = "Rating forwarded", body = ActionResponse),
        (status = 401, description = "Missing or invalid credentials"),
        (status = 502, description = "Platform rejected the request")
    )
)]
/// Dislike a comment on behalf of the caller.
pub async fn dislike_comment(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<CommentRatingRequest>,
) -> Result<Json<ActionResponse>, AppError> {
    rate_comment(&state, &headers, &body.comment_id, Rating::Dislike).await
}

async fn rate_comment(
    state: &SharedState,
    headers: &HeaderMap,
    comment_id: &str,
    rating: Rating,
) -> Result<Json<ActionResponse>, AppError> {
    let token = session_service::bearer_token(state, headers).await?;
    state
        .platform()
        .rate_comment(&token, comment_id, rating)
        .await?;
    Ok(Json(ActionResponse::ok()))
}

#[utoipa::path(
    post,
    path = "/comment",
    tag = "video",
    request_body = CommentRequest,
    responses(
        (status = 200, description = "Comment created; platform response is returned verbatim"),
        (status = 401, description = "Missing or invalid credentials"),
        (status = 502, description = "Platform rejected the request")
    )
)]
/// Post a top-level comment on a video.
pub async fn post_comment(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<CommentRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let token = session_service::bearer_token(&state, &headers).await?;
    let created = state
        .platform()
        .insert_comment(&token, &body.video_id, &body.text)
        .await?;
    Ok(Json(created))
}

/// Configure the video proxy routes subtree.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new()
        .route("/comment", post(post_comment))
        .route("/video/{video_id}/like", post(like_video))
        .route("/video/{video_id}/dislike", post(dislike_video))
        .route("/comment/like", post(like_comment))
        .route("/comment/dislike", post(dislike_comment))
}
