use axum::{
    Json, Router,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Redirect},
    routing::{get, post},
};

use crate::{
    dto::auth::{CallbackQuery, RefreshTokenRequest, TokenResponse},
    error::AppError,
    services::auth_service,
    state::SharedState,
};

#[utoipa::path(
    get,
    path = "/auth/login",
    tag = "auth",
    responses(
        (status = 307, description = "Redirect to the provider's authorize URL"),
        (status = 503, description = "OAuth provider not configured")
    )
)]
/// Start a login by redirecting to the OAuth provider.
pub async fn login(State(state): State<SharedState>) -> Result<Redirect, AppError> {
    let url = auth_service::begin_login(&state)?;
    Ok(Redirect::temporary(&url))
}

#[utoipa::path(
    get,
    path = "/auth/callback",
    tag = "auth",
    responses(
        (status = 303, description = "Session established, redirect to the frontend"),
        (status = 400, description = "Missing code or state"),
        (status = 401, description = "Provider rejected the code exchange")
    )
)]
/// Finish a login: exchange the provider's code and set the session cookie.
pub async fn callback(
    State(state): State<SharedState>,
    Query(query): Query<CallbackQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (Some(code), Some(nonce)) = (query.code, query.state) else {
        return Err(AppError::BadRequest("Missing code or state".into()));
    };

    let set_cookie = auth_service::handle_callback(&state, &code, &nonce).await?;
    let frontend = state.config().cors_origin.clone();

    Ok((
        [(header::SET_COOKIE, set_cookie)],
        Redirect::to(&frontend),
    ))
}

#[utoipa::path(
    post,
    path = "/refresh-token",
    tag = "auth",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "Fresh token set", body = TokenResponse),
        (status = 401, description = "Provider rejected the refresh token"),
        (status = 503, description = "OAuth provider not configured")
    )
)]
/// Exchange a refresh token for a fresh access token.
pub async fn refresh_token(
    State(state): State<SharedState>,
    Json(body): Json<RefreshTokenRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let tokens = auth_service::refresh(&state, &body.refresh_token).await?;
    Ok(Json(tokens.into()))
}

/// Configure the auth routes subtree.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new()
        .route("/auth/login", get(login))
        .route("/auth/callback", get(callback))
        .route("/refresh-token", post(refresh_token))
}
