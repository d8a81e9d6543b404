use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use tracing::error;

use crate::{
    dto::thumbnail::{GradientResponse, ThumbnailQuery},
    error::AppError,
    services::thumbnail_service,
    state::SharedState,
};

#[utoipa::path(
    get,
    path = "/thumbnail-color",
    tag = "thumbnail",
    params(ThumbnailQuery),
    responses(
        (status = 200, description = "Gradient derived from the dominant color", body = GradientResponse),
        (status = 400, description = "Missing or malformed image URL"),
        (status = 404, description = "No vibrant color found"),
        (status = 500, description = "Fetch or extraction failure")
    )
)]
/// Derive a three-stop CSS gradient from the image's dominant color.
pub async fn thumbnail_color(
    State(state): State<SharedState>,
    Query(query): Query<ThumbnailQuery>,
) -> Result<Json<GradientResponse>, AppError> {
    // Rejected before any network call.
    let image_url = query
        .image_url
        .filter(|url| url.starts_with("http"))
        .ok_or_else(|| AppError::BadRequest("A valid image URL is required".into()))?;

    let gradient = thumbnail_service::gradient_for_url(&state, &image_url)
        .await
        .inspect_err(|err| error!(error = %err, %image_url, "thumbnail processing failed"))?;

    Ok(Json(gradient.into()))
}

/// Configure the thumbnail routes subtree.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/thumbnail-color", get(thumbnail_color))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::{body, http::StatusCode, response::IntoResponse};
    use serde_json::json;

    use super::*;
    use crate::{config::AppConfig, state::AppState};

    fn test_state() -> SharedState {
        AppState::new(AppConfig {
            port: 0,
            session_secret: "test-secret".to_string(),
            cors_origin: "http://localhost:5173".to_string(),
            cache_endpoint: None,
            cache_credentials: None,
            video_api_base: "http://platform.test".to_string(),
            oauth: None,
            fetch_timeout: Duration::from_secs(1),
        })
        .unwrap()
    }

    async fn rejection(image_url: Option<&str>) -> axum::response::Response {
        let query = ThumbnailQuery {
            image_url: image_url.map(str::to_string),
        };
        thumbnail_color(State(test_state()), Query(query))
            .await
            .expect_err("validation should fail")
            .into_response()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = body::to_bytes(response.into_body(), 1024).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn missing_image_url_answers_400_with_the_contract_body() {
        let response = rejection(None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await,
            json!({ "error": "A valid image URL is required" })
        );
    }

    #[tokio::test]
    async fn non_http_image_url_answers_400_with_the_contract_body() {
        let response = rejection(Some("not-a-url")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await,
            json!({ "error": "A valid image URL is required" })
        );
    }
}
