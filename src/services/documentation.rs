use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Vidgate Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::thumbnail::thumbnail_color,
        crate::routes::auth::login,
        crate::routes::auth::callback,
        crate::routes::auth::refresh_token,
        crate::routes::video::like_video,
        crate::routes::video::dislike_video,
        crate::routes::video::like_comment,
        crate::routes::video::dislike_comment,
        crate::routes::video::post_comment,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::health::CacheHealth,
            crate::dto::thumbnail::GradientResponse,
            crate::dto::auth::RefreshTokenRequest,
            crate::dto::auth::TokenResponse,
            crate::dto::video::CommentRequest,
            crate::dto::video::CommentRatingRequest,
            crate::dto::video::ActionResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "thumbnail", description = "Thumbnail color gradient derivation"),
        (name = "auth", description = "OAuth login and token refresh"),
        (name = "video", description = "Actions proxied to the video platform"),
    )
)]
pub struct ApiDoc;
