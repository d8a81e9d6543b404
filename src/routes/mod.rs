use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{services::documentation::ApiDoc, state::SharedState};

pub mod auth;
pub mod health;
pub mod thumbnail;
pub mod video;

/// Compose all route subtrees, mount the Swagger UI, and attach the shared
/// state.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(thumbnail::router())
        .merge(auth::router())
        .merge(video::router());

    let swagger: Router<SharedState> = SwaggerUi::new("/docs")
        .url("/api-doc/openapi.json", ApiDoc::openapi())
        .into();

    api_router.merge(swagger).with_state(state)
}
