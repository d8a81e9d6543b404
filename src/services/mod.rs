/// OAuth login, callback, and token refresh orchestration.
pub mod auth_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Session cookie signing and resolution.
pub mod session_service;
/// Thumbnail fetching and gradient derivation.
pub mod thumbnail_service;
/// Proxy client for the external video-platform API.
pub mod video_service;
