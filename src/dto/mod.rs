/// Auth flow payloads.
pub mod auth;
/// Health check payloads.
pub mod health;
/// Thumbnail gradient payloads.
pub mod thumbnail;
/// Video action payloads.
pub mod video;
