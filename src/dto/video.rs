use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of the comment creation endpoint.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CommentRequest {
    /// Video the comment is posted on.
    #[serde(rename = "videoId")]
    pub video_id: String,
    /// Comment text.
    pub text: String,
}

/// Body of the comment rating endpoints.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CommentRatingRequest {
    /// Comment the rating applies to.
    #[serde(rename = "commentId")]
    pub comment_id: String,
}

/// Acknowledgement returned by proxied actions without a payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct ActionResponse {
    /// Always `true`; failures are reported through error bodies.
    pub success: bool,
}

impl ActionResponse {
    /// Successful acknowledgement.
    pub fn ok() -> Self {
        Self { success: true }
    }
}
