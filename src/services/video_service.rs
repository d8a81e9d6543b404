//! Thin proxy client forwarding like/dislike/comment actions to the
//! external video-platform API.

use std::sync::Arc;

use reqwest::Client;
use serde_json::{Value, json};

use crate::error::ServiceError;

/// Rating applied to a video or comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rating {
    /// Positive rating.
    Like,
    /// Negative rating.
    Dislike,
}

impl Rating {
    /// Wire value expected by the platform API.
    pub fn as_str(self) -> &'static str {
        match self {
            Rating::Like => "like",
            Rating::Dislike => "dislike",
        }
    }
}

/// HTTP client for the platform API, carrying the caller's bearer token per
/// request.
#[derive(Clone)]
pub struct PlatformClient {
    http: Client,
    base_url: Arc<str>,
}

impl PlatformClient {
    /// Build a client targeting `base_url`.
    pub fn new(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: Arc::from(base_url.trim_end_matches('/')),
        }
    }

    /// Rate a video on behalf of the caller.
    pub async fn rate_video(
        &self,
        token: &str,
        video_id: &str,
        rating: Rating,
    ) -> Result<(), ServiceError> {
        let url = format!("{}/videos/rate", self.base_url);
        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .query(&[("id", video_id), ("rating", rating.as_str())])
            .send()
            .await
            .map_err(|err| ServiceError::Upstream(err.to_string()))?;

        expect_success(response.status())
    }

    /// Rate a comment on behalf of the caller.
    pub async fn rate_comment(
        &self,
        token: &str,
        comment_id: &str,
        rating: Rating,
    ) -> Result<(), ServiceError> {
        let url = format!("{}/comments/rate", self.base_url);
        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .query(&[("id", comment_id), ("rating", rating.as_str())])
            .send()
            .await
            .map_err(|err| ServiceError::Upstream(err.to_string()))?;

        expect_success(response.status())
    }

    /// Post a top-level comment on a video and return the platform's
    /// response document.
    pub async fn insert_comment(
        &self,
        token: &str,
        video_id: &str,
        text: &str,
    ) -> Result<Value, ServiceError> {
        let url = format!("{}/commentThreads", self.base_url);
        let body = json!({
            "snippet": {
                "videoId": video_id,
                "topLevelComment": {
                    "snippet": { "textOriginal": text }
                }
            }
        });

        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .query(&[("part", "snippet")])
            .json(&body)
            .send()
            .await
            .map_err(|err| ServiceError::Upstream(err.to_string()))?;

        let status = response.status();
        expect_success(status)?;

        response
            .json::<Value>()
            .await
            .map_err(|err| ServiceError::Upstream(err.to_string()))
    }
}

fn expect_success(status: reqwest::StatusCode) -> Result<(), ServiceError> {
    if status.is_success() {
        Ok(())
    } else if status == reqwest::StatusCode::UNAUTHORIZED {
        Err(ServiceError::Unauthorized(
            "platform rejected the access token".into(),
        ))
    } else {
        Err(ServiceError::Upstream(format!(
            "platform answered {status}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_wire_values() {
        assert_eq!(Rating::Like.as_str(), "like");
        assert_eq!(Rating::Dislike.as_str(), "dislike");
    }

    #[test]
    fn upstream_statuses_map_to_service_errors() {
        assert!(expect_success(reqwest::StatusCode::NO_CONTENT).is_ok());
        assert!(matches!(
            expect_success(reqwest::StatusCode::UNAUTHORIZED),
            Err(ServiceError::Unauthorized(_))
        ));
        assert!(matches!(
            expect_success(reqwest::StatusCode::INTERNAL_SERVER_ERROR),
            Err(ServiceError::Upstream(_))
        ));
    }
}
