use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::color::Gradient;

/// Query parameters of the thumbnail color endpoint.
#[derive(Debug, Deserialize, IntoParams)]
pub struct ThumbnailQuery {
    /// Absolute URL of the image to derive the gradient from.
    #[serde(rename = "imageUrl")]
    pub image_url: Option<String>,
}

/// Gradient derived from the thumbnail's dominant color.
#[derive(Debug, Serialize, ToSchema)]
pub struct GradientResponse {
    /// CSS `linear-gradient` value.
    pub gradient: String,
}

impl From<Gradient> for GradientResponse {
    fn from(gradient: Gradient) -> Self {
        Self {
            gradient: gradient.css(),
        }
    }
}
