//! Thumbnail color pipeline: fetch bytes, extract the palette, derive the
//! gradient.

use thiserror::Error;
use tracing::error;

use crate::{
    color::{ExtractionError, Gradient, PaletteExtractor},
    error::AppError,
    state::SharedState,
};

/// Failures along the thumbnail pipeline. The HTTP mapping is fixed by the
/// endpoint contract: extraction and fetch problems collapse into one 500
/// body, the missing-swatch case answers 404.
#[derive(Debug, Error)]
pub enum ThumbnailError {
    /// The image could not be fetched.
    #[error("failed to fetch image")]
    Fetch(#[source] reqwest::Error),
    /// The image host answered with a non-success status.
    #[error("image host answered {status}")]
    FetchStatus {
        /// Status returned by the image host.
        status: reqwest::StatusCode,
    },
    /// Palette extraction failed.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    /// Extraction succeeded but produced neither a vibrant nor a
    /// dark-vibrant swatch.
    #[error("no vibrant color found")]
    NoVibrantColor,
}

impl From<ThumbnailError> for AppError {
    fn from(err: ThumbnailError) -> Self {
        match err {
            ThumbnailError::NoVibrantColor => AppError::NotFound("No vibrant color found".into()),
            ThumbnailError::Fetch(_)
            | ThumbnailError::FetchStatus { .. }
            | ThumbnailError::Extraction(_) => {
                AppError::Internal("Error processing image.".into())
            }
        }
    }
}

/// Fetch the image behind `image_url` and derive its gradient.
///
/// One bounded fetch, no retry: a failed fetch or extraction is terminal for
/// the request.
pub async fn gradient_for_url(
    state: &SharedState,
    image_url: &str,
) -> Result<Gradient, ThumbnailError> {
    let response = state
        .http()
        .get(image_url)
        .timeout(state.config().fetch_timeout)
        .send()
        .await
        .map_err(ThumbnailError::Fetch)?;

    let status = response.status();
    if !status.is_success() {
        return Err(ThumbnailError::FetchStatus { status });
    }

    let bytes = response.bytes().await.map_err(ThumbnailError::Fetch)?;
    let gradient = gradient_from_bytes(state.extractor(), &bytes)?;
    Ok(gradient)
}

/// Run palette extraction over already-fetched bytes and build the gradient
/// from the selected swatch (vibrant, else dark vibrant).
pub fn gradient_from_bytes(
    extractor: &dyn PaletteExtractor,
    bytes: &[u8],
) -> Result<Gradient, ThumbnailError> {
    let palette = extractor.extract(bytes).inspect_err(|err| {
        error!(error = %err, "palette extraction failed");
    })?;

    let swatch = palette.dominant().ok_or(ThumbnailError::NoVibrantColor)?;
    Ok(Gradient::from_base(swatch.rgb))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{ImagePalette, Rgb, Swatch};

    /// Extractor returning a canned palette, standing in for the real
    /// decoder.
    struct FixedExtractor(ImagePalette);

    impl PaletteExtractor for FixedExtractor {
        fn extract(&self, _bytes: &[u8]) -> Result<ImagePalette, ExtractionError> {
            Ok(self.0)
        }
    }

    fn swatch(r: u8, g: u8, b: u8) -> Option<Swatch> {
        Some(Swatch {
            rgb: Rgb::new(r, g, b),
            population: 100,
        })
    }

    #[test]
    fn vibrant_swatch_drives_the_gradient() {
        let extractor = FixedExtractor(ImagePalette {
            vibrant: swatch(255, 0, 0),
            dark_vibrant: swatch(60, 0, 0),
            ..Default::default()
        });

        let gradient = gradient_from_bytes(&extractor, b"ignored").unwrap();
        assert_eq!(gradient.base, Rgb::new(255, 0, 0));
        assert_eq!(
            gradient.css(),
            "linear-gradient(90deg, rgb(153, 0, 0) 0%, rgb(255, 0, 0) 50%, rgb(255, 102, 102) 100%)"
        );
    }

    #[test]
    fn dark_vibrant_is_used_when_vibrant_is_absent() {
        let extractor = FixedExtractor(ImagePalette {
            dark_vibrant: swatch(80, 6, 6),
            ..Default::default()
        });

        let gradient = gradient_from_bytes(&extractor, b"ignored").unwrap();
        assert_eq!(gradient.base, Rgb::new(80, 6, 6));
    }

    #[test]
    fn empty_palette_is_reported_as_no_vibrant_color() {
        let extractor = FixedExtractor(ImagePalette::default());
        let err = gradient_from_bytes(&extractor, b"ignored").unwrap_err();
        assert!(matches!(err, ThumbnailError::NoVibrantColor));

        let app_err = AppError::from(err);
        assert_eq!(app_err.to_string(), "No vibrant color found");
    }

    #[test]
    fn extraction_failures_map_to_the_processing_error_body() {
        let err = ThumbnailError::Extraction(ExtractionError::Decode(
            image::ImageError::Unsupported(
                image::error::UnsupportedError::from_format_and_kind(
                    image::error::ImageFormatHint::Unknown,
                    image::error::UnsupportedErrorKind::GenericFeature("stub".into()),
                ),
            ),
        ));
        assert_eq!(AppError::from(err).to_string(), "Error processing image.");
    }
}
