//! Dominant-color extraction from thumbnail images.
//!
//! Images are decoded and quantized fully in memory; no temporary file is
//! written at any point. Candidate colors are scored against per-swatch
//! saturation/lightness targets in the style of the Palette/Vibrant family of
//! extractors.

use std::collections::HashMap;

use image::{DynamicImage, imageops::FilterType};
use thiserror::Error;

use super::gradient::{Rgb, rgb_to_hsl};

/// Longest edge the image is downsampled to before quantization.
const MAX_DIMENSION: u32 = 112;
/// Bits kept per channel when bucketing colors into the histogram.
const QUANTIZE_BITS: u32 = 5;

const WEIGHT_SATURATION: f64 = 0.24;
const WEIGHT_LIGHTNESS: f64 = 0.52;
const WEIGHT_POPULATION: f64 = 0.24;

/// Failures raised while turning raw bytes into a palette.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The fetched bytes could not be decoded as a supported image format.
    #[error("failed to decode image")]
    Decode(#[source] image::ImageError),
}

/// A representative color together with how many sampled pixels landed in
/// its histogram bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Swatch {
    /// The representative color.
    pub rgb: Rgb,
    /// Number of sampled pixels backing this color.
    pub population: u32,
}

/// The named swatches extracted from one image. Any of them may be absent
/// when no candidate color falls inside the target's saturation/lightness
/// window.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImagePalette {
    /// Saturated color of medium lightness.
    pub vibrant: Option<Swatch>,
    /// Saturated, light color.
    pub light_vibrant: Option<Swatch>,
    /// Saturated, dark color.
    pub dark_vibrant: Option<Swatch>,
    /// Desaturated color of medium lightness.
    pub muted: Option<Swatch>,
    /// Desaturated, light color.
    pub light_muted: Option<Swatch>,
    /// Desaturated, dark color.
    pub dark_muted: Option<Swatch>,
}

impl ImagePalette {
    /// The swatch the gradient endpoint builds on: `vibrant`, falling back
    /// to `dark_vibrant`.
    pub fn dominant(&self) -> Option<Swatch> {
        self.vibrant.or(self.dark_vibrant)
    }
}

/// Turns raw image bytes into named swatches.
///
/// Implementations must be pure with respect to their input so requests can
/// share one extractor without coordination.
pub trait PaletteExtractor: Send + Sync {
    /// Decode `bytes` and extract the palette.
    fn extract(&self, bytes: &[u8]) -> Result<ImagePalette, ExtractionError>;
}

/// Default extractor: in-memory decode, downsample, quantize, score.
#[derive(Debug, Default, Clone, Copy)]
pub struct VibrantExtractor;

impl PaletteExtractor for VibrantExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<ImagePalette, ExtractionError> {
        let image = image::load_from_memory(bytes).map_err(ExtractionError::Decode)?;
        Ok(palette_from_image(&image))
    }
}

/// Saturation/lightness window one named swatch is selected from.
struct SwatchTarget {
    target_saturation: f64,
    min_saturation: f64,
    max_saturation: f64,
    target_lightness: f64,
    min_lightness: f64,
    max_lightness: f64,
}

const VIBRANT: SwatchTarget = SwatchTarget {
    target_saturation: 1.0,
    min_saturation: 0.35,
    max_saturation: 1.0,
    target_lightness: 0.5,
    min_lightness: 0.3,
    max_lightness: 0.7,
};

const LIGHT_VIBRANT: SwatchTarget = SwatchTarget {
    target_saturation: 1.0,
    min_saturation: 0.35,
    max_saturation: 1.0,
    target_lightness: 0.74,
    min_lightness: 0.55,
    max_lightness: 1.0,
};

const DARK_VIBRANT: SwatchTarget = SwatchTarget {
    target_saturation: 1.0,
    min_saturation: 0.35,
    max_saturation: 1.0,
    target_lightness: 0.26,
    min_lightness: 0.0,
    max_lightness: 0.45,
};

const MUTED: SwatchTarget = SwatchTarget {
    target_saturation: 0.3,
    min_saturation: 0.0,
    max_saturation: 0.4,
    target_lightness: 0.5,
    min_lightness: 0.3,
    max_lightness: 0.7,
};

const LIGHT_MUTED: SwatchTarget = SwatchTarget {
    target_saturation: 0.3,
    min_saturation: 0.0,
    max_saturation: 0.4,
    target_lightness: 0.74,
    min_lightness: 0.55,
    max_lightness: 1.0,
};

const DARK_MUTED: SwatchTarget = SwatchTarget {
    target_saturation: 0.3,
    min_saturation: 0.0,
    max_saturation: 0.4,
    target_lightness: 0.26,
    min_lightness: 0.0,
    max_lightness: 0.45,
};

fn palette_from_image(image: &DynamicImage) -> ImagePalette {
    let scaled = if image.width() > MAX_DIMENSION || image.height() > MAX_DIMENSION {
        image.resize(MAX_DIMENSION, MAX_DIMENSION, FilterType::Triangle)
    } else {
        image.clone()
    };

    let candidates = histogram(&scaled);
    let max_population = candidates
        .iter()
        .map(|swatch| swatch.population)
        .max()
        .unwrap_or(1);

    ImagePalette {
        vibrant: select(&candidates, &VIBRANT, max_population),
        light_vibrant: select(&candidates, &LIGHT_VIBRANT, max_population),
        dark_vibrant: select(&candidates, &DARK_VIBRANT, max_population),
        muted: select(&candidates, &MUTED, max_population),
        light_muted: select(&candidates, &LIGHT_MUTED, max_population),
        dark_muted: select(&candidates, &DARK_MUTED, max_population),
    }
}

/// Bucket every pixel into a reduced-depth histogram and return one swatch
/// per occupied bucket.
fn histogram(image: &DynamicImage) -> Vec<Swatch> {
    let shift = 8 - QUANTIZE_BITS;
    let mut buckets: HashMap<u16, u32> = HashMap::new();

    for pixel in image.to_rgb8().pixels() {
        let [r, g, b] = pixel.0;
        let key = (u16::from(r >> shift) << (2 * QUANTIZE_BITS))
            | (u16::from(g >> shift) << QUANTIZE_BITS)
            | u16::from(b >> shift);
        *buckets.entry(key).or_insert(0) += 1;
    }

    buckets
        .into_iter()
        .map(|(key, population)| Swatch {
            rgb: Rgb::new(
                widen((key >> (2 * QUANTIZE_BITS)) as u8),
                widen(((key >> QUANTIZE_BITS) & 0x1f) as u8),
                widen((key & 0x1f) as u8),
            ),
            population,
        })
        .collect()
}

/// Expand a quantized channel back to 8 bits, replicating the high bits so
/// 0x1f maps to 0xff.
fn widen(quantized: u8) -> u8 {
    (quantized << 3) | (quantized >> 2)
}

/// Pick the candidate inside the target window with the best weighted score.
fn select(candidates: &[Swatch], target: &SwatchTarget, max_population: u32) -> Option<Swatch> {
    let mut best: Option<(f64, Swatch)> = None;

    for swatch in candidates {
        let hsl = rgb_to_hsl(swatch.rgb);
        if hsl.s < target.min_saturation
            || hsl.s > target.max_saturation
            || hsl.l < target.min_lightness
            || hsl.l > target.max_lightness
        {
            continue;
        }

        let score = WEIGHT_SATURATION * (1.0 - (hsl.s - target.target_saturation).abs())
            + WEIGHT_LIGHTNESS * (1.0 - (hsl.l - target.target_lightness).abs())
            + WEIGHT_POPULATION * (f64::from(swatch.population) / f64::from(max_population));

        if best.is_none_or(|(best_score, _)| score > best_score) {
            best = Some((score, *swatch));
        }
    }

    best.map(|(_, swatch)| swatch)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use image::{ImageFormat, RgbImage};

    use super::*;

    fn solid_image(r: u8, g: u8, b: u8) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(64, 64, image::Rgb([r, g, b])))
    }

    #[test]
    fn saturated_midtone_yields_a_vibrant_swatch() {
        let palette = palette_from_image(&solid_image(200, 30, 30));
        let vibrant = palette.vibrant.expect("vibrant swatch");

        let hsl = rgb_to_hsl(vibrant.rgb);
        assert!(hsl.s >= 0.35);
        assert!((0.3..=0.7).contains(&hsl.l));
        assert_eq!(palette.dominant().unwrap().rgb, vibrant.rgb);
    }

    #[test]
    fn dark_saturated_color_falls_back_to_dark_vibrant() {
        let palette = palette_from_image(&solid_image(80, 6, 6));
        assert!(palette.vibrant.is_none());
        let dark = palette.dark_vibrant.expect("dark vibrant swatch");
        assert!(rgb_to_hsl(dark.rgb).l < 0.45);
        assert_eq!(palette.dominant().unwrap().rgb, dark.rgb);
    }

    #[test]
    fn grayscale_image_has_no_vibrant_swatch() {
        let palette = palette_from_image(&solid_image(128, 128, 128));
        assert!(palette.vibrant.is_none());
        assert!(palette.dark_vibrant.is_none());
        assert!(palette.dominant().is_none());
        // Desaturated colors still land in the muted family.
        assert!(palette.muted.is_some());
    }

    #[test]
    fn extractor_decodes_png_bytes() {
        let mut bytes = Vec::new();
        solid_image(30, 160, 40)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();

        let palette = VibrantExtractor.extract(&bytes).unwrap();
        assert!(palette.dominant().is_some());
    }

    #[test]
    fn extractor_rejects_garbage_bytes() {
        let result = VibrantExtractor.extract(b"definitely not an image");
        assert!(matches!(result, Err(ExtractionError::Decode(_))));
    }
}
