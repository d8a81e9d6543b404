//! Color math and palette extraction used by the thumbnail gradient endpoint.

pub mod gradient;
pub mod palette;

pub use gradient::{Gradient, Hsl, Rgb, hsl_to_rgb, rgb_to_hsl};
pub use palette::{ExtractionError, ImagePalette, PaletteExtractor, Swatch, VibrantExtractor};
