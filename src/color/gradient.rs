//! RGB ↔ HSL conversion and three-stop gradient synthesis.
//!
//! These are pure functions with no error conditions: any 24-bit RGB color
//! converts to an HSL triple in [0, 1]³ and back within ±1 per channel.

use std::fmt;

/// How far the lightness moves for the darker and lighter gradient stops.
const SHADE_STEP: f64 = 0.2;

/// A 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Build a color from its three channels.
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// A hue/saturation/lightness triple, each component in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    /// Hue, as a fraction of a full turn.
    pub h: f64,
    /// Saturation.
    pub s: f64,
    /// Lightness.
    pub l: f64,
}

impl Hsl {
    /// Return the same hue and saturation with lightness moved by `delta`,
    /// clamped to [0, 1].
    pub fn with_lightness_shifted(self, delta: f64) -> Self {
        Self {
            l: (self.l + delta).clamp(0.0, 1.0),
            ..self
        }
    }
}

/// Convert an RGB color to HSL, all components normalized to [0, 1].
pub fn rgb_to_hsl(rgb: Rgb) -> Hsl {
    let r = f64::from(rgb.r) / 255.0;
    let g = f64::from(rgb.g) / 255.0;
    let b = f64::from(rgb.b) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        // Achromatic: hue is undefined, reported as zero.
        return Hsl { h: 0.0, s: 0.0, l };
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };

    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    Hsl { h: h / 6.0, s, l }
}

/// Convert an HSL triple back to RGB, rounding each channel to the nearest
/// integer.
pub fn hsl_to_rgb(hsl: Hsl) -> Rgb {
    let Hsl { h, s, l } = hsl;

    if s == 0.0 {
        let channel = to_channel(l);
        return Rgb::new(channel, channel, channel);
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    Rgb::new(
        to_channel(hue_to_channel(p, q, h + 1.0 / 3.0)),
        to_channel(hue_to_channel(p, q, h)),
        to_channel(hue_to_channel(p, q, h - 1.0 / 3.0)),
    )
}

/// Map one hue offset through the piecewise-linear HSL reconstruction.
fn hue_to_channel(p: f64, q: f64, t: f64) -> f64 {
    let t = if t < 0.0 {
        t + 1.0
    } else if t > 1.0 {
        t - 1.0
    } else {
        t
    };

    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn to_channel(value: f64) -> u8 {
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}

/// A three-stop linear gradient derived from one base color.
///
/// Stops sit at 0% / 50% / 100% along a fixed 90° (left-to-right) axis; the
/// darker and lighter stops keep the base hue and saturation and only move
/// the lightness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gradient {
    /// Stop at 0%: base lightness reduced by [`SHADE_STEP`], floored at 0.
    pub darker: Rgb,
    /// Stop at 50%: the base color, untouched.
    pub base: Rgb,
    /// Stop at 100%: base lightness raised by [`SHADE_STEP`], capped at 1.
    pub lighter: Rgb,
}

impl Gradient {
    /// Derive the darker and lighter stops from a base color.
    pub fn from_base(base: Rgb) -> Self {
        let hsl = rgb_to_hsl(base);
        Self {
            darker: hsl_to_rgb(hsl.with_lightness_shifted(-SHADE_STEP)),
            base,
            lighter: hsl_to_rgb(hsl.with_lightness_shifted(SHADE_STEP)),
        }
    }

    /// Render the gradient as a CSS `linear-gradient` value.
    pub fn css(&self) -> String {
        format!(
            "linear-gradient(90deg, {} 0%, {} 50%, {} 100%)",
            self.darker, self.base, self.lighter
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lightness(rgb: Rgb) -> f64 {
        rgb_to_hsl(rgb).l
    }

    #[test]
    fn black_and_white_are_achromatic() {
        assert_eq!(rgb_to_hsl(Rgb::new(0, 0, 0)), Hsl { h: 0.0, s: 0.0, l: 0.0 });
        assert_eq!(
            rgb_to_hsl(Rgb::new(255, 255, 255)),
            Hsl { h: 0.0, s: 0.0, l: 1.0 }
        );
    }

    #[test]
    fn grays_keep_zero_saturation() {
        for value in [1u8, 64, 127, 128, 200, 254] {
            let hsl = rgb_to_hsl(Rgb::new(value, value, value));
            assert_eq!(hsl.h, 0.0);
            assert_eq!(hsl.s, 0.0);
            assert_eq!(hsl_to_rgb(hsl), Rgb::new(value, value, value));
        }
    }

    #[test]
    fn primary_hues_convert_exactly() {
        assert_eq!(
            rgb_to_hsl(Rgb::new(255, 0, 0)),
            Hsl { h: 0.0, s: 1.0, l: 0.5 }
        );
        assert_eq!(rgb_to_hsl(Rgb::new(0, 255, 0)).h, 1.0 / 3.0);
        assert_eq!(rgb_to_hsl(Rgb::new(0, 0, 255)).h, 2.0 / 3.0);
    }

    #[test]
    fn round_trip_is_within_one_per_channel() {
        // Sampled grid over the full cube, including both channel extremes.
        for r in (0..=255u16).step_by(15) {
            for g in (0..=255u16).step_by(15) {
                for b in (0..=255u16).step_by(15) {
                    let original = Rgb::new(r as u8, g as u8, b as u8);
                    let back = hsl_to_rgb(rgb_to_hsl(original));
                    for (a, c) in [
                        (original.r, back.r),
                        (original.g, back.g),
                        (original.b, back.b),
                    ] {
                        assert!(
                            a.abs_diff(c) <= 1,
                            "round trip drifted for {original:?}: got {back:?}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn gradient_orders_lightness_and_preserves_hue() {
        let base = Rgb::new(255, 0, 0);
        let gradient = Gradient::from_base(base);

        assert!(lightness(gradient.darker) < lightness(gradient.base));
        assert!(lightness(gradient.lighter) > lightness(gradient.base));

        let base_hsl = rgb_to_hsl(base);
        for stop in [gradient.darker, gradient.lighter] {
            let hsl = rgb_to_hsl(stop);
            assert!((hsl.h - base_hsl.h).abs() < 0.01, "hue drifted: {hsl:?}");
            assert!(
                (hsl.s - base_hsl.s).abs() < 0.01,
                "saturation drifted: {hsl:?}"
            );
        }
    }

    #[test]
    fn gradient_from_pure_red_matches_known_stops() {
        let gradient = Gradient::from_base(Rgb::new(255, 0, 0));
        assert_eq!(gradient.darker, Rgb::new(153, 0, 0));
        assert_eq!(gradient.lighter, Rgb::new(255, 102, 102));
        assert_eq!(
            gradient.css(),
            "linear-gradient(90deg, rgb(153, 0, 0) 0%, rgb(255, 0, 0) 50%, rgb(255, 102, 102) 100%)"
        );
    }

    #[test]
    fn lightness_clamps_at_both_ends() {
        let white = Gradient::from_base(Rgb::new(255, 255, 255));
        assert_eq!(lightness(white.lighter), 1.0);

        let black = Gradient::from_base(Rgb::new(0, 0, 0));
        assert_eq!(lightness(black.darker), 0.0);
    }
}
