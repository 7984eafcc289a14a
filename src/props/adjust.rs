//! Brightness / contrast / saturation matching for a prop preview.

use rayon::prelude::*;

use crate::canvas::raster::Raster;
use crate::utils::color::Color;

pub const MATCH_RANGE: std::ops::RangeInclusive<f32> = 0.0..=200.0;

/// Percentages with CSS filter semantics; 100 leaves the channel as is.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatchSettings {
    pub brightness: f32,
    pub contrast: f32,
    pub saturation: f32,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            brightness: 100.0,
            contrast: 100.0,
            saturation: 100.0,
        }
    }
}

impl MatchSettings {
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }

    pub fn clamped(self) -> Self {
        let c = |v: f32| v.clamp(*MATCH_RANGE.start(), *MATCH_RANGE.end());
        Self {
            brightness: c(self.brightness),
            contrast: c(self.contrast),
            saturation: c(self.saturation),
        }
    }

    /// Adjust one colour: brightness, then contrast, then saturation.
    /// Each stage clamps to 0..1, alpha passes through.
    pub fn apply(&self, color: Color) -> Color {
        let b = self.brightness / 100.0;
        let k = self.contrast / 100.0;
        let s = self.saturation / 100.0;

        let stage = |c: Color, f: &dyn Fn(f32) -> f32| Color {
            r: f(c.r).clamp(0.0, 1.0),
            g: f(c.g).clamp(0.0, 1.0),
            b: f(c.b).clamp(0.0, 1.0),
            a: c.a,
        };

        let bright = stage(color, &|v| v * b);
        let contrasted = stage(bright, &|v| (v - 0.5) * k + 0.5);
        let luma = contrasted.luma();
        stage(contrasted, &|v| luma + (v - luma) * s)
    }
}

/// Return an adjusted copy of `raster`.
pub fn apply_match(raster: &Raster, settings: MatchSettings) -> Raster {
    let mut out = raster.clone();
    if settings.is_identity() {
        return out;
    }
    let settings = settings.clamped();
    out.par_chunks_exact_mut(4).for_each(|px| {
        let color = Color::rgba(px[0], px[1], px[2], px[3]);
        let adjusted = settings.apply(color).to_pixel();
        px[..3].copy_from_slice(&adjusted.0[..3]);
    });
    out
}
