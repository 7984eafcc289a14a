//! Pan/zoom state mapping between screen space and image space.
//!
//! The forward map is `screen = offset + image * scale`. Zoom is stored as an
//! integer number of steps away from the fitted base scale, so stepping in and
//! back out lands on exactly the same scale.

use crate::canvas::raster::Size;
use crate::config::EditorConfig;
use crate::utils::vector::Vec2;

pub const MIN_SCALE: f32 = 0.1;
pub const MAX_SCALE: f32 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportTransform {
    pub offset: Vec2,
    base_scale: f32,
    zoom_level: i32,
    zoom_step: f32,
    min_scale: f32,
    max_scale: f32,
}

impl Default for ViewportTransform {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            base_scale: 1.0,
            zoom_level: 0,
            zoom_step: 1.2,
            min_scale: MIN_SCALE,
            max_scale: MAX_SCALE,
        }
    }
}

impl ViewportTransform {
    pub fn new(offset: Vec2, scale: f32) -> Self {
        let mut transform = Self::default();
        transform.offset = offset;
        transform.base_scale = scale.clamp(transform.min_scale, transform.max_scale);
        transform
    }

    /// Identity transform carrying the zoom limits of `config`.
    pub fn from_config(config: &EditorConfig) -> Self {
        Self {
            zoom_step: config.zoom_step,
            min_scale: config.min_scale,
            max_scale: config.max_scale,
            ..Self::default()
        }
    }

    /// Current uniform scale, always inside the configured limits.
    pub fn scale(&self) -> f32 {
        (self.base_scale * self.zoom_step.powi(self.zoom_level))
            .clamp(self.min_scale, self.max_scale)
    }

    pub fn zoom_level(&self) -> i32 {
        self.zoom_level
    }

    /// Centre `raster` inside `container`, never enlarging past 100%.
    ///
    /// Computed from scratch each time, so calling it again after a resize or
    /// after any pan/zoom gives the same answer as the first call.
    pub fn fit_to_screen(&mut self, raster: Size, container: Size) {
        if raster.is_empty() {
            self.offset = Vec2::ZERO;
            self.base_scale = 1.0;
            self.zoom_level = 0;
            return;
        }
        let (rw, rh) = (raster.width as f32, raster.height as f32);
        let (cw, ch) = (container.width as f32, container.height as f32);
        let scale = (cw / rw)
            .min(ch / rh)
            .min(1.0)
            .clamp(self.min_scale, self.max_scale);
        self.base_scale = scale;
        self.zoom_level = 0;
        self.offset = Vec2::new((cw - rw * scale) / 2.0, (ch - rh * scale) / 2.0);
    }

    /// Move the image by a screen-space delta. Unbounded.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.offset += Vec2::new(dx, dy);
    }

    /// Step the zoom once, around the current offset.
    ///
    /// Returns false when the scale is already pinned at the limit in that
    /// direction; the level does not keep counting past a clamp.
    pub fn zoom(&mut self, direction: ZoomDirection) -> bool {
        let scale = self.scale();
        match direction {
            ZoomDirection::In if scale < self.max_scale => self.zoom_level += 1,
            ZoomDirection::Out if scale > self.min_scale => self.zoom_level -= 1,
            _ => return false,
        }
        true
    }

    pub fn screen_to_image(&self, screen: Vec2) -> Vec2 {
        (screen - self.offset) / self.scale()
    }

    pub fn image_to_screen(&self, image: Vec2) -> Vec2 {
        self.offset + image * self.scale()
    }

    /// Image-space length of a screen-space length.
    pub fn screen_len_to_image(&self, len: f32) -> f32 {
        len / self.scale()
    }
}
