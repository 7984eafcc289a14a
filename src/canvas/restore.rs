//! Recovery of pixels from the image as it was first uploaded.

use crate::brush_engine::Dab;
use crate::canvas::raster::{Raster, Size};
use crate::canvas::viewport::ViewportTransform;
use crate::utils::vector::Vec2;

/// Holds the original upload and merges it back into the working raster.
///
/// Every operation is a no-op returning `false` until an original is set.
#[derive(Clone, Debug, Default)]
pub struct RestoreLayer {
    original: Option<Raster>,
}

impl RestoreLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the original. Only a fresh upload should call this.
    pub fn set_original(&mut self, original: Raster) {
        self.original = Some(original);
    }

    pub fn original(&self) -> Option<&Raster> {
        self.original.as_ref()
    }

    pub fn has_original(&self) -> bool {
        self.original.is_some()
    }

    pub fn clear(&mut self) {
        self.original = None;
    }

    /// Paint original pixels back into `current` inside a circle of screen
    /// radius `diameter / 2` centred on `image_point`.
    ///
    /// Each covered pixel is overwritten with the original, transparency
    /// included. Pixels outside the circle or outside the original are kept.
    pub fn restore_stroke(
        &self,
        current: &mut Raster,
        image_point: Vec2,
        diameter: f32,
        transform: &ViewportTransform,
    ) -> bool {
        let Some(original) = &self.original else {
            return false;
        };
        let radius = transform.screen_len_to_image(diameter / 2.0);
        let bounds = Size::new(
            current.width().min(original.width()),
            current.height().min(original.height()),
        );
        Dab::new(image_point, radius).for_each_pixel(bounds.width, bounds.height, |x, y| {
            current.put_pixel(x, y, *original.get_pixel(x, y));
        });
        true
    }

    /// Replace `current` with a copy of the original.
    pub fn restore_all(&self, current: &mut Raster) -> bool {
        match &self.original {
            Some(original) => {
                current.clone_from(original);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const ORIGINAL: Rgba<u8> = Rgba([10, 200, 30, 255]);
    const EDITED: Rgba<u8> = Rgba([250, 0, 0, 255]);

    fn layer() -> RestoreLayer {
        let mut layer = RestoreLayer::new();
        layer.set_original(Raster::from_pixel(40, 40, ORIGINAL));
        layer
    }

    #[test]
    fn stroke_restores_only_inside_the_circle() {
        let layer = layer();
        let mut current = Raster::from_pixel(40, 40, EDITED);
        // Scale 2 turns a 20px screen brush into a 5px image radius.
        let t = ViewportTransform::new(Vec2::ZERO, 2.0);
        assert!(layer.restore_stroke(&mut current, Vec2::new(20.0, 20.0), 20.0, &t));

        assert_eq!(*current.get_pixel(20, 20), ORIGINAL);
        assert_eq!(*current.get_pixel(16, 19), ORIGINAL);
        assert_eq!(*current.get_pixel(26, 20), EDITED);
        assert_eq!(*current.get_pixel(0, 0), EDITED);
    }

    #[test]
    fn stroke_overwrites_with_transparent_original() {
        let clear = Rgba([0, 0, 0, 0]);
        let half = Rgba([40, 80, 120, 128]);
        let mut original = Raster::from_pixel(10, 10, clear);
        original.put_pixel(6, 5, half);
        let mut layer = RestoreLayer::new();
        layer.set_original(original);

        let mut current = Raster::from_pixel(10, 10, EDITED);
        layer.restore_stroke(
            &mut current,
            Vec2::new(5.0, 5.0),
            8.0,
            &ViewportTransform::default(),
        );
        assert_eq!(*current.get_pixel(5, 5), clear);
        assert_eq!(*current.get_pixel(6, 5), half);
        assert_eq!(*current.get_pixel(0, 0), EDITED);
    }

    #[test]
    fn stroke_ignores_pixels_beyond_the_original() {
        let layer = layer();
        let mut current = Raster::from_pixel(60, 60, EDITED);
        layer.restore_stroke(
            &mut current,
            Vec2::new(40.0, 40.0),
            10.0,
            &ViewportTransform::default(),
        );
        assert_eq!(*current.get_pixel(39, 39), ORIGINAL);
        assert_eq!(*current.get_pixel(41, 41), EDITED);
    }

    #[test]
    fn restore_all_is_byte_identical() {
        let layer = layer();
        let mut current = Raster::from_pixel(12, 7, EDITED);
        assert!(layer.restore_all(&mut current));
        assert_eq!(current.as_raw(), layer.original().map(|o| o.as_raw()).unwrap());
    }

    #[test]
    fn without_original_everything_is_a_no_op() {
        let layer = RestoreLayer::new();
        let mut current = Raster::from_pixel(8, 8, EDITED);
        let before = current.clone();
        let t = ViewportTransform::default();
        assert!(!layer.restore_stroke(&mut current, Vec2::new(4.0, 4.0), 30.0, &t));
        assert!(!layer.restore_all(&mut current));
        assert_eq!(current, before);
    }
}
