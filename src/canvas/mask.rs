//! Screen-space selection mask painted over the working image.
//!
//! The buffer is only meaningful under the transform it was painted with;
//! the session clears it whenever the view moves.

use rayon::prelude::*;

use crate::brush_engine::{Dab, MaskMode};
use crate::canvas::raster::{AlphaBuffer, Size};
use crate::canvas::viewport::ViewportTransform;
use crate::utils::profiler::ScopeTimer;
use crate::utils::vector::Vec2;

/// Single-channel alpha buffer sized to the visible viewport surface.
#[derive(Clone, Debug, PartialEq)]
pub struct MaskLayer {
    buffer: AlphaBuffer,
}

impl MaskLayer {
    pub fn new(size: Size) -> Self {
        Self {
            buffer: AlphaBuffer::new(size.width, size.height),
        }
    }

    pub fn size(&self) -> Size {
        let (width, height) = self.buffer.dimensions();
        Size { width, height }
    }

    pub fn buffer(&self) -> &AlphaBuffer {
        &self.buffer
    }

    #[inline]
    pub fn alpha_at(&self, x: u32, y: u32) -> u8 {
        self.buffer.get_pixel_checked(x, y).map_or(0, |p| p.0[0])
    }

    /// Paint one dab centred on `image_point`.
    ///
    /// The footprint has a constant screen radius of `diameter / 2`, so the
    /// visible stroke width does not change with zoom.
    pub fn paint(
        &mut self,
        image_point: Vec2,
        diameter: f32,
        mode: MaskMode,
        transform: &ViewportTransform,
    ) {
        let dab = Dab::new(transform.image_to_screen(image_point), diameter / 2.0);
        let (w, h) = self.buffer.dimensions();
        let buffer = &mut self.buffer;
        dab.for_each_pixel(w, h, |x, y| {
            let px = buffer.get_pixel_mut(x, y);
            px.0[0] = match mode {
                MaskMode::Draw => draw_over(px.0[0]),
                MaskMode::Erase => 0,
            };
        });
    }

    pub fn clear(&mut self) {
        self.buffer.fill(0);
    }

    /// Match the buffer to a new viewport size. Content is discarded when the
    /// size actually changes; returns whether it did.
    pub fn resize(&mut self, size: Size) -> bool {
        if self.size() == size {
            return false;
        }
        log::debug!(
            "mask resized {}x{} -> {}x{}, content dropped",
            self.buffer.width(),
            self.buffer.height(),
            size.width,
            size.height
        );
        self.buffer = AlphaBuffer::new(size.width, size.height);
        true
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.iter().all(|&a| a == 0)
    }

    /// Resample the mask into image space. An image pixel becomes 255 when
    /// any painted mask texel overlaps its screen footprint, so thin strokes
    /// survive at high zoom; everything else is 0.
    pub fn to_image_mask(&self, transform: &ViewportTransform, image_size: Size) -> AlphaBuffer {
        let _timer = ScopeTimer::new("mask_to_image");
        let mut out = AlphaBuffer::new(image_size.width, image_size.height);
        if image_size.is_empty() || self.is_empty() {
            return out;
        }
        let scale = transform.scale();
        let offset = transform.offset;
        let (w, h) = self.buffer.dimensions();
        let row_len = image_size.width as usize;
        out.par_chunks_mut(row_len)
            .enumerate()
            .for_each(|(y, row)| {
                let Some(rows) = texel_span(offset.y + y as f32 * scale, scale, h) else {
                    return;
                };
                for (x, value) in row.iter_mut().enumerate() {
                    let Some(cols) = texel_span(offset.x + x as f32 * scale, scale, w) else {
                        continue;
                    };
                    let hit = (rows.0..=rows.1)
                        .any(|my| (cols.0..=cols.1).any(|mx| self.alpha_at(mx, my) > 0));
                    if hit {
                        *value = 255;
                    }
                }
            });
        out
    }
}

/// Mask texels overlapped by the screen interval `[start, start + len)`,
/// clipped to `0..limit`.
fn texel_span(start: f32, len: f32, limit: u32) -> Option<(u32, u32)> {
    let first = start.floor().max(0.0);
    let last = ((start + len).ceil() - 1.0).min(limit as f32 - 1.0);
    if limit == 0 || last < first {
        return None;
    }
    Some((first as u32, last as u32))
}

/// Source-over of a constant 50% alpha: `a' = 0.5 + a * 0.5`, rounded half up.
#[inline]
fn draw_over(dst: u8) -> u8 {
    ((255 + dst as u16 + 1) / 2) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn painted(mask: &MaskLayer) -> usize {
        mask.buffer().iter().filter(|&&a| a > 0).count()
    }

    #[test]
    fn draw_accumulates_towards_opaque() {
        assert_eq!(draw_over(0), 128);
        assert_eq!(draw_over(128), 192);
        assert_eq!(draw_over(255), 255);
    }

    #[test]
    fn erase_undoes_draw_for_same_footprint() {
        let t = ViewportTransform::new(Vec2::new(10.0, 5.0), 1.5);
        let mut mask = MaskLayer::new(Size::new(120, 90));
        let at = Vec2::new(30.0, 30.0);
        mask.paint(at, 20.0, MaskMode::Draw, &t);
        mask.paint(at, 20.0, MaskMode::Draw, &t);
        assert!(!mask.is_empty());
        mask.paint(at, 20.0, MaskMode::Erase, &t);
        assert!(mask.is_empty());
    }

    #[test]
    fn erase_leaves_pixels_outside_footprint() {
        let t = ViewportTransform::default();
        let mut mask = MaskLayer::new(Size::new(100, 100));
        mask.paint(Vec2::new(20.0, 20.0), 10.0, MaskMode::Draw, &t);
        mask.paint(Vec2::new(70.0, 70.0), 10.0, MaskMode::Draw, &t);
        mask.paint(Vec2::new(70.0, 70.0), 10.0, MaskMode::Erase, &t);
        assert_eq!(mask.alpha_at(20, 20), 128);
        assert_eq!(mask.alpha_at(70, 70), 0);
    }

    #[test]
    fn visible_width_is_constant_across_zoom() {
        let mut near = MaskLayer::new(Size::new(200, 200));
        let mut far = MaskLayer::new(Size::new(200, 200));
        near.paint(
            Vec2::new(25.0, 25.0),
            30.0,
            MaskMode::Draw,
            &ViewportTransform::new(Vec2::ZERO, 4.0),
        );
        far.paint(
            Vec2::new(100.0, 100.0),
            30.0,
            MaskMode::Draw,
            &ViewportTransform::new(Vec2::ZERO, 1.0),
        );
        assert_eq!(painted(&near), painted(&far));
    }

    #[test]
    fn resize_discards_only_on_change() {
        let t = ViewportTransform::default();
        let mut mask = MaskLayer::new(Size::new(50, 50));
        mask.paint(Vec2::new(10.0, 10.0), 8.0, MaskMode::Draw, &t);
        assert!(!mask.resize(Size::new(50, 50)));
        assert!(!mask.is_empty());
        assert!(mask.resize(Size::new(60, 40)));
        assert_eq!(mask.size(), Size::new(60, 40));
        assert!(mask.is_empty());
    }

    #[test]
    fn image_mask_follows_the_transform() {
        // Image pixel (5, 5) sits at screen (10..12, 10..12) under scale 2.
        let t = ViewportTransform::new(Vec2::ZERO, 2.0);
        let mut mask = MaskLayer::new(Size::new(40, 40));
        mask.paint(Vec2::new(5.5, 5.5), 2.0, MaskMode::Draw, &t);
        let image_mask = mask.to_image_mask(&t, Size::new(20, 20));
        assert_eq!(image_mask.get_pixel(5, 5).0[0], 255);
        assert_eq!(image_mask.get_pixel(0, 0).0[0], 0);
        assert!(image_mask.iter().all(|&v| v == 0 || v == 255));
    }

    #[test]
    fn thin_stroke_at_high_zoom_reaches_the_image_mask() {
        // At scale 10 a 5px dab never touches the centre of image pixel (5, 5).
        let t = ViewportTransform::new(Vec2::ZERO, 10.0);
        let mut mask = MaskLayer::new(Size::new(200, 200));
        mask.paint(Vec2::new(5.02, 5.02), 5.0, MaskMode::Draw, &t);
        assert_eq!(mask.alpha_at(55, 55), 0);

        let image_mask = mask.to_image_mask(&t, Size::new(20, 20));
        assert_eq!(image_mask.get_pixel(5, 5).0[0], 255);
        assert_eq!(image_mask.get_pixel(4, 4).0[0], 255);
        assert_eq!(image_mask.get_pixel(6, 6).0[0], 0);
    }

    #[test]
    fn zoomed_out_pixels_pick_up_overlapping_texels() {
        let t = ViewportTransform::new(Vec2::new(3.0, 3.0), 0.25);
        let mut mask = MaskLayer::new(Size::new(40, 40));
        mask.paint(Vec2::new(40.0, 40.0), 2.0, MaskMode::Draw, &t);
        let image_mask = mask.to_image_mask(&t, Size::new(120, 120));
        assert_eq!(image_mask.get_pixel(40, 40).0[0], 255);
        assert_eq!(image_mask.get_pixel(100, 100).0[0], 0);
    }

    #[test]
    fn texel_span_clips_to_the_buffer() {
        assert_eq!(texel_span(50.0, 10.0, 200), Some((50, 59)));
        assert_eq!(texel_span(-5.0, 10.0, 200), Some((0, 4)));
        assert_eq!(texel_span(12.3, 0.25, 200), Some((12, 12)));
        assert_eq!(texel_span(195.0, 10.0, 200), Some((195, 199)));
        assert_eq!(texel_span(-20.0, 10.0, 200), None);
        assert_eq!(texel_span(210.0, 10.0, 200), None);
    }
}
