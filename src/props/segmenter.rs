//! Naive prop cut-out: chroma-key the background, find the opaque box, pad, crop.

use image::imageops;
use rayon::prelude::*;

use crate::canvas::raster::{self, BBox, Raster, Size};
use crate::config::EditorConfig;
use crate::error::Result;
use crate::utils::color::rgb_distance;
use crate::utils::profiler::ScopeTimer;

/// Output of one segmentation pass.
#[derive(Clone, Debug, PartialEq)]
pub struct Segmentation {
    pub cropped: Raster,
    pub bbox: BBox,
    pub padded_bbox: BBox,
    pub background_removed: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PropSegmenter {
    threshold: f32,
    padding: u32,
}

impl Default for PropSegmenter {
    fn default() -> Self {
        Self::from_config(&EditorConfig::default())
    }
}

impl PropSegmenter {
    pub fn new(threshold: f32, padding: u32) -> Self {
        Self { threshold, padding }
    }

    pub fn from_config(config: &EditorConfig) -> Self {
        Self::new(config.bg_threshold, config.prop_padding)
    }

    /// Decode `bytes` and segment them. Returns the decoded source alongside
    /// the result so it can be re-processed later.
    pub fn segment_bytes(&self, bytes: &[u8], force_remove_bg: bool) -> Result<(Raster, Segmentation)> {
        let source = raster::decode(bytes)?;
        let segmentation = self.segment(&source, force_remove_bg);
        Ok((source, segmentation))
    }

    pub fn segment(&self, source: &Raster, force_remove_bg: bool) -> Segmentation {
        let _timer = ScopeTimer::new("segment_prop");
        let mut keyed = source.clone();
        let background_removed = force_remove_bg || !raster::has_transparency(source);
        if background_removed {
            remove_background(&mut keyed, self.threshold);
        }

        let bbox = alpha_bbox(&keyed);
        let padded_bbox = bbox.padded(self.padding, Size::of(&keyed));
        let cropped = imageops::crop_imm(
            &keyed,
            padded_bbox.x,
            padded_bbox.y,
            padded_bbox.width,
            padded_bbox.height,
        )
        .to_image();

        log::debug!(
            "segmented {}x{} source: bbox {:?}, padded {:?}, keyed {}",
            source.width(),
            source.height(),
            bbox,
            padded_bbox,
            background_removed
        );

        Segmentation {
            cropped,
            bbox,
            padded_bbox,
            background_removed,
        }
    }
}

/// Clear alpha on every pixel within `threshold` of the top-left pixel's colour.
pub fn remove_background(raster: &mut Raster, threshold: f32) {
    let Some(key) = raster.get_pixel_checked(0, 0).map(|p| [p.0[0], p.0[1], p.0[2]]) else {
        return;
    };
    raster.par_chunks_exact_mut(4).for_each(|px| {
        if rgb_distance([px[0], px[1], px[2]], key) < threshold {
            px[3] = 0;
        }
    });
}

/// Tightest box around every pixel with non-zero alpha, or [`BBox::EMPTY`]
/// when the raster is fully transparent.
pub fn alpha_bbox(raster: &Raster) -> BBox {
    let row_bytes = raster.width() as usize * 4;
    if row_bytes == 0 {
        return BBox::EMPTY;
    }
    raster
        .par_chunks_exact(row_bytes)
        .enumerate()
        .filter_map(|(y, row)| {
            let mut xs = row
                .chunks_exact(4)
                .enumerate()
                .filter(|(_, px)| px[3] > 0)
                .map(|(x, _)| x as u32);
            let first = xs.next()?;
            let last = xs.last().unwrap_or(first);
            Some((first, last, y as u32, y as u32))
        })
        .reduce_with(|a, b| (a.0.min(b.0), a.1.max(b.1), a.2.min(b.2), a.3.max(b.3)))
        .map_or(BBox::EMPTY, |(min_x, max_x, min_y, max_y)| {
            BBox::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    fn red_with_blue_square() -> Raster {
        let mut img = Raster::from_pixel(100, 100, RED);
        for y in 30..70 {
            for x in 30..70 {
                img.put_pixel(x, y, BLUE);
            }
        }
        img
    }

    #[test]
    fn chroma_key_finds_the_square() {
        let seg = PropSegmenter::default().segment(&red_with_blue_square(), false);
        assert!(seg.background_removed);
        assert_eq!(seg.bbox, BBox::new(30, 30, 40, 40));
        assert_eq!(seg.padded_bbox, BBox::new(10, 10, 80, 80));
        assert_eq!(seg.cropped.dimensions(), (80, 80));
        assert_eq!(seg.cropped.get_pixel(0, 0).0[3], 0);
        assert_eq!(*seg.cropped.get_pixel(40, 40), BLUE);
    }

    #[test]
    fn threshold_is_strict() {
        let mut img = Raster::from_pixel(3, 1, Rgba([100, 100, 100, 255]));
        // Distance 29 and 30 from the key colour.
        img.put_pixel(1, 0, Rgba([129, 100, 100, 255]));
        img.put_pixel(2, 0, Rgba([130, 100, 100, 255]));
        remove_background(&mut img, 30.0);
        assert_eq!(img.get_pixel(1, 0).0[3], 0);
        assert_eq!(img.get_pixel(2, 0).0[3], 255);
    }

    #[test]
    fn existing_transparency_skips_keying_unless_forced() {
        let mut img = red_with_blue_square();
        img.put_pixel(99, 99, Rgba([255, 0, 0, 0]));
        let segmenter = PropSegmenter::default();

        let kept = segmenter.segment(&img, false);
        assert!(!kept.background_removed);
        assert_eq!(kept.bbox, BBox::new(0, 0, 100, 100));

        let forced = segmenter.segment(&img, true);
        assert!(forced.background_removed);
        assert_eq!(forced.bbox, BBox::new(30, 30, 40, 40));
    }

    #[test]
    fn uniform_image_degenerates_to_empty_box() {
        let img = Raster::from_pixel(100, 100, RED);
        let seg = PropSegmenter::default().segment(&img, false);
        assert_eq!(seg.bbox, BBox::EMPTY);
        assert_eq!(seg.padded_bbox, BBox::new(0, 0, 40, 40));
        assert_eq!(seg.cropped.dimensions(), (40, 40));
    }

    #[test]
    fn undecodable_bytes_fail() {
        assert!(PropSegmenter::default().segment_bytes(b"\x89PNG broken", false).is_err());
    }
}
