use image::{GrayImage, RgbaImage};

use crate::error::Result;

/// RGBA8 pixel buffer used for both the working and the original image.
pub type Raster = RgbaImage;

/// Single-channel coverage buffer (0 = untouched, 255 = fully covered).
pub type AlphaBuffer = GrayImage;

/// Width/height pair in whole pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn of(raster: &Raster) -> Self {
        let (width, height) = raster.dimensions();
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Axis-aligned rectangle in image-pixel coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct BBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BBox {
    pub const EMPTY: BBox = BBox {
        x: 0,
        y: 0,
        width: 0,
        height: 0,
    };

    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// True when `other` lies entirely inside `self`.
    pub fn contains(&self, other: &BBox) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Grow by `pad` on every side, then clamp to a `bounds` sized raster.
    pub fn padded(&self, pad: u32, bounds: Size) -> BBox {
        let x = self.x.saturating_sub(pad);
        let y = self.y.saturating_sub(pad);
        let grow = pad.saturating_mul(2);
        let mut width = self.width.saturating_add(grow).min(bounds.width);
        let mut height = self.height.saturating_add(grow).min(bounds.height);
        if x.saturating_add(width) > bounds.width {
            width = bounds.width.saturating_sub(x);
        }
        if y.saturating_add(height) > bounds.height {
            height = bounds.height.saturating_sub(y);
        }
        BBox {
            x,
            y,
            width,
            height,
        }
    }
}

/// Decode encoded image bytes (PNG, JPEG, WebP) into an RGBA raster.
pub fn decode(bytes: &[u8]) -> Result<Raster> {
    let img = image::load_from_memory(bytes)?;
    Ok(img.into_rgba8())
}

/// True if any pixel carries less than full opacity.
pub fn has_transparency(raster: &Raster) -> bool {
    raster.pixels().any(|p| p.0[3] < 255)
}
