use crate::canvas::raster::{AlphaBuffer, Raster};
use crate::error::Result;
use image::{ImageFormat, Rgba};
use std::io::Cursor;
use std::path::Path;

/// File name offered when downloading the working image.
pub const DEFAULT_EXPORT_NAME: &str = "edited-image.png";

/// Losslessly encode a raster as PNG.
pub fn encode_png(raster: &Raster) -> Result<Vec<u8>> {
    let mut out = Cursor::new(Vec::new());
    raster.write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}

/// Encode a coverage mask as an RGBA PNG: selected pixels become opaque
/// white, everything else fully transparent.
pub fn encode_mask_png(mask: &AlphaBuffer) -> Result<Vec<u8>> {
    let rgba = Raster::from_fn(mask.width(), mask.height(), |x, y| {
        if mask.get_pixel(x, y).0[0] > 0 {
            Rgba([255, 255, 255, 255])
        } else {
            Rgba([0, 0, 0, 0])
        }
    });
    encode_png(&rgba)
}

/// Write a raster to disk as PNG regardless of the path's extension.
pub fn save_png(raster: &Raster, path: &Path) -> Result<()> {
    raster.save_with_format(path, ImageFormat::Png)?;
    log::info!("saved {}x{} image to {}", raster.width(), raster.height(), path.display());
    Ok(())
}
