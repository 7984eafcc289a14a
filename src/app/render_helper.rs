use crate::app::state::CanvasTextures;
use crate::canvas::raster::{AlphaBuffer, Raster};
use crate::session::EditingSession;
use crate::utils::profiler::ScopeTimer;
use eframe::egui::{self, Color32, ColorImage, TextureOptions};
use std::time::Duration;

/// One frame at 60 Hz.
const FRAME_BUDGET: Duration = Duration::from_millis(16);

/// Mask pixels are shown in red with their coverage as alpha.
const MASK_TINT: [u8; 3] = [255, 0, 0];

pub struct CanvasView {
    pub rect: egui::Rect,
    pub response: egui::Response,
}

pub fn raster_to_color_image(raster: &Raster) -> ColorImage {
    let size = [raster.width() as usize, raster.height() as usize];
    ColorImage::from_rgba_unmultiplied(size, raster.as_raw())
}

pub fn mask_to_color_image(mask: &AlphaBuffer) -> ColorImage {
    let [r, g, b] = MASK_TINT;
    ColorImage {
        size: [mask.width() as usize, mask.height() as usize],
        pixels: mask
            .iter()
            .map(|&a| Color32::from_rgba_unmultiplied(r, g, b, a))
            .collect(),
    }
}

fn upload(
    ctx: &egui::Context,
    slot: &mut Option<egui::TextureHandle>,
    name: &str,
    image: ColorImage,
    options: TextureOptions,
) {
    let _timer = ScopeTimer::with_budget("texture_set", FRAME_BUDGET);
    match slot {
        Some(handle) => handle.set(image, options),
        None => *slot = Some(ctx.load_texture(name, image, options)),
    }
}

/// Re-upload whichever layer changed since the last frame.
pub fn update_dirty_textures(
    ctx: &egui::Context,
    session: &EditingSession,
    textures: &mut CanvasTextures,
) {
    if textures.image_dirty {
        match session.current() {
            Some(raster) => upload(
                ctx,
                &mut textures.image,
                "working_image",
                raster_to_color_image(raster),
                TextureOptions::LINEAR,
            ),
            None => textures.image = None,
        }
        textures.image_dirty = false;
    }
    if textures.mask_dirty {
        let mask = session.mask().buffer();
        if mask.width() > 0 && mask.height() > 0 {
            upload(
                ctx,
                &mut textures.mask,
                "mask_overlay",
                mask_to_color_image(mask),
                TextureOptions::NEAREST,
            );
        }
        textures.mask_dirty = false;
    }
}

/// Allocate the canvas area and paint the image with the mask on top.
pub fn draw_canvas(
    ui: &mut egui::Ui,
    session: &EditingSession,
    textures: &CanvasTextures,
) -> CanvasView {
    let (rect, response) =
        ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 0.0, Color32::from_rgb(17, 24, 39));

    let full_uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));

    match (&textures.image, session.image_size()) {
        (Some(texture), Some(size)) => {
            let t = session.viewport();
            let origin = rect.min + egui::vec2(t.offset.x, t.offset.y);
            let image_rect = egui::Rect::from_min_size(
                origin,
                egui::vec2(size.width as f32, size.height as f32) * t.scale(),
            );
            painter.image(texture.id(), image_rect, full_uv, Color32::WHITE);

            if let Some(mask) = &textures.mask {
                // The mask lives in screen space, one texel per point.
                let mask_size = session.mask().size();
                let mask_rect = egui::Rect::from_min_size(
                    rect.min,
                    egui::vec2(mask_size.width as f32, mask_size.height as f32),
                );
                painter.image(mask.id(), mask_rect, full_uv, Color32::WHITE);
            }

            if let Some(hover) = response.hover_pos() {
                let diameter = match session.paint_mode {
                    crate::canvas::PaintMode::Restore => session.restore_brush.diameter,
                    _ => session.mask_brush.diameter,
                };
                painter.circle_stroke(
                    hover,
                    diameter / 2.0,
                    egui::Stroke::new(1.0, Color32::from_white_alpha(180)),
                );
            }
        }
        _ => {
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                "Upload an image to get started",
                egui::FontId::proportional(16.0),
                Color32::GRAY,
            );
        }
    }

    CanvasView { rect, response }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgba};

    #[test]
    fn color_image_matches_raster_dimensions() {
        let raster = Raster::from_pixel(3, 2, Rgba([10, 20, 30, 255]));
        let img = raster_to_color_image(&raster);
        assert_eq!(img.size, [3, 2]);
        assert_eq!(img.pixels[5], Color32::from_rgb(10, 20, 30));
    }

    #[test]
    fn empty_mask_is_invisible() {
        let mut mask = AlphaBuffer::new(2, 1);
        mask.put_pixel(1, 0, Luma([255]));
        let img = mask_to_color_image(&mask);
        assert_eq!(img.pixels[0].a(), 0);
        assert_eq!(img.pixels[1], Color32::from_rgb(255, 0, 0));
    }
}
