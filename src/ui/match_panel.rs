use crate::EditorApp;
use crate::app::render_helper::raster_to_color_image;
use crate::app::state::PreviewTexture;
use crate::props::MatchSettings;
use crate::props::adjust::MATCH_RANGE;
use eframe::egui::{self, TextureOptions};

const PREVIEW_MAX: f32 = 160.0;

/// Brightness, contrast and saturation sliders for the selected prop.
pub fn match_panel(ui: &mut egui::Ui, app: &mut EditorApp) {
    ui.heading("Match");
    ui.separator();

    let settings = &mut app.session.match_settings;
    ui.label("Brightness:");
    ui.add(egui::Slider::new(&mut settings.brightness, MATCH_RANGE).suffix("%"));
    ui.label("Contrast:");
    ui.add(egui::Slider::new(&mut settings.contrast, MATCH_RANGE).suffix("%"));
    ui.label("Saturation:");
    ui.add(egui::Slider::new(&mut settings.saturation, MATCH_RANGE).suffix("%"));

    if ui
        .add_enabled(!settings.is_identity(), egui::Button::new("Reset"))
        .clicked()
    {
        *settings = MatchSettings::default();
    }

    ui.separator();

    let Some(active) = app.session.props().active_id() else {
        app.match_preview = None;
        ui.label("Select a prop to preview");
        return;
    };

    let settings = app.session.match_settings;
    let stale = !app
        .match_preview
        .as_ref()
        .is_some_and(|p| p.is_current(active, settings));
    if stale {
        if let Some(raster) = app.session.active_prop_preview() {
            let image = raster_to_color_image(&raster);
            let texture = match app.match_preview.take() {
                Some(mut previous) => {
                    previous.texture.set(image, TextureOptions::LINEAR);
                    previous.texture
                }
                None => ui
                    .ctx()
                    .load_texture("match_preview", image, TextureOptions::LINEAR),
            };
            app.match_preview = Some(PreviewTexture {
                prop: active,
                settings,
                texture,
            });
        }
    }

    if let Some(preview) = &app.match_preview {
        let size = preview.texture.size_vec2();
        let scale = (PREVIEW_MAX / size.x.max(size.y).max(1.0)).min(1.0);
        ui.add(egui::Image::new((preview.texture.id(), size * scale)));
    }
}
