use crate::EditorApp;
use crate::app::render_helper::raster_to_color_image;
use crate::validation::UploadKind;
use eframe::egui::{self, Color32, TextureOptions};
use uuid::Uuid;

const THUMB_SIZE: f32 = 48.0;

enum PropAction {
    Select(Uuid),
    RemoveBackground(Uuid),
    Delete(Uuid),
}

/// Upload button plus the list of segmented props.
pub fn props_panel(ui: &mut egui::Ui, app: &mut EditorApp) {
    ui.heading("Props");
    ui.separator();

    ui.horizontal(|ui| {
        let uploading = app.tasks.props.is_some();
        if ui
            .add_enabled(!uploading, egui::Button::new("Upload Props"))
            .on_hover_text(UploadKind::Prop.accepted_label())
            .clicked()
        {
            if let Some(paths) = rfd::FileDialog::new()
                .add_filter("Props", UploadKind::Prop.extensions())
                .pick_files()
            {
                app.start_prop_upload(paths);
            }
        }
        if uploading {
            ui.spinner();
            ui.label("Processing...");
        }
    });

    if let Some(err) = &app.status.props {
        ui.colored_label(ui.visuals().error_fg_color, err);
    }

    ui.add_space(5.0);

    let mut action = None;
    let active = app.session.props().active_id();
    egui::ScrollArea::vertical().show(ui, |ui| {
        for prop in app.session.props().iter() {
            let texture = app.prop_thumbnails.entry(prop.id).or_insert_with(|| {
                ui.ctx().load_texture(
                    format!("prop_{}", prop.id),
                    raster_to_color_image(&prop.cropped),
                    TextureOptions::LINEAR,
                )
            });

            ui.horizontal(|ui| {
                let aspect = prop.width.max(1) as f32 / prop.height.max(1) as f32;
                let thumb = if aspect >= 1.0 {
                    egui::vec2(THUMB_SIZE, THUMB_SIZE / aspect)
                } else {
                    egui::vec2(THUMB_SIZE * aspect, THUMB_SIZE)
                };
                let response = ui.add(
                    egui::Image::new((texture.id(), thumb)).sense(egui::Sense::click()),
                );
                if active == Some(prop.id) {
                    ui.painter().rect_stroke(
                        response.rect.expand(2.0),
                        2.0,
                        egui::Stroke::new(2.0, Color32::LIGHT_BLUE),
                    );
                }
                if response.clicked() {
                    action = Some(PropAction::Select(prop.id));
                }

                ui.vertical(|ui| {
                    ui.label(&prop.file_name);
                    ui.label(format!("{}×{}", prop.width, prop.height));
                    ui.horizontal(|ui| {
                        let remove_bg = ui
                            .add_enabled(
                                !prop.background_removed,
                                egui::Button::new("Remove BG").small(),
                            )
                            .on_disabled_hover_text("Background already removed");
                        if remove_bg.clicked() {
                            action = Some(PropAction::RemoveBackground(prop.id));
                        }
                        if ui.small_button("🗑").on_hover_text("Delete").clicked() {
                            action = Some(PropAction::Delete(prop.id));
                        }
                    });
                });
            });
            ui.separator();
        }
    });

    let result = match action {
        Some(PropAction::Select(id)) => app.session.select_prop(id),
        Some(PropAction::RemoveBackground(id)) => {
            app.prop_thumbnails.remove(&id);
            app.match_preview = None;
            app.session.toggle_prop_background(id)
        }
        Some(PropAction::Delete(id)) => {
            app.prop_thumbnails.remove(&id);
            app.session.delete_prop(id)
        }
        None => Ok(()),
    };
    if let Err(err) = result {
        log::warn!("prop action failed: {err}");
        app.status.props = Some(err.to_string());
    }
}
