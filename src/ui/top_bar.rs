use crate::EditorApp;
use crate::canvas::ZoomDirection;
use crate::utils::exporter::DEFAULT_EXPORT_NAME;
use crate::validation::UploadKind;
use eframe::egui;

pub fn top_bar(app: &mut EditorApp, ctx: &egui::Context) {
    egui::TopBottomPanel::top("quick_settings").show(ctx, |ui| {
        ui.horizontal(|ui| {
            if ui
                .button("Upload Image")
                .on_hover_text(UploadKind::BaseImage.accepted_label())
                .clicked()
            {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("Images", UploadKind::BaseImage.extensions())
                    .pick_file()
                {
                    app.open_image(path);
                }
            }

            let has_image = app.session.has_image();
            if ui.add_enabled(has_image, egui::Button::new("Download")).clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .set_file_name(DEFAULT_EXPORT_NAME)
                    .add_filter("PNG", &["png"])
                    .save_file()
                {
                    app.save_image(path);
                }
            }

            if ui.button("Clear All").clicked() {
                app.clear_all();
            }

            ui.separator();

            ui.add_enabled_ui(has_image, |ui| {
                if ui.button("➖").on_hover_text("Zoom out").clicked() {
                    app.zoom(ZoomDirection::Out);
                }
                ui.label(format!("{:.0}%", app.session.viewport().scale() * 100.0));
                if ui.button("➕").on_hover_text("Zoom in").clicked() {
                    app.zoom(ZoomDirection::In);
                }
                if ui.button("Fit").clicked() {
                    app.fit_to_screen();
                }
            });

            ui.separator();
            ui.label(app.session.paint_mode.label());

            if let Some(msg) = app.status.upload.as_ref().or(app.status.info.as_ref()) {
                ui.separator();
                ui.label(msg);
            }
        });
    });
}
