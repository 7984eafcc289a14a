use crate::EditorApp;
use eframe::egui;

pub fn generate_panel(ui: &mut egui::Ui, app: &mut EditorApp) {
    ui.heading("Generate");
    ui.separator();

    ui.label("Prompt:");
    ui.add(
        egui::TextEdit::multiline(&mut app.session.prompt)
            .hint_text(crate::generation::DEFAULT_PROMPT)
            .desired_rows(3)
            .desired_width(f32::INFINITY),
    );

    ui.add_space(5.0);

    let running = app.tasks.generation.is_some();
    let ready = app.generator.is_some() && app.session.has_image() && !app.tasks.busy();
    ui.horizontal(|ui| {
        let button = ui.add_enabled(ready, egui::Button::new("Generate"));
        let button = if app.generator.is_none() {
            button.on_disabled_hover_text("Start with --generator <command> to enable")
        } else {
            button
        };
        if button.clicked() {
            app.start_generation();
        }
        if running {
            ui.spinner();
            ui.label("Generating...");
        }
    });

    if let Some(err) = &app.status.generation {
        ui.colored_label(ui.visuals().error_fg_color, err);
    }
}
