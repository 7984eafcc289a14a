use crate::EditorApp;
use crate::canvas::PaintMode;
use eframe::egui;

/// Mask brush: draw/erase mode, size and clearing.
pub fn mask_brush_panel(ui: &mut egui::Ui, app: &mut EditorApp) {
    ui.heading("Mask Brush");
    ui.separator();

    ui.horizontal(|ui| {
        ui.label("Mode:");
        ui.selectable_value(&mut app.session.paint_mode, PaintMode::MaskDraw, "Draw");
        ui.selectable_value(&mut app.session.paint_mode, PaintMode::MaskErase, "Erase");
    });

    ui.add_space(5.0);

    let (min, max) = brush_range(app);
    let mut diameter = app.session.mask_brush.diameter;
    ui.label("Size:");
    if ui.add(egui::Slider::new(&mut diameter, min..=max)).changed() {
        app.session.set_mask_brush_size(diameter);
    }

    ui.separator();
    let has_mask = !app.session.mask().is_empty();
    if ui.add_enabled(has_mask, egui::Button::new("Clear Mask")).clicked() {
        app.clear_mask();
    }
}

/// Restore brush: paints the original image back over edits.
pub fn restore_brush_panel(ui: &mut egui::Ui, app: &mut EditorApp) {
    ui.heading("Restore Brush");
    ui.separator();

    let active = app.session.paint_mode == PaintMode::Restore;
    if ui.selectable_label(active, "Restore from original").clicked() {
        app.session.paint_mode = PaintMode::Restore;
    }

    let (min, max) = brush_range(app);
    let mut diameter = app.session.restore_brush.diameter;
    ui.label("Size:");
    if ui.add(egui::Slider::new(&mut diameter, min..=max)).changed() {
        app.session.set_restore_brush_size(diameter);
    }

    ui.separator();
    let can_restore = app.session.original().is_some();
    if ui
        .add_enabled(can_restore, egui::Button::new("Restore All"))
        .on_hover_text("Revert every edit and clear the mask")
        .clicked()
    {
        app.restore_all();
    }
}

fn brush_range(app: &EditorApp) -> (f32, f32) {
    let config = app.session.config();
    (config.min_brush, config.max_brush)
}
