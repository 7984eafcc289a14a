use env_logger::Env;
use prop_inpainter::{EditorApp, EditorConfig};

/// Launch the native egui application.
fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = EditorConfig::from_env_args();
    log::info!(
        "max upload {}MB, brush {}..{}",
        config.max_upload_mb,
        config.min_brush,
        config.max_brush
    );

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1280.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Prop Inpainter",
        options,
        Box::new(|cc| Ok(Box::new(EditorApp::new(cc, config)))),
    )
}
