use super::layout::{self, ToolTab};
use super::state::{BackgroundTask, CanvasTextures, PreviewTexture, StatusMessages, Tasks};
use super::{input_handler, render_helper};
use crate::{
    canvas::{Size, ZoomDirection},
    config::EditorConfig,
    error::EditorError,
    generation::{CommandGenerator, GenerativeFill},
    props::{PropUpload, process_batch},
    session::EditingSession,
    ui,
};
use eframe::egui;
use egui_dock::DockState;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Main egui application: owns the editing session, textures and workers.
pub struct EditorApp {
    pub(crate) session: EditingSession,
    pub(crate) generator: Option<Arc<dyn GenerativeFill>>,
    pub(crate) textures: CanvasTextures,
    pub(crate) prop_thumbnails: HashMap<Uuid, egui::TextureHandle>,
    pub(crate) match_preview: Option<PreviewTexture>,
    pub(crate) tasks: Tasks,
    pub(crate) status: StatusMessages,
    pub(crate) dock_left: DockState<ToolTab>,
    pub(crate) dock_right: DockState<ToolTab>,
}

impl EditorApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: EditorConfig) -> Self {
        let generator = config.generator.as_deref().and_then(|cmd| {
            match CommandGenerator::new(cmd) {
                Ok(g) => {
                    log::info!("generative fill backend: {}", g.program());
                    Some(Arc::new(g) as Arc<dyn GenerativeFill>)
                }
                Err(err) => {
                    log::error!("{err}");
                    None
                }
            }
        });
        if generator.is_none() {
            log::warn!("no --generator configured, generation is disabled");
        }

        Self {
            session: EditingSession::new(config),
            generator,
            textures: CanvasTextures::default(),
            prop_thumbnails: HashMap::new(),
            match_preview: None,
            tasks: Tasks::default(),
            status: StatusMessages::default(),
            dock_left: layout::default_left_dock(),
            dock_right: layout::default_right_dock(),
        }
    }

    pub(crate) fn open_image(&mut self, path: PathBuf) {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let result = std::fs::read(&path)
            .map_err(EditorError::from)
            .and_then(|bytes| self.session.load_image(&name, &bytes));
        match result {
            Ok(()) => {
                self.tasks.discard_generation();
                self.status.upload = None;
                self.status.generation = None;
                self.textures.mark_all_dirty();
            }
            Err(err) => {
                log::warn!("upload of {} rejected: {err}", path.display());
                self.status.upload = Some(err.to_string());
            }
        }
    }

    pub(crate) fn save_image(&mut self, path: PathBuf) {
        match self.session.save_png(&path) {
            Ok(()) => self.status.info = Some(format!("Saved to {}", path.display())),
            Err(err) => {
                log::error!("export failed: {err}");
                self.status.info = Some(format!("Export failed: {err}"));
            }
        }
    }

    pub(crate) fn clear_all(&mut self) {
        self.tasks.discard_generation();
        self.session.clear_all();
        self.prop_thumbnails.clear();
        self.match_preview = None;
        self.status = StatusMessages::default();
        self.textures.mark_all_dirty();
    }

    pub(crate) fn zoom(&mut self, direction: ZoomDirection) {
        self.textures.mask_dirty |= self.session.zoom(direction);
    }

    pub(crate) fn fit_to_screen(&mut self) {
        self.textures.mask_dirty |= self.session.fit_to_screen();
    }

    pub(crate) fn restore_all(&mut self) {
        if self.session.restore_all() {
            self.textures.mark_all_dirty();
        }
    }

    pub(crate) fn clear_mask(&mut self) {
        self.session.clear_mask();
        self.textures.mask_dirty = true;
    }

    /// Read and segment prop files on a worker thread.
    pub(crate) fn start_prop_upload(&mut self, paths: Vec<PathBuf>) {
        if paths.is_empty() || self.tasks.props.is_some() {
            return;
        }
        self.status.props = None;
        let segmenter = *self.session.segmenter();
        let max_bytes = self.session.config().max_upload_bytes();
        self.tasks.props = Some(BackgroundTask::spawn("prop upload", move || {
            let files = paths
                .iter()
                .map(|p| PropUpload::from_path(p))
                .collect::<crate::error::Result<Vec<_>>>()?;
            process_batch(files, &segmenter, max_bytes)
        }));
    }

    /// Snapshot the request on the UI thread and run the backend on a worker.
    pub(crate) fn start_generation(&mut self) {
        if self.tasks.generation.is_some() {
            return;
        }
        let Some(backend) = self.generator.clone() else {
            self.status.generation = Some("No generator configured".to_string());
            return;
        };
        let request = match self.session.generation_request() {
            Ok(request) => request,
            Err(err) => {
                self.status.generation = Some(err.to_string());
                return;
            }
        };
        self.status.generation = None;
        self.tasks.generation = Some(BackgroundTask::spawn("generation", move || {
            backend.generate(&request)
        }));
    }

    fn poll_tasks(&mut self) {
        if let Some(result) = BackgroundTask::poll(&mut self.tasks.props) {
            match result {
                Ok(Ok(props)) => {
                    self.session.commit_props(props);
                }
                Ok(Err(err)) => {
                    log::warn!("prop upload failed: {err}");
                    self.status.props = Some(match err {
                        EditorError::BatchFailed { .. } => {
                            "Failed to process one or more props.".to_string()
                        }
                        other => other.to_string(),
                    });
                }
                Err(panic) => self.status.props = Some(panic),
            }
        }

        if let Some(result) = BackgroundTask::poll(&mut self.tasks.generation) {
            let applied = result.and_then(|r| {
                r.and_then(|response| self.session.apply_generation(response))
                    .map_err(|e| e.to_string())
            });
            match applied {
                Ok(()) => self.textures.mark_all_dirty(),
                Err(msg) => {
                    log::warn!("generation failed: {msg}");
                    self.status.generation = Some(msg);
                }
            }
        }
    }

    /// Keep the mask sized to the canvas area and feed it pointer input.
    fn canvas_ui(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        let available = ui.available_size();
        let size = Size::new(available.x.max(0.0) as u32, available.y.max(0.0) as u32);
        if self.session.container() != size {
            self.session.resize_viewport(size);
            self.textures.mask_dirty = true;
        }

        render_helper::update_dirty_textures(ctx, &self.session, &mut self.textures);
        let view = render_helper::draw_canvas(ui, &self.session, &self.textures);

        for event in input_handler::pointer_events(ctx, &view.response) {
            let outcome = self.session.handle_pointer(event);
            self.textures.mask_dirty |= outcome.mask_changed;
            self.textures.image_dirty |= outcome.image_changed;
            if outcome.any() {
                ctx.request_repaint();
            }
        }
    }
}

impl eframe::App for EditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_tasks();

        ui::top_bar::top_bar(self, ctx);
        layout::show_tool_docks(self, ctx);

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| self.canvas_ui(ctx, ui));

        if self.tasks.busy() {
            // Keep polling workers while they run.
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
