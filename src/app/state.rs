use crate::error::Result;
use crate::generation::GenerationResponse;
use crate::props::Prop;
use crate::props::adjust::MatchSettings;
use eframe::egui::TextureHandle;
use std::thread::JoinHandle;
use uuid::Uuid;

/// Worker thread producing a result the UI thread applies once finished.
pub struct BackgroundTask<T> {
    pub label: &'static str,
    pub handle: JoinHandle<Result<T>>,
}

impl<T> BackgroundTask<T> {
    pub fn spawn<F>(label: &'static str, work: F) -> Self
    where
        F: FnOnce() -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        log::debug!("starting {label}");
        Self {
            label,
            handle: std::thread::spawn(work),
        }
    }

    /// Take the result if the worker is done. A panicked worker reports as
    /// `Err` with the panic text.
    pub fn poll(slot: &mut Option<Self>) -> Option<std::result::Result<Result<T>, String>> {
        if !slot.as_ref().is_some_and(|t| t.handle.is_finished()) {
            return None;
        }
        let task = slot.take()?;
        let label = task.label;
        Some(task.handle.join().map_err(|_| format!("{label} thread panicked")))
    }
}

#[derive(Default)]
pub struct Tasks {
    pub generation: Option<BackgroundTask<GenerationResponse>>,
    pub props: Option<BackgroundTask<Vec<Prop>>>,
}

impl Tasks {
    pub fn busy(&self) -> bool {
        self.generation.is_some() || self.props.is_some()
    }

    /// Forget a running generation so its result is never applied. The
    /// worker finishes on its own and the result is dropped with the handle.
    pub fn discard_generation(&mut self) -> bool {
        match self.generation.take() {
            Some(task) => {
                log::info!("discarding in-flight {}", task.label);
                true
            }
            None => false,
        }
    }
}

/// Last message per area of the UI, shown next to the control that caused it.
#[derive(Default, Clone, Debug)]
pub struct StatusMessages {
    pub upload: Option<String>,
    pub props: Option<String>,
    pub generation: Option<String>,
    pub info: Option<String>,
}

/// GPU copies of the working image and the mask overlay.
#[derive(Default)]
pub struct CanvasTextures {
    pub image: Option<TextureHandle>,
    pub mask: Option<TextureHandle>,
    pub image_dirty: bool,
    pub mask_dirty: bool,
}

impl CanvasTextures {
    pub fn mark_all_dirty(&mut self) {
        self.image_dirty = true;
        self.mask_dirty = true;
    }
}

/// Match preview texture and the inputs it was rendered from.
pub struct PreviewTexture {
    pub prop: Uuid,
    pub settings: MatchSettings,
    pub texture: TextureHandle,
}

impl PreviewTexture {
    pub fn is_current(&self, prop: Uuid, settings: MatchSettings) -> bool {
        self.prop == prop && self.settings == settings
    }
}
