//! One editing session: the working image, its original, the mask and the
//! viewport they are shown through.

use std::path::Path;

use uuid::Uuid;

use crate::brush_engine::BrushOptions;
use crate::canvas::{
    MaskLayer, PaintMode, PointerAction, PointerEvent, PointerState, Raster, RestoreLayer, Size,
    ViewportTransform, ZoomDirection, raster,
};
use crate::config::EditorConfig;
use crate::error::{EditorError, Result};
use crate::generation::{GenerationRequest, GenerationResponse, GenerativeFill};
use crate::props::{MatchSettings, Prop, PropCollection, PropSegmenter, PropUpload, apply_match};
use crate::utils::exporter;
use crate::validation::{UploadKind, validate_upload};

/// Which parts of the view need redrawing after an input event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputOutcome {
    pub view_changed: bool,
    pub mask_changed: bool,
    pub image_changed: bool,
}

impl InputOutcome {
    pub fn any(&self) -> bool {
        self.view_changed || self.mask_changed || self.image_changed
    }
}

pub struct EditingSession {
    config: EditorConfig,
    current: Option<Raster>,
    restore: RestoreLayer,
    mask: MaskLayer,
    viewport: ViewportTransform,
    container: Size,
    pointer: PointerState,
    props: PropCollection,
    segmenter: PropSegmenter,

    pub paint_mode: PaintMode,
    pub mask_brush: BrushOptions,
    pub restore_brush: BrushOptions,
    pub match_settings: MatchSettings,
    pub prompt: String,
}

impl Default for EditingSession {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl EditingSession {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            current: None,
            restore: RestoreLayer::new(),
            mask: MaskLayer::new(Size::default()),
            viewport: ViewportTransform::from_config(&config),
            container: Size::default(),
            pointer: PointerState::Idle,
            props: PropCollection::new(),
            segmenter: PropSegmenter::from_config(&config),
            paint_mode: PaintMode::default(),
            mask_brush: BrushOptions::from_config(&config),
            restore_brush: BrushOptions::from_config(&config),
            match_settings: MatchSettings::default(),
            prompt: String::new(),
            config,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn current(&self) -> Option<&Raster> {
        self.current.as_ref()
    }

    pub fn original(&self) -> Option<&Raster> {
        self.restore.original()
    }

    pub fn has_image(&self) -> bool {
        self.current.is_some()
    }

    pub fn image_size(&self) -> Option<Size> {
        self.current.as_ref().map(Size::of)
    }

    pub fn mask(&self) -> &MaskLayer {
        &self.mask
    }

    pub fn viewport(&self) -> ViewportTransform {
        self.viewport
    }

    pub fn container(&self) -> Size {
        self.container
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    pub fn props(&self) -> &PropCollection {
        &self.props
    }

    pub fn segmenter(&self) -> &PropSegmenter {
        &self.segmenter
    }

    pub fn set_mask_brush_size(&mut self, diameter: f32) {
        self.mask_brush.diameter = self.config.clamp_brush(diameter);
    }

    pub fn set_restore_brush_size(&mut self, diameter: f32) {
        self.restore_brush.diameter = self.config.clamp_brush(diameter);
    }

    /// Fresh upload: replaces both the working image and the original.
    pub fn load_image(&mut self, name: &str, bytes: &[u8]) -> Result<()> {
        validate_upload(name, bytes, UploadKind::BaseImage, self.config.max_upload_bytes())?;
        let decoded = raster::decode(bytes)?;
        log::info!(
            "loaded {name}: {}x{}",
            decoded.width(),
            decoded.height()
        );
        self.restore.set_original(decoded.clone());
        self.current = Some(decoded);
        self.mask.clear();
        self.pointer = PointerState::Idle;
        self.fit_to_screen();
        Ok(())
    }

    /// Track the visible surface size. The mask loses its content when the
    /// size changes or the refit moves the image; returns whether it did.
    pub fn resize_viewport(&mut self, size: Size) -> bool {
        self.container = size;
        let resized = self.mask.resize(size);
        let moved = self.fit_to_screen();
        resized || moved
    }

    /// Refit the image. Like every view change this drops the mask.
    pub fn fit_to_screen(&mut self) -> bool {
        let before = self.viewport;
        if let Some(size) = self.image_size() {
            self.viewport.fit_to_screen(size, self.container);
        }
        self.view_moved(before)
    }

    pub fn zoom(&mut self, direction: ZoomDirection) -> bool {
        let before = self.viewport;
        self.viewport.zoom(direction);
        self.view_moved(before)
    }

    pub fn pan(&mut self, dx: f32, dy: f32) -> bool {
        let before = self.viewport;
        self.viewport.pan(dx, dy);
        self.view_moved(before)
    }

    /// The mask lives in screen space, so it no longer lines up with the
    /// image once the transform changes. Clear it when that happens.
    fn view_moved(&mut self, before: ViewportTransform) -> bool {
        if self.viewport == before {
            return false;
        }
        if !self.mask.is_empty() {
            log::debug!("view changed, mask cleared");
            self.mask.clear();
        }
        true
    }

    /// Feed one pointer event through the state machine and apply whatever
    /// it asks for. All dabs of the event use the same transform.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> InputOutcome {
        let transform = self.viewport;
        let mask_spacing = self.mask_brush.spacing_distance();
        let restore_spacing = self.restore_brush.spacing_distance();
        let actions = self.pointer.handle(event, self.paint_mode, |mode| match mode {
            PaintMode::Restore => restore_spacing,
            PaintMode::MaskDraw | PaintMode::MaskErase => mask_spacing,
        });

        let mut outcome = InputOutcome::default();
        for action in actions {
            match action {
                PointerAction::Pan { dx, dy } => {
                    let moved = self.pan(dx, dy);
                    outcome.view_changed |= moved;
                    outcome.mask_changed |= moved;
                }
                PointerAction::Zoom(direction) => {
                    let moved = self.zoom(direction);
                    outcome.view_changed |= moved;
                    outcome.mask_changed |= moved;
                }
                PointerAction::Dab { mode, screen } => {
                    let Some(current) = self.current.as_mut() else {
                        continue;
                    };
                    let image_point = transform.screen_to_image(screen);
                    match mode.mask_mode() {
                        Some(mask_mode) => {
                            self.mask.paint(
                                image_point,
                                self.mask_brush.diameter,
                                mask_mode,
                                &transform,
                            );
                            outcome.mask_changed = true;
                        }
                        None => {
                            outcome.image_changed |= self.restore.restore_stroke(
                                current,
                                image_point,
                                self.restore_brush.diameter,
                                &transform,
                            );
                        }
                    }
                }
            }
        }
        outcome
    }

    /// Put the whole original back. No-op without an upload.
    pub fn restore_all(&mut self) -> bool {
        let Some(current) = self.current.as_mut() else {
            return false;
        };
        if !self.restore.restore_all(current) {
            return false;
        }
        self.mask.clear();
        self.fit_to_screen();
        log::info!("restored original image");
        true
    }

    pub fn clear_mask(&mut self) {
        self.mask.clear();
    }

    /// Package the working image, the image-space mask and the prompt.
    pub fn generation_request(&self) -> Result<GenerationRequest> {
        let current = self.current.as_ref().ok_or(EditorError::NoImage)?;
        let image_png = exporter::encode_png(current)?;
        let image_mask = self.mask.to_image_mask(&self.viewport, Size::of(current));
        // Strokes that only touched the area around the image select nothing.
        let mask_png = if image_mask.iter().any(|&v| v > 0) {
            Some(exporter::encode_mask_png(&image_mask)?)
        } else {
            None
        };
        Ok(GenerationRequest::new(image_png, mask_png, &self.prompt))
    }

    /// Install a backend result as the working image. The original is kept
    /// so later restores still reach the upload.
    pub fn apply_generation(&mut self, response: GenerationResponse) -> Result<()> {
        let Some(bytes) = response.image else {
            log::warn!("generator returned no image");
            return Err(EditorError::NoImageReturned);
        };
        let generated = raster::decode(&bytes)?;
        log::info!(
            "generated image {}x{}",
            generated.width(),
            generated.height()
        );
        self.current = Some(generated);
        self.mask.clear();
        self.fit_to_screen();
        Ok(())
    }

    pub fn generate(&mut self, backend: &dyn GenerativeFill) -> Result<()> {
        let request = self.generation_request()?;
        let response = backend.generate(&request)?;
        self.apply_generation(response)
    }

    pub fn export_png(&self) -> Result<Vec<u8>> {
        let current = self.current.as_ref().ok_or(EditorError::NoImage)?;
        exporter::encode_png(current)
    }

    pub fn save_png(&self, path: &Path) -> Result<()> {
        let current = self.current.as_ref().ok_or(EditorError::NoImage)?;
        exporter::save_png(current, path)
    }

    pub fn upload_props(&mut self, files: Vec<PropUpload>) -> Result<Vec<Uuid>> {
        let max = self.config.max_upload_bytes();
        self.props.upload_batch(files, &self.segmenter, max)
    }

    /// Add props processed elsewhere, e.g. on a worker thread.
    pub fn commit_props(&mut self, props: Vec<Prop>) -> Vec<Uuid> {
        self.props.commit(props)
    }

    pub fn delete_prop(&mut self, id: Uuid) -> Result<()> {
        self.props.delete(id).map(|_| ())
    }

    pub fn select_prop(&mut self, id: Uuid) -> Result<()> {
        self.props.select(id, &mut self.prompt)
    }

    pub fn toggle_prop_background(&mut self, id: Uuid) -> Result<()> {
        self.props.toggle_background(id, &self.segmenter)
    }

    /// The active prop with the current match settings applied.
    pub fn active_prop_preview(&self) -> Option<Raster> {
        self.props
            .active()
            .map(|prop| apply_match(&prop.cropped, self.match_settings))
    }

    /// Back to an empty session, keeping configuration and brush sizes.
    pub fn clear_all(&mut self) {
        self.current = None;
        self.restore.clear();
        self.mask.clear();
        self.props.clear();
        self.prompt.clear();
        self.pointer = PointerState::Idle;
        self.viewport = ViewportTransform::from_config(&self.config);
        log::info!("session cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::PointerButton;
    use crate::utils::vector::Vec2;
    use image::Rgba;

    fn png(img: &Raster) -> Vec<u8> {
        exporter::encode_png(img).unwrap()
    }

    fn session_with(img: &Raster) -> EditingSession {
        let mut session = EditingSession::default();
        session.resize_viewport(Size::new(400, 300));
        session.load_image("base.png", &png(img)).unwrap();
        session
    }

    fn stroke(session: &mut EditingSession, at: Vec2) -> InputOutcome {
        let outcome = session.handle_pointer(PointerEvent::Press {
            pos: at,
            button: PointerButton::Primary,
            shift: false,
        });
        session.handle_pointer(PointerEvent::Release);
        outcome
    }

    #[test]
    fn load_fills_both_slots_and_fits() {
        let img = Raster::from_pixel(800, 600, Rgba([5, 6, 7, 255]));
        let session = session_with(&img);
        assert_eq!(session.current(), Some(&img));
        assert_eq!(session.original(), Some(&img));
        assert_eq!(session.viewport().scale(), 0.5);
        assert_eq!(session.viewport().offset, Vec2::ZERO);
    }

    #[test]
    fn rejected_upload_leaves_state_alone() {
        let img = Raster::from_pixel(10, 10, Rgba([5, 6, 7, 255]));
        let mut session = session_with(&img);
        assert!(session.load_image("bad.txt", b"nope").is_err());
        assert_eq!(session.current(), Some(&img));
    }

    #[test]
    fn mask_stroke_then_restore_all() {
        let img = Raster::from_pixel(100, 100, Rgba([5, 6, 7, 255]));
        let mut session = session_with(&img);
        let outcome = stroke(&mut session, Vec2::new(200.0, 150.0));
        assert!(outcome.mask_changed);
        assert!(!session.mask().is_empty());

        assert!(session.restore_all());
        assert!(session.mask().is_empty());
        assert_eq!(session.current().unwrap().as_raw(), img.as_raw());
    }

    #[test]
    fn restore_stroke_brings_back_original_pixels() {
        let original = Raster::from_pixel(100, 100, Rgba([5, 6, 7, 255]));
        let generated = Raster::from_pixel(100, 100, Rgba([200, 0, 0, 255]));
        let mut session = session_with(&original);
        session
            .apply_generation(GenerationResponse {
                image: Some(png(&generated)),
            })
            .unwrap();

        // 100x100 in 400x300 fits at scale 1 with offset (150, 100).
        session.paint_mode = PaintMode::Restore;
        let outcome = stroke(&mut session, Vec2::new(200.0, 150.0));
        assert!(outcome.image_changed);
        let current = session.current().unwrap();
        assert_eq!(*current.get_pixel(50, 50), Rgba([5, 6, 7, 255]));
        assert_eq!(*current.get_pixel(0, 0), Rgba([200, 0, 0, 255]));
        assert!(session.mask().is_empty());
    }

    #[test]
    fn generation_without_image_is_refused() {
        let mut session = EditingSession::default();
        let backend = |_: &GenerationRequest| -> Result<GenerationResponse> {
            panic!("backend must not be called")
        };
        assert!(matches!(session.generate(&backend), Err(EditorError::NoImage)));
        assert!(!session.has_image());
    }

    #[test]
    fn empty_response_keeps_everything() {
        let img = Raster::from_pixel(20, 20, Rgba([1, 1, 1, 255]));
        let mut session = session_with(&img);
        stroke(&mut session, Vec2::new(200.0, 150.0));
        let before = session.mask().clone();
        let backend = |_: &GenerationRequest| -> Result<GenerationResponse> {
            Ok(GenerationResponse::default())
        };
        assert!(matches!(
            session.generate(&backend),
            Err(EditorError::NoImageReturned)
        ));
        assert_eq!(session.current(), Some(&img));
        assert_eq!(session.mask(), &before);
    }

    #[test]
    fn request_carries_mask_only_when_painted() {
        let img = Raster::from_pixel(20, 20, Rgba([1, 1, 1, 255]));
        let mut session = session_with(&img);
        let request = session.generation_request().unwrap();
        assert!(request.mask_png.is_none());
        assert_eq!(request.prompt, crate::generation::DEFAULT_PROMPT);

        stroke(&mut session, Vec2::new(200.0, 150.0));
        session.prompt = "a boat".to_string();
        let request = session.generation_request().unwrap();
        let mask = raster::decode(&request.mask_png.unwrap()).unwrap();
        assert_eq!(mask.dimensions(), (20, 20));
        assert_eq!(mask.get_pixel(10, 10).0[3], 255);
        assert_eq!(request.prompt, "a boat");
    }

    #[test]
    fn resize_drops_mask_and_refits() {
        let img = Raster::from_pixel(100, 100, Rgba([1, 1, 1, 255]));
        let mut session = session_with(&img);
        stroke(&mut session, Vec2::new(200.0, 150.0));
        assert!(session.resize_viewport(Size::new(50, 50)));
        assert!(session.mask().is_empty());
        assert_eq!(session.viewport().scale(), 0.5);
    }

    #[test]
    fn restore_without_upload_is_a_no_op() {
        let mut session = EditingSession::default();
        assert!(!session.restore_all());
        session.paint_mode = PaintMode::Restore;
        assert!(!stroke(&mut session, Vec2::new(1.0, 1.0)).image_changed);
    }

    #[test]
    fn clear_all_empties_the_session() {
        let img = Raster::from_pixel(10, 10, Rgba([1, 1, 1, 255]));
        let mut session = session_with(&img);
        session.prompt = "x".into();
        session.clear_all();
        assert!(!session.has_image());
        assert!(session.original().is_none());
        assert!(session.prompt.is_empty());
        assert!(matches!(session.export_png(), Err(EditorError::NoImage)));
    }

    fn request_mask(session: &EditingSession) -> Option<Raster> {
        let request = session.generation_request().unwrap();
        request.mask_png.map(|bytes| raster::decode(&bytes).unwrap())
    }

    #[test]
    fn panning_drops_the_mask_instead_of_shifting_it() {
        // 200x100 in 400x300 fits at scale 1 with offset (100, 100).
        let img = Raster::from_pixel(200, 100, Rgba([1, 1, 1, 255]));
        let mut session = session_with(&img);
        stroke(&mut session, Vec2::new(200.0, 150.0));
        let mask = request_mask(&session).unwrap();
        assert_eq!(mask.get_pixel(100, 50).0[3], 255);

        assert!(session.pan(60.0, 0.0));
        assert!(session.mask().is_empty());
        assert!(request_mask(&session).is_none());

        // Image (100, 50) now sits at screen (260, 150).
        stroke(&mut session, Vec2::new(260.0, 150.0));
        let mask = request_mask(&session).unwrap();
        assert_eq!(mask.get_pixel(100, 50).0[3], 255);
        assert_eq!(mask.get_pixel(40, 50).0[3], 0);
    }

    #[test]
    fn pointer_pan_and_wheel_clear_the_mask() {
        let img = Raster::from_pixel(200, 100, Rgba([1, 1, 1, 255]));
        let mut session = session_with(&img);

        stroke(&mut session, Vec2::new(200.0, 150.0));
        session.handle_pointer(PointerEvent::Press {
            pos: Vec2::new(10.0, 10.0),
            button: PointerButton::Middle,
            shift: false,
        });
        let outcome = session.handle_pointer(PointerEvent::Move {
            pos: Vec2::new(30.0, 10.0),
        });
        session.handle_pointer(PointerEvent::Release);
        assert!(outcome.view_changed && outcome.mask_changed);
        assert!(session.mask().is_empty());

        stroke(&mut session, Vec2::new(220.0, 150.0));
        let outcome = session.handle_pointer(PointerEvent::Wheel { delta_y: -1.0 });
        assert!(outcome.mask_changed);
        assert!(session.mask().is_empty());
    }

    #[test]
    fn zoom_pinned_at_the_limit_keeps_the_mask() {
        let img = Raster::from_pixel(200, 100, Rgba([1, 1, 1, 255]));
        let mut session = session_with(&img);
        while session.zoom(ZoomDirection::In) {}
        assert_eq!(session.viewport().scale(), 10.0);

        stroke(&mut session, Vec2::new(200.0, 150.0));
        assert!(!session.zoom(ZoomDirection::In));
        assert!(!session.mask().is_empty());
    }

    #[test]
    fn smallest_brush_at_max_zoom_still_selects_pixels() {
        // 20x20 in 400x300 fits at scale 1 with offset (190, 140).
        let img = Raster::from_pixel(20, 20, Rgba([1, 1, 1, 255]));
        let mut session = session_with(&img);
        while session.zoom(ZoomDirection::In) {}
        assert_eq!(session.viewport().scale(), 10.0);
        session.set_mask_brush_size(5.0);

        // Image (5.02, 5.02), away from any pixel centre.
        stroke(&mut session, Vec2::new(240.2, 190.2));
        let mask = request_mask(&session).unwrap();
        assert_eq!(mask.get_pixel(5, 5).0[3], 255);
        assert!(mask.pixels().filter(|p| p.0[3] == 255).count() <= 4);
    }

    #[test]
    fn stroke_beside_the_image_sends_no_mask() {
        let img = Raster::from_pixel(20, 20, Rgba([1, 1, 1, 255]));
        let mut session = session_with(&img);
        stroke(&mut session, Vec2::new(20.0, 20.0));
        assert!(!session.mask().is_empty());
        assert!(request_mask(&session).is_none());
    }
}
