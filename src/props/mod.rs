//! Prop images: cut-outs the user can reference in the generation prompt.
pub mod adjust;
pub mod segmenter;

use std::path::Path;

use rayon::prelude::*;
use uuid::Uuid;

use crate::canvas::raster::{BBox, Raster};
use crate::error::{EditorError, Result};
use crate::utils::profiler::ScopeTimer;
use crate::validation::{UploadKind, validate_upload};

pub use adjust::{MatchSettings, apply_match};
pub use segmenter::{PropSegmenter, Segmentation};

/// One file handed to a prop upload.
#[derive(Clone, Debug)]
pub struct PropUpload {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl PropUpload {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(name, std::fs::read(path)?))
    }
}

#[derive(Clone, Debug)]
pub struct Prop {
    /// Stable across re-processing.
    pub id: Uuid,
    pub file_name: String,
    pub cropped: Raster,
    /// Decoded upload, kept so the prop can be segmented again.
    pub original: Raster,
    pub width: u32,
    pub height: u32,
    pub bbox: BBox,
    pub padded_bbox: BBox,
    pub background_removed: bool,
}

impl Prop {
    fn new(file_name: String, original: Raster, seg: Segmentation) -> Self {
        Self {
            id: Uuid::new_v4(),
            file_name,
            width: seg.cropped.width(),
            height: seg.cropped.height(),
            cropped: seg.cropped,
            original,
            bbox: seg.bbox,
            padded_bbox: seg.padded_bbox,
            background_removed: seg.background_removed,
        }
    }

    fn apply(&mut self, segmentation: Segmentation) {
        self.width = segmentation.cropped.width();
        self.height = segmentation.cropped.height();
        self.cropped = segmentation.cropped;
        self.bbox = segmentation.bbox;
        self.padded_bbox = segmentation.padded_bbox;
        self.background_removed = segmentation.background_removed;
    }

    /// Human name used in prompts: text before the first dot, with `-` and
    /// `_` turned into spaces.
    pub fn display_name(&self) -> String {
        let stem = self.file_name.split('.').next().unwrap_or_default();
        stem.replace(['-', '_'], " ")
    }
}

/// Validate and segment a batch of uploads. All or nothing: the first file
/// with a bad format aborts before any decoding, and any segmentation
/// failure fails the whole batch.
pub fn process_batch(
    files: Vec<PropUpload>,
    segmenter: &PropSegmenter,
    max_bytes: u64,
) -> Result<Vec<Prop>> {
    for file in &files {
        validate_upload(&file.name, &file.bytes, UploadKind::Prop, max_bytes)?;
    }

    let _timer = ScopeTimer::new("process_prop_batch");
    let total = files.len();
    let results: Vec<Result<Prop>> = files
        .into_par_iter()
        .map(|file| {
            let (original, segmentation) = segmenter.segment_bytes(&file.bytes, false)?;
            Ok(Prop::new(file.name, original, segmentation))
        })
        .collect();

    let failed = results.iter().filter(|r| r.is_err()).count();
    if failed > 0 {
        for err in results.iter().filter_map(|r| r.as_ref().err()) {
            log::warn!("prop processing failed: {err}");
        }
        return Err(EditorError::BatchFailed { failed, total });
    }
    results.into_iter().collect()
}

#[derive(Clone, Debug, Default)]
pub struct PropCollection {
    props: Vec<Prop>,
    active: Option<Uuid>,
}

impl PropCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.props.len()
    }

    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Prop> {
        self.props.iter()
    }

    pub fn get(&self, id: Uuid) -> Option<&Prop> {
        self.props.iter().find(|p| p.id == id)
    }

    pub fn active_id(&self) -> Option<Uuid> {
        self.active
    }

    pub fn active(&self) -> Option<&Prop> {
        self.active.and_then(|id| self.get(id))
    }

    /// Process and append a batch; see [`process_batch`].
    pub fn upload_batch(
        &mut self,
        files: Vec<PropUpload>,
        segmenter: &PropSegmenter,
        max_bytes: u64,
    ) -> Result<Vec<Uuid>> {
        let props = process_batch(files, segmenter, max_bytes)?;
        Ok(self.commit(props))
    }

    /// Append already processed props, returning their ids.
    pub fn commit(&mut self, props: Vec<Prop>) -> Vec<Uuid> {
        let ids = props.iter().map(|p| p.id).collect();
        log::info!("added {} props", props.len());
        self.props.extend(props);
        ids
    }

    pub fn delete(&mut self, id: Uuid) -> Result<Prop> {
        let idx = self
            .props
            .iter()
            .position(|p| p.id == id)
            .ok_or(EditorError::PropNotFound(id))?;
        if self.active == Some(id) {
            self.active = None;
        }
        Ok(self.props.remove(idx))
    }

    /// Make `id` active and prepend it to `prompt`.
    pub fn select(&mut self, id: Uuid, prompt: &mut String) -> Result<()> {
        let name = self
            .get(id)
            .ok_or(EditorError::PropNotFound(id))?
            .display_name();
        self.active = Some(id);
        *prompt = if prompt.is_empty() {
            format!("Add a {name} to the masked area")
        } else {
            format!("Add a {name} to the masked area, and also {prompt}")
        };
        Ok(())
    }

    /// Segment the stored original again with keying forced on.
    pub fn toggle_background(&mut self, id: Uuid, segmenter: &PropSegmenter) -> Result<()> {
        let prop = self
            .props
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(EditorError::PropNotFound(id))?;
        let segmentation = segmenter.segment(&prop.original, true);
        prop.apply(segmentation);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.props.clear();
        self.active = None;
    }
}
