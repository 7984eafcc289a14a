//! Raster primitives and the two editable layers shown in the viewport.
pub mod mask;
pub mod pointer;
pub mod raster;
pub mod restore;
pub mod viewport;

pub use mask::MaskLayer;
pub use pointer::{PaintMode, PointerAction, PointerButton, PointerEvent, PointerState};
pub use raster::{AlphaBuffer, BBox, Raster, Size};
pub use restore::RestoreLayer;
pub use viewport::{ViewportTransform, ZoomDirection};
