//! Circular brush footprints and spacing of dabs along a pointer stroke.
pub mod brush;
pub mod brush_options;
pub mod stroke;

pub use brush::Dab;
pub use brush_options::{BrushOptions, MaskMode};
pub use stroke::StrokeState;
