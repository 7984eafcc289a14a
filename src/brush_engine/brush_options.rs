use crate::config::EditorConfig;

/// How a mask dab affects the coverage underneath it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MaskMode {
    Draw,
    Erase,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BrushOptions {
    /// Diameter in screen pixels.
    pub diameter: f32,
    pub spacing: f32, // Percentage of diameter (0..100+)
}

impl BrushOptions {
    pub fn new(diameter: f32, spacing: f32) -> Self {
        Self { diameter, spacing }
    }

    pub fn from_config(config: &EditorConfig) -> Self {
        Self::new(config.default_brush, config.stroke_spacing)
    }

    /// Screen-space distance between two consecutive dabs.
    pub fn spacing_distance(&self) -> f32 {
        // Avoid infinite loops
        ((self.spacing / 100.0) * self.diameter).max(0.5)
    }
}
