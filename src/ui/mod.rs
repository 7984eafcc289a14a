//! egui panels for brushes, props, matching and generation.
pub mod brush_settings;
pub mod generate_panel;
pub mod match_panel;
pub mod props_list;
pub mod top_bar;
