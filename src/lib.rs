pub mod app;
pub mod brush_engine;
pub mod canvas;
pub mod config;
pub mod error;
pub mod generation;
pub mod props;
pub mod session;
pub mod ui;
pub mod utils;
pub mod validation;

pub use app::EditorApp;
pub use config::EditorConfig;
pub use error::{EditorError, Result};
pub use session::EditingSession;
