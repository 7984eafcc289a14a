//! Editor-wide tunables and their command line overrides.

/// Numeric limits and defaults shared by the session, the layers and the GUI.
#[derive(Clone, Debug, PartialEq)]
pub struct EditorConfig {
    /// Uploads above this size are rejected before decoding.
    pub max_upload_mb: u64,
    pub min_brush: f32,
    pub max_brush: f32,
    pub default_brush: f32,
    /// Multiplicative factor of one zoom step.
    pub zoom_step: f32,
    pub min_scale: f32,
    pub max_scale: f32,
    /// Euclidean RGB distance under which a pixel counts as background.
    pub bg_threshold: f32,
    /// Pixels added on each side of a prop's opaque bounding box.
    pub prop_padding: u32,
    /// Brush dab spacing as a percentage of the diameter.
    pub stroke_spacing: f32,
    /// External program used as the generative-fill backend.
    pub generator: Option<String>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_upload_mb: 20,
            min_brush: 5.0,
            max_brush: 100.0,
            default_brush: 30.0,
            zoom_step: 1.2,
            min_scale: 0.1,
            max_scale: 10.0,
            bg_threshold: 30.0,
            prop_padding: 20,
            stroke_spacing: 25.0,
            generator: None,
        }
    }
}

impl EditorConfig {
    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }

    /// Build a config from process arguments, ignoring anything unknown.
    pub fn from_env_args() -> Self {
        Self::from_args(std::env::args().skip(1))
    }

    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut config = Self::default();
        let mut args = args.into_iter().map(Into::<String>::into);
        while let Some(arg) = args.next() {
            let (flag, inline) = match arg.split_once('=') {
                Some((f, v)) => (f.to_string(), Some(v.to_string())),
                None => (arg.clone(), None),
            };
            let mut value = || inline.clone().or_else(|| args.next());
            match flag.as_str() {
                "--generator" => config.generator = value(),
                "--max-upload-mb" => {
                    if let Some(v) = value().and_then(|v| v.parse().ok()) {
                        config.max_upload_mb = v;
                    }
                }
                "--bg-threshold" => {
                    if let Some(v) = value().and_then(|v| v.parse().ok()) {
                        config.bg_threshold = v;
                    }
                }
                "--padding" => {
                    if let Some(v) = value().and_then(|v| v.parse().ok()) {
                        config.prop_padding = v;
                    }
                }
                "--zoom-step" => {
                    if let Some(v) = value().and_then(|v| v.parse::<f32>().ok()) {
                        if v > 1.0 {
                            config.zoom_step = v;
                        } else {
                            log::warn!("ignoring --zoom-step {v}: must be greater than 1");
                        }
                    }
                }
                other => log::debug!("ignoring unknown argument {other}"),
            }
        }
        config
    }

    pub fn clamp_brush(&self, diameter: f32) -> f32 {
        diameter.clamp(self.min_brush, self.max_brush)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_editor_constants() {
        let config = EditorConfig::default();
        assert_eq!(config.max_upload_bytes(), 20 * 1024 * 1024);
        assert_eq!(config.default_brush, 30.0);
        assert_eq!(config.bg_threshold, 30.0);
        assert_eq!(config.prop_padding, 20);
    }

    #[test]
    fn parses_separate_and_inline_values() {
        let config = EditorConfig::from_args([
            "--generator",
            "fill.sh",
            "--padding=8",
            "--bg-threshold",
            "12.5",
            "--bogus",
        ]);
        assert_eq!(config.generator.as_deref(), Some("fill.sh"));
        assert_eq!(config.prop_padding, 8);
        assert_eq!(config.bg_threshold, 12.5);
    }

    #[test]
    fn oversized_upload_limit_saturates() {
        let config = EditorConfig::from_args(["--max-upload-mb".to_string(), u64::MAX.to_string()]);
        assert_eq!(config.max_upload_mb, u64::MAX);
        assert_eq!(config.max_upload_bytes(), u64::MAX);
    }

    #[test]
    fn rejects_zoom_step_that_cannot_zoom() {
        let config = EditorConfig::from_args(["--zoom-step", "0.5"]);
        assert_eq!(config.zoom_step, 1.2);
    }
}
