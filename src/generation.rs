//! Boundary to the generative-fill backend.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use uuid::Uuid;

use crate::error::{EditorError, Result};

pub const DEFAULT_PROMPT: &str = "Fill in the masked area plausibly.";

/// Everything the backend needs for one fill.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationRequest {
    /// Working raster, PNG encoded.
    pub image_png: Vec<u8>,
    /// Image-aligned mask (255 = fill, 0 = keep), only when something is masked.
    pub mask_png: Option<Vec<u8>>,
    pub prompt: String,
}

impl GenerationRequest {
    pub fn new(image_png: Vec<u8>, mask_png: Option<Vec<u8>>, prompt: &str) -> Self {
        let prompt = if prompt.trim().is_empty() {
            DEFAULT_PROMPT.to_string()
        } else {
            prompt.to_string()
        };
        Self {
            image_png,
            mask_png,
            prompt,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GenerationResponse {
    /// Encoded image bytes, `None` when the backend produced nothing.
    pub image: Option<Vec<u8>>,
}

pub trait GenerativeFill: Send + Sync {
    fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse>;
}

impl<F> GenerativeFill for F
where
    F: Fn(&GenerationRequest) -> Result<GenerationResponse> + Send + Sync,
{
    fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse> {
        self(request)
    }
}

/// Runs `program [args..] <image.png> <mask.png | -> <prompt>` and reads the
/// resulting image from stdout.
#[derive(Clone, Debug)]
pub struct CommandGenerator {
    program: String,
    args: Vec<String>,
    work_dir: PathBuf,
}

impl CommandGenerator {
    /// `command` is split on whitespace; the first word is the program.
    pub fn new(command: &str) -> Result<Self> {
        let mut words = command.split_whitespace().map(str::to_string);
        let program = words
            .next()
            .ok_or_else(|| EditorError::Generator("empty generator command".to_string()))?;
        Ok(Self {
            program,
            args: words.collect(),
            work_dir: std::env::temp_dir(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn run(&self, image: &Path, mask: Option<&Path>, prompt: &str) -> Result<Vec<u8>> {
        let mask_arg = mask.map_or_else(|| OsString::from("-"), |m| m.as_os_str().to_owned());
        log::info!("running generator {} {:?}", self.program, self.args);
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(image)
            .arg(mask_arg)
            .arg(prompt)
            .output()
            .map_err(|e| EditorError::Generator(format!("{}: {e}", self.program)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(EditorError::Generator(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }
        Ok(output.stdout)
    }
}

impl GenerativeFill for CommandGenerator {
    fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse> {
        let tag = Uuid::new_v4();
        let image_path = self.work_dir.join(format!("fill-{tag}-image.png"));
        let mask_path = self.work_dir.join(format!("fill-{tag}-mask.png"));

        std::fs::write(&image_path, &request.image_png)?;
        let mask = match &request.mask_png {
            Some(bytes) => {
                std::fs::write(&mask_path, bytes)?;
                Some(mask_path.as_path())
            }
            None => None,
        };

        let result = self.run(&image_path, mask, &request.prompt);

        for path in [&image_path, &mask_path] {
            if path.exists() {
                if let Err(e) = std::fs::remove_file(path) {
                    log::warn!("could not remove {}: {e}", path.display());
                }
            }
        }

        let stdout = result?;
        Ok(GenerationResponse {
            image: (!stdout.is_empty()).then_some(stdout),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_prompt_gets_the_default() {
        let req = GenerationRequest::new(vec![1], None, "   ");
        assert_eq!(req.prompt, DEFAULT_PROMPT);
        let req = GenerationRequest::new(vec![1], None, "add a cat");
        assert_eq!(req.prompt, "add a cat");
    }

    #[test]
    fn closures_are_backends() {
        let backend = |req: &GenerationRequest| -> Result<GenerationResponse> {
            Ok(GenerationResponse {
                image: Some(req.image_png.clone()),
            })
        };
        let req = GenerationRequest::new(vec![7, 8], None, "");
        assert_eq!(backend.generate(&req).unwrap().image, Some(vec![7, 8]));
    }

    #[test]
    fn empty_command_is_rejected() {
        assert!(matches!(CommandGenerator::new("  "), Err(EditorError::Generator(_))));
    }

    #[cfg(unix)]
    #[test]
    fn silent_command_returns_no_image() {
        let generator = CommandGenerator::new("true").unwrap();
        let req = GenerationRequest::new(vec![1, 2, 3], Some(vec![4]), "");
        assert_eq!(generator.generate(&req).unwrap().image, None);
    }

    #[cfg(unix)]
    #[test]
    fn failing_command_is_a_generator_error() {
        let generator = CommandGenerator::new("false").unwrap();
        let req = GenerationRequest::new(vec![1], None, "");
        assert!(matches!(generator.generate(&req), Err(EditorError::Generator(_))));
    }

    #[cfg(unix)]
    #[test]
    fn stdout_is_the_image() {
        // The script sees the image path as $0.
        let generator = CommandGenerator::new(r#"sh -c cat<"$0""#).unwrap();
        let req = GenerationRequest::new(vec![1, 2, 3], None, "prompt");
        assert_eq!(generator.generate(&req).unwrap().image, Some(vec![1, 2, 3]));
    }
}
