use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("invalid file format: {name}. Accepted formats: {accepted}")]
    UnsupportedFormat { name: String, accepted: &'static str },

    #[error("{name} is too large. Maximum size is {max_mb}MB")]
    FileTooLarge { name: String, max_mb: u64 },

    #[error("image decode error: {0}")]
    Decode(String),

    #[error("image encode error: {0}")]
    Encode(String),

    #[error("failed to process {failed} of {total} props")]
    BatchFailed { failed: usize, total: usize },

    #[error("please upload a base image first")]
    NoImage,

    #[error("the model did not return an image, try a different prompt")]
    NoImageReturned,

    #[error("generation failed: {0}")]
    Generator(String),

    #[error("no prop with id {0}")]
    PropNotFound(Uuid),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<image::ImageError> for EditorError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::Encoding(e) => EditorError::Encode(e.to_string()),
            image::ImageError::IoError(e) => EditorError::Io(e),
            other => EditorError::Decode(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, EditorError>;
