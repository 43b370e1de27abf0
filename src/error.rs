use crate::object_detection::tensor_decoder::DecodeError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced while scanning an image end to end.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("inference failed")]
    Inference(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("failed to read image {path}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to write image {path}")]
    ImageWrite {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
