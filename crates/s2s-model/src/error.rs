use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("invalid model id: {0:?}")]
    InvalidModelId(String),
    #[error("model artifact not found: {}", .0.display())]
    ArtifactNotFound(PathBuf),
    #[error("failed to load session from {}: {message}", .path.display())]
    SessionLoad { path: PathBuf, message: String },
    #[error("session run failed: {0}")]
    Session(String),
    #[error("graph output not found: {0}")]
    MissingOutput(String),
    #[error("{0} session is not loaded")]
    NotLoaded(&'static str),
    #[error("decoder returned logits with an empty vocabulary")]
    EmptyLogits,
    #[error("tensor error: {0}")]
    TensorError(#[from] s2s_tensor::TensorError),
}

pub type Result<T> = std::result::Result<T, ModelError>;
