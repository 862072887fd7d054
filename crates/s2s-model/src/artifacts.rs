use std::path::{Path, PathBuf};

use crate::error::{ModelError, Result};

/// Filename convention for exported graph artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactNaming {
    /// Appended after the graph role, selects the quantized export.
    pub suffix: String,
    /// File extension, without the leading dot.
    pub extension: String,
}

impl Default for ArtifactNaming {
    fn default() -> Self {
        Self {
            suffix: "-quantized".to_string(),
            extension: "onnx".to_string(),
        }
    }
}

impl ArtifactNaming {
    fn file_name(&self, model_name: &str, role: &str) -> String {
        format!("{}-{}{}.{}", model_name, role, self.suffix, self.extension)
    }
}

/// Locations of the three graphs that make up an exported seq2seq model.
///
/// Paths are derived, not checked; nothing is read until a session is loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelArtifacts {
    pub encoder: PathBuf,
    pub init_decoder: PathBuf,
    pub decoder: PathBuf,
}

impl ModelArtifacts {
    /// Derive artifact paths from a model id such as `"t5-small"` or
    /// `"org/t5-small"`, using the default naming.
    pub fn from_model_id(model_id: &str, base_path: impl AsRef<Path>) -> Result<Self> {
        Self::with_naming(model_id, base_path, &ArtifactNaming::default())
    }

    /// Derive artifact paths using an explicit naming convention.
    ///
    /// The final `/`-separated segment of `model_id` is the file base name:
    /// `<base>/<name>-encoder<suffix>.<ext>`, `<name>-init-decoder...`,
    /// `<name>-decoder...`.
    pub fn with_naming(
        model_id: &str,
        base_path: impl AsRef<Path>,
        naming: &ArtifactNaming,
    ) -> Result<Self> {
        let name = model_name(model_id)?;
        let base = base_path.as_ref();
        Ok(ModelArtifacts {
            encoder: base.join(naming.file_name(name, "encoder")),
            init_decoder: base.join(naming.file_name(name, "init-decoder")),
            decoder: base.join(naming.file_name(name, "decoder")),
        })
    }
}

/// Returns the final path segment of a namespaced model id.
pub fn model_name(model_id: &str) -> Result<&str> {
    match model_id.rsplit('/').next() {
        Some(name) if !name.is_empty() => Ok(name),
        _ => Err(ModelError::InvalidModelId(model_id.to_string())),
    }
}
