use std::path::Path;

use s2s_tensor::TensorMap;

/// A loaded graph (encoder or decoder) that can be run with named inputs.
///
/// The graph engine is opaque: a session accepts a map from input name to
/// tensor and returns a map from output name to tensor.
pub trait GraphSession: Send + Sync {
    /// Run the graph once.
    fn run(&self, inputs: &TensorMap) -> crate::Result<TensorMap>;

    /// Output names in the order the graph declares them.
    ///
    /// Decoder graphs put `logits` first; every later output is a cached
    /// key/value tensor for the next step.
    fn output_names(&self) -> &[String];
}

/// Creates graph sessions from artifact files.
///
/// Locations are local file paths. `Seq2SeqModel` checks that each artifact
/// is an existing file before calling `load` and reports
/// `ModelError::ArtifactNotFound` otherwise, so loaders that resolve other
/// kinds of locations (URLs, in-memory registries) are not supported. The
/// file can still disappear between that check and `load`; the loader's own
/// error then propagates unchanged.
pub trait SessionLoader: Send + Sync {
    /// Returns the name of this loader (e.g., "onnxruntime").
    fn name(&self) -> &str;

    /// Instantiate a session from the artifact at `path`.
    fn load(&self, path: &Path) -> crate::Result<Box<dyn GraphSession>>;
}
