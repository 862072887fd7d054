use s2s_tensor::{Result, Storage, Tensor, TensorError};

/// Trait for strategies that pick the next token from decoder logits.
pub trait Sampler: Send + Sync {
    /// Returns the name of this sampler.
    fn name(&self) -> &str;

    /// Select a token id from the scores of a single position.
    ///
    /// Returns `None` when `scores` is empty.
    fn select(&self, scores: &[f32]) -> Option<u32>;

    /// Select the next token from a `[batch=1, sequence, vocabulary]` logits
    /// tensor. Only the final position's vocabulary slice is scored.
    fn sample(&self, logits: &Tensor) -> Result<Option<u32>> {
        let scores = last_position(logits)?;
        Ok(self.select(&scores))
    }
}

/// Extract the vocabulary slice of the final sequence position from a flat
/// logits buffer, widened to f32.
///
/// The vocabulary size is the innermost dimension; the slice starts at
/// `numel - vocab`. A zero-sized vocabulary yields an empty vector.
pub fn last_position(logits: &Tensor) -> Result<Vec<f32>> {
    let vocab = logits.shape().last_dim().ok_or_else(|| {
        TensorError::Other("logits must have at least one dimension".to_string())
    })?;
    let n = logits.numel();
    if n < vocab {
        return Err(TensorError::Empty(logits.shape().dims().to_vec()));
    }
    let start = n - vocab;

    let scores = match logits.storage() {
        Storage::F32(v) => v[start..].to_vec(),
        Storage::F16(v) => v[start..].iter().map(|h| h.to_f32()).collect(),
        other => {
            return Err(TensorError::DTypeMismatch {
                expected: "f32 or f16".to_string(),
                got: other.dtype().to_string(),
            })
        }
    };
    Ok(scores)
}
