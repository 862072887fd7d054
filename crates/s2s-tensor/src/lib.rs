//! `s2s-tensor` - Tensor values exchanged with graph sessions for seq2seq-runtime.
//!
//! This crate provides:
//! - A `Tensor` type carrying an element-type tag, a shape and a flat buffer
//! - Typed `Storage` for the element types graph sessions exchange
//! - Shape utilities
//! - `TensorMap`, the named inputs/outputs of one graph run

pub mod dtype;
pub mod error;
pub mod shape;
pub mod storage;
pub mod tensor;

use std::collections::HashMap;

// Re-export primary types at the crate root for convenience.
pub use dtype::DType;
pub use error::{Result, TensorError};
pub use shape::Shape;
pub use storage::Storage;
pub use tensor::Tensor;

/// Named tensors passed to, or returned from, a single graph run.
pub type TensorMap = HashMap<String, Tensor>;
