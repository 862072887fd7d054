use half::f16;

use crate::dtype::DType;
use crate::error::{Result, TensorError};
use crate::shape::Shape;
use crate::storage::Storage;

/// An opaque tensor value passed between the decode loop and a graph session.
///
/// Holds contiguous, row-major data with an associated shape. The element
/// type is carried by the storage variant. Beyond flat indexing, no array
/// semantics are attached to the buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    storage: Storage,
    shape: Shape,
}

impl Tensor {
    /// Create a tensor from storage and a shape.
    ///
    /// # Errors
    /// Returns `TensorError::ShapeMismatch` if the storage length does not
    /// match the shape's element count.
    pub fn new(storage: Storage, shape: Shape) -> Result<Self> {
        if storage.len() != shape.numel() {
            return Err(TensorError::ShapeMismatch {
                shape: shape.dims().to_vec(),
                expected: shape.numel(),
                got: storage.len(),
            });
        }
        Ok(Tensor { storage, shape })
    }

    /// Create an f32 tensor.
    pub fn from_f32(data: Vec<f32>, shape: Shape) -> Result<Self> {
        Self::new(Storage::F32(data), shape)
    }

    /// Create an f16 tensor.
    pub fn from_f16(data: Vec<f16>, shape: Shape) -> Result<Self> {
        Self::new(Storage::F16(data), shape)
    }

    /// Create an i64 tensor.
    pub fn from_i64(data: Vec<i64>, shape: Shape) -> Result<Self> {
        Self::new(Storage::I64(data), shape)
    }

    /// Pack a token sequence as a `[1, n]` i64 tensor.
    pub fn from_token_ids(ids: &[u32]) -> Self {
        Tensor {
            storage: Storage::I64(ids.iter().map(|&id| i64::from(id)).collect()),
            shape: Shape::new(vec![1, ids.len()]),
        }
    }

    /// Create an i64 tensor filled with ones, e.g. a full-coverage attention mask.
    pub fn ones_i64(shape: Shape) -> Self {
        let n = shape.numel();
        Tensor {
            storage: Storage::I64(vec![1; n]),
            shape,
        }
    }

    /// Create a zero-filled f32 tensor with the given shape.
    pub fn zeros_f32(shape: Shape) -> Self {
        let n = shape.numel();
        Tensor {
            storage: Storage::F32(vec![0.0; n]),
            shape,
        }
    }

    /// Returns a reference to the tensor's shape.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Returns the tensor's data type.
    pub fn dtype(&self) -> DType {
        self.storage.dtype()
    }

    /// Total number of elements.
    pub fn numel(&self) -> usize {
        self.storage.len()
    }

    /// Size of the flat buffer in bytes.
    pub fn nbytes(&self) -> usize {
        self.numel() * self.dtype().size_in_bytes()
    }

    /// Returns the underlying storage reference.
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn data_f32(&self) -> Result<&[f32]> {
        self.storage.as_f32_slice()
    }

    pub fn data_i64(&self) -> Result<&[i64]> {
        self.storage.as_i64_slice()
    }
}
