//! ONNX Runtime engine, enabled with the `onnx` feature.

use std::borrow::Cow;
use std::path::Path;

use half::f16;
use log::debug;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::{Session, SessionInputValue};
use ort::value::{DynValue, Tensor as OrtTensor};
use s2s_tensor::{Shape, Storage, Tensor, TensorMap};

use crate::error::{ModelError, Result};
use crate::session::{GraphSession, SessionLoader};

/// Creates ONNX Runtime sessions from `.onnx` artifacts.
#[derive(Debug, Clone)]
pub struct OrtSessionLoader {
    intra_threads: usize,
}

impl OrtSessionLoader {
    pub fn new() -> Self {
        Self { intra_threads: 1 }
    }

    /// Number of threads ONNX Runtime uses within a single operator.
    pub fn with_intra_threads(mut self, threads: usize) -> Self {
        self.intra_threads = threads.max(1);
        self
    }
}

impl Default for OrtSessionLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionLoader for OrtSessionLoader {
    fn name(&self) -> &str {
        "onnxruntime"
    }

    fn load(&self, path: &Path) -> Result<Box<dyn GraphSession>> {
        let load_error = |e: ort::Error| ModelError::SessionLoad {
            path: path.to_path_buf(),
            message: e.to_string(),
        };
        let session = Session::builder()
            .map_err(load_error)?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(load_error)?
            .with_intra_threads(self.intra_threads)
            .map_err(load_error)?
            .commit_from_file(path)
            .map_err(load_error)?;

        let output_names: Vec<String> = session.outputs.iter().map(|o| o.name.clone()).collect();
        debug!("{} outputs: {:?}", path.display(), output_names);
        Ok(Box::new(OrtSession {
            session,
            output_names,
        }))
    }
}

/// A graph session backed by ONNX Runtime.
pub struct OrtSession {
    session: Session,
    output_names: Vec<String>,
}

impl GraphSession for OrtSession {
    fn run(&self, inputs: &TensorMap) -> Result<TensorMap> {
        let mut feeds: Vec<(Cow<'_, str>, SessionInputValue<'_>)> =
            Vec::with_capacity(inputs.len());
        for (name, tensor) in inputs {
            feeds.push((Cow::Borrowed(name.as_str()), to_ort(tensor)?.into()));
        }

        let outputs = self.session.run(feeds).map_err(engine_error)?;

        let mut results = TensorMap::new();
        for name in &self.output_names {
            let value = outputs
                .get(name.as_str())
                .ok_or_else(|| ModelError::MissingOutput(name.clone()))?;
            results.insert(name.clone(), from_ort(value)?);
        }
        Ok(results)
    }

    fn output_names(&self) -> &[String] {
        &self.output_names
    }
}

fn engine_error(e: ort::Error) -> ModelError {
    ModelError::Session(e.to_string())
}

fn to_ort(tensor: &Tensor) -> Result<DynValue> {
    let shape: Vec<i64> = tensor.shape().dims().iter().map(|&d| d as i64).collect();
    let value = match tensor.storage() {
        Storage::F32(v) => OrtTensor::from_array((shape, v.clone())).map(|t| t.into_dyn()),
        Storage::F16(v) => OrtTensor::from_array((shape, v.clone())).map(|t| t.into_dyn()),
        Storage::I64(v) => OrtTensor::from_array((shape, v.clone())).map(|t| t.into_dyn()),
    };
    value.map_err(engine_error)
}

fn from_ort(value: &DynValue) -> Result<Tensor> {
    if let Ok((shape, data)) = value.try_extract_raw_tensor::<f32>() {
        return Ok(Tensor::from_f32(data.to_vec(), to_shape(&shape))?);
    }
    if let Ok((shape, data)) = value.try_extract_raw_tensor::<f16>() {
        return Ok(Tensor::from_f16(data.to_vec(), to_shape(&shape))?);
    }
    if let Ok((shape, data)) = value.try_extract_raw_tensor::<i64>() {
        return Ok(Tensor::from_i64(data.to_vec(), to_shape(&shape))?);
    }
    Err(ModelError::Session(
        "graph output has an unsupported element type".to_string(),
    ))
}

/// Convert ONNX Runtime dimensions; symbolic (negative) sizes become 0.
fn to_shape(dims: &[i64]) -> Shape {
    Shape::new(dims.iter().map(|&d| d.max(0) as usize).collect())
}
