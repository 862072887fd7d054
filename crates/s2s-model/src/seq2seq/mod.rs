//! Encoder-decoder generation over three exported graphs.
//!
//! A `Seq2SeqModel` owns the artifact locations of an encoder, an initial
//! decoder (first step, no cached state) and a continuation decoder (every
//! later step, fed the previous step's cached key/values). Sessions are
//! created on first use and kept for the life of the model.

mod forward;
mod generate;

pub use forward::Seq2SeqOutput;

use std::path::Path;

use log::info;
use s2s_sampler::{GreedySampler, Sampler};

use crate::artifacts::ModelArtifacts;
use crate::config::{GenerationConfig, GraphIoNames, PastFeedNaming};
use crate::error::{ModelError, Result};
use crate::session::{GraphSession, SessionLoader};

/// A sequence-to-sequence model backed by encoder, init-decoder and decoder
/// graph sessions.
pub struct Seq2SeqModel {
    artifacts: ModelArtifacts,
    loader: Box<dyn SessionLoader>,
    io_names: GraphIoNames,
    past_naming: PastFeedNaming,
    generation: GenerationConfig,
    sampler: Box<dyn Sampler>,
    encoder: Option<Box<dyn GraphSession>>,
    init_decoder: Option<Box<dyn GraphSession>>,
    decoder: Option<Box<dyn GraphSession>>,
}

impl Seq2SeqModel {
    /// Create a model over already-resolved artifact locations.
    ///
    /// Nothing is loaded until the first forward pass.
    pub fn new(artifacts: ModelArtifacts, loader: Box<dyn SessionLoader>) -> Self {
        Seq2SeqModel {
            artifacts,
            loader,
            io_names: GraphIoNames::default(),
            past_naming: PastFeedNaming::default(),
            generation: GenerationConfig::default(),
            sampler: Box::new(GreedySampler::new()),
            encoder: None,
            init_decoder: None,
            decoder: None,
        }
    }

    /// Resolve the quantized artifacts of `model_id` under `models_path`.
    ///
    /// `"org/t5-small"` with `"/models"` resolves to
    /// `/models/t5-small-encoder-quantized.onnx` and its two decoders.
    pub fn from_pretrained(
        model_id: &str,
        models_path: impl AsRef<Path>,
        loader: Box<dyn SessionLoader>,
    ) -> Result<Self> {
        let artifacts = ModelArtifacts::from_model_id(model_id, models_path)?;
        Ok(Self::new(artifacts, loader))
    }

    pub fn with_io_names(mut self, io_names: GraphIoNames) -> Self {
        self.io_names = io_names;
        self
    }

    pub fn with_past_feed_naming(mut self, naming: PastFeedNaming) -> Self {
        self.past_naming = naming;
        self
    }

    pub fn with_generation_config(mut self, config: GenerationConfig) -> Self {
        self.generation = config;
        self
    }

    pub fn with_sampler(mut self, sampler: Box<dyn Sampler>) -> Self {
        self.sampler = sampler;
        self
    }

    pub fn artifacts(&self) -> &ModelArtifacts {
        &self.artifacts
    }

    /// Returns true once all three sessions have been created.
    pub fn is_loaded(&self) -> bool {
        self.encoder.is_some() && self.init_decoder.is_some() && self.decoder.is_some()
    }

    /// Create any session that has not been created yet.
    ///
    /// Sessions already present are left untouched, so repeated calls are
    /// no-ops. A failure leaves earlier sessions in place.
    pub fn ensure_loaded(&mut self) -> Result<()> {
        if self.encoder.is_none() {
            self.encoder = Some(load_session(
                self.loader.as_ref(),
                "encoder",
                &self.artifacts.encoder,
            )?);
        }
        if self.init_decoder.is_none() {
            self.init_decoder = Some(load_session(
                self.loader.as_ref(),
                "init decoder",
                &self.artifacts.init_decoder,
            )?);
        }
        if self.decoder.is_none() {
            self.decoder = Some(load_session(
                self.loader.as_ref(),
                "decoder",
                &self.artifacts.decoder,
            )?);
            info!("done loading decoder");
        }
        Ok(())
    }
}

fn load_session(
    loader: &dyn SessionLoader,
    role: &str,
    path: &Path,
) -> Result<Box<dyn GraphSession>> {
    if !path.is_file() {
        return Err(ModelError::ArtifactNotFound(path.to_path_buf()));
    }
    info!("loading {} from {} ({})", role, path.display(), loader.name());
    loader.load(path)
}
