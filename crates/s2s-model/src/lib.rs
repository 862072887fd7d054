//! `s2s-model` - Sequence-to-sequence generation over exported graphs.
//!
//! An exported T5-style model is three graphs: an encoder, an init decoder
//! for the first step and a decoder for every later step. `Seq2SeqModel`
//! loads them through a `SessionLoader` on first use and drives greedy
//! decoding, threading the encoder output and cached key/values between
//! steps.

pub mod artifacts;
pub mod config;
pub mod error;
#[cfg(feature = "onnx")]
pub mod onnx;
pub mod past;
pub mod seq2seq;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use artifacts::{ArtifactNaming, ModelArtifacts};
pub use config::{GenerationConfig, GraphIoNames, PastFeedNaming};
pub use error::{ModelError, Result};
pub use past::{PastKeyValue, PastKeyValues};
pub use seq2seq::{Seq2SeqModel, Seq2SeqOutput};
pub use session::{GraphSession, SessionLoader};
