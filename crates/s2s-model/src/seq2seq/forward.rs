use log::debug;
use s2s_tensor::{Shape, Tensor, TensorMap};

use super::Seq2SeqModel;
use crate::error::{ModelError, Result};
use crate::past::PastKeyValues;
use crate::session::GraphSession;

/// Result of one decoder step.
#[derive(Debug, Clone)]
pub struct Seq2SeqOutput {
    /// Decoder scores, `[1, decoder_len, vocab]`.
    pub logits: Tensor,
    /// Cached key/values to feed into the next step.
    pub past_key_values: PastKeyValues,
    /// Encoder hidden states, reused by every step of the same call.
    pub encoder_outputs: Tensor,
}

impl Seq2SeqModel {
    /// Run one decoder step.
    ///
    /// The encoder runs only when `encoder_outputs` is `None`. Without
    /// `past_key_values` the init decoder runs; otherwise the cached entries
    /// are added to the feed and the continuation decoder runs.
    pub fn forward(
        &mut self,
        input_ids: &[u32],
        decoder_input_ids: &[u32],
        encoder_outputs: Option<Tensor>,
        past_key_values: Option<PastKeyValues>,
    ) -> Result<Seq2SeqOutput> {
        self.ensure_loaded()?;
        let names = &self.io_names;

        let attention_mask = Tensor::ones_i64(Shape::new(vec![1, input_ids.len()]));

        let encoder_outputs = match encoder_outputs {
            Some(hidden) => hidden,
            None => {
                let encoder = session(&self.encoder, "encoder")?;
                let mut feeds = TensorMap::new();
                feeds.insert(names.input_ids.clone(), Tensor::from_token_ids(input_ids));
                feeds.insert(names.attention_mask.clone(), attention_mask.clone());

                debug!("encoding {} input tokens", input_ids.len());
                let mut results = encoder.run(&feeds)?;
                let hidden = take_output(&mut results, &names.hidden_states)?;
                debug!(
                    "encoder output {} ({} bytes)",
                    hidden.shape(),
                    hidden.nbytes()
                );
                hidden
            }
        };

        let mut feeds = TensorMap::new();
        feeds.insert(
            names.decoder_input_ids.clone(),
            Tensor::from_token_ids(decoder_input_ids),
        );
        feeds.insert(names.encoder_attention_mask.clone(), attention_mask);
        feeds.insert(names.encoder_hidden_states.clone(), encoder_outputs);

        let decoder = match past_key_values {
            None => {
                debug!("init decoding, {} decoder tokens", decoder_input_ids.len());
                session(&self.init_decoder, "init decoder")?
            }
            Some(past) => {
                debug!(
                    "decoding, {} decoder tokens, {} cached tensors",
                    decoder_input_ids.len(),
                    past.len()
                );
                past.feed_into(&mut feeds, self.past_naming);
                session(&self.decoder, "decoder")?
            }
        };

        let mut results = decoder.run(&feeds)?;
        let logits = take_output(&mut results, &names.logits)?;
        let past_names = decoder.output_names().get(1..).unwrap_or(&[]);
        let past_key_values = PastKeyValues::from_outputs(past_names, &mut results)?;

        // Hand the encoder output back to the caller without copying it.
        let encoder_outputs = take_output(&mut feeds, &names.encoder_hidden_states)?;

        Ok(Seq2SeqOutput {
            logits,
            past_key_values,
            encoder_outputs,
        })
    }
}

fn session<'a>(
    slot: &'a Option<Box<dyn GraphSession>>,
    role: &'static str,
) -> Result<&'a dyn GraphSession> {
    slot.as_deref().ok_or(ModelError::NotLoaded(role))
}

fn take_output(map: &mut TensorMap, name: &str) -> Result<Tensor> {
    map.remove(name)
        .ok_or_else(|| ModelError::MissingOutput(name.to_string()))
}
