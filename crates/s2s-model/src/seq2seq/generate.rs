use log::{debug, trace};
use s2s_tensor::Tensor;

use super::Seq2SeqModel;
use crate::config::GenerationConfig;
use crate::error::{ModelError, Result};
use crate::past::PastKeyValues;

impl Seq2SeqModel {
    /// Greedily generate up to `max_length` tokens for `input_ids`.
    ///
    /// Start and end token ids come from the model's generation config. The
    /// returned sequence starts with the decoder start token and ends with the
    /// end token if one was selected.
    pub fn generate(&mut self, input_ids: &[u32], max_length: usize) -> Result<Vec<u32>> {
        let config = self.generation.clone().with_max_length(max_length);
        self.generate_with_config(input_ids, &config)
    }

    /// Greedily generate with an explicit config.
    ///
    /// The encoder runs once; the init decoder produces the first token and
    /// the continuation decoder every later one. Any failure discards the
    /// partial output.
    pub fn generate_with_config(
        &mut self,
        input_ids: &[u32],
        config: &GenerationConfig,
    ) -> Result<Vec<u32>> {
        let mut output_ids = vec![config.decoder_start_token_id];
        let mut encoder_outputs: Option<Tensor> = None;
        let mut past_key_values: Option<PastKeyValues> = None;
        // `usize::MAX` means no cap beyond the end token.
        let max_output_tokens = output_ids.len().saturating_add(config.max_length);

        while output_ids.len() < max_output_tokens {
            let output = self.forward(
                input_ids,
                &output_ids,
                encoder_outputs.take(),
                past_key_values.take(),
            )?;
            encoder_outputs = Some(output.encoder_outputs);
            past_key_values = Some(output.past_key_values);

            let next = self
                .sampler
                .sample(&output.logits)?
                .ok_or(ModelError::EmptyLogits)?;
            output_ids.push(next);
            trace!("step {}: token {}", output_ids.len() - 1, next);

            if next == config.eos_token_id {
                break;
            }
        }

        debug!(
            "generated {} tokens for {} input tokens",
            output_ids.len() - 1,
            input_ids.len()
        );
        Ok(output_ids)
    }
}
