/// Parameters controlling greedy generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationConfig {
    /// Maximum number of tokens generated after the start token.
    pub max_length: usize,
    /// Token the decoder sequence starts with (T5 uses the pad id, 0).
    pub decoder_start_token_id: u32,
    /// Token that ends generation when selected (T5 `</s>`, 1).
    pub eos_token_id: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_length: 50,
            decoder_start_token_id: 0,
            eos_token_id: 1,
        }
    }
}

impl GenerationConfig {
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    pub fn with_decoder_start_token_id(mut self, id: u32) -> Self {
        self.decoder_start_token_id = id;
        self
    }

    pub fn with_eos_token_id(mut self, id: u32) -> Self {
        self.eos_token_id = id;
        self
    }
}

/// How cached key/value tensors are named when fed back into the
/// continuation decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PastFeedNaming {
    /// Feed each entry under the output name it was produced as.
    #[default]
    OutputName,
    /// Feed each entry under its positional key (`pkv_0`, `pkv_1`, ...).
    Positional,
}

/// Input and output names of the exported encoder and decoder graphs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphIoNames {
    /// Encoder input: source token ids.
    pub input_ids: String,
    /// Encoder input: source attention mask.
    pub attention_mask: String,
    /// Encoder output consumed by the decoders.
    pub hidden_states: String,
    /// Decoder input: decoder token ids.
    pub decoder_input_ids: String,
    /// Decoder input: source attention mask.
    pub encoder_attention_mask: String,
    /// Decoder input: encoder output.
    pub encoder_hidden_states: String,
    /// Decoder output: next-token scores.
    pub logits: String,
}

impl Default for GraphIoNames {
    fn default() -> Self {
        Self {
            input_ids: "input_ids".to_string(),
            attention_mask: "attention_mask".to_string(),
            hidden_states: "hidden_states".to_string(),
            decoder_input_ids: "input_ids".to_string(),
            encoder_attention_mask: "encoder_attention_mask".to_string(),
            encoder_hidden_states: "encoder_hidden_states".to_string(),
            logits: "logits".to_string(),
        }
    }
}
