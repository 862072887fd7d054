//! Scripted graph sessions for exercising the decode loop without an engine.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use s2s_tensor::{Shape, Tensor, TensorMap};
use tempfile::TempDir;

use crate::config::PastFeedNaming;
use crate::error::{ModelError, Result};
use crate::seq2seq::Seq2SeqModel;
use crate::session::{GraphSession, SessionLoader};

pub(crate) const MODEL_ID: &str = "google/t5-small";
pub(crate) const VOCAB: usize = 8;
/// Emitted once the script runs out; never the end token.
pub(crate) const FILLER_TOKEN: u32 = 2;
pub(crate) const HIDDEN: usize = 4;

const PRESENT: [&str; 2] = ["present.0.key", "present.0.value"];

#[derive(Debug, Default)]
pub(crate) struct ProbeState {
    pub loads: usize,
    pub encoder_runs: usize,
    pub init_runs: usize,
    pub decoder_runs: usize,
    /// Input names of every decoder-side run, sorted.
    pub decoder_feeds: Vec<Vec<String>>,
    /// First element of each cached tensor fed to the continuation decoder.
    pub past_seen: Vec<Vec<f32>>,
}

/// Shared record of what the scripted sessions were asked to do.
#[derive(Debug, Clone, Default)]
pub(crate) struct Probe(Arc<Mutex<ProbeState>>);

impl Probe {
    pub fn state(&self) -> MutexGuard<'_, ProbeState> {
        self.0.lock().unwrap()
    }

    pub fn loads(&self) -> usize {
        self.state().loads
    }

    pub fn encoder_runs(&self) -> usize {
        self.state().encoder_runs
    }

    pub fn init_runs(&self) -> usize {
        self.state().init_runs
    }

    pub fn decoder_runs(&self) -> usize {
        self.state().decoder_runs
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Role {
    Encoder,
    InitDecoder,
    Decoder,
}

/// Test harness: a temp directory holding three placeholder artifacts and a
/// loader producing scripted sessions.
///
/// `script[k]` is the token the decoder scores highest at step `k`.
pub(crate) struct Fixture {
    pub dir: TempDir,
    pub probe: Probe,
    pub script: Vec<u32>,
    /// Names the model uses when feeding cached state.
    pub model_naming: PastFeedNaming,
    /// Names the scripted continuation decoder requires.
    pub engine_naming: PastFeedNaming,
    /// Decoder step at which the engine reports a failure.
    pub fail_at: Option<usize>,
    pub fail_load: bool,
}

impl Fixture {
    pub fn new(script: Vec<u32>) -> Self {
        let dir = tempfile::tempdir().unwrap();
        for role in ["encoder", "init-decoder", "decoder"] {
            let path = dir.path().join(format!("t5-small-{}-quantized.onnx", role));
            std::fs::write(path, b"graph").unwrap();
        }
        Fixture {
            dir,
            probe: Probe::default(),
            script,
            model_naming: PastFeedNaming::OutputName,
            engine_naming: PastFeedNaming::OutputName,
            fail_at: None,
            fail_load: false,
        }
    }

    pub fn loader(&self) -> Box<dyn SessionLoader> {
        Box::new(ScriptedLoader {
            probe: self.probe.clone(),
            script: Arc::new(self.script.clone()),
            engine_naming: self.engine_naming,
            fail_at: self.fail_at,
            fail_load: self.fail_load,
        })
    }

    pub fn model(&self) -> Seq2SeqModel {
        Seq2SeqModel::from_pretrained(MODEL_ID, self.dir.path(), self.loader())
            .unwrap()
            .with_past_feed_naming(self.model_naming)
    }
}

struct ScriptedLoader {
    probe: Probe,
    script: Arc<Vec<u32>>,
    engine_naming: PastFeedNaming,
    fail_at: Option<usize>,
    fail_load: bool,
}

impl SessionLoader for ScriptedLoader {
    fn name(&self) -> &str {
        "scripted"
    }

    fn load(&self, path: &Path) -> Result<Box<dyn GraphSession>> {
        if self.fail_load {
            return Err(ModelError::SessionLoad {
                path: path.to_path_buf(),
                message: "protobuf parsing failed".to_string(),
            });
        }
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        let role = if file_name.ends_with("-encoder-quantized.onnx") {
            Role::Encoder
        } else if file_name.ends_with("-init-decoder-quantized.onnx") {
            Role::InitDecoder
        } else {
            Role::Decoder
        };
        self.probe.state().loads += 1;

        let output_names = match role {
            Role::Encoder => vec!["hidden_states".to_string()],
            _ => std::iter::once("logits")
                .chain(PRESENT)
                .map(str::to_string)
                .collect(),
        };
        Ok(Box::new(ScriptedSession {
            role,
            probe: self.probe.clone(),
            script: Arc::clone(&self.script),
            engine_naming: self.engine_naming,
            fail_at: self.fail_at,
            output_names,
        }))
    }
}

struct ScriptedSession {
    role: Role,
    probe: Probe,
    script: Arc<Vec<u32>>,
    engine_naming: PastFeedNaming,
    fail_at: Option<usize>,
    output_names: Vec<String>,
}

fn input<'a>(inputs: &'a TensorMap, name: &str) -> Result<&'a Tensor> {
    inputs
        .get(name)
        .ok_or_else(|| ModelError::Session(format!("missing input: {}", name)))
}

impl ScriptedSession {
    fn encode(&self, inputs: &TensorMap) -> Result<TensorMap> {
        let ids = input(inputs, "input_ids")?;
        let mask = input(inputs, "attention_mask")?;
        assert_eq!(ids.shape(), mask.shape());
        assert!(mask.data_i64().unwrap().iter().all(|&m| m == 1));
        self.probe.state().encoder_runs += 1;

        let n = ids.shape().dims()[1];
        let mut out = TensorMap::new();
        out.insert(
            "hidden_states".to_string(),
            Tensor::zeros_f32(Shape::new(vec![1, n, HIDDEN])),
        );
        Ok(out)
    }

    fn decode(&self, inputs: &TensorMap) -> Result<TensorMap> {
        let ids = input(inputs, "input_ids")?;
        input(inputs, "encoder_attention_mask")?;
        let hidden = input(inputs, "encoder_hidden_states")?;
        assert_eq!(hidden.shape().last_dim(), Some(HIDDEN));

        let dec_len = ids.numel();
        let step = dec_len - 1;

        let mut past = Vec::new();
        if self.role == Role::Decoder {
            for (i, output_name) in PRESENT.iter().enumerate() {
                let name = match self.engine_naming {
                    PastFeedNaming::OutputName => output_name.to_string(),
                    PastFeedNaming::Positional => format!("pkv_{}", i),
                };
                past.push(input(inputs, &name)?.data_f32()?[0]);
            }
        }

        {
            let mut state = self.probe.state();
            match self.role {
                Role::InitDecoder => state.init_runs += 1,
                _ => state.decoder_runs += 1,
            }
            let mut names: Vec<String> = inputs.keys().cloned().collect();
            names.sort();
            state.decoder_feeds.push(names);
            if self.role == Role::Decoder {
                state.past_seen.push(past);
            }
        }

        if self.fail_at == Some(step) {
            return Err(ModelError::Session("engine failure".to_string()));
        }

        let token = self.script.get(step).copied().unwrap_or(FILLER_TOKEN) as usize;
        // Earlier positions favour the last vocabulary entry so that scoring
        // the wrong position is visible.
        let mut logits = vec![0.0f32; dec_len * VOCAB];
        for pos in 0..step {
            logits[pos * VOCAB + VOCAB - 1] = 10.0;
        }
        logits[step * VOCAB + token] = 1.0;

        let mut out = TensorMap::new();
        out.insert(
            "logits".to_string(),
            Tensor::from_f32(logits, Shape::new(vec![1, dec_len, VOCAB]))?,
        );
        for (i, name) in PRESENT.iter().enumerate() {
            let marker = step as f32 + i as f32 * 0.5;
            out.insert(
                name.to_string(),
                Tensor::from_f32(vec![marker; 2], Shape::new(vec![1, 1, 1, 2]))?,
            );
        }
        Ok(out)
    }
}

impl GraphSession for ScriptedSession {
    fn run(&self, inputs: &TensorMap) -> Result<TensorMap> {
        match self.role {
            Role::Encoder => self.encode(inputs),
            _ => self.decode(inputs),
        }
    }

    fn output_names(&self) -> &[String] {
        &self.output_names
    }
}
