use s2s_tensor::{Tensor, TensorMap};

use crate::config::PastFeedNaming;
use crate::error::{ModelError, Result};

/// One cached key/value tensor produced by a decoder step.
#[derive(Debug, Clone)]
pub struct PastKeyValue {
    /// Positional key, `pkv_<index>`.
    pub key: String,
    /// Name of the decoder output this tensor was read from.
    pub output_name: String,
    pub value: Tensor,
}

/// Cached decoder state threaded from one step into the next.
///
/// Entries keep the decoder's output order. Each is stored under a
/// positional key; the original output name is kept so the entry can be fed
/// back under it on the next step.
#[derive(Debug, Clone, Default)]
pub struct PastKeyValues {
    entries: Vec<PastKeyValue>,
}

impl PastKeyValues {
    /// Collect the cached tensors named by `names` out of a decoder run.
    ///
    /// `names` are the decoder's outputs after `logits`, in declared order;
    /// the i-th becomes `pkv_i`.
    pub fn from_outputs(names: &[String], outputs: &mut TensorMap) -> Result<Self> {
        let mut entries = Vec::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            let value = outputs
                .remove(name)
                .ok_or_else(|| ModelError::MissingOutput(name.clone()))?;
            entries.push(PastKeyValue {
                key: format!("pkv_{}", i),
                output_name: name.clone(),
                value,
            });
        }
        Ok(PastKeyValues { entries })
    }

    /// Move every entry into a decoder feed.
    pub fn feed_into(self, feeds: &mut TensorMap, naming: PastFeedNaming) {
        for entry in self.entries {
            let name = match naming {
                PastFeedNaming::OutputName => entry.output_name,
                PastFeedNaming::Positional => entry.key,
            };
            feeds.insert(name, entry.value);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PastKeyValue> {
        self.entries.iter()
    }
}
