use crate::sampler::Sampler;

/// Greedy sampler: selects the single token with the highest logit.
///
/// Comparison is strictly greater-than, so on ties the earliest maximal
/// index wins. NaN scores never replace the running maximum.
#[derive(Debug, Clone, Copy)]
pub struct GreedySampler;

impl GreedySampler {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GreedySampler {
    fn default() -> Self {
        Self::new()
    }
}

impl Sampler for GreedySampler {
    fn name(&self) -> &str {
        "greedy"
    }

    fn select(&self, scores: &[f32]) -> Option<u32> {
        let (&first, rest) = scores.split_first()?;
        let mut best_index = 0usize;
        let mut best = first;
        for (i, &score) in rest.iter().enumerate() {
            if score > best {
                best_index = i + 1;
                best = score;
            }
        }
        Some(best_index as u32)
    }
}
