use crate::candidate::{Candidate, WeightedCandidate};
use crate::error::{Result, SamplerError};

/// Convert raw candidate logits into a temperature-scaled probability
/// distribution over exactly those candidates.
///
/// For numerical stability each logit is shifted by the pool maximum before
/// exponentiation: `p_i = exp((l_i - max) / T) / sum`. The exponential sum
/// is accumulated in f64. Pool order is preserved. Temperatures near zero
/// sharpen the distribution toward the arg-max; temperatures above one
/// flatten it.
///
/// # Errors
/// `InvalidTemperature` if `temperature` is not a positive finite number.
pub fn normalize(
    candidates: Vec<Candidate>,
    temperature: f32,
) -> Result<Vec<WeightedCandidate>> {
    if temperature <= 0.0 || !temperature.is_finite() {
        return Err(SamplerError::InvalidTemperature(temperature));
    }
    if candidates.is_empty() {
        return Ok(Vec::new());
    }

    let max_logit = candidates
        .iter()
        .map(|c| c.logit)
        .fold(f32::NEG_INFINITY, f32::max);

    let mut sum = 0.0f64;
    let unnormalized: Vec<f64> = candidates
        .iter()
        .map(|c| {
            let adjusted = (c.logit - max_logit) / temperature;
            let weight = (adjusted as f64).exp();
            sum += weight;
            weight
        })
        .collect();

    Ok(candidates
        .into_iter()
        .zip(unnormalized)
        .map(|(c, weight)| WeightedCandidate {
            id: c.id,
            text: c.text,
            probability: (weight / sum) as f32,
        })
        .collect())
}
