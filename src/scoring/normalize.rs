use crate::models::{ConfidenceSample, MAX_CONFIDENCE};

/// Clamp a raw sample into something the aggregator can safely combine.
///
/// Never fails. Confidence lands in [0, 100] (NaN -> 0, +inf -> 100,
/// -inf -> 0). Duration lands in [0, inf); any non-finite duration becomes 0
/// so the sample carries no weight.
pub fn normalize(sample: ConfidenceSample) -> ConfidenceSample {
    ConfidenceSample {
        confidence: clamp_confidence(sample.confidence),
        duration: clamp_duration(sample.duration),
    }
}

pub fn normalize_all(samples: &[ConfidenceSample]) -> Vec<ConfidenceSample> {
    samples.iter().copied().map(normalize).collect()
}

fn clamp_confidence(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    // f64::clamp maps the infinities onto the bounds.
    value.clamp(0.0, MAX_CONFIDENCE)
}

fn clamp_duration(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    value.max(0.0)
}
