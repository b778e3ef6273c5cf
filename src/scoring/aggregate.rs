use crate::models::{ConfidenceSample, ConfidenceSummary, MAX_CONFIDENCE};

use super::normalize::normalize;

/// Duration-weighted mean of the samples' confidence.
///
/// `Σ(confidence * duration) / Σ(duration)`, computed over normalized
/// samples. Empty input and zero total duration both yield `0.0`, so a lone
/// zero-duration sample scores 0 rather than its own confidence.
pub fn aggregate(samples: &[ConfidenceSample]) -> f64 {
    summarize(samples).overall_confidence
}

/// Same reduction as [`aggregate`], plus the totals it was computed from.
pub fn summarize(samples: &[ConfidenceSample]) -> ConfidenceSummary {
    if samples.is_empty() {
        return ConfidenceSummary::default();
    }

    let mut normalized: Vec<ConfidenceSample> = samples.iter().copied().map(normalize).collect();
    // Fixed summation order keeps the result bit-identical under permutation.
    normalized.sort_by(|a, b| {
        a.duration
            .total_cmp(&b.duration)
            .then(a.confidence.total_cmp(&b.confidence))
    });

    let (weighted, total_duration) = normalized
        .iter()
        .fold((0.0_f64, 0.0_f64), |(weighted, total), s| {
            (weighted + s.confidence * s.duration, total + s.duration)
        });

    let overall_confidence = if total_duration == 0.0 {
        0.0
    } else if weighted.is_finite() && total_duration.is_finite() {
        weighted / total_duration
    } else {
        rescaled_mean(&normalized)
    };

    ConfidenceSummary {
        sample_count: samples.len(),
        total_duration,
        overall_confidence: overall_confidence.clamp(0.0, MAX_CONFIDENCE),
    }
}

/// Weighted mean with every duration divided by the largest one first.
/// Only needed when the plain sums overflow. Expects `samples` already in
/// the canonical order used by [`summarize`].
fn rescaled_mean(samples: &[ConfidenceSample]) -> f64 {
    let max_duration = samples.iter().map(|s| s.duration).fold(0.0_f64, f64::max);
    if max_duration == 0.0 {
        return 0.0;
    }

    let (weighted, total) = samples.iter().fold((0.0_f64, 0.0_f64), |(weighted, total), s| {
        let weight = s.duration / max_duration;
        (weighted + s.confidence * weight, total + weight)
    });

    if total == 0.0 {
        0.0
    } else {
        weighted / total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(confidence: f64, duration: f64) -> ConfidenceSample {
        ConfidenceSample::new(confidence, duration)
    }

    #[test]
    fn empty_sequence_is_zero() {
        assert_eq!(aggregate(&[]), 0.0);
        assert_eq!(summarize(&[]), ConfidenceSummary::default());
    }

    #[test]
    fn zero_total_duration_is_zero() {
        assert_eq!(aggregate(&[s(70.0, 0.0)]), 0.0);
        assert_eq!(aggregate(&[s(70.0, 0.0), s(90.0, 0.0)]), 0.0);
    }

    #[test]
    fn negative_durations_count_as_zero() {
        assert_eq!(aggregate(&[s(70.0, -4.0)]), 0.0);
        assert_eq!(aggregate(&[s(70.0, -4.0), s(40.0, 2.0)]), 40.0);
    }

    #[test]
    fn weights_by_duration() {
        assert_eq!(aggregate(&[s(80.0, 30.0), s(100.0, 10.0)]), 85.0);
    }

    #[test]
    fn clamps_before_weighting() {
        assert_eq!(aggregate(&[s(-20.0, 5.0), s(150.0, 5.0)]), 50.0);
    }

    #[test]
    fn order_does_not_matter() {
        let forward = [s(80.0, 30.0), s(100.0, 10.0), s(55.0, 4.0), s(20.0, 6.0)];
        let mut reversed = forward;
        reversed.reverse();
        let rotated = [forward[2], forward[0], forward[3], forward[1]];

        let expected = aggregate(&forward);
        assert_eq!(aggregate(&reversed), expected);
        assert_eq!(aggregate(&rotated), expected);
    }

    #[test]
    fn every_permutation_gives_identical_bits() {
        let samples = [s(10.0, 0.1), s(10.0, 0.2), s(10.0, 0.3), s(73.3, 0.7)];
        let expected = aggregate(&samples).to_bits();

        let orders = [
            [0, 1, 2, 3],
            [3, 2, 1, 0],
            [2, 1, 0, 3],
            [1, 3, 0, 2],
            [2, 0, 3, 1],
            [3, 0, 2, 1],
        ];
        for order in orders {
            let permuted: Vec<ConfidenceSample> = order.iter().map(|&i| samples[i]).collect();
            assert_eq!(aggregate(&permuted).to_bits(), expected, "order {order:?}");
        }

        let equal = [s(10.0, 0.1), s(10.0, 0.2), s(10.0, 0.3)];
        let mut reversed = equal;
        reversed.reverse();
        assert_eq!(aggregate(&equal).to_bits(), aggregate(&reversed).to_bits());
    }

    #[test]
    fn overflow_fallback_ignores_order() {
        let forward = [s(100.0, f64::MAX), s(0.3, 0.1), s(0.0, f64::MAX)];
        let reversed = [forward[2], forward[1], forward[0]];
        assert_eq!(aggregate(&forward).to_bits(), aggregate(&reversed).to_bits());
    }

    #[test]
    fn result_stays_within_percentage_range() {
        let batches: [&[ConfidenceSample]; 5] = [
            &[s(1e9, 1.0), s(-1e9, 1.0)],
            &[s(100.0, 1e-300), s(100.0, 1e-300)],
            &[s(f64::NAN, 3.0), s(f64::INFINITY, 1.0)],
            &[s(99.0, f64::NAN), s(12.0, f64::INFINITY)],
            &[s(100.0, f64::MAX), s(0.0, f64::MAX), s(50.0, 1.0)],
        ];

        for batch in batches {
            let value = aggregate(batch);
            assert!(value.is_finite(), "non-finite aggregate for {batch:?}");
            assert!((0.0..=100.0).contains(&value), "{value} out of range for {batch:?}");
        }
    }

    #[test]
    fn overflowing_durations_fall_back_to_rescaled_mean() {
        let value = aggregate(&[s(100.0, f64::MAX), s(0.0, f64::MAX)]);
        assert_eq!(value, 50.0);
    }

    #[test]
    fn nan_confidence_is_treated_as_zero() {
        assert_eq!(aggregate(&[s(f64::NAN, 1.0), s(100.0, 1.0)]), 50.0);
    }

    #[test]
    fn summary_reports_totals() {
        let summary = summarize(&[s(80.0, 30.0), s(100.0, 10.0), s(10.0, -5.0)]);
        assert_eq!(summary.sample_count, 3);
        assert_eq!(summary.total_duration, 40.0);
        assert_eq!(summary.overall_confidence, 85.0);
    }
}
