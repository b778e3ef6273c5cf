//! Confidence sample data model.
//!
//! One (confidence, duration) observation reported for a slice of an
//! interview. The type holds raw values only; clamping happens in
//! `scoring::normalize` so malformed client data never reaches the aggregate.

use serde::{Deserialize, Serialize};

/// Upper bound of the confidence percentage scale.
pub const MAX_CONFIDENCE: f64 = 100.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ConfidenceSample {
    /// Percentage in [0, 100] once normalized.
    pub confidence: f64,
    /// Seconds this reading covers.
    pub duration: f64,
}

impl ConfidenceSample {
    pub fn new(confidence: f64, duration: f64) -> Self {
        Self {
            confidence,
            duration,
        }
    }
}

/// Summary of one aggregation pass, useful for logging and callers that
/// want more than the scalar.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ConfidenceSummary {
    pub sample_count: usize,
    pub total_duration: f64,
    pub overall_confidence: f64,
}

impl Default for ConfidenceSummary {
    fn default() -> Self {
        Self {
            sample_count: 0,
            total_duration: 0.0,
            overall_confidence: 0.0,
        }
    }
}
