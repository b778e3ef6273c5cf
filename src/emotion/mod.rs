//! Emotion capture during a live interview.
//!
//! Frames come from a [`FrameSource`], are decoded and handed to an
//! [`EmotionDetector`], and each successful reading becomes one
//! [`ConfidenceSample`] covering one capture interval.

pub mod capture;
pub mod frame;

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::models::{ConfidenceSample, MAX_CONFIDENCE};

pub use capture::{capture_loop, CaptureController, SampleRecorder};
pub use frame::{analyze_frame, decode_frame};

/// Label carried by the failure sentinel.
pub const ERROR_LABEL: &str = "error";

/// Dominant emotion and its score in [0, 1].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmotionReading {
    pub emotion: String,
    pub confidence: f64,
}

impl EmotionReading {
    pub fn new(emotion: impl Into<String>, confidence: f64) -> Self {
        Self {
            emotion: emotion.into(),
            confidence,
        }
    }

    /// Sentinel for a frame that could not be analyzed.
    pub fn error() -> Self {
        Self::new(ERROR_LABEL, 0.0)
    }

    pub fn is_error(&self) -> bool {
        self.emotion == ERROR_LABEL
    }

    /// Percentage score rounded to two decimals, credited with `interval`
    /// of interview time. Error sentinels produce no sample.
    pub fn to_sample(&self, interval: Duration) -> Option<ConfidenceSample> {
        if self.is_error() {
            return None;
        }
        let percent = (self.confidence * MAX_CONFIDENCE * 100.0).round() / 100.0;
        Some(ConfidenceSample::new(percent, interval.as_secs_f64()))
    }
}

/// Facial emotion recognition, treated as a black box.
///
/// Called from a blocking worker thread; implementations may be slow.
pub trait EmotionDetector: Send + Sync {
    fn detect(&self, frame: &DynamicImage) -> Result<EmotionReading>;
}

/// Supplies encoded frames (JPEG, PNG, ...) from a camera or upload queue.
#[async_trait]
pub trait FrameSource: Send + Sync {
    /// `Ok(None)` when no frame is ready this tick.
    async fn next_frame(&self) -> Result<Option<Vec<u8>>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reading_scales_and_rounds_like_the_camera_client() {
        let sample = EmotionReading::new("happy", 0.85678)
            .to_sample(Duration::from_secs(2))
            .unwrap();
        assert_eq!(sample.confidence, 85.68);
        assert_eq!(sample.duration, 2.0);
    }

    #[test]
    fn error_sentinel_produces_no_sample() {
        assert!(EmotionReading::error().to_sample(Duration::from_secs(2)).is_none());
    }

    #[test]
    fn no_face_reading_still_counts() {
        let sample = EmotionReading::new("No face detected", 0.0)
            .to_sample(Duration::from_millis(500))
            .unwrap();
        assert_eq!(sample, ConfidenceSample::new(0.0, 0.5));
    }
}
