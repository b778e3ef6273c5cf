use anyhow::{Context, Result};
use image::DynamicImage;

use super::{EmotionDetector, EmotionReading};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::log_warn;

/// Decode an encoded frame; the format is sniffed from the bytes.
pub fn decode_frame(bytes: &[u8]) -> Result<DynamicImage> {
    if bytes.is_empty() {
        anyhow::bail!("empty frame");
    }
    image::load_from_memory(bytes).context("failed to decode frame")
}

/// Decode and analyze one frame. Never fails: anything that goes wrong is
/// logged and reported as [`EmotionReading::error`].
pub fn analyze_frame(detector: &dyn EmotionDetector, bytes: &[u8]) -> EmotionReading {
    let frame = match decode_frame(bytes) {
        Ok(frame) => frame,
        Err(err) => {
            log_warn!("Skipping frame ({} bytes): {err:#}", bytes.len());
            return EmotionReading::error();
        }
    };

    match detector.detect(&frame) {
        Ok(reading) if reading.confidence.is_finite() => reading,
        Ok(reading) => {
            log_warn!(
                "Detector returned non-finite score for '{}'; discarding",
                reading.emotion
            );
            EmotionReading::error()
        }
        Err(err) => {
            log_warn!("Emotion detection failed: {err:#}");
            EmotionReading::error()
        }
    }
}
