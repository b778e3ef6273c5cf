use std::sync::Arc;

use anyhow::{bail, Context, Result};
use log::info;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::models::{ConfidenceSample, ConfidenceSummary};
use crate::scoring::summarize;
use crate::settings::CaptureSettings;

use super::{analyze_frame, EmotionDetector, FrameSource};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

// Import the logging macros (exported at crate root)
use crate::{log_error, log_info, log_warn};

/// Samples collected so far, in capture order. Clones share storage.
#[derive(Clone, Default)]
pub struct SampleRecorder {
    inner: Arc<Mutex<Vec<ConfidenceSample>>>,
}

impl SampleRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn push(&self, sample: ConfidenceSample) {
        self.inner.lock().await.push(sample);
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn snapshot(&self) -> Vec<ConfidenceSample> {
        self.inner.lock().await.clone()
    }

    /// Drain everything recorded so far.
    pub async fn take(&self) -> Vec<ConfidenceSample> {
        std::mem::take(&mut *self.inner.lock().await)
    }
}

pub async fn capture_loop(
    source: Arc<dyn FrameSource>,
    detector: Arc<dyn EmotionDetector>,
    recorder: SampleRecorder,
    settings: CaptureSettings,
    cancel_token: CancellationToken,
) {
    let interval = settings.interval();
    let timeout = settings.timeout();
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let fut = capture_once(source.as_ref(), &detector, &recorder, interval);

                match tokio::time::timeout(timeout, fut).await {
                    Ok(Ok(())) => {},
                    Ok(Err(err)) => log_error!("emotion capture failed: {err:?}"),
                    Err(_) => log_warn!("emotion capture timeout (> {}ms)", timeout.as_millis()),
                }
            }
            _ = cancel_token.cancelled() => {
                log_info!("emotion capture loop shutting down");
                break;
            }
        }
    }
}

/// Grab one frame, analyze it off the async runtime and record the sample.
pub async fn capture_once(
    source: &dyn FrameSource,
    detector: &Arc<dyn EmotionDetector>,
    recorder: &SampleRecorder,
    interval: Duration,
) -> Result<()> {
    let Some(bytes) = source.next_frame().await.context("frame source failed")? else {
        log_info!("No frame available this tick");
        return Ok(());
    };

    let detector = Arc::clone(detector);
    let reading = tokio::task::spawn_blocking(move || analyze_frame(detector.as_ref(), &bytes))
        .await
        .context("emotion analysis worker join failed")?;

    match reading.to_sample(interval) {
        Some(sample) => {
            recorder.push(sample).await;
            log_info!(
                "Recorded {} at {:.2}% for {:.1}s",
                reading.emotion,
                sample.confidence,
                sample.duration
            );
        }
        None => log_warn!("Frame analysis failed; no sample recorded"),
    }

    Ok(())
}

/// Runs one capture loop at a time and hands back its samples on stop.
pub struct CaptureController {
    settings: CaptureSettings,
    recorder: SampleRecorder,
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl CaptureController {
    pub fn new(settings: CaptureSettings) -> Self {
        Self {
            settings,
            recorder: SampleRecorder::new(),
            handle: None,
            cancel_token: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.handle.is_some()
    }

    pub fn start(
        &mut self,
        source: Arc<dyn FrameSource>,
        detector: Arc<dyn EmotionDetector>,
    ) -> Result<()> {
        if self.handle.is_some() {
            bail!("emotion capture already active");
        }
        if self.settings.interval_ms == 0 {
            bail!("capture interval must be greater than zero");
        }

        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(capture_loop(
            source,
            detector,
            self.recorder.clone(),
            self.settings.clone(),
            cancel_token.clone(),
        ));

        info!(
            "Emotion capture started (every {}ms)",
            self.settings.interval_ms
        );
        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        Ok(())
    }

    /// Running summary of what has been captured so far.
    pub async fn current_summary(&self) -> ConfidenceSummary {
        summarize(&self.recorder.snapshot().await)
    }

    /// Stop the loop and return every sample it recorded, oldest first.
    pub async fn stop(&mut self) -> Result<Vec<ConfidenceSample>> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.handle.take() {
            handle.await.context("emotion capture task failed to join")?;
        }

        let samples = self.recorder.take().await;
        info!("Emotion capture stopped with {} samples", samples.len());
        Ok(samples)
    }
}
