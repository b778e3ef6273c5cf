//! Mock-interview confidence backend.
//!
//! Confidence samples captured during an interview are clamped, reduced to a
//! duration-weighted overall score, and stored once per interview together
//! with the interview metadata and answers.

pub mod auth;
pub mod db;
pub mod emotion;
pub mod error;
pub mod interview;
pub mod models;
pub mod scoring;
pub mod settings;
mod utils;

use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use log::info;

pub use auth::{AuthError, Authenticator, TokenAuthenticator, UserDirectory};
pub use db::Database;
pub use emotion::{CaptureController, EmotionDetector, EmotionReading, FrameSource};
pub use error::{InterviewError, InterviewResult};
pub use interview::{InterviewService, InterviewStore, SavedInterview};
pub use models::{
    ConfidenceSample, ConfidenceSummary, InterviewMetadata, InterviewRecord, InterviewSubmission,
    NewInterview, PersistedInterview, UserId,
};
pub use scoring::{aggregate, normalize, summarize};
pub use settings::{Settings, SettingsStore};
pub use utils::logging::init_logging;

/// Everything a transport layer needs, wired from one set of settings.
#[derive(Clone)]
pub struct InterviewApp {
    pub db: Database,
    pub service: InterviewService,
    pub settings: Settings,
}

impl InterviewApp {
    pub fn new(settings: Settings) -> Result<Self> {
        let database = Database::new(settings.database_path.clone())?;
        let authenticator = TokenAuthenticator::new(&settings.auth, Arc::new(database.clone()))?;
        let service = InterviewService::new(Arc::new(database.clone()), Arc::new(authenticator));

        info!(
            "Interview backend ready (database {})",
            database.path().display()
        );

        Ok(Self {
            db: database,
            service,
            settings,
        })
    }

    /// Load settings from `settings_path` (defaults if absent) and wire the app.
    pub fn from_settings_file(settings_path: PathBuf) -> Result<Self> {
        let store = SettingsStore::new(settings_path)?;
        Self::new(store.settings())
    }

    /// A fresh capture controller using the configured interval and timeout.
    pub fn capture_controller(&self) -> CaptureController {
        CaptureController::new(self.settings.capture.clone())
    }
}
