use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    auth::Authenticator,
    error::{InterviewError, InterviewResult},
    models::{
        ConfidenceSample, InterviewMetadata, InterviewRecord, InterviewSubmission,
        PersistedInterview, UserId,
    },
};

use super::store::InterviewStore;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info};

/// Result of a save: the stored row and the score computed for it.
#[derive(Debug, Clone, Serialize)]
pub struct SavedInterview {
    pub overall_confidence: f64,
    pub interview: PersistedInterview,
}

/// Orchestrates sample normalization, aggregation, ownership stamping and
/// persistence for interview records.
#[derive(Clone)]
pub struct InterviewService {
    store: Arc<dyn InterviewStore>,
    authenticator: Arc<dyn Authenticator>,
}

impl InterviewService {
    pub fn new(store: Arc<dyn InterviewStore>, authenticator: Arc<dyn Authenticator>) -> Self {
        Self {
            store,
            authenticator,
        }
    }

    /// Score and store one interview for an already authenticated owner.
    ///
    /// `metadata.user_id` is ignored; the row always belongs to `owner`.
    pub async fn save(
        &self,
        metadata: InterviewMetadata,
        raw_samples: &[ConfidenceSample],
        answers: Vec<String>,
        timestamp: DateTime<Utc>,
        owner: &UserId,
    ) -> InterviewResult<SavedInterview> {
        let record =
            InterviewRecord::assemble(metadata, raw_samples, answers, timestamp, owner.clone());
        let overall_confidence = record.overall_confidence();

        log_info!(
            "Saving interview for user {} ({} samples, overall confidence {:.2})",
            owner,
            record.samples.len(),
            overall_confidence
        );

        let interview = self.store.insert(record.into_row()).await.map_err(|err| {
            log_error!("Failed to save interview for user {}: {err:#}", owner);
            InterviewError::Persistence(err)
        })?;

        Ok(SavedInterview {
            overall_confidence,
            interview,
        })
    }

    /// Every stored interview owned by `owner`. An owner with no interviews
    /// gets an empty list.
    pub async fn list_by_user(&self, owner: &UserId) -> InterviewResult<Vec<PersistedInterview>> {
        self.store.list_by_user(owner).await.map_err(|err| {
            log_error!("Failed to list interviews for user {}: {err:#}", owner);
            InterviewError::Persistence(err)
        })
    }

    /// Authenticate `credential`, then save the submission for that user.
    pub async fn save_submission(
        &self,
        credential: &str,
        submission: InterviewSubmission,
    ) -> InterviewResult<SavedInterview> {
        let owner = self.authenticator.resolve(credential).await?;
        self.save(
            submission.metadata,
            &submission.confidence_data,
            submission.answers,
            submission.timestamp,
            &owner,
        )
        .await
    }

    /// Authenticate `credential`, then list that user's interviews.
    pub async fn list_for_credential(
        &self,
        credential: &str,
    ) -> InterviewResult<Vec<PersistedInterview>> {
        let owner = self.authenticator.resolve(credential).await?;
        self.list_by_user(&owner).await
    }
}
