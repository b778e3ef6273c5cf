//! Interview data models.
//!
//! - `InterviewSubmission`, `InterviewMetadata`: what a caller sends in
//! - `InterviewRecord`: transient, built once per save, owns the samples
//! - `NewInterview`, `PersistedInterview`: the row handed to and read from the store

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scoring::{aggregate, normalize_all};

use super::{ConfidenceSample, UserId};

/// Caller-supplied description of an interview.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InterviewMetadata {
    /// Accepted for payload compatibility and never trusted; ownership is
    /// always taken from the authenticated caller.
    #[serde(default, skip_serializing)]
    pub user_id: Option<String>,
    pub job_role: String,
    #[serde(default)]
    pub interview_name: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
}

impl InterviewMetadata {
    pub fn new(job_role: impl Into<String>) -> Self {
        Self {
            job_role: job_role.into(),
            ..Self::default()
        }
    }

    pub fn with_interview_name(mut self, name: impl Into<String>) -> Self {
        self.interview_name = Some(name.into());
        self
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }
}

/// Full save request body as a transport layer would receive it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewSubmission {
    #[serde(flatten)]
    pub metadata: InterviewMetadata,
    #[serde(default)]
    pub confidence_data: Vec<ConfidenceSample>,
    #[serde(default)]
    pub answers: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

/// One interview as assembled at save time.
///
/// `overall_confidence` is computed in [`InterviewRecord::assemble`] and is
/// read-only afterwards.
#[derive(Debug, Clone)]
pub struct InterviewRecord {
    pub user_id: UserId,
    pub job_role: String,
    pub interview_name: Option<String>,
    pub level: Option<String>,
    /// Normalized samples in capture order.
    pub samples: Vec<ConfidenceSample>,
    /// One entry per question, in question order.
    pub answers: Vec<String>,
    pub timestamp: DateTime<Utc>,
    overall_confidence: f64,
}

impl InterviewRecord {
    pub fn assemble(
        metadata: InterviewMetadata,
        raw_samples: &[ConfidenceSample],
        answers: Vec<String>,
        timestamp: DateTime<Utc>,
        owner: UserId,
    ) -> Self {
        let samples = normalize_all(raw_samples);
        let overall_confidence = aggregate(&samples);

        Self {
            user_id: owner,
            job_role: metadata.job_role,
            interview_name: metadata.interview_name,
            level: metadata.level,
            samples,
            answers,
            timestamp,
            overall_confidence,
        }
    }

    pub fn overall_confidence(&self) -> f64 {
        self.overall_confidence
    }

    /// Drops the sample series and keeps only the aggregate.
    pub fn into_row(self) -> NewInterview {
        NewInterview {
            user_id: self.user_id,
            job_role: self.job_role,
            interview_name: self.interview_name,
            level: self.level,
            confidence: self.overall_confidence,
            answers: self.answers,
            timestamp: self.timestamp,
        }
    }
}

/// Row shape handed to the store on insert.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewInterview {
    pub user_id: UserId,
    pub job_role: String,
    pub interview_name: Option<String>,
    pub level: Option<String>,
    pub confidence: f64,
    pub answers: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

/// Row shape read back from the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersistedInterview {
    pub id: String,
    pub user_id: UserId,
    pub job_role: String,
    pub interview_name: Option<String>,
    pub level: Option<String>,
    pub confidence: f64,
    pub answers: Vec<String>,
    pub timestamp: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
