pub mod confidence;
pub mod interview;
pub mod user;

pub use confidence::{ConfidenceSample, ConfidenceSummary, MAX_CONFIDENCE};
pub use interview::{
    InterviewMetadata, InterviewRecord, InterviewSubmission, NewInterview, PersistedInterview,
};
pub use user::UserId;
