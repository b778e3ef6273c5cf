pub mod service;
pub mod store;

pub use service::{InterviewService, SavedInterview};
pub use store::InterviewStore;
