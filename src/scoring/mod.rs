//! Confidence scoring: per-sample normalization and the duration-weighted
//! reduction to one overall score per interview.
//!
//! Everything here is pure and synchronous.

pub mod aggregate;
pub mod normalize;

pub use aggregate::{aggregate, summarize};
pub use normalize::{normalize, normalize_all};
