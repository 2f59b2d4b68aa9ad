//! Error types for the statistics engine.
//!
//! Data irregularities (missing weights, out-of-range log values, negative
//! budgets) are never errors here; they are clamped or defaulted at the point
//! of use. Errors are reserved for boundary contract violations, such as
//! asking about a project the snapshot does not contain.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("project not found in snapshot: {0}")]
    ProjectNotFound(i64),
}
