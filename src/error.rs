// Error taxonomy for alignment, aggregation, and comparison
//
// Alignment/aggregation errors are per-group and comparison errors are
// per-comparison: the pipeline records them as skipped items and keeps
// going, so the worst case is always a visible omission in the report.

use thiserror::Error;

use crate::series::Checkpoint;

/// Errors for the aggregation-and-comparison engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("no trial series supplied for group")]
    EmptyInput,

    #[error("checkpoint {checkpoint} has no contributing trials")]
    CheckpointNotFound { checkpoint: Checkpoint },

    #[error("omnibus test needs at least 3 cross-sections, got {actual}")]
    InsufficientGroups { actual: usize },

    #[error("degenerate sample: {reason}")]
    DegenerateSample { reason: String },

    #[error("baseline group has zero variance, Glass's delta is undefined")]
    ZeroVariance,
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
