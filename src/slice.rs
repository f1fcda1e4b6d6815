// Cross-section extraction: one group's per-trial values at one checkpoint

use crate::error::{AnalysisError, Result};
use crate::series::{Checkpoint, GroupMatrix};

/// Per-trial values recorded for a group at one checkpoint
///
/// Errors with `CheckpointNotFound` when no trial contributes, so a caller
/// can never silently feed an empty sequence into a statistical test.
pub fn cross_section(matrix: &GroupMatrix, checkpoint: Checkpoint) -> Result<Vec<f64>> {
    matrix
        .contributors(checkpoint)
        .map(<[f64]>::to_vec)
        .ok_or(AnalysisError::CheckpointNotFound { checkpoint })
}
