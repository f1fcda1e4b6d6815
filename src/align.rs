// Union-by-checkpoint alignment of ragged trial series
//
// Each checkpoint appearing in at least one input collects a value from
// every trial defining it. No interpolation, no zero-fill, no dropping of
// partial checkpoints: a trial missing a checkpoint simply contributes
// nothing there.

use std::collections::BTreeMap;

use crate::error::{AnalysisError, Result};
use crate::series::{Checkpoint, GroupMatrix, TrialSeries};

/// Combine a group's trial series into one indexed [`GroupMatrix`]
///
/// Values at each checkpoint appear in trial order. The order carries no
/// meaning for the statistics downstream, but it is deterministic so test
/// fixtures can assert on matrix contents.
///
/// # Errors
/// `EmptyInput` when `trials` is empty — a group with no trials is skipped
/// by the pipeline, never summarized as an empty trajectory.
pub fn align(trials: &[TrialSeries]) -> Result<GroupMatrix> {
    if trials.is_empty() {
        return Err(AnalysisError::EmptyInput);
    }

    let mut cells: BTreeMap<Checkpoint, Vec<f64>> = BTreeMap::new();
    for series in trials {
        for (checkpoint, value) in series.iter() {
            cells.entry(checkpoint).or_default().push(value);
        }
    }

    Ok(GroupMatrix::from_cells(cells))
}
