// Core data model: trial series and group matrices
//
// Per-trial series are ragged: checkpoints need not be contiguous or
// complete, so both structures are sparse ordered maps keyed by checkpoint.
// Fixed-length arrays would silently corrupt results whenever trial lengths
// disagree.

use std::collections::BTreeMap;

/// Discrete ordinal position at which a metric is recorded (e.g. generation)
pub type Checkpoint = u64;

/// Ordered checkpoint -> value mapping for one independent trial run
///
/// Immutable after load: the source adapter builds it once and the rest of
/// the pipeline only reads it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrialSeries {
    points: BTreeMap<Checkpoint, f64>,
}

impl TrialSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Checkpoint, f64)>,
    {
        Self {
            points: pairs.into_iter().collect(),
        }
    }

    /// Record a value at a checkpoint (last write wins within a trial)
    pub fn insert(&mut self, checkpoint: Checkpoint, value: f64) {
        self.points.insert(checkpoint, value);
    }

    pub fn get(&self, checkpoint: Checkpoint) -> Option<f64> {
        self.points.get(&checkpoint).copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterate (checkpoint, value) pairs in ascending checkpoint order
    pub fn iter(&self) -> impl Iterator<Item = (Checkpoint, f64)> + '_ {
        self.points.iter().map(|(&c, &v)| (c, v))
    }
}

/// Checkpoint -> per-trial values for one named experimental condition
///
/// Built once by [`crate::align::align`] from the union of a group's trial
/// series and immutable thereafter (write-once/read-many). Every value at a
/// checkpoint came from a distinct trial; a trial missing the checkpoint
/// contributes nothing — ragged alignment, never zero-fill.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupMatrix {
    cells: BTreeMap<Checkpoint, Vec<f64>>,
}

impl GroupMatrix {
    pub(crate) fn from_cells(cells: BTreeMap<Checkpoint, Vec<f64>>) -> Self {
        Self { cells }
    }

    /// Values recorded at a checkpoint, in trial order, if any trial has it
    pub fn contributors(&self, checkpoint: Checkpoint) -> Option<&[f64]> {
        self.cells.get(&checkpoint).map(Vec::as_slice)
    }

    /// Number of trials contributing at a checkpoint (0 when absent)
    pub fn contributor_count(&self, checkpoint: Checkpoint) -> usize {
        self.cells.get(&checkpoint).map_or(0, Vec::len)
    }

    /// Number of distinct checkpoints with at least one contributor
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate (checkpoint, values) in ascending checkpoint order
    pub fn iter(&self) -> impl Iterator<Item = (Checkpoint, &[f64])> + '_ {
        self.cells.iter().map(|(&c, v)| (c, v.as_slice()))
    }
}
