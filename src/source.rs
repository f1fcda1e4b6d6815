// Series sources: where per-trial metric series come from
//
// The core never touches the filesystem directly; it consumes the
// [`SeriesSource`] trait. `CsvDirSource` is the adapter for the layout the
// experiment runners write: one directory per condition, one subdirectory
// per trial, one CSV of per-generation metrics inside each trial.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::series::TrialSeries;

/// Supplier of per-trial metric series for named groups
pub trait SeriesSource {
    /// Trial ids for a group, in deterministic order
    fn trial_ids(&self, group: &str) -> Result<Vec<String>>;

    /// The ordered (checkpoint, value) series recorded by one trial
    fn fetch(&self, group: &str, trial: &str) -> Result<TrialSeries>;
}

/// Filesystem source reading `<root>/<group>/<trial>/<metrics file>`
///
/// Each CSV row is one checkpoint (the row index is the generation number);
/// the metric is taken from a configurable 0-based column. Rows whose cell
/// is missing or not a finite number are dropped, which keeps the series
/// ragged instead of inventing values.
#[derive(Debug, Clone)]
pub struct CsvDirSource {
    root: PathBuf,
    file_name: String,
    value_column: usize,
}

impl CsvDirSource {
    pub fn new<P: Into<PathBuf>>(root: P, value_column: usize) -> Self {
        Self {
            root: root.into(),
            file_name: "dist.csv".to_string(),
            value_column,
        }
    }

    /// Override the metrics file name looked up inside each trial directory
    pub fn with_file_name(mut self, file_name: &str) -> Self {
        self.file_name = file_name.to_string();
        self
    }

    fn parse_csv(&self, path: &Path) -> Result<TrialSeries> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;

        let mut series = TrialSeries::new();
        for (row, line) in content.lines().enumerate() {
            let Some(cell) = line.split(',').nth(self.value_column) else {
                tracing::debug!("{}: row {} has no column {}", path.display(), row, self.value_column);
                continue;
            };
            match cell.trim().parse::<f64>() {
                Ok(value) if value.is_finite() => series.insert(row as u64, value),
                _ => {
                    tracing::debug!("{}: row {} value {:?} not parsable", path.display(), row, cell);
                }
            }
        }

        if series.is_empty() {
            anyhow::bail!("no parsable values in {}", path.display());
        }
        Ok(series)
    }
}

impl SeriesSource for CsvDirSource {
    fn trial_ids(&self, group: &str) -> Result<Vec<String>> {
        let group_dir = self.root.join(group);
        let entries = fs::read_dir(&group_dir)
            .with_context(|| format!("failed to list group directory {}", group_dir.display()))?;

        let mut ids: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_dir())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect();
        ids.sort(); // read_dir order is platform-dependent; fixtures need determinism
        Ok(ids)
    }

    fn fetch(&self, group: &str, trial: &str) -> Result<TrialSeries> {
        let path = self.root.join(group).join(trial).join(&self.file_name);
        self.parse_csv(&path)
    }
}
