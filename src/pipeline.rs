// Batch orchestration: load -> align -> summarize -> compare -> report
//
// One invocation processes every requested group and checkpoint, then
// terminates. Groups are independent: a failure in one is recorded as a
// skipped item and never aborts the others. Likewise each comparison —
// the worst case is an omission that stays visible in the report.

use anyhow::Result;

use crate::align::align;
use crate::aggregate::summarize;
use crate::compare::{omnibus_test, pairwise_test};
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::report::{AnalysisReport, ComparisonRecord, GroupSummary, SkippedItem};
use crate::series::{Checkpoint, GroupMatrix};
use crate::slice::cross_section;
use crate::source::SeriesSource;

/// Run the full analysis over the listed groups and checkpoints
///
/// Group order matters for comparisons: at each checkpoint the earlier
/// listed group of every pair is the baseline whose stddev scales Glass's
/// delta, and the omnibus test runs whenever at least 3 groups have data.
///
/// # Errors
/// Only on invalid configuration. Per-group and per-comparison failures are
/// reported in the returned [`AnalysisReport::skipped`] list instead.
pub fn run_analysis(
    source: &dyn SeriesSource,
    groups: &[String],
    checkpoints: &[Checkpoint],
    config: &AnalysisConfig,
) -> Result<AnalysisReport> {
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    let mut skipped: Vec<SkippedItem> = Vec::new();

    // Build each group's matrix once; it is read-only from here on.
    let mut matrices: Vec<(String, GroupMatrix)> = Vec::new();
    for group in groups {
        match load_group(source, group) {
            Ok(matrix) => matrices.push((group.clone(), matrix)),
            Err(reason) => {
                tracing::warn!("skipping group {}: {}", group, reason);
                skipped.push(SkippedItem {
                    item: format!("group {}", group),
                    reason,
                });
            }
        }
    }

    let summaries: Vec<GroupSummary> = matrices
        .iter()
        .map(|(group, matrix)| GroupSummary {
            group: group.clone(),
            points: summarize(matrix),
        })
        .collect();

    let mut comparisons: Vec<ComparisonRecord> = Vec::new();
    for &checkpoint in checkpoints {
        // Cross-sections for the groups that recorded this checkpoint
        let mut sections: Vec<(&str, Vec<f64>)> = Vec::new();
        for (group, matrix) in &matrices {
            match cross_section(matrix, checkpoint) {
                Ok(values) => sections.push((group.as_str(), values)),
                Err(AnalysisError::CheckpointNotFound { .. }) => {
                    skipped.push(SkippedItem {
                        item: format!("{} @ checkpoint {}", group, checkpoint),
                        reason: "no trial recorded this checkpoint".to_string(),
                    });
                }
                Err(e) => {
                    skipped.push(SkippedItem {
                        item: format!("{} @ checkpoint {}", group, checkpoint),
                        reason: e.to_string(),
                    });
                }
            }
        }

        if sections.len() >= 3 {
            let refs: Vec<&[f64]> = sections.iter().map(|(_, v)| v.as_slice()).collect();
            match omnibus_test(&refs) {
                Ok(result) => comparisons.push(ComparisonRecord::Omnibus {
                    checkpoint,
                    groups: sections.iter().map(|(g, _)| g.to_string()).collect(),
                    statistic: result.statistic,
                    pvalue: result.pvalue,
                    significant: result.pvalue < config.significance_level,
                }),
                Err(e) => {
                    tracing::warn!("omnibus test failed at checkpoint {}: {}", checkpoint, e);
                    skipped.push(SkippedItem {
                        item: format!("omnibus @ checkpoint {}", checkpoint),
                        reason: e.to_string(),
                    });
                }
            }
        }

        // All listed-order pairs; the earlier group is the baseline.
        for i in 0..sections.len() {
            for j in (i + 1)..sections.len() {
                let (baseline, base_values) = &sections[i];
                let (treatment, treat_values) = &sections[j];
                let label = format!("{} vs {} @ checkpoint {}", baseline, treatment, checkpoint);

                if base_values.len() < config.min_sample_size
                    || treat_values.len() < config.min_sample_size
                {
                    skipped.push(SkippedItem {
                        item: label,
                        reason: format!(
                            "fewer than {} contributing trials",
                            config.min_sample_size
                        ),
                    });
                    continue;
                }

                match pairwise_test(base_values, treat_values) {
                    Ok(result) => comparisons.push(ComparisonRecord::Pairwise {
                        checkpoint,
                        baseline: baseline.to_string(),
                        treatment: treatment.to_string(),
                        statistic: result.statistic,
                        pvalue: result.pvalue,
                        glass_delta: result.glass_delta,
                        significant: result.pvalue < config.significance_level,
                    }),
                    Err(e) => {
                        tracing::warn!("pairwise test skipped ({}): {}", label, e);
                        skipped.push(SkippedItem {
                            item: label,
                            reason: e.to_string(),
                        });
                    }
                }
            }
        }
    }

    Ok(AnalysisReport {
        summaries,
        comparisons,
        skipped,
    })
}

/// Load and align one group; the error string becomes the skip reason
fn load_group(source: &dyn SeriesSource, group: &str) -> std::result::Result<GroupMatrix, String> {
    let trial_ids = source.trial_ids(group).map_err(|e| format!("{:#}", e))?;

    let mut series = Vec::new();
    for trial in &trial_ids {
        match source.fetch(group, trial) {
            Ok(s) => series.push(s),
            Err(e) => {
                // Unreadable/malformed trial: warn and move on, never fatal
                tracing::warn!("skipping trial {}/{}: {:#}", group, trial, e);
            }
        }
    }

    align(&series).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::TrialSeries;
    use std::collections::HashMap;

    /// In-memory source for pipeline tests
    struct FixtureSource {
        groups: HashMap<String, Vec<(String, TrialSeries)>>,
    }

    impl FixtureSource {
        fn new() -> Self {
            Self {
                groups: HashMap::new(),
            }
        }

        fn with_group(mut self, name: &str, trials: Vec<Vec<(u64, f64)>>) -> Self {
            let trials = trials
                .into_iter()
                .enumerate()
                .map(|(i, pairs)| (format!("run-{}", i), TrialSeries::from_pairs(pairs)))
                .collect();
            self.groups.insert(name.to_string(), trials);
            self
        }
    }

    impl SeriesSource for FixtureSource {
        fn trial_ids(&self, group: &str) -> Result<Vec<String>> {
            self.groups
                .get(group)
                .map(|trials| trials.iter().map(|(id, _)| id.clone()).collect())
                .ok_or_else(|| anyhow::anyhow!("unknown group {}", group))
        }

        fn fetch(&self, group: &str, trial: &str) -> Result<TrialSeries> {
            self.groups
                .get(group)
                .and_then(|trials| trials.iter().find(|(id, _)| id == trial))
                .map(|(_, series)| series.clone())
                .ok_or_else(|| anyhow::anyhow!("unknown trial {}/{}", group, trial))
        }
    }

    fn series_at(checkpoint: u64, values: &[f64]) -> Vec<Vec<(u64, f64)>> {
        values.iter().map(|&v| vec![(checkpoint, v)]).collect()
    }

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_run_analysis_three_groups() {
        let source = FixtureSource::new()
            .with_group("nofa", series_at(40, &[10.0, 12.0, 11.0, 13.0]))
            .with_group("lora", series_at(40, &[20.0, 22.0, 21.0, 23.0]))
            .with_group("small", series_at(40, &[10.0, 12.0, 11.0, 13.0, 12.0]));

        let report = run_analysis(
            &source,
            &names(&["nofa", "lora", "small"]),
            &[40],
            &AnalysisConfig::default(),
        )
        .unwrap();

        assert_eq!(report.summaries.len(), 3);
        // One omnibus + three pairs
        assert_eq!(report.comparisons.len(), 4);
        assert!(report.skipped.is_empty());

        match &report.comparisons[0] {
            ComparisonRecord::Omnibus {
                pvalue, significant, ..
            } => {
                assert!(*significant, "shifted group should be detected, p={}", pvalue);
            }
            other => panic!("expected omnibus first, got {:?}", other),
        }

        // First pair is earlier-listed baseline vs next group
        match &report.comparisons[1] {
            ComparisonRecord::Pairwise {
                baseline,
                treatment,
                glass_delta,
                ..
            } => {
                assert_eq!(baseline, "nofa");
                assert_eq!(treatment, "lora");
                assert!((glass_delta - 7.7459666924).abs() < 1e-8);
            }
            other => panic!("expected pairwise, got {:?}", other),
        }
    }

    #[test]
    fn test_failed_group_does_not_abort_others() {
        let source = FixtureSource::new()
            .with_group("nofa", series_at(0, &[1.0, 2.0, 3.0]))
            .with_group("lora", series_at(0, &[4.0, 5.0, 6.0]));

        let report = run_analysis(
            &source,
            &names(&["nofa", "missing", "lora"]),
            &[0],
            &AnalysisConfig::default(),
        )
        .unwrap();

        assert_eq!(report.summaries.len(), 2);
        assert!(report
            .skipped
            .iter()
            .any(|s| s.item == "group missing"));
        // The two surviving groups still get their pairwise comparison
        assert_eq!(report.comparisons.len(), 1);
    }

    #[test]
    fn test_group_with_no_trials_skipped() {
        let source = FixtureSource::new()
            .with_group("empty", vec![])
            .with_group("nofa", series_at(0, &[1.0, 2.0]));

        let report = run_analysis(
            &source,
            &names(&["empty", "nofa"]),
            &[],
            &AnalysisConfig::default(),
        )
        .unwrap();

        assert_eq!(report.summaries.len(), 1);
        assert!(report
            .skipped
            .iter()
            .any(|s| s.item == "group empty" && s.reason.contains("no trial series")));
    }

    #[test]
    fn test_missing_checkpoint_skips_comparison_not_run() {
        // "small" has no data at checkpoint 40: its comparisons are skipped,
        // the remaining pair still runs, and no omnibus (only 2 sections).
        let source = FixtureSource::new()
            .with_group("nofa", series_at(40, &[10.0, 12.0, 11.0]))
            .with_group("lora", series_at(40, &[20.0, 22.0, 21.0]))
            .with_group("small", series_at(10, &[1.0, 2.0, 3.0]));

        let report = run_analysis(
            &source,
            &names(&["nofa", "lora", "small"]),
            &[40],
            &AnalysisConfig::default(),
        )
        .unwrap();

        assert!(report
            .skipped
            .iter()
            .any(|s| s.item.contains("small") && s.item.contains("40")));
        assert_eq!(report.comparisons.len(), 1);
        assert!(matches!(
            report.comparisons[0],
            ComparisonRecord::Pairwise { .. }
        ));
    }

    #[test]
    fn test_zero_variance_baseline_reported_not_nan() {
        let source = FixtureSource::new()
            .with_group("flat", series_at(0, &[5.0, 5.0, 5.0]))
            .with_group("lora", series_at(0, &[6.0, 7.0, 8.0]));

        let report = run_analysis(
            &source,
            &names(&["flat", "lora"]),
            &[0],
            &AnalysisConfig::default(),
        )
        .unwrap();

        // Delta undefined: comparison lands in the skip list, never as NaN
        assert!(report.comparisons.is_empty());
        assert!(report
            .skipped
            .iter()
            .any(|s| s.reason.contains("zero variance")));
    }

    #[test]
    fn test_small_sections_skipped_by_config() {
        let source = FixtureSource::new()
            .with_group("nofa", series_at(0, &[1.0, 2.0, 3.0]))
            .with_group("lora", series_at(0, &[4.0, 5.0, 6.0]));

        let config = AnalysisConfig {
            min_sample_size: 5,
            ..AnalysisConfig::default()
        };
        let report =
            run_analysis(&source, &names(&["nofa", "lora"]), &[0], &config).unwrap();

        assert!(report.comparisons.is_empty());
        assert!(report
            .skipped
            .iter()
            .any(|s| s.reason.contains("fewer than 5")));
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let source = FixtureSource::new();
        let config = AnalysisConfig {
            significance_level: 2.0,
            ..AnalysisConfig::default()
        };
        assert!(run_analysis(&source, &[], &[], &config).is_err());
    }
}
