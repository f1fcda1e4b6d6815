// Structured analysis report: trajectories, comparisons, skipped items
//
// The core returns plain values; rendering is a stateless consumer. Text
// output goes to humans, JSON to downstream tooling (plot scripts read the
// per-group SummaryPoint sequences for trajectory + band rendering).

use serde::Serialize;

use crate::aggregate::SummaryPoint;
use crate::series::Checkpoint;

/// Ordered trajectory summary for one experimental condition
#[derive(Debug, Clone, Serialize)]
pub struct GroupSummary {
    pub group: String,
    pub points: Vec<SummaryPoint>,
}

/// One comparison outcome, tagged with checkpoint and group names
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ComparisonRecord {
    Omnibus {
        checkpoint: Checkpoint,
        groups: Vec<String>,
        statistic: f64,
        pvalue: f64,
        significant: bool,
    },
    Pairwise {
        checkpoint: Checkpoint,
        baseline: String,
        treatment: String,
        statistic: f64,
        pvalue: f64,
        glass_delta: f64,
        significant: bool,
    },
}

/// A group or comparison the run had to omit, with the reason
///
/// Skips are always listed in the final report; nothing is dropped silently.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedItem {
    pub item: String,
    pub reason: String,
}

/// Complete output of one analysis run
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub summaries: Vec<GroupSummary>,
    pub comparisons: Vec<ComparisonRecord>,
    pub skipped: Vec<SkippedItem>,
}

impl AnalysisReport {
    /// Generate human-readable report
    pub fn to_report_string(&self) -> String {
        let mut report = String::new();

        report.push_str("📈 Group Trajectories:\n");
        for summary in &self.summaries {
            match (summary.points.first(), summary.points.last()) {
                (Some(first), Some(last)) => {
                    report.push_str(&format!(
                        "  {} ({} checkpoints {}..{}): final mean={:.4} ±{:.4} (n={})\n",
                        summary.group,
                        summary.points.len(),
                        first.checkpoint,
                        last.checkpoint,
                        last.mean,
                        last.ci95,
                        last.n
                    ));
                }
                _ => {
                    report.push_str(&format!("  {}: no checkpoints\n", summary.group));
                }
            }
        }

        if !self.comparisons.is_empty() {
            report.push_str("\n📊 Comparisons:\n");
            for record in &self.comparisons {
                match record {
                    ComparisonRecord::Omnibus {
                        checkpoint,
                        groups,
                        statistic,
                        pvalue,
                        significant,
                    } => {
                        report.push_str(&format!(
                            "  [checkpoint {}] omnibus over {}: H={:.4}, p={:.4}{}\n",
                            checkpoint,
                            groups.join(", "),
                            statistic,
                            pvalue,
                            if *significant { " *" } else { "" }
                        ));
                    }
                    ComparisonRecord::Pairwise {
                        checkpoint,
                        baseline,
                        treatment,
                        statistic,
                        pvalue,
                        glass_delta,
                        significant,
                    } => {
                        report.push_str(&format!(
                            "  [checkpoint {}] {} vs {}: z={:.4}, p={:.4}, Glass's delta={:.4}{}\n",
                            checkpoint,
                            baseline,
                            treatment,
                            statistic,
                            pvalue,
                            glass_delta,
                            if *significant { " *" } else { "" }
                        ));
                    }
                }
            }
        }

        if !self.skipped.is_empty() {
            report.push_str(&format!("\n🔇 Skipped ({}):\n", self.skipped.len()));
            for item in &self.skipped {
                report.push_str(&format!("  - {}: {}\n", item.item, item.reason));
            }
        }

        report
    }
}
