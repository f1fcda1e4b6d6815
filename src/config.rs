// Configuration for the comparison pipeline

use serde::{Deserialize, Serialize};

/// Settings shared by every comparison in one analysis run
///
/// # Example
/// ```
/// use cotejo::config::AnalysisConfig;
///
/// let config = AnalysisConfig::default();
/// assert_eq!(config.significance_level, 0.05); // 95% confidence
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Significance level (alpha) used to flag comparisons in the report
    ///
    /// Flagging only: every computed p-value is reported either way, so a
    /// reader can apply a different threshold after the fact.
    pub significance_level: f64,

    /// Minimum per-section sample size for running a test
    ///
    /// Sections smaller than this are skipped (and listed as skipped) rather
    /// than tested: rank tests on one or two trials carry no power and only
    /// add noise to the report.
    pub min_sample_size: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            significance_level: 0.05, // 95% confidence (standard in science)
            min_sample_size: 2,
        }
    }
}

impl AnalysisConfig {
    /// Strict configuration: fewer false positives, more skipped tests
    pub fn strict() -> Self {
        Self {
            significance_level: 0.01, // 99% confidence
            min_sample_size: 5,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.significance_level) {
            return Err(format!(
                "significance_level must be in [0, 1], got {}",
                self.significance_level
            ));
        }

        if self.min_sample_size < 1 {
            return Err("min_sample_size must be >= 1".to_string());
        }

        Ok(())
    }
}
