//! Cotejo - statistical comparison engine for evolutionary experiment runs
//!
//! This library aggregates per-trial metric series into group-level
//! trajectories with 95% confidence bands, and runs nonparametric
//! comparisons (Kruskal-Wallis omnibus, Wilcoxon rank-sum pairwise with
//! Glass's delta) between experimental conditions at chosen checkpoints.

pub mod aggregate;
pub mod align;
pub mod cli;
pub mod compare;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod series;
pub mod slice;
pub mod source;
