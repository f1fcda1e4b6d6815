// Per-checkpoint aggregation: mean, SEM, and 95% confidence half-width
//
// SEM uses the sample standard deviation (n-1 denominator) throughout the
// crate, including the Glass's delta denominator in the comparison engine.
// The half-width is the normal-approximation 95% band (1.96 x SEM).

use serde::Serialize;

use crate::series::{Checkpoint, GroupMatrix};

/// z-score for a two-sided 95% confidence interval (normal approximation)
const CONFIDENCE_Z: f64 = 1.96;

/// Cross-trial summary for one (group, checkpoint) cell
///
/// `n` is always >= 1: checkpoints nobody recorded are absent from the
/// matrix, so they never appear here as NaN rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryPoint {
    pub checkpoint: Checkpoint,
    /// Number of trials contributing at this checkpoint
    pub n: usize,
    pub mean: f64,
    /// Standard error of the mean (0 when n=1)
    pub sem: f64,
    /// 95% confidence half-width (1.96 x SEM)
    pub ci95: f64,
}

/// Summarize a group matrix into one point per checkpoint, ascending
pub fn summarize(matrix: &GroupMatrix) -> Vec<SummaryPoint> {
    matrix
        .iter()
        .map(|(checkpoint, values)| {
            let n = values.len();
            let sem = if n > 1 {
                sample_stddev(values) / (n as f64).sqrt()
            } else {
                0.0
            };
            SummaryPoint {
                checkpoint,
                n,
                mean: mean(values),
                sem,
                ci95: CONFIDENCE_Z * sem,
            }
        })
        .collect()
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n-1 denominator); 0 when fewer than 2 values
pub(crate) fn sample_stddev(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    (ss / (n - 1) as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::align;
    use crate::series::TrialSeries;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn matrix_from(trials: &[TrialSeries]) -> GroupMatrix {
        align(trials).unwrap()
    }

    #[test]
    fn test_summarize_known_values() {
        let trials = [
            TrialSeries::from_pairs([(0, 5.0)]),
            TrialSeries::from_pairs([(0, 7.0)]),
            TrialSeries::from_pairs([(0, 9.0)]),
        ];
        let points = summarize(&matrix_from(&trials));

        assert_eq!(points.len(), 1);
        let p = &points[0];
        assert_eq!(p.n, 3);
        assert!((p.mean - 7.0).abs() < 1e-12);
        // sample stddev = 2, sem = 2/sqrt(3)
        assert!((p.sem - 1.1547005383792517).abs() < 1e-12);
        assert!((p.ci95 - 2.2632130552233333).abs() < 1e-12);
    }

    #[test]
    fn test_summarize_n_matches_contributor_count() {
        let trials = [
            TrialSeries::from_pairs([(0, 1.0), (1, 2.0), (2, 3.0)]),
            TrialSeries::from_pairs([(0, 4.0), (2, 5.0)]),
            TrialSeries::from_pairs([(2, 6.0)]),
        ];
        let matrix = matrix_from(&trials);

        for point in summarize(&matrix) {
            assert_eq!(point.n, matrix.contributor_count(point.checkpoint));
        }
    }

    #[test]
    fn test_summarize_single_trial_sem_zero() {
        let trials = [TrialSeries::from_pairs([(3, 42.0)])];
        let points = summarize(&matrix_from(&trials));

        assert_eq!(points[0].n, 1);
        assert_eq!(points[0].sem, 0.0);
        assert_eq!(points[0].ci95, 0.0);
        assert_eq!(points[0].mean, 42.0);
    }

    #[test]
    fn test_summarize_ascending_checkpoints() {
        let trials = [TrialSeries::from_pairs([(9, 1.0), (2, 1.0), (5, 1.0)])];
        let checkpoints: Vec<u64> = summarize(&matrix_from(&trials))
            .iter()
            .map(|p| p.checkpoint)
            .collect();
        assert_eq!(checkpoints, vec![2, 5, 9]);
    }

    #[test]
    fn test_sem_shrinks_with_sample_size() {
        // Resample from a fixed uniform population: average SEM at n=40
        // should come out below average SEM at n=5.
        let mut rng = StdRng::seed_from_u64(7);
        let average_sem = |rng: &mut StdRng, n: usize| -> f64 {
            let resamples = 50;
            let mut total = 0.0;
            for _ in 0..resamples {
                let sample: Vec<f64> = (0..n).map(|_| rng.gen::<f64>() * 10.0).collect();
                total += sample_stddev(&sample) / (n as f64).sqrt();
            }
            total / resamples as f64
        };

        let sem_small = average_sem(&mut rng, 5);
        let sem_large = average_sem(&mut rng, 40);
        assert!(
            sem_large < sem_small,
            "expected SEM to shrink: n=5 gave {}, n=40 gave {}",
            sem_small,
            sem_large
        );
    }

    #[test]
    fn test_sample_stddev_constant_values() {
        assert_eq!(sample_stddev(&[5.0, 5.0, 5.0, 5.0]), 0.0);
    }

    #[test]
    fn test_sample_stddev_single_value() {
        assert_eq!(sample_stddev(&[3.0]), 0.0);
    }
}
