//! Histogram density estimation.

use anomaly_api::{check_bin_count, DEFAULT_BIN_COUNT};
use anomaly_spi::{AnomalyError, Histogram, Result, DENSITY_FLOOR};

/// Builds floored, normalized histograms with a fixed bin count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DensityEstimator {
    bin_count: usize,
}

impl DensityEstimator {
    pub fn new(bin_count: usize) -> Result<Self> {
        check_bin_count(bin_count)?;
        Ok(Self { bin_count })
    }

    pub fn bin_count(&self) -> usize {
        self.bin_count
    }

    pub fn estimate(&self, data: &[f64]) -> Result<Histogram> {
        histogram(data, self.bin_count)
    }
}

impl Default for DensityEstimator {
    fn default() -> Self {
        Self {
            bin_count: DEFAULT_BIN_COUNT,
        }
    }
}

/// Histogram of `data` over `bin_count` equal-width bins spanning
/// `[min, max]`.
///
/// Each cell holds the fraction of samples falling in it, so the cells sum
/// to 1, and then [`DENSITY_FLOOR`] is added to every cell. Bins are
/// half-open except the last, which also takes `max`. A constant input
/// spans `[v - 0.5, v + 0.5]`.
///
/// Every sample is binned on its own, so the result does not depend on
/// accumulation order.
pub fn histogram(data: &[f64], bin_count: usize) -> Result<Histogram> {
    check_bin_count(bin_count)?;
    if data.is_empty() {
        return Err(AnomalyError::invalid("data", "sample sequence is empty"));
    }
    if let Some(i) = data.iter().position(|x| !x.is_finite()) {
        return Err(AnomalyError::invalid(
            "data",
            format!("non-finite value at index {}", i),
        ));
    }

    let (mut lo, mut hi) = data
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
            (lo.min(x), hi.max(x))
        });
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let span = hi - lo;
    if !span.is_finite() {
        return Err(AnomalyError::invalid("data", "value range overflows f64"));
    }

    let edges = bin_edges(lo, hi, bin_count);
    let norm = bin_count as f64 / span;
    let mut counts = vec![0usize; bin_count];
    for &x in data {
        counts[bin_index(x, lo, norm, &edges)] += 1;
    }

    let n = data.len() as f64;
    let hist = counts
        .into_iter()
        .map(|c| c as f64 / n + DENSITY_FLOOR)
        .collect();

    Ok(Histogram { hist, edges })
}

fn bin_edges(lo: f64, hi: f64, bin_count: usize) -> Vec<f64> {
    let step = (hi - lo) / bin_count as f64;
    let mut edges: Vec<f64> = (0..=bin_count).map(|i| lo + step * i as f64).collect();
    edges[bin_count] = hi;
    edges
}

fn bin_index(x: f64, lo: f64, norm: f64, edges: &[f64]) -> usize {
    let bins = edges.len() - 1;
    let mut idx = (((x - lo) * norm) as usize).min(bins - 1);
    // The scaled index can land one off the materialized edges.
    if idx > 0 && x < edges[idx] {
        idx -= 1;
    } else if idx + 1 < bins && x >= edges[idx + 1] {
        idx += 1;
    }
    idx
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| 325.0 * (2.0 * std::f64::consts::PI * 50.0 * i as f64 / 1000.0).sin())
            .collect()
    }

    #[test]
    fn test_cells_sum_to_one_plus_floor() {
        for bins in [1, 7, 50, 128] {
            let h = histogram(&sine(1000), bins).unwrap();
            let expected = 1.0 + bins as f64 * DENSITY_FLOOR;
            assert!((h.total() - expected).abs() < 1e-12, "bins={}", bins);
        }
    }

    #[test]
    fn test_edges_invariant() {
        let data = sine(500);
        let h = histogram(&data, 50).unwrap();
        assert_eq!(h.hist.len(), 50);
        assert_eq!(h.edges.len(), 51);
        assert_eq!(h.edges[0], data.iter().cloned().fold(f64::INFINITY, f64::min));
        assert_eq!(h.edges[50], data.iter().cloned().fold(f64::NEG_INFINITY, f64::max));
        assert!(h.edges.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_every_cell_is_floored() {
        let h = histogram(&[0.0, 10.0], 10).unwrap();
        assert!(h.hist.iter().all(|&c| c >= DENSITY_FLOOR));
        assert!((h.hist[0] - (0.5 + DENSITY_FLOOR)).abs() < 1e-15);
        assert!((h.hist[9] - (0.5 + DENSITY_FLOOR)).abs() < 1e-15);
    }

    #[test]
    fn test_max_falls_in_last_bin() {
        let h = histogram(&[0.0, 1.0, 2.0, 3.0, 4.0], 4).unwrap();
        let counts: Vec<f64> = h.hist.iter().map(|c| (c - DENSITY_FLOOR) * 5.0).collect();
        assert_eq!(
            counts.iter().map(|c| c.round() as usize).collect::<Vec<_>>(),
            vec![1, 1, 1, 2]
        );
    }

    #[test]
    fn test_constant_input_widens_range() {
        let h = histogram(&[3.0; 10], 4).unwrap();
        assert_eq!(h.edges[0], 2.5);
        assert_eq!(h.edges[4], 3.5);
        assert!((h.total() - (1.0 + 4.0 * DENSITY_FLOOR)).abs() < 1e-12);
    }

    #[test]
    fn test_deterministic_and_order_independent() {
        let data = sine(1000);
        let mut reversed = data.clone();
        reversed.reverse();
        let a = histogram(&data, 50).unwrap();
        let b = histogram(&data, 50).unwrap();
        let c = histogram(&reversed, 50).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.hist, c.hist);
    }

    #[test]
    fn test_rejects_invalid_input() {
        assert!(matches!(
            histogram(&[], 50),
            Err(AnomalyError::InvalidInput { .. })
        ));
        assert!(histogram(&[1.0, f64::NAN], 50).is_err());
        assert!(histogram(&[1.0, f64::INFINITY], 50).is_err());
        assert!(histogram(&[1.0, 2.0], 0).is_err());
        assert!(histogram(&[-f64::MAX, f64::MAX], 10).is_err());
    }

    #[test]
    fn test_oversized_bin_count_rejected_before_allocation() {
        assert!(matches!(
            histogram(&[1.0, 2.0], usize::MAX),
            Err(AnomalyError::InvalidInput { .. })
        ));
        assert!(DensityEstimator::new(usize::MAX).is_err());
    }

    #[test]
    fn test_estimator_wraps_histogram() {
        let estimator = DensityEstimator::new(20).unwrap();
        assert_eq!(estimator.bin_count(), 20);
        assert_eq!(
            estimator.estimate(&sine(100)).unwrap(),
            histogram(&sine(100), 20).unwrap()
        );
        assert_eq!(DensityEstimator::default().bin_count(), 50);
        assert!(DensityEstimator::new(0).is_err());
    }
}
