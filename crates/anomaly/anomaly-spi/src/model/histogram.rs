//! Density estimates and reference profiles.

use serde::{Deserialize, Serialize};

/// Floor added to every histogram cell so divergences stay finite.
pub const DENSITY_FLOOR: f64 = 1e-10;

/// Normalized histogram over an equal-width bin grid.
///
/// Invariants: `edges.len() == hist.len() + 1` and every cell is at least
/// [`DENSITY_FLOOR`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub hist: Vec<f64>,
    pub edges: Vec<f64>,
}

impl Histogram {
    /// Number of bins.
    pub fn bin_count(&self) -> usize {
        self.hist.len()
    }

    /// Width of a single bin.
    pub fn bin_width(&self) -> f64 {
        match (self.edges.first(), self.edges.last()) {
            (Some(lo), Some(hi)) if !self.hist.is_empty() => (hi - lo) / self.hist.len() as f64,
            _ => 0.0,
        }
    }

    /// Sum of all cells, `1 + bin_count * DENSITY_FLOOR` for a well-formed histogram.
    pub fn total(&self) -> f64 {
        self.hist.iter().sum()
    }
}

/// The density estimate of "normal" behaviour samples are scored against.
///
/// Immutable once built; a new reference means a new profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceProfile {
    pub histogram: Histogram,
    /// Samples the histogram was built from, after any trimming.
    pub sample_count: usize,
    /// Whether the reference was trimmed to zero crossings.
    pub trimmed: bool,
}

impl ReferenceProfile {
    pub fn new(histogram: Histogram, sample_count: usize, trimmed: bool) -> Self {
        Self {
            histogram,
            sample_count,
            trimmed,
        }
    }

    pub fn bin_count(&self) -> usize {
        self.histogram.bin_count()
    }
}
