//! Labeled chunks and calibration reports.

use serde::{Deserialize, Serialize};

/// A chunk of an observed waveform with its ground-truth label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledChunk {
    /// Position of the chunk in the windowed sequence.
    pub index: usize,
    pub samples: Vec<f64>,
    /// `true` when any sample inside the window was labeled anomalous.
    pub label: bool,
}

/// Reference samples plus the labeled chunks to calibrate against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledDataset {
    pub reference: Vec<f64>,
    pub chunks: Vec<LabeledChunk>,
}

impl LabeledDataset {
    pub fn new(reference: Vec<f64>, chunks: Vec<LabeledChunk>) -> Self {
        Self { reference, chunks }
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Ground-truth labels in chunk order.
    pub fn labels(&self) -> Vec<bool> {
        self.chunks.iter().map(|c| c.label).collect()
    }
}

/// Binary classification counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub true_positives: usize,
    pub false_positives: usize,
    pub true_negatives: usize,
    pub false_negatives: usize,
}

/// Metric whose standard formula had a zero denominator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UndefinedMetric {
    Precision,
    Recall,
    F1,
}

/// Result of one calibration run.
///
/// Metrics whose denominator was zero are reported as `0.0` and listed in
/// `undefined`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationReport {
    pub threshold: f64,
    /// Standard-deviation multiplier used to derive `threshold`; `None`
    /// when a fixed threshold was evaluated.
    pub k: Option<f64>,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub confusion: ConfusionMatrix,
    /// Divergence of every chunk, in dataset order.
    pub divergences: Vec<f64>,
    #[serde(default)]
    pub undefined: Vec<UndefinedMetric>,
}

impl CalibrationReport {
    /// Whether the given metric fell back to its zero-denominator value.
    pub fn is_undefined(&self, metric: UndefinedMetric) -> bool {
        self.undefined.contains(&metric)
    }

    /// Number of chunks predicted anomalous.
    pub fn predicted_anomalies(&self) -> usize {
        self.confusion.true_positives + self.confusion.false_positives
    }
}
