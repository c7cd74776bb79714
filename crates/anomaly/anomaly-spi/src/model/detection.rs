//! Detection verdicts.

use serde::{Deserialize, Serialize};

/// Outcome of scoring one waveform against a reference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    /// KL divergence of the sample from the reference, in nats.
    pub divergence: f64,
    /// Threshold the divergence was compared against.
    pub threshold: f64,
    /// `divergence > threshold`.
    pub verdict: bool,
}

impl DetectionResult {
    /// Create a result, deriving the verdict from divergence and threshold.
    pub fn new(divergence: f64, threshold: f64) -> Self {
        Self {
            divergence,
            threshold,
            verdict: divergence > threshold,
        }
    }
}

/// Detection result for one window of a longer waveform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowVerdict {
    /// Offset of the window's first sample in the source waveform.
    pub start: usize,
    pub result: DetectionResult,
}
