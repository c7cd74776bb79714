//! Waveform detector trait definition.

use crate::error::Result;
use crate::model::DetectionResult;

/// Scores whole waveforms against a held reference.
///
/// `detect` and `score` take `&self` and never touch the reference, so a
/// configured detector can be shared across threads.
pub trait WaveformDetector: Send + Sync {
    /// Build and store the reference profile from clean samples.
    fn set_reference(&mut self, samples: &[f64]) -> Result<()>;

    /// Score a waveform and apply the threshold.
    fn detect(&self, samples: &[f64]) -> Result<DetectionResult>;

    /// Divergence of a waveform from the reference, without thresholding.
    fn score(&self, samples: &[f64]) -> Result<f64>;

    /// Check if a reference has been set.
    fn is_configured(&self) -> bool;
}
