//! KL-divergence waveform detector.

use std::sync::Arc;

use anomaly_api::{DetectorConfig, ReferenceSource, DEFAULT_THRESHOLD};
use anomaly_spi::{
    AnomalyError, DetectionResult, ReferenceProfile, Result, WaveformDetector, WindowVerdict,
};

use crate::density::DensityEstimator;
use crate::divergence::divergence_from_reference;
use crate::generator::sine_wave;
use crate::windower::{chunk, trim_to_zero_crossings};

/// Scores waveforms by the KL divergence of their histogram from a
/// reference histogram.
///
/// The reference is owned by the detector, so detectors with different
/// references coexist. Clones share the reference profile.
#[derive(Debug, Clone)]
pub struct KlDetector {
    estimator: DensityEstimator,
    threshold: f64,
    trim_zero_crossings: bool,
    reference: Option<Arc<ReferenceProfile>>,
}

impl KlDetector {
    /// Create an unconfigured detector.
    pub fn new(bin_count: usize, threshold: f64) -> Result<Self> {
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(AnomalyError::invalid(
                "threshold",
                "must be finite and non-negative",
            ));
        }
        Ok(Self {
            estimator: DensityEstimator::new(bin_count)?,
            threshold,
            trim_zero_crossings: false,
            reference: None,
        })
    }

    /// Create from configuration, building the reference when one is given.
    pub fn from_config(config: &DetectorConfig) -> Result<Self> {
        config.validate()?;
        let mut detector = Self::new(config.bin_count, config.threshold)?
            .with_trim(config.trim_zero_crossings);
        if let Some(source) = &config.reference {
            let samples = reference_samples(source)?;
            detector.set_reference(&samples)?;
        }
        Ok(detector)
    }

    /// Trim references set from now on to whole periods.
    ///
    /// Samples are always prepared the way the stored reference was, so
    /// toggling this takes effect at the next `set_reference`.
    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim_zero_crossings = trim;
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn bin_count(&self) -> usize {
        self.estimator.bin_count()
    }

    pub fn trims_zero_crossings(&self) -> bool {
        self.trim_zero_crossings
    }

    pub fn reference(&self) -> Option<&ReferenceProfile> {
        self.reference.as_deref()
    }

    /// Same reference, different threshold.
    pub fn with_threshold(mut self, threshold: f64) -> Result<Self> {
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(AnomalyError::invalid(
                "threshold",
                "must be finite and non-negative",
            ));
        }
        self.threshold = threshold;
        Ok(self)
    }

    fn prepare(samples: &[f64], trim: bool) -> &[f64] {
        if trim {
            trim_to_zero_crossings(samples)
        } else {
            samples
        }
    }

    fn profile(&self) -> Result<&ReferenceProfile> {
        self.reference.as_deref().ok_or(AnomalyError::NotConfigured)
    }

    /// Score every window of a long waveform independently.
    pub fn detect_windows(
        &self,
        samples: &[f64],
        window_len: usize,
        step: usize,
    ) -> Result<Vec<WindowVerdict>> {
        self.profile()?;
        chunk(samples, window_len, step)?
            .map(|window| {
                Ok(WindowVerdict {
                    start: window.start,
                    result: self.detect(window.samples)?,
                })
            })
            .collect()
    }
}

impl Default for KlDetector {
    fn default() -> Self {
        Self {
            estimator: DensityEstimator::default(),
            threshold: DEFAULT_THRESHOLD,
            trim_zero_crossings: false,
            reference: None,
        }
    }
}

impl WaveformDetector for KlDetector {
    fn set_reference(&mut self, samples: &[f64]) -> Result<()> {
        let prepared = Self::prepare(samples, self.trim_zero_crossings);
        let histogram = self.estimator.estimate(prepared)?;
        tracing::info!(
            samples = samples.len(),
            used = prepared.len(),
            bins = histogram.bin_count(),
            trimmed = self.trim_zero_crossings,
            "reference profile set"
        );
        self.reference = Some(Arc::new(ReferenceProfile::new(
            histogram,
            prepared.len(),
            self.trim_zero_crossings,
        )));
        Ok(())
    }

    fn detect(&self, samples: &[f64]) -> Result<DetectionResult> {
        let divergence = self.score(samples)?;
        let result = DetectionResult::new(divergence, self.threshold);
        tracing::debug!(
            divergence,
            threshold = self.threshold,
            verdict = result.verdict,
            "waveform scored"
        );
        Ok(result)
    }

    fn score(&self, samples: &[f64]) -> Result<f64> {
        let reference = self.profile()?;
        let histogram = self
            .estimator
            .estimate(Self::prepare(samples, reference.trimmed))?;
        divergence_from_reference(&reference.histogram, &histogram)
    }

    fn is_configured(&self) -> bool {
        self.reference.is_some()
    }
}

/// Materialize a configured reference source into samples.
pub fn reference_samples(source: &ReferenceSource) -> Result<Vec<f64>> {
    match source {
        ReferenceSource::Samples { samples } => Ok(samples.clone()),
        ReferenceSource::Synthetic(wave) => sine_wave(wave),
    }
}
