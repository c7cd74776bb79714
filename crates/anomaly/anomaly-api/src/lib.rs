//! Anomaly Scoring API
//!
//! Configuration types and builders for waveform anomaly scoring.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// Re-export SPI types
pub use anomaly_spi::{AnomalyError, DetectionResult, Result};

/// Default number of histogram bins.
pub const DEFAULT_BIN_COUNT: usize = 50;

/// Divergence threshold calibrated for a 1 s, 1 kHz, 50 Hz / 230 V reference.
///
/// It does not carry over to other signal parameters; recalibrate instead.
pub const DEFAULT_THRESHOLD: f64 = 0.010199148586751076;

/// Default standard-deviation multiplier for threshold calibration.
pub const DEFAULT_CALIBRATION_K: f64 = 0.1;

/// Largest accepted histogram bin count.
pub const MAX_BIN_COUNT: usize = 1 << 20;

/// Largest synthetic waveform, in samples.
pub const MAX_SYNTHETIC_SAMPLES: usize = 1 << 26;

pub const ENV_BIN_COUNT: &str = "ANOMALY_BIN_COUNT";
pub const ENV_THRESHOLD: &str = "ANOMALY_THRESHOLD";
pub const ENV_TRIM_ZERO_CROSSINGS: &str = "ANOMALY_TRIM_ZERO_CROSSINGS";

// ============================================================================
// Synthetic Waveforms
// ============================================================================

/// Parameters of a clean sinusoidal mains waveform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticWaveConfig {
    /// Length in seconds (default: 1.0).
    pub duration: f64,
    /// Samples per second (default: 1000.0).
    pub sampling_rate: f64,
    /// Signal frequency in Hz (default: 50.0).
    pub frequency: f64,
    /// RMS amplitude; the peak is `amplitude * sqrt(2)` (default: 230.0).
    pub amplitude: f64,
}

impl Default for SyntheticWaveConfig {
    fn default() -> Self {
        Self {
            duration: 1.0,
            sampling_rate: 1000.0,
            frequency: 50.0,
            amplitude: 230.0,
        }
    }
}

impl SyntheticWaveConfig {
    pub fn new(duration: f64, sampling_rate: f64, frequency: f64, amplitude: f64) -> Self {
        Self {
            duration,
            sampling_rate,
            frequency,
            amplitude,
        }
    }

    /// Number of samples the waveform spans.
    pub fn sample_count(&self) -> usize {
        (self.duration * self.sampling_rate).round().max(0.0) as usize
    }

    pub fn validate(&self) -> Result<()> {
        positive("duration", self.duration)?;
        positive("sampling_rate", self.sampling_rate)?;
        positive("frequency", self.frequency)?;
        positive("amplitude", self.amplitude)?;
        let samples = self.duration * self.sampling_rate;
        if samples.round() > MAX_SYNTHETIC_SAMPLES as f64 {
            return Err(AnomalyError::invalid(
                "duration",
                format!("waveform exceeds {} samples", MAX_SYNTHETIC_SAMPLES),
            ));
        }
        Ok(())
    }
}

/// Voltage-dip injection policy for synthetic recordings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyInjection {
    /// Per-sample probability of starting a dip (default: 0.0001).
    pub probability: f64,
    /// Dip length in samples (default: 100).
    pub duration: usize,
    /// Factor applied to samples inside a dip (default: 0.2, an 80% dip).
    pub drop: f64,
}

impl Default for AnomalyInjection {
    fn default() -> Self {
        Self {
            probability: 0.0001,
            duration: 100,
            drop: 0.2,
        }
    }
}

impl AnomalyInjection {
    pub fn new(probability: f64, duration: usize, drop: f64) -> Self {
        Self {
            probability,
            duration,
            drop,
        }
    }

    /// A policy that never injects.
    pub fn none() -> Self {
        Self::new(0.0, 0, 1.0)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.probability) {
            return Err(AnomalyError::invalid("probability", "must be in [0, 1]"));
        }
        if !self.drop.is_finite() {
            return Err(AnomalyError::invalid("drop", "must be finite"));
        }
        Ok(())
    }
}

// ============================================================================
// Detector Configuration
// ============================================================================

/// Where a detector's reference waveform comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReferenceSource {
    /// Literal reference samples.
    Samples { samples: Vec<f64> },
    /// Generate a clean synthetic waveform.
    Synthetic(SyntheticWaveConfig),
}

/// KL detector configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Histogram bins for both reference and sample (default: 50).
    #[serde(default = "default_bin_count")]
    pub bin_count: usize,
    /// Divergence above which a waveform is anomalous.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Trim reference and samples to whole periods before scoring.
    #[serde(default)]
    pub trim_zero_crossings: bool,
    /// Reference to build at construction time, if any.
    #[serde(default)]
    pub reference: Option<ReferenceSource>,
}

fn default_bin_count() -> usize {
    DEFAULT_BIN_COUNT
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            bin_count: DEFAULT_BIN_COUNT,
            threshold: DEFAULT_THRESHOLD,
            trim_zero_crossings: false,
            reference: None,
        }
    }
}

impl DetectorConfig {
    pub fn new(bin_count: usize, threshold: f64) -> Self {
        Self {
            bin_count,
            threshold,
            ..Self::default()
        }
    }

    /// Attach a reference source.
    pub fn with_reference(mut self, reference: ReferenceSource) -> Self {
        self.reference = Some(reference);
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_bin_count(self.bin_count)?;
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(AnomalyError::invalid(
                "threshold",
                "must be finite and non-negative",
            ));
        }
        match &self.reference {
            Some(ReferenceSource::Synthetic(wave)) => wave.validate(),
            Some(ReferenceSource::Samples { samples }) if samples.is_empty() => Err(
                AnomalyError::invalid("reference", "sample list is empty"),
            ),
            _ => Ok(()),
        }
    }

    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| AnomalyError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| AnomalyError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&json)
    }

    /// Defaults overlaid with `ANOMALY_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::default().overlay_env()
    }

    /// Overlay `ANOMALY_*` environment variables onto this configuration.
    pub fn overlay_env(mut self) -> Result<Self> {
        if let Some(bins) = env_var::<usize>(ENV_BIN_COUNT)? {
            self.bin_count = bins;
        }
        if let Some(threshold) = env_var::<f64>(ENV_THRESHOLD)? {
            self.threshold = threshold;
        }
        if let Some(trim) = env_var::<bool>(ENV_TRIM_ZERO_CROSSINGS)? {
            self.trim_zero_crossings = trim;
        }
        self.validate()?;
        Ok(self)
    }
}

/// Builder for DetectorConfig.
#[derive(Debug, Default)]
pub struct DetectorConfigBuilder {
    bin_count: Option<usize>,
    threshold: Option<f64>,
    trim_zero_crossings: bool,
    reference: Option<ReferenceSource>,
}

impl DetectorConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bin_count(mut self, bin_count: usize) -> Self {
        self.bin_count = Some(bin_count);
        self
    }

    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    pub fn trim_zero_crossings(mut self, trim: bool) -> Self {
        self.trim_zero_crossings = trim;
        self
    }

    pub fn reference_samples(mut self, samples: Vec<f64>) -> Self {
        self.reference = Some(ReferenceSource::Samples { samples });
        self
    }

    pub fn synthetic_reference(mut self, wave: SyntheticWaveConfig) -> Self {
        self.reference = Some(ReferenceSource::Synthetic(wave));
        self
    }

    /// Build and validate the configuration.
    pub fn build(self) -> Result<DetectorConfig> {
        let config = DetectorConfig {
            bin_count: self.bin_count.unwrap_or(DEFAULT_BIN_COUNT),
            threshold: self.threshold.unwrap_or(DEFAULT_THRESHOLD),
            trim_zero_crossings: self.trim_zero_crossings,
            reference: self.reference,
        };
        config.validate()?;
        Ok(config)
    }
}

// ============================================================================
// Windowing and Calibration
// ============================================================================

/// How a long waveform is cut into comparable chunks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Samples per chunk (default: 1000, one second at 1 kHz).
    pub window_len: usize,
    /// Offset between chunk starts (default: 1000, tiling).
    pub step: usize,
    /// Trim each chunk to its first and last zero crossing (default: true).
    pub trim_zero_crossings: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            window_len: 1000,
            step: 1000,
            trim_zero_crossings: true,
        }
    }
}

impl WindowConfig {
    pub fn new(window_len: usize, step: usize) -> Self {
        Self {
            window_len,
            step,
            ..Self::default()
        }
    }

    /// Non-overlapping windows of `window_len`.
    pub fn tiling(window_len: usize) -> Self {
        Self::new(window_len, window_len)
    }

    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim_zero_crossings = trim;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.window_len == 0 {
            return Err(AnomalyError::invalid("window_len", "must be positive"));
        }
        if self.step == 0 {
            return Err(AnomalyError::invalid("step", "must be positive"));
        }
        Ok(())
    }
}

/// Threshold calibration configuration.
///
/// `threshold = mean + k * stddev` over the chunk divergences. `k` is an
/// empirical knob, not a statistical guarantee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationConfig {
    pub window: WindowConfig,
    /// Histogram bins (default: 50).
    pub bin_count: usize,
    /// Standard-deviation multiplier (default: 0.1).
    pub k: f64,
    /// Clean-channel window used as the reference (default: 0).
    pub reference_chunk: usize,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            bin_count: DEFAULT_BIN_COUNT,
            k: DEFAULT_CALIBRATION_K,
            reference_chunk: 0,
        }
    }
}

impl CalibrationConfig {
    pub fn new(window: WindowConfig, k: f64) -> Self {
        Self {
            window,
            k,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.window.validate()?;
        check_bin_count(self.bin_count)?;
        if !self.k.is_finite() {
            return Err(AnomalyError::invalid("k", "must be finite"));
        }
        Ok(())
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Reject bin counts outside `1..=MAX_BIN_COUNT`.
pub fn check_bin_count(bin_count: usize) -> Result<()> {
    if bin_count == 0 {
        return Err(AnomalyError::invalid("bin_count", "must be positive"));
    }
    if bin_count > MAX_BIN_COUNT {
        return Err(AnomalyError::invalid(
            "bin_count",
            format!("must not exceed {}", MAX_BIN_COUNT),
        ));
    }
    Ok(())
}

fn positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(AnomalyError::invalid(name, "must be finite and positive"))
    }
}

fn env_var<T: FromStr>(name: &str) -> Result<Option<T>> {
    match std::env::var(name) {
        Ok(raw) => {
            let value = raw
                .trim()
                .parse::<T>()
                .map_err(|_| AnomalyError::Config(format!("{} has invalid value '{}'", name, raw)))?;
            tracing::debug!(variable = name, value = %raw.trim(), "config override from environment");
            Ok(Some(value))
        }
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(AnomalyError::Config(format!("{}: {}", name, e))),
    }
}
