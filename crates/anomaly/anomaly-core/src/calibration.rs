//! Threshold calibration against labeled chunks.
//!
//! The threshold is `mean + k * stddev` over the chunk divergences, with
//! the population standard deviation. `k` is an empirical knob: it does
//! not bound the false-positive rate.

use anomaly_api::{CalibrationConfig, WindowConfig, DEFAULT_CALIBRATION_K};
use anomaly_spi::{AnomalyError, CalibrationReport, LabeledChunk, LabeledDataset, Result};

use crate::dataset::DualChannelRecording;
use crate::density::DensityEstimator;
use crate::divergence::divergence_from_reference;
use crate::metrics;
use crate::windower::chunk;

/// Cut a recording into labeled chunks.
///
/// Clean and observed channels are windowed identically. A chunk is
/// labeled anomalous when any sample in its full window is. With
/// `window.trim_zero_crossings` every chunk and the reference are trimmed
/// to whole periods. The reference is the clean channel's
/// `reference_chunk`-th window.
pub fn dataset_from_recording(
    recording: &DualChannelRecording,
    window: &WindowConfig,
    reference_chunk: usize,
) -> Result<LabeledDataset> {
    recording.validate()?;
    window.validate()?;

    let clean = chunk(&recording.clean, window.window_len, window.step)?;
    let reference = clean.clone().nth(reference_chunk).ok_or_else(|| {
        AnomalyError::invalid(
            "reference_chunk",
            format!("{} out of range for {} windows", reference_chunk, clean.len()),
        )
    })?;
    let reference = if window.trim_zero_crossings {
        reference.trimmed()
    } else {
        reference
    };

    let chunks = chunk(&recording.observed, window.window_len, window.step)?
        .enumerate()
        .map(|(index, observed)| {
            let end = observed.start + observed.len();
            let label = recording.labels[observed.start..end].iter().any(|&l| l);
            let observed = if window.trim_zero_crossings {
                observed.trimmed()
            } else {
                observed
            };
            LabeledChunk {
                index,
                samples: observed.samples.to_vec(),
                label,
            }
        })
        .collect();

    Ok(LabeledDataset::new(reference.samples.to_vec(), chunks))
}

/// Derives a detection threshold from labeled data and scores it.
#[derive(Debug, Clone)]
pub struct ThresholdCalibrator {
    estimator: DensityEstimator,
    k: f64,
}

impl Default for ThresholdCalibrator {
    fn default() -> Self {
        Self {
            estimator: DensityEstimator::default(),
            k: DEFAULT_CALIBRATION_K,
        }
    }
}

impl ThresholdCalibrator {
    pub fn new(bin_count: usize, k: f64) -> Result<Self> {
        if !k.is_finite() {
            return Err(AnomalyError::invalid("k", "must be finite"));
        }
        Ok(Self {
            estimator: DensityEstimator::new(bin_count)?,
            k,
        })
    }

    pub fn from_config(config: &CalibrationConfig) -> Result<Self> {
        config.validate()?;
        Self::new(config.bin_count, config.k)
    }

    pub fn k(&self) -> f64 {
        self.k
    }

    pub fn bin_count(&self) -> usize {
        self.estimator.bin_count()
    }

    /// Divergence of every chunk from the dataset reference.
    pub fn divergences(&self, dataset: &LabeledDataset) -> Result<Vec<f64>> {
        if dataset.is_empty() {
            return Err(AnomalyError::invalid("dataset", "no chunks to calibrate"));
        }
        let reference = self.estimator.estimate(&dataset.reference)?;
        dataset
            .chunks
            .iter()
            .map(|c| {
                let histogram = self.estimator.estimate(&c.samples)?;
                divergence_from_reference(&reference, &histogram)
            })
            .collect()
    }

    /// Fit `threshold = mean + k * stddev` and evaluate it on the same data.
    pub fn calibrate(&self, dataset: &LabeledDataset) -> Result<CalibrationReport> {
        let divergences = self.divergences(dataset)?;
        let (mean, stddev) = mean_stddev(&divergences);
        let threshold = mean + self.k * stddev;
        tracing::debug!(mean, stddev, k = self.k, "divergence statistics");
        self.report(dataset, divergences, threshold, Some(self.k))
    }

    /// Evaluate a fixed threshold on the dataset.
    pub fn evaluate(&self, dataset: &LabeledDataset, threshold: f64) -> Result<CalibrationReport> {
        if !threshold.is_finite() {
            return Err(AnomalyError::invalid("threshold", "must be finite"));
        }
        let divergences = self.divergences(dataset)?;
        self.report(dataset, divergences, threshold, None)
    }

    fn report(
        &self,
        dataset: &LabeledDataset,
        divergences: Vec<f64>,
        threshold: f64,
        k: Option<f64>,
    ) -> Result<CalibrationReport> {
        let predicted: Vec<bool> = divergences.iter().map(|&d| d > threshold).collect();
        let m = metrics::evaluate(&dataset.labels(), &predicted)?;

        tracing::info!(
            chunks = dataset.len(),
            threshold,
            accuracy = m.accuracy,
            precision = m.precision,
            recall = m.recall,
            f1 = m.f1,
            "threshold evaluated"
        );
        if !m.undefined.is_empty() {
            tracing::warn!(undefined = ?m.undefined, "metrics with zero denominator reported as 0");
        }

        Ok(CalibrationReport {
            threshold,
            k,
            accuracy: m.accuracy,
            precision: m.precision,
            recall: m.recall,
            f1: m.f1,
            confusion: m.confusion,
            divergences,
            undefined: m.undefined,
        })
    }
}

/// Window a recording and calibrate on it in one step.
pub fn calibrate_recording(
    recording: &DualChannelRecording,
    config: &CalibrationConfig,
) -> Result<CalibrationReport> {
    let calibrator = ThresholdCalibrator::from_config(config)?;
    let dataset = dataset_from_recording(recording, &config.window, config.reference_chunk)?;
    calibrator.calibrate(&dataset)
}

fn mean_stddev(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{inject_dip, sine_wave};
    use anomaly_api::SyntheticWaveConfig;
    use anomaly_spi::UndefinedMetric;

    /// Ten one-second periods of the default sine, with chunks 3 and 7 dipped.
    fn recording() -> DualChannelRecording {
        let period = sine_wave(&SyntheticWaveConfig::default()).unwrap();
        let mut recording = DualChannelRecording::default();
        for c in 0..10 {
            let mut observed = period.clone();
            let mut labels = vec![false; period.len()];
            if c == 3 || c == 7 {
                let dip = inject_dip(&mut observed, 400, 100, 0.2);
                labels[dip].iter_mut().for_each(|l| *l = true);
            }
            recording
                .time
                .extend((0..period.len()).map(|i| (c * 1000 + i) as f64 / 1000.0));
            recording.clean.extend_from_slice(&period);
            recording.observed.extend(observed);
            recording.labels.extend(labels);
        }
        recording
    }

    #[test]
    fn test_mean_stddev_population() {
        let (mean, stddev) = mean_stddev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_eq!(mean, 5.0);
        assert_eq!(stddev, 2.0);
    }

    #[test]
    fn test_dataset_labels_by_any_sample() {
        let dataset =
            dataset_from_recording(&recording(), &WindowConfig::tiling(1000).with_trim(false), 0)
                .unwrap();
        assert_eq!(dataset.len(), 10);
        assert_eq!(dataset.reference.len(), 1000);
        let positives: Vec<usize> = dataset
            .chunks
            .iter()
            .filter(|c| c.label)
            .map(|c| c.index)
            .collect();
        assert_eq!(positives, vec![3, 7]);
    }

    #[test]
    fn test_dataset_single_labeled_sample_marks_chunk() {
        let mut rec = recording();
        rec.labels.iter_mut().for_each(|l| *l = false);
        rec.labels[5999] = true;
        let dataset = dataset_from_recording(&rec, &WindowConfig::tiling(1000), 0).unwrap();
        assert_eq!(dataset.labels().iter().filter(|&&l| l).count(), 1);
        assert!(dataset.chunks[5].label);
    }

    #[test]
    fn test_dataset_trims_chunks() {
        let dataset = dataset_from_recording(&recording(), &WindowConfig::tiling(1000), 0).unwrap();
        assert!(dataset.reference.len() < 1000);
        assert!(dataset.chunks.iter().all(|c| c.samples.len() < 1000));
    }

    #[test]
    fn test_reference_chunk_out_of_range() {
        let result = dataset_from_recording(&recording(), &WindowConfig::tiling(1000), 10);
        assert!(matches!(result, Err(AnomalyError::InvalidInput { .. })));
    }

    #[test]
    fn test_calibration_separates_dipped_chunks() {
        let report = calibrate_recording(&recording(), &CalibrationConfig::default()).unwrap();
        assert_eq!(report.k, Some(DEFAULT_CALIBRATION_K));
        assert_eq!(report.divergences.len(), 10);
        assert_eq!(report.divergences[0], 0.0);
        assert!(report.divergences[3] > report.threshold);
        assert!(report.divergences[7] > report.threshold);
        assert_eq!(report.precision, 1.0);
        assert_eq!(report.recall, 1.0);
        assert_eq!(report.f1, 1.0);
        assert_eq!(report.accuracy, 1.0);
        assert!(report.undefined.is_empty());
    }

    #[test]
    fn test_single_class_dataset_reports_undefined() {
        let period = sine_wave(&SyntheticWaveConfig::default()).unwrap();
        let chunks = (0..4)
            .map(|index| LabeledChunk {
                index,
                samples: period.clone(),
                label: false,
            })
            .collect();
        let dataset = LabeledDataset::new(period, chunks);
        let report = ThresholdCalibrator::default().calibrate(&dataset).unwrap();
        assert_eq!(report.threshold, 0.0);
        assert_eq!(report.predicted_anomalies(), 0);
        assert_eq!(report.accuracy, 1.0);
        assert_eq!(report.precision, 0.0);
        assert!(report.is_undefined(UndefinedMetric::Precision));
        assert!(report.is_undefined(UndefinedMetric::Recall));
        assert!(report.is_undefined(UndefinedMetric::F1));
    }

    #[test]
    fn test_fixed_threshold_evaluation() {
        let dataset =
            dataset_from_recording(&recording(), &WindowConfig::tiling(1000).with_trim(false), 0)
                .unwrap();
        let calibrator = ThresholdCalibrator::default();
        let report = calibrator.evaluate(&dataset, 1.0).unwrap();
        assert_eq!(report.k, None);
        assert_eq!(report.threshold, 1.0);
        assert_eq!(report.confusion.false_negatives, 2);
        assert_eq!(report.recall, 0.0);
        assert!(report.is_undefined(UndefinedMetric::Precision));
        assert!(!report.is_undefined(UndefinedMetric::Recall));
    }

    #[test]
    fn test_empty_dataset_rejected() {
        let dataset = LabeledDataset::new(vec![1.0, 2.0], vec![]);
        assert!(matches!(
            ThresholdCalibrator::default().calibrate(&dataset),
            Err(AnomalyError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_invalid_calibrator() {
        assert!(ThresholdCalibrator::new(0, 0.1).is_err());
        assert!(ThresholdCalibrator::new(50, f64::INFINITY).is_err());
    }
}
