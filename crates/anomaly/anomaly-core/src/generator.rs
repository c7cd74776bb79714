//! Synthetic mains waveforms with injected voltage dips.

use std::f64::consts::{PI, SQRT_2};
use std::ops::Range;

use anomaly_api::{AnomalyInjection, SyntheticWaveConfig};
use anomaly_spi::{Point, Result};
use rand::Rng;

use crate::dataset::DualChannelRecording;

/// Clean sine `amplitude * sqrt(2) * sin(2π f t)` sampled at `t = i / sampling_rate`.
pub fn sine_wave(config: &SyntheticWaveConfig) -> Result<Vec<f64>> {
    config.validate()?;
    let peak = config.amplitude * SQRT_2;
    Ok((0..config.sample_count())
        .map(|i| {
            let t = i as f64 / config.sampling_rate;
            peak * (2.0 * PI * config.frequency * t).sin()
        })
        .collect())
}

/// Scale `len` samples from `start` by `drop`, clamped to the waveform end.
///
/// Returns the affected index range.
pub fn inject_dip(samples: &mut [f64], start: usize, len: usize, drop: f64) -> Range<usize> {
    let start = start.min(samples.len());
    let end = start.saturating_add(len).min(samples.len());
    for x in &mut samples[start..end] {
        *x *= drop;
    }
    start..end
}

/// A clean channel, a possibly dipped copy, and per-sample ground truth.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticSample {
    /// Sample times in seconds.
    pub time: Vec<f64>,
    pub normal: Vec<f64>,
    pub anomalous: Vec<f64>,
    pub labels: Vec<bool>,
}

impl SyntheticSample {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Index ranges of the injected dips.
    pub fn dips(&self) -> Vec<Range<usize>> {
        let mut dips = Vec::new();
        let mut start = None;
        for (i, &label) in self.labels.iter().enumerate() {
            match (label, start) {
                (true, None) => start = Some(i),
                (false, Some(s)) => {
                    dips.push(s..i);
                    start = None;
                }
                _ => {}
            }
        }
        if let Some(s) = start {
            dips.push(s..self.labels.len());
        }
        dips
    }

    /// The dipped channel as store points, timestamps rendered as strings.
    pub fn points(&self) -> Vec<Point> {
        self.time
            .iter()
            .zip(&self.anomalous)
            .map(|(t, &v)| Point::new(t.to_string(), v))
            .collect()
    }

    pub fn into_recording(self) -> DualChannelRecording {
        DualChannelRecording {
            time: self.time,
            clean: self.normal,
            observed: self.anomalous,
            labels: self.labels,
        }
    }
}

/// Generate a clean waveform and a copy with randomly injected dips.
///
/// At each sample a dip starts with `injection.probability`, unless one is
/// already in progress. A dip scales `injection.duration` samples by
/// `injection.drop` and labels them anomalous.
pub fn generate_sample<R: Rng + ?Sized>(
    wave: &SyntheticWaveConfig,
    injection: &AnomalyInjection,
    rng: &mut R,
) -> Result<SyntheticSample> {
    injection.validate()?;
    let normal = sine_wave(wave)?;
    let n = normal.len();
    let time = (0..n).map(|i| i as f64 / wave.sampling_rate).collect();

    let mut anomalous = normal.clone();
    let mut labels = vec![false; n];
    let mut in_anomaly = false;
    for i in 0..n {
        let draw: f64 = rng.gen();
        if draw < injection.probability && !in_anomaly {
            let dip = inject_dip(&mut anomalous, i, injection.duration, injection.drop);
            labels[dip].iter_mut().for_each(|l| *l = true);
            in_anomaly = true;
        } else if !labels[i] {
            in_anomaly = false;
        }
    }

    let injected = labels.iter().filter(|&&l| l).count();
    tracing::debug!(samples = n, anomalous_samples = injected, "generated synthetic waveform");

    Ok(SyntheticSample {
        time,
        normal,
        anomalous,
        labels,
    })
}
