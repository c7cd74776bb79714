//! Waveform Anomaly Scoring Core
//!
//! Windowing, histogram density estimation, KL divergence scoring,
//! threshold calibration, an in-memory store and the service facade.

pub mod calibration;
pub mod dataset;
pub mod density;
pub mod detector;
pub mod divergence;
pub mod generator;
pub mod metrics;
pub mod service;
pub mod store;
pub mod windower;

pub use calibration::{calibrate_recording, dataset_from_recording, ThresholdCalibrator};
pub use dataset::DualChannelRecording;
pub use density::{histogram, DensityEstimator};
pub use detector::{reference_samples, KlDetector};
pub use divergence::{divergence_from_reference, kl_divergence};
pub use generator::{generate_sample, inject_dip, sine_wave, SyntheticSample};
pub use metrics::ClassificationMetrics;
pub use service::WaveformService;
pub use store::InMemoryWaveformStore;
pub use windower::{chunk, trim_to_zero_crossings, window_count, zero_crossings, Chunk, Windows};
