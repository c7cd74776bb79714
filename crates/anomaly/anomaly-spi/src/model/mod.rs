//! Data models for waveform anomaly scoring.
//!
//! This module contains data structures used throughout the scoring pipeline.

mod calibration;
mod detection;
mod histogram;
mod waveform;

pub use calibration::{
    CalibrationReport, ConfusionMatrix, LabeledChunk, LabeledDataset, UndefinedMetric,
};
pub use detection::{DetectionResult, WindowVerdict};
pub use histogram::{Histogram, ReferenceProfile, DENSITY_FLOOR};
pub use waveform::{ListFilter, Point, RecordSummary, WaveformRecord};
