//! Waveform Anomaly Scoring Service Provider Interface
//!
//! Defines the store and detector contracts, the shared models and the
//! error type.

pub mod contract;
pub mod error;
pub mod model;

// Re-export all public items at crate root for convenience
pub use contract::{WaveformDetector, WaveformStore};
pub use error::{AnomalyError, ErrorStatus, Result};
pub use model::{
    CalibrationReport, ConfusionMatrix, DetectionResult, Histogram, LabeledChunk,
    LabeledDataset, ListFilter, Point, RecordSummary, ReferenceProfile, UndefinedMetric,
    WaveformRecord, WindowVerdict, DENSITY_FLOOR,
};
