//! Waveform Anomaly Scoring Facade
//!
//! Unified re-exports for waveform anomaly scoring.
//!
//! This facade provides a single entry point:
//! - Store and detector contracts, models and errors from SPI
//! - Configuration types and defaults from API
//! - Scoring, calibration, the in-memory store and the service from Core

// Re-export everything from SPI
pub use anomaly_spi::*;

// Re-export everything from API
pub use anomaly_api::*;

// Re-export everything from Core
pub use anomaly_core::*;

/// The types most callers need.
pub mod prelude {
    pub use anomaly_api::{CalibrationConfig, DetectorConfig, ReferenceSource, WindowConfig};
    pub use anomaly_core::{InMemoryWaveformStore, KlDetector, ThresholdCalibrator, WaveformService};
    pub use anomaly_spi::{
        AnomalyError, DetectionResult, ListFilter, Point, Result, WaveformDetector, WaveformStore,
    };
}
