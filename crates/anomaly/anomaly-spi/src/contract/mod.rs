//! Contract definitions for waveform anomaly scoring.
//!
//! This module contains trait definitions that providers must implement.

mod waveform_detector;
mod waveform_store;

pub use waveform_detector::WaveformDetector;
pub use waveform_store::WaveformStore;
