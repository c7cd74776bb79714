//! Error types for anomaly scoring.
//!
//! This module contains the error type, its status mapping and the Result alias.

mod anomaly_error;

pub use anomaly_error::{AnomalyError, ErrorStatus, Result};
