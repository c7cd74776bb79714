//! # waveguard-anomaly
//!
//! Scores periodic waveforms against a clean reference by comparing value
//! histograms with the Kullback-Leibler divergence.
//!
//! ```no_run
//! use anomaly::prelude::*;
//!
//! let service = WaveformService::in_memory();
//! service.set_reference(&[0.0, 1.0, 0.0, -1.0, 0.0])?;
//! service.put("w1", vec![Point::new("0", 0.0), Point::new("1", 1.0)], false)?;
//! let result = service.detect("w1", Some("job-1"))?;
//! println!("divergence {} anomaly {}", result.divergence, result.verdict);
//! # Ok::<(), AnomalyError>(())
//! ```

pub use anomaly_facade::*;
