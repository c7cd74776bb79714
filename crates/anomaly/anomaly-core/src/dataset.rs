//! Dual-channel labeled recordings and their CSV form.
//!
//! The CSV layout is one row per sample with the header
//! `time,normal_wave,anomaly_wave,is_anomaly`; `is_anomaly` is 0 or 1.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use anomaly_spi::{AnomalyError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
struct Row {
    time: f64,
    normal_wave: f64,
    anomaly_wave: f64,
    is_anomaly: u8,
}

/// A clean reference channel recorded alongside a possibly anomalous one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DualChannelRecording {
    /// Sample times in seconds.
    pub time: Vec<f64>,
    pub clean: Vec<f64>,
    pub observed: Vec<f64>,
    /// Per-sample ground truth for `observed`.
    pub labels: Vec<bool>,
}

impl DualChannelRecording {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Check that all channels have the same length.
    pub fn validate(&self) -> Result<()> {
        let n = self.time.len();
        for (name, len) in [
            ("clean", self.clean.len()),
            ("observed", self.observed.len()),
            ("labels", self.labels.len()),
        ] {
            if len != n {
                return Err(AnomalyError::invalid(
                    name,
                    format!("has {} samples, time has {}", len, n),
                ));
            }
        }
        Ok(())
    }

    /// Parse CSV rows from any reader.
    pub fn read_csv<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::Reader::from_reader(reader);
        let mut recording = Self::default();
        for (line, row) in reader.deserialize::<Row>().enumerate() {
            let row = row.map_err(|e| AnomalyError::Dataset(format!("row {}: {}", line + 1, e)))?;
            recording.time.push(row.time);
            recording.clean.push(row.normal_wave);
            recording.observed.push(row.anomaly_wave);
            recording.labels.push(row.is_anomaly != 0);
        }
        tracing::debug!(samples = recording.len(), "read labeled recording");
        Ok(recording)
    }

    /// Read a CSV file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| AnomalyError::Dataset(format!("{}: {}", path.display(), e)))?;
        Self::read_csv(BufReader::new(file))
    }

    /// Write CSV rows to any writer.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        self.validate()?;
        let mut writer = csv::Writer::from_writer(writer);
        for i in 0..self.len() {
            writer
                .serialize(Row {
                    time: self.time[i],
                    normal_wave: self.clean[i],
                    anomaly_wave: self.observed[i],
                    is_anomaly: u8::from(self.labels[i]),
                })
                .map_err(|e| AnomalyError::Dataset(e.to_string()))?;
        }
        writer
            .flush()
            .map_err(|e| AnomalyError::Dataset(e.to_string()))?;
        Ok(())
    }

    /// Write a CSV file, replacing any existing one.
    pub fn to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)
            .map_err(|e| AnomalyError::Dataset(format!("{}: {}", path.display(), e)))?;
        self.write_csv(BufWriter::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "time,normal_wave,anomaly_wave,is_anomaly\n\
                       0.0,0.0,0.0,0\n\
                       0.001,100.5,20.1,1\n\
                       0.002,191.2,191.2,0\n";

    #[test]
    fn test_read_csv() {
        let recording = DualChannelRecording::read_csv(CSV.as_bytes()).unwrap();
        assert_eq!(recording.len(), 3);
        assert_eq!(recording.clean, vec![0.0, 100.5, 191.2]);
        assert_eq!(recording.observed, vec![0.0, 20.1, 191.2]);
        assert_eq!(recording.labels, vec![false, true, false]);
        assert!(recording.validate().is_ok());
    }

    #[test]
    fn test_write_then_read() {
        let recording = DualChannelRecording::read_csv(CSV.as_bytes()).unwrap();
        let mut buffer = Vec::new();
        recording.write_csv(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.starts_with("time,normal_wave,anomaly_wave,is_anomaly"));
        assert_eq!(
            DualChannelRecording::read_csv(text.as_bytes()).unwrap(),
            recording
        );
    }

    #[test]
    fn test_malformed_row() {
        let csv = "time,normal_wave,anomaly_wave,is_anomaly\n0.0,abc,0.0,0\n";
        let result = DualChannelRecording::read_csv(csv.as_bytes());
        assert!(matches!(result, Err(AnomalyError::Dataset(_))));
    }

    #[test]
    fn test_missing_column() {
        let csv = "time,normal_wave\n0.0,1.0\n";
        assert!(DualChannelRecording::read_csv(csv.as_bytes()).is_err());
    }

    #[test]
    fn test_mismatched_channels() {
        let recording = DualChannelRecording {
            time: vec![0.0, 1.0],
            clean: vec![0.0, 1.0],
            observed: vec![0.0],
            labels: vec![false, false],
        };
        assert!(matches!(
            recording.validate(),
            Err(AnomalyError::InvalidInput { .. })
        ));
        assert!(recording.write_csv(Vec::new()).is_err());
    }

    #[test]
    fn test_missing_file() {
        let result = DualChannelRecording::from_path("/nonexistent/dataset.csv");
        assert!(matches!(result, Err(AnomalyError::Dataset(_))));
    }
}
