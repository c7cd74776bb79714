//! Stored waveform records.

use serde::{Deserialize, Serialize};

/// One acquired sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Acquisition timestamp as supplied by the producer.
    pub time: String,
    pub value: f64,
}

impl Point {
    pub fn new(time: impl Into<String>, value: f64) -> Self {
        Self {
            time: time.into(),
            value,
        }
    }
}

/// A waveform stored under an identifier together with its anomaly flag.
///
/// `points` keep insertion order, which is the acquisition order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveformRecord {
    pub id: String,
    pub points: Vec<Point>,
    pub anomaly: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_ref: Option<String>,
}

impl WaveformRecord {
    /// Create a record with no owner reference.
    pub fn new(id: impl Into<String>, points: Vec<Point>, anomaly: bool) -> Self {
        Self {
            id: id.into(),
            points,
            anomaly,
            owner_ref: None,
        }
    }

    /// Sample values in acquisition order.
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// Listing view of this record.
    pub fn summary(&self) -> RecordSummary {
        RecordSummary {
            id: self.id.clone(),
            owner_ref: self.owner_ref.clone(),
            anomaly: self.anomaly,
        }
    }
}

/// Listing entry returned by `WaveformStore::list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSummary {
    pub id: String,
    pub owner_ref: Option<String>,
    pub anomaly: bool,
}

/// Filter for `WaveformStore::list`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListFilter {
    #[default]
    All,
    Anomalous,
    Normal,
}

impl ListFilter {
    /// Whether a record with the given flag passes the filter.
    pub fn matches(self, anomaly: bool) -> bool {
        match self {
            Self::All => true,
            Self::Anomalous => anomaly,
            Self::Normal => !anomaly,
        }
    }
}
