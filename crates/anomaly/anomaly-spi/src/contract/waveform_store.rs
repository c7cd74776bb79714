//! Waveform store trait definition.

use crate::error::Result;
use crate::model::{ListFilter, Point, RecordSummary, WaveformRecord};

/// Keyed persistence for waveform records and their anomaly flag.
///
/// Every operation is atomic with respect to a single record. Concurrent
/// writes to the same id are serialized with last-writer-wins; operations
/// on distinct ids must not block each other.
pub trait WaveformStore: Send + Sync {
    /// Insert or fully replace the record under `id`.
    fn put(&self, id: &str, points: Vec<Point>, anomaly: bool) -> Result<WaveformRecord>;

    /// Fetch a record. Fails with `NotFound` if absent.
    fn get(&self, id: &str) -> Result<WaveformRecord>;

    /// Update only the anomaly flag, and the owner reference when one is
    /// given. Fails with `NotFound` if absent.
    fn patch_anomaly(&self, id: &str, anomaly: bool, owner_ref: Option<&str>) -> Result<()>;

    /// List records passing `filter`, ordered by id.
    fn list(&self, filter: ListFilter) -> Result<Vec<RecordSummary>>;

    /// Remove a record. Fails with `NotFound` if absent.
    fn delete(&self, id: &str) -> Result<()>;
}
