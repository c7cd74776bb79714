//! In-memory waveform store.
//!
//! Records live in a `DashMap`, so operations on distinct ids proceed in
//! parallel and every operation on one id holds that entry's shard lock.
//! Contents are lost on drop.

use anomaly_spi::{
    AnomalyError, ListFilter, Point, RecordSummary, Result, WaveformRecord, WaveformStore,
};
use dashmap::DashMap;

#[derive(Debug, Default)]
pub struct InMemoryWaveformStore {
    records: DashMap<String, WaveformRecord>,
}

impl InMemoryWaveformStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: DashMap::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl WaveformStore for InMemoryWaveformStore {
    fn put(&self, id: &str, points: Vec<Point>, anomaly: bool) -> Result<WaveformRecord> {
        if id.is_empty() {
            return Err(AnomalyError::invalid("id", "must not be empty"));
        }
        let record = WaveformRecord::new(id, points, anomaly);
        let replaced = self
            .records
            .insert(id.to_string(), record.clone())
            .is_some();
        tracing::debug!(id, points = record.points.len(), replaced, "waveform stored");
        Ok(record)
    }

    fn get(&self, id: &str) -> Result<WaveformRecord> {
        self.records
            .get(id)
            .map(|r| r.value().clone())
            .ok_or_else(|| AnomalyError::not_found(id))
    }

    fn patch_anomaly(&self, id: &str, anomaly: bool, owner_ref: Option<&str>) -> Result<()> {
        let mut record = self
            .records
            .get_mut(id)
            .ok_or_else(|| AnomalyError::not_found(id))?;
        record.anomaly = anomaly;
        if let Some(owner_ref) = owner_ref {
            record.owner_ref = Some(owner_ref.to_string());
        }
        Ok(())
    }

    fn list(&self, filter: ListFilter) -> Result<Vec<RecordSummary>> {
        let mut summaries: Vec<RecordSummary> = self
            .records
            .iter()
            .filter(|r| filter.matches(r.anomaly))
            .map(|r| r.summary())
            .collect();
        summaries.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(summaries)
    }

    fn delete(&self, id: &str) -> Result<()> {
        self.records
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| AnomalyError::not_found(id))
    }
}
