//! Service facade over a store and a detector.
//!
//! The detector sits behind an `Arc` that is swapped whole on
//! reconfiguration. A `detect` call works on the snapshot it took when it
//! started, so a concurrent reference change never mixes two references
//! in one score.

use std::sync::Arc;

use anomaly_api::DetectorConfig;
use anomaly_spi::{
    DetectionResult, ListFilter, Point, RecordSummary, Result, WaveformDetector, WaveformRecord,
    WaveformStore,
};
use parking_lot::{Mutex, RwLock};

use crate::detector::KlDetector;
use crate::store::InMemoryWaveformStore;

/// Stores waveforms and scores them against the configured reference.
pub struct WaveformService<S: WaveformStore = InMemoryWaveformStore> {
    store: S,
    detector: RwLock<Arc<KlDetector>>,
    // Serializes detector replacements so a threshold change and a
    // reference change cannot overwrite each other.
    update: Mutex<()>,
}

impl WaveformService<InMemoryWaveformStore> {
    /// Service over a fresh in-memory store with an unconfigured default
    /// detector.
    pub fn in_memory() -> Self {
        Self::new(InMemoryWaveformStore::new(), KlDetector::default())
    }
}

impl<S: WaveformStore> WaveformService<S> {
    pub fn new(store: S, detector: KlDetector) -> Self {
        Self {
            store,
            detector: RwLock::new(Arc::new(detector)),
            update: Mutex::new(()),
        }
    }

    /// Build the detector from configuration.
    pub fn with_config(store: S, config: &DetectorConfig) -> Result<Self> {
        Ok(Self::new(store, KlDetector::from_config(config)?))
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Snapshot of the current detector.
    pub fn detector(&self) -> Arc<KlDetector> {
        Arc::clone(&self.detector.read())
    }

    fn swap(&self, detector: KlDetector) {
        *self.detector.write() = Arc::new(detector);
    }

    /// Replace the detector. Without a reference source in `config` the
    /// new detector is unconfigured until `set_reference` is called.
    pub fn configure(&self, config: &DetectorConfig) -> Result<()> {
        let _guard = self.update.lock();
        let detector = KlDetector::from_config(config)?;
        tracing::info!(
            bins = detector.bin_count(),
            threshold = detector.threshold(),
            configured = detector.is_configured(),
            "detector reconfigured"
        );
        self.swap(detector);
        Ok(())
    }

    /// Install a new reference, keeping bin count, threshold and trimming.
    ///
    /// On failure the previous reference stays in place.
    pub fn set_reference(&self, samples: &[f64]) -> Result<()> {
        let _guard = self.update.lock();
        let mut detector = KlDetector::clone(&self.detector());
        detector.set_reference(samples)?;
        self.swap(detector);
        Ok(())
    }

    /// Change the threshold, keeping the reference.
    pub fn set_threshold(&self, threshold: f64) -> Result<()> {
        let _guard = self.update.lock();
        let detector = KlDetector::clone(&self.detector()).with_threshold(threshold)?;
        tracing::info!(threshold, "detector threshold changed");
        self.swap(detector);
        Ok(())
    }

    pub fn put(&self, id: &str, points: Vec<Point>, anomaly: bool) -> Result<WaveformRecord> {
        self.store.put(id, points, anomaly)
    }

    pub fn get(&self, id: &str) -> Result<WaveformRecord> {
        self.store.get(id)
    }

    pub fn patch_anomaly(&self, id: &str, anomaly: bool, owner_ref: Option<&str>) -> Result<()> {
        self.store.patch_anomaly(id, anomaly, owner_ref)
    }

    pub fn list(&self, filter: ListFilter) -> Result<Vec<RecordSummary>> {
        self.store.list(filter)
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        self.store.delete(id)
    }

    /// Score the stored waveform `id` and write the verdict back to its
    /// anomaly flag, recording `owner_ref` when given.
    ///
    /// Nothing is written when scoring fails.
    pub fn detect(&self, id: &str, owner_ref: Option<&str>) -> Result<DetectionResult> {
        let detector = self.detector();
        let record = self.store.get(id)?;
        let result = detector.detect(&record.values())?;
        self.store.patch_anomaly(id, result.verdict, owner_ref)?;
        tracing::info!(
            id,
            divergence = result.divergence,
            threshold = result.threshold,
            anomaly = result.verdict,
            "verdict written"
        );
        Ok(result)
    }

    /// Run [`detect`](Self::detect) for each id, collecting per-id
    /// outcomes. A failing id does not stop the rest.
    pub fn detect_batch<I>(
        &self,
        ids: I,
        owner_ref: Option<&str>,
    ) -> Vec<(String, Result<DetectionResult>)>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        ids.into_iter()
            .map(|id| {
                let id = id.as_ref();
                let outcome = self.detect(id, owner_ref);
                if let Err(e) = &outcome {
                    tracing::warn!(id, error = %e, "detection failed");
                }
                (id.to_string(), outcome)
            })
            .collect()
    }
}
