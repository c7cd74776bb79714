//! Basic example demonstrating waveform anomaly scoring
//!
//! Run with: cargo run --example basic -p waveguard-anomaly
//! Set RUST_LOG=anomaly_core=debug to see per-waveform scoring.

use anomaly::prelude::*;
use anomaly::{
    calibrate_recording, generate_sample, inject_dip, sine_wave, AnomalyInjection,
    SyntheticWaveConfig,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "anomaly_core=info".into()),
        )
        .init();

    println!("=== waveguard-anomaly Basic Example ===\n");

    // 1. Single waveforms against a synthetic reference
    let clean = sine_wave(&SyntheticWaveConfig::default())?;
    let mut dipped = clean.clone();
    inject_dip(&mut dipped, 400, 100, 0.2);

    let mut detector = KlDetector::default();
    detector.set_reference(&clean)?;
    for (name, wave) in [("clean", &clean), ("80% dip", &dipped)] {
        let result = detector.detect(wave)?;
        println!(
            "1. {:8} divergence={:.5} threshold={:.5} anomaly={}",
            name, result.divergence, result.threshold, result.verdict
        );
    }

    // 2. Calibrate a threshold on a generated recording
    let wave = SyntheticWaveConfig {
        duration: 20.0,
        ..SyntheticWaveConfig::default()
    };
    let injection = AnomalyInjection::new(0.0003, 100, 0.2);
    let recording =
        generate_sample(&wave, &injection, &mut StdRng::seed_from_u64(2024))?.into_recording();
    let report = calibrate_recording(&recording, &CalibrationConfig::default())?;
    println!(
        "\n2. calibrated threshold={:.5} accuracy={:.2} precision={:.2} recall={:.2} f1={:.2}",
        report.threshold, report.accuracy, report.precision, report.recall, report.f1
    );
    if !report.undefined.is_empty() {
        println!("   undefined metrics: {:?}", report.undefined);
    }

    // 3. Store, detect, and list through the service
    let service = WaveformService::in_memory();
    service.set_reference(&clean)?;
    for (id, wave) in [("w-clean", &clean), ("w-dip", &dipped)] {
        let points = wave
            .iter()
            .enumerate()
            .map(|(i, &v)| Point::new(format!("{:.3}", i as f64 / 1000.0), v))
            .collect();
        service.put(id, points, false)?;
    }
    for (id, outcome) in service.detect_batch(["w-clean", "w-dip"], Some("example")) {
        println!("\n3. {} -> {:?}", id, outcome.map(|r| r.verdict));
    }
    println!("   flagged: {:?}", service.list(ListFilter::Anomalous)?);

    println!("\n=== Example Complete ===");
    Ok(())
}
