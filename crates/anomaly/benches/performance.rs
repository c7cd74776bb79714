//! Performance benchmarks for waveguard-anomaly

use std::hint::black_box;
use std::time::Instant;

use anomaly::prelude::*;
use anomaly::{
    chunk, dataset_from_recording, histogram, inject_dip, kl_divergence, sine_wave,
    DualChannelRecording, SyntheticWaveConfig,
};

fn mains(seconds: f64) -> Vec<f64> {
    sine_wave(&SyntheticWaveConfig {
        duration: seconds,
        ..SyntheticWaveConfig::default()
    })
    .unwrap()
}

fn bench<F, R>(name: &str, iterations: u32, mut f: F)
where
    F: FnMut() -> R,
{
    // Warmup
    for _ in 0..3 {
        black_box(f());
    }

    let start = Instant::now();
    for _ in 0..iterations {
        black_box(f());
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations;

    println!(
        "{:32} {:>10.2?} total, {:>10.2?}/iter ({} iters)",
        name, elapsed, per_iter, iterations
    );
}

fn main() {
    println!("=== Waveform Scoring Benchmarks ===\n");

    let wave_1s = mains(1.0);
    let wave_10s = mains(10.0);
    let wave_100s = mains(100.0);

    println!("--- Density and Divergence ---");
    bench("histogram 50 bins (1K)", 10_000, || histogram(&wave_1s, 50).unwrap());
    bench("histogram 50 bins (100K)", 100, || {
        histogram(&wave_100s, 50).unwrap()
    });
    bench("histogram 500 bins (100K)", 100, || {
        histogram(&wave_100s, 500).unwrap()
    });

    let p = histogram(&wave_1s, 50).unwrap();
    let mut dipped = wave_1s.clone();
    inject_dip(&mut dipped, 400, 100, 0.2);
    let q = histogram(&dipped, 50).unwrap();
    bench("kl_divergence (50 bins)", 100_000, || {
        kl_divergence(&p.hist, &q.hist).unwrap()
    });

    println!("\n--- Detector ---");
    let mut detector = KlDetector::default();
    detector.set_reference(&wave_1s).unwrap();
    bench("detect (1K)", 10_000, || detector.detect(&dipped).unwrap());
    let trimming = {
        let mut d = KlDetector::default().with_trim(true);
        d.set_reference(&wave_1s).unwrap();
        d
    };
    bench("detect trimmed (1K)", 10_000, || trimming.detect(&dipped).unwrap());
    bench("detect_windows (100K / 1K)", 100, || {
        detector.detect_windows(&wave_100s, 1000, 1000).unwrap()
    });
    bench("chunk count (100K / 1K, step 10)", 1000, || {
        chunk(&wave_100s, 1000, 10).unwrap().count()
    });

    println!("\n--- Calibration ---");
    let recording = DualChannelRecording {
        time: (0..wave_10s.len()).map(|i| i as f64 / 1000.0).collect(),
        clean: wave_10s.clone(),
        observed: wave_10s.clone(),
        labels: vec![false; wave_10s.len()],
    };
    let config = CalibrationConfig::default();
    let dataset = dataset_from_recording(&recording, &config.window, 0).unwrap();
    let calibrator = ThresholdCalibrator::from_config(&config).unwrap();
    bench("calibrate (10 chunks)", 1000, || {
        calibrator.calibrate(&dataset).unwrap()
    });

    println!("\n--- Service ---");
    let service = WaveformService::in_memory();
    service.set_reference(&wave_1s).unwrap();
    let points: Vec<Point> = dipped
        .iter()
        .enumerate()
        .map(|(i, &v)| Point::new(i.to_string(), v))
        .collect();
    service.put("bench", points, false).unwrap();
    bench("service detect (1K)", 10_000, || {
        service.detect("bench", None).unwrap()
    });

    println!("\n=== Benchmark Complete ===");
}
