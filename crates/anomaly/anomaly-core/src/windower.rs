//! Windowing of long waveforms into comparable chunks.
//!
//! Chunks borrow from the source waveform and never outlive it. Trimming
//! to zero crossings keeps whole periods of a periodic signal so chunks
//! are phase-comparable; it must be applied to the reference and to every
//! scored chunk alike.

use anomaly_spi::{AnomalyError, Result};

/// A contiguous slice of a waveform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Chunk<'a> {
    /// Offset of the first sample in the source waveform.
    pub start: usize,
    pub samples: &'a [f64],
}

impl<'a> Chunk<'a> {
    pub fn new(start: usize, samples: &'a [f64]) -> Self {
        Self { start, samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// This chunk trimmed to its first and last zero crossing.
    pub fn trimmed(&self) -> Chunk<'a> {
        match crossing_bounds(self.samples) {
            Some((first, last)) => Chunk {
                start: self.start + first,
                samples: &self.samples[first..=last],
            },
            None => *self,
        }
    }
}

/// Iterator over fixed-length windows of a waveform.
///
/// Cheap to clone; a clone resumes from the same position, and
/// calling [`chunk`] again restarts from the beginning.
#[derive(Debug, Clone)]
pub struct Windows<'a> {
    samples: &'a [f64],
    window_len: usize,
    step: usize,
    next: usize,
    count: usize,
}

impl<'a> Iterator for Windows<'a> {
    type Item = Chunk<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.count {
            return None;
        }
        let start = self.next * self.step;
        self.next += 1;
        Some(Chunk::new(
            start,
            &self.samples[start..start + self.window_len],
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Windows<'_> {}

/// Number of windows [`chunk`] yields: `floor((len - window_len) / step) + 1`,
/// or 0 when the waveform is shorter than one window.
pub fn window_count(len: usize, window_len: usize, step: usize) -> usize {
    if window_len == 0 || step == 0 || len < window_len {
        return 0;
    }
    (len - window_len) / step + 1
}

/// Split `samples` into windows of `window_len`, advancing by `step`.
///
/// `step < window_len` overlaps windows, `step == window_len` tiles them.
pub fn chunk(samples: &[f64], window_len: usize, step: usize) -> Result<Windows<'_>> {
    if window_len == 0 {
        return Err(AnomalyError::invalid("window_len", "must be positive"));
    }
    if step == 0 {
        return Err(AnomalyError::invalid("step", "must be positive"));
    }
    Ok(Windows {
        samples,
        window_len,
        step,
        next: 0,
        count: window_count(samples.len(), window_len, step),
    })
}

fn sign(x: f64) -> i8 {
    if x > 0.0 {
        1
    } else if x < 0.0 {
        -1
    } else {
        0
    }
}

fn is_crossing(pair: &[f64]) -> bool {
    sign(pair[0]) != sign(pair[1])
}

/// Indices `i` where `sign(s[i]) != sign(s[i + 1])`.
///
/// Zero is its own sign, so touching zero counts as a crossing.
pub fn zero_crossings(samples: &[f64]) -> Vec<usize> {
    samples
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| is_crossing(pair))
        .map(|(i, _)| i)
        .collect()
}

/// First and last crossing, when there are at least two.
fn crossing_bounds(samples: &[f64]) -> Option<(usize, usize)> {
    let first = samples.windows(2).position(is_crossing)?;
    let last = samples.windows(2).rposition(is_crossing)?;
    (last > first).then_some((first, last))
}

/// Sub-slice from the first to the last zero crossing, inclusive.
///
/// Returns `samples` unchanged when fewer than two crossings exist.
pub fn trim_to_zero_crossings(samples: &[f64]) -> &[f64] {
    match crossing_bounds(samples) {
        Some((first, last)) => &samples[first..=last],
        None => samples,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| (2.0 * std::f64::consts::PI * 50.0 * i as f64 / 1000.0).sin())
            .collect()
    }

    #[test]
    fn test_window_count_formula() {
        assert_eq!(window_count(10, 4, 2), 4);
        assert_eq!(window_count(10, 5, 5), 2);
        assert_eq!(window_count(10, 10, 3), 1);
        assert_eq!(window_count(9, 10, 1), 0);
        assert_eq!(window_count(0, 1, 1), 0);
    }

    #[test]
    fn test_tiling_windows() {
        let data: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let chunks: Vec<_> = chunk(&data, 5, 5).unwrap().collect();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].samples, &[0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(chunks[1].start, 5);
        assert_eq!(chunks[1].samples, &[5.0, 6.0, 7.0, 8.0, 9.0]);
    }

    #[test]
    fn test_overlapping_windows() {
        let data: Vec<f64> = (0..6).map(|i| i as f64).collect();
        let windows = chunk(&data, 4, 1).unwrap();
        assert_eq!(windows.len(), 3);
        let starts: Vec<usize> = windows.map(|c| c.start).collect();
        assert_eq!(starts, vec![0, 1, 2]);
    }

    #[test]
    fn test_windows_are_restartable() {
        let data: Vec<f64> = (0..20).map(|i| i as f64).collect();
        let windows = chunk(&data, 6, 4).unwrap();
        let first: Vec<_> = windows.clone().collect();
        let second: Vec<_> = windows.collect();
        let third: Vec<_> = chunk(&data, 6, 4).unwrap().collect();
        assert_eq!(first, second);
        assert_eq!(first, third);
    }

    #[test]
    fn test_short_input_yields_nothing() {
        let data = [1.0, 2.0];
        assert_eq!(chunk(&data, 3, 1).unwrap().count(), 0);
    }

    #[test]
    fn test_invalid_window_parameters() {
        let data = [1.0, 2.0];
        assert!(chunk(&data, 0, 1).is_err());
        assert!(chunk(&data, 1, 0).is_err());
    }

    #[test]
    fn test_zero_crossings() {
        let data = [1.0, 2.0, -1.0, -3.0, 4.0, 0.0, 5.0];
        assert_eq!(zero_crossings(&data), vec![1, 3, 4, 5]);
    }

    #[test]
    fn test_trim_inclusive_of_last_crossing() {
        let data = [1.0, 2.0, -1.0, -3.0, 4.0, 5.0];
        assert_eq!(trim_to_zero_crossings(&data), &[2.0, -1.0, -3.0]);
    }

    #[test]
    fn test_trim_requires_two_crossings() {
        let one = [1.0, 2.0, -1.0, -2.0];
        assert_eq!(trim_to_zero_crossings(&one), &one);
        let none = [1.0, 2.0, 3.0];
        assert_eq!(trim_to_zero_crossings(&none), &none);
        let empty: [f64; 0] = [];
        assert!(trim_to_zero_crossings(&empty).is_empty());
    }

    #[test]
    fn test_trimmed_ends_are_adjacent_to_sign_changes() {
        let wave = sine(1000);
        for window in chunk(&wave, 237, 101).unwrap() {
            let trimmed = window.trimmed();
            let end = trimmed.start + trimmed.len() - 1;
            assert!(sign(wave[trimmed.start]) != sign(wave[trimmed.start + 1]));
            assert!(sign(wave[end]) != sign(wave[end + 1]));
            assert!(trimmed.start >= window.start);
            assert!(end < window.start + window.len());
        }
    }

    #[test]
    fn test_chunk_trimmed_offsets() {
        let data = [3.0, 1.0, -1.0, -2.0, 2.0, 4.0];
        let trimmed = Chunk::new(10, &data).trimmed();
        assert_eq!(trimmed.start, 11);
        assert_eq!(trimmed.samples, &[1.0, -1.0, -2.0]);
    }
}
