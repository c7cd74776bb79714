//! Kullback-Leibler divergence between histograms.
//!
//! The pipeline always passes the reference first:
//! `kl_divergence(reference, sample)` measures the information lost when
//! the sample distribution is used to approximate the reference.

use anomaly_spi::{AnomalyError, Histogram, Result};

/// `Σ pᵢ · ln(pᵢ / qᵢ)` with `p` and `q` rescaled to unit sum.
///
/// Both inputs must have the same length and strictly positive, finite
/// cells; floored histograms from [`crate::histogram`] always do. The
/// result is in nats and never negative. Not symmetric.
pub fn kl_divergence(p: &[f64], q: &[f64]) -> Result<f64> {
    if p.len() != q.len() {
        return Err(AnomalyError::invalid(
            "histogram",
            format!("bin count mismatch: {} vs {}", p.len(), q.len()),
        ));
    }
    if p.is_empty() {
        return Err(AnomalyError::invalid("histogram", "no bins"));
    }
    let p_total = checked_total("p", p)?;
    let q_total = checked_total("q", q)?;

    let divergence: f64 = p
        .iter()
        .zip(q)
        .map(|(&pi, &qi)| {
            let pi = pi / p_total;
            let qi = qi / q_total;
            pi * (pi / qi).ln()
        })
        .sum();

    // Rounding can leave identical distributions a hair below zero.
    Ok(divergence.max(0.0))
}

fn checked_total(name: &str, cells: &[f64]) -> Result<f64> {
    if let Some(i) = cells.iter().position(|c| !c.is_finite() || *c <= 0.0) {
        return Err(AnomalyError::invalid(
            name,
            format!("cell {} is not strictly positive and finite", i),
        ));
    }
    Ok(cells.iter().sum())
}

/// Divergence of `sample` from `reference`, reference first.
pub fn divergence_from_reference(reference: &Histogram, sample: &Histogram) -> Result<f64> {
    kl_divergence(&reference.hist, &sample.hist)
}
