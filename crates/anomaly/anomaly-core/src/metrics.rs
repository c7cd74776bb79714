//! Binary classification metrics
//!
//! Zero-denominator metrics evaluate to `0.0` and are flagged as undefined
//! instead of failing, so single-class label sets are still reportable.

use anomaly_spi::{AnomalyError, ConfusionMatrix, Result, UndefinedMetric};

/// Count outcomes of `predicted` against `truth`.
pub fn confusion_matrix(truth: &[bool], predicted: &[bool]) -> Result<ConfusionMatrix> {
    if truth.len() != predicted.len() {
        return Err(AnomalyError::invalid(
            "predicted",
            format!("{} predictions for {} labels", predicted.len(), truth.len()),
        ));
    }
    let mut cm = ConfusionMatrix::default();
    for (&t, &p) in truth.iter().zip(predicted) {
        match (t, p) {
            (true, true) => cm.true_positives += 1,
            (false, true) => cm.false_positives += 1,
            (false, false) => cm.true_negatives += 1,
            (true, false) => cm.false_negatives += 1,
        }
    }
    Ok(cm)
}

fn ratio(numerator: usize, denominator: usize) -> Option<f64> {
    (denominator > 0).then(|| numerator as f64 / denominator as f64)
}

/// Fraction of correct predictions; `None` for an empty matrix.
pub fn accuracy(cm: &ConfusionMatrix) -> Option<f64> {
    let total = cm.true_positives + cm.false_positives + cm.true_negatives + cm.false_negatives;
    ratio(cm.true_positives + cm.true_negatives, total)
}

/// `tp / (tp + fp)`; `None` when nothing was predicted positive.
pub fn precision(cm: &ConfusionMatrix) -> Option<f64> {
    ratio(cm.true_positives, cm.true_positives + cm.false_positives)
}

/// `tp / (tp + fn)`; `None` when there are no positive labels.
pub fn recall(cm: &ConfusionMatrix) -> Option<f64> {
    ratio(cm.true_positives, cm.true_positives + cm.false_negatives)
}

/// `2tp / (2tp + fp + fn)`; `None` when there are neither positive labels
/// nor positive predictions.
pub fn f1(cm: &ConfusionMatrix) -> Option<f64> {
    ratio(
        2 * cm.true_positives,
        2 * cm.true_positives + cm.false_positives + cm.false_negatives,
    )
}

/// All metrics for one set of predictions.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationMetrics {
    pub confusion: ConfusionMatrix,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub undefined: Vec<UndefinedMetric>,
}

/// Evaluate predictions against ground truth. Both must be non-empty.
pub fn evaluate(truth: &[bool], predicted: &[bool]) -> Result<ClassificationMetrics> {
    let confusion = confusion_matrix(truth, predicted)?;
    let accuracy = accuracy(&confusion)
        .ok_or_else(|| AnomalyError::invalid("truth", "no labels to evaluate"))?;

    let mut undefined = Vec::new();
    let mut or_zero = |value: Option<f64>, metric: UndefinedMetric| {
        value.unwrap_or_else(|| {
            undefined.push(metric);
            0.0
        })
    };
    let precision = or_zero(precision(&confusion), UndefinedMetric::Precision);
    let recall = or_zero(recall(&confusion), UndefinedMetric::Recall);
    let f1 = or_zero(f1(&confusion), UndefinedMetric::F1);

    Ok(ClassificationMetrics {
        confusion,
        accuracy,
        precision,
        recall,
        f1,
        undefined,
    })
}
