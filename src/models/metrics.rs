//! Regression metrics

/// Coefficient of determination.
///
/// Returns 0.0 when the labels have zero variance.
pub fn r2_score(labels: &[f64], predictions: &[f64]) -> f64 {
    if labels.is_empty() {
        return 0.0;
    }

    let mean_label = labels.iter().sum::<f64>() / labels.len() as f64;

    let ss_res: f64 = predictions
        .iter()
        .zip(labels.iter())
        .map(|(p, l)| (l - p).powi(2))
        .sum();

    let ss_tot: f64 = labels.iter().map(|l| (l - mean_label).powi(2)).sum();

    if ss_tot == 0.0 {
        0.0
    } else {
        1.0 - ss_res / ss_tot
    }
}

/// Mean squared error
pub fn mse(labels: &[f64], predictions: &[f64]) -> f64 {
    if labels.is_empty() {
        return 0.0;
    }

    predictions
        .iter()
        .zip(labels.iter())
        .map(|(p, l)| (p - l).powi(2))
        .sum::<f64>()
        / labels.len() as f64
}
