//! Target binning and stratified train/test partitioning

use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;
use tracing::warn;

/// Assign each value to one of `n_bins` equal-frequency bins.
///
/// Edges are the interior quantiles of `values` (linear interpolation). Bins
/// are right-closed, the lowest value falls in bin 0. Duplicate edges are
/// dropped, so heavily tied targets yield fewer bins rather than an error.
pub fn quantile_bins(values: &[f64], n_bins: usize) -> Vec<usize> {
    let n = values.len();
    if n == 0 || n_bins <= 1 {
        return vec![0; n];
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mut edges: Vec<f64> = (1..n_bins)
        .map(|q| quantile_sorted(&sorted, q as f64 / n_bins as f64))
        .collect();
    edges.dedup();

    if edges.len() + 1 < n_bins {
        warn!(
            requested = n_bins,
            effective = edges.len() + 1,
            "duplicate quantile edges in target, stratification bins collapsed"
        );
    }

    values
        .iter()
        .map(|&v| edges.iter().filter(|&&e| v > e).count())
        .collect()
}

/// Quantile of already sorted data with linear interpolation
fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    let frac = pos - lo as f64;
    sorted[lo] + frac * (sorted[hi] - sorted[lo])
}

/// Partition row indices into (train, test) preserving the bin proportions.
///
/// Per-bin test quotas are allocated by largest remainder so they sum to
/// `ceil(test_ratio * n)`, clamped to `[1, n - 1]`. Requires `bins.len() >= 2`.
pub fn stratified_indices(
    bins: &[usize],
    test_ratio: f64,
    rng: &mut ChaCha8Rng,
) -> (Vec<usize>, Vec<usize>) {
    let n = bins.len();
    let n_test = ((test_ratio * n as f64).ceil() as usize).clamp(1, n.saturating_sub(1).max(1));

    let mut groups: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (i, &bin) in bins.iter().enumerate() {
        groups.entry(bin).or_default().push(i);
    }

    // Floor of each proportional share, then hand out the remainder
    let mut quotas: Vec<(usize, usize, f64)> = groups
        .iter()
        .map(|(&bin, members)| {
            let exact = members.len() as f64 * n_test as f64 / n as f64;
            (bin, exact.floor() as usize, exact - exact.floor())
        })
        .collect();

    let assigned: usize = quotas.iter().map(|q| q.1).sum();
    let mut remaining = n_test.saturating_sub(assigned);

    let mut order: Vec<usize> = (0..quotas.len()).collect();
    order.sort_by(|&a, &b| quotas[b].2.total_cmp(&quotas[a].2).then(quotas[a].0.cmp(&quotas[b].0)));

    while remaining > 0 {
        let mut progressed = false;
        for &k in &order {
            if remaining == 0 {
                break;
            }
            let capacity = groups[&quotas[k].0].len();
            if quotas[k].1 < capacity {
                quotas[k].1 += 1;
                remaining -= 1;
                progressed = true;
            }
        }
        if !progressed {
            break;
        }
    }

    let mut train = Vec::with_capacity(n - n_test);
    let mut test = Vec::with_capacity(n_test);

    for (bin, quota, _) in quotas {
        let mut members = groups.remove(&bin).unwrap_or_default();
        members.shuffle(rng);
        let (test_part, train_part) = members.split_at(quota.min(members.len()));
        test.extend_from_slice(test_part);
        train.extend_from_slice(train_part);
    }

    train.shuffle(rng);
    test.shuffle(rng);

    (train, test)
}
