use crate::histogram::{Binning, Histogram, HistogramBin};
use std::cmp::Ordering;

/// How bins are weighed against each other before representatives are extracted from them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BinPriority {
    /// Raw weight scaled by `1 + factor * s`, where `s` is the bin's normalized saturation. No bin is discarded.
    SaturationBoosted { factor: f32 },
    /// Raw weight. Bins holding less than `min_bin_size_percent` percent of the total weight are discarded.
    MinimumSize { min_bin_size_percent: f32 },
}

/// Orders the bins of `histogram` by descending priority, breaking ties by ascending bin index.
pub fn prioritize_bins<'a>(histogram: &'a Histogram, binning: &Binning, policy: BinPriority) -> Vec<&'a HistogramBin> {
    let total_weight = histogram.total_weight() as f64;

    let mut bins = histogram
        .bins()
        .filter_map(|bin| {
            let weight = bin.weight() as f64;

            match policy {
                BinPriority::SaturationBoosted { factor } => {
                    let boost = 1.0 + factor as f64 * binning.normalized_saturation(bin.index()) as f64;
                    Some((bin, weight * boost))
                }
                BinPriority::MinimumSize { min_bin_size_percent } => {
                    if weight * 100.0 < min_bin_size_percent as f64 * total_weight {
                        None
                    } else {
                        Some((bin, weight))
                    }
                }
            }
        })
        .collect::<Vec<_>>();

    bins.sort_by(|(lhs, lhs_priority), (rhs, rhs_priority)| {
        match rhs_priority.partial_cmp(lhs_priority) {
            Some(Ordering::Equal) | None => lhs.index().cmp(&rhs.index()),
            Some(ordering) => ordering,
        }
    });

    bins.into_iter().map(|(bin, _)| bin).collect()
}
