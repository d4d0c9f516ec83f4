use crate::{
    color::{hsv_to_luv, luv_distance},
    histogram::Histogram,
};
use palette::Luv;

/// Every admitted color of an image in LUV space, with its weight. Used to score representatives against the whole
/// image rather than only against the cluster they came from.
#[derive(Debug, Clone)]
pub struct LuvIndex {
    colors: Vec<(Luv, u64)>,
    total_weight: u64,
}

impl LuvIndex {
    pub fn from_histogram(histogram: &Histogram) -> Self {
        let colors = histogram
            .bins()
            .flat_map(|bin| bin.samples())
            .map(|sample| (hsv_to_luv(sample.hsv()), sample.weight() as u64))
            .collect();

        Self {
            colors,
            total_weight: histogram.total_weight(),
        }
    }

    /// The fraction of the admitted weight whose color lies within `max_distance` of `color` in LUV space.
    pub fn score(&self, color: Luv, max_distance: f32) -> f32 {
        if self.total_weight == 0 {
            return 0.0;
        }

        let close = self
            .colors
            .iter()
            .filter(|(other, _)| luv_distance(color, *other) <= max_distance)
            .map(|(_, weight)| weight)
            .sum::<u64>();

        (close as f64 / self.total_weight as f64) as f32
    }
}

/// The fraction of `total_weight` held by a single bin.
pub fn bin_fraction(bin_weight: u64, total_weight: u64) -> f32 {
    if total_weight == 0 {
        0.0
    } else {
        (bin_weight as f64 / total_weight as f64) as f32
    }
}
