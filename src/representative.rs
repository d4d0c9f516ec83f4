use crate::{
    color::PixelSample,
    config::{RepresentativePercentiles, RepresentativesPickerConfig},
    dbscan::{Dbscan, WeightedPoint},
    error::{Error, Result},
    histogram::HistogramBin,
};

/// A representative color of a cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Representative {
    hsv: (u8, u8, u8),
}

/// Splits a histogram bin into clusters with DBSCAN and picks a representative color for each of them.
#[derive(Debug, Clone, Copy)]
pub struct BinRepresentativesPicker {
    dbscan: Dbscan<3>,
    percentiles: RepresentativePercentiles,
}

impl Representative {
    pub fn hsv(self) -> (u8, u8, u8) {
        self.hsv
    }
}

impl BinRepresentativesPicker {
    pub fn new(config: RepresentativesPickerConfig, percentiles: RepresentativePercentiles) -> Self {
        Self {
            dbscan: Dbscan::new(
                config.dbscan_radius,
                config.dbscan_min_neighbors,
                config.dbscan_point_multipliers,
            ),
            percentiles,
        }
    }

    /// Returns one representative per cluster found in `bin`, in cluster discovery order.
    pub fn find_representative_colors(&self, bin: &HistogramBin) -> Result<Vec<Representative>> {
        let samples = bin.samples();

        self.dbscan
            .clusters(samples)
            .into_iter()
            .map(|cluster| {
                let members = cluster.into_iter().map(|index| samples[index]).collect::<Vec<_>>();
                let hsv = representative_of_samples(&members, self.percentiles)?;

                Ok(Representative { hsv })
            })
            .collect()
    }
}

impl WeightedPoint<3> for PixelSample {
    fn coordinates(&self) -> [f32; 3] {
        let (h, s, v) = self.hsv();
        [h as f32, s as f32, v as f32]
    }

    fn weight(&self) -> u32 {
        PixelSample::weight(*self)
    }
}

/// Picks a representative color for a set of weighted samples, choosing every channel independently by its
/// percentile. The result isn't necessarily one of the samples.
pub fn representative_of_samples(
    samples: &[PixelSample],
    percentiles: RepresentativePercentiles,
) -> Result<(u8, u8, u8)> {
    let channel = |select: fn(PixelSample) -> u8, percentile: f32| {
        channel_percentile(samples.iter().map(|&sample| (select(sample), sample.weight())), percentile)
            .ok_or(Error::EmptyCluster)
    };

    Ok((
        channel(PixelSample::hue, percentiles.hue)?,
        channel(PixelSample::saturation, percentiles.saturation)?,
        channel(PixelSample::value, percentiles.value)?,
    ))
}

/// Weighted nearest-rank percentile of a single channel.
///
/// With `W` the total weight, the rank is `max(1, ceil(percentile * W))` and the result is the smallest value whose
/// cumulative weight reaches the rank. The boundary is inclusive: for the values `[10, 10, 10, 20]` a percentile of
/// 0.75 gives 10 while 0.8 gives 20. Returns `None` if the total weight is zero.
pub fn channel_percentile<I>(values: I, percentile: f32) -> Option<u8>
where
    I: IntoIterator<Item = (u8, u32)>,
{
    let mut counts = [0u64; 256];
    for (value, weight) in values {
        counts[value as usize] += weight as u64;
    }

    let total = counts.iter().sum::<u64>();
    if total == 0 {
        return None;
    }

    let rank = nearest_rank(percentile, total);
    let mut cumulative = 0;

    for (value, count) in counts.iter().enumerate() {
        cumulative += count;

        if cumulative >= rank {
            return Some(value as u8);
        }
    }

    None
}

fn nearest_rank(percentile: f32, total: u64) -> u64 {
    let exact = percentile as f64 * total as f64;
    // the percentile only carries f32 precision; don't let its rounding error push an exact rank up by one
    let tolerance = exact * f32::EPSILON as f64;
    let nearest = exact.round();

    let rank = if (exact - nearest).abs() <= tolerance {
        nearest
    } else {
        exact.ceil()
    };

    (rank as u64).clamp(1, total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::histogram::{Binning, Histogram};

    fn unit(values: &[u8]) -> Vec<(u8, u32)> {
        values.iter().map(|&value| (value, 1)).collect()
    }

    #[test]
    fn nearest_rank_boundary_is_inclusive() {
        assert_eq!(channel_percentile(unit(&[10, 10, 10, 20]), 0.8), Some(20));
        assert_eq!(channel_percentile(unit(&[10, 10, 10, 20]), 0.75), Some(10));
        assert_eq!(channel_percentile(unit(&[10, 10, 10, 20]), 0.76), Some(20));
    }

    #[test]
    fn extreme_percentiles_pick_min_and_max() {
        assert_eq!(channel_percentile(unit(&[7, 3, 200]), 0.0), Some(3));
        assert_eq!(channel_percentile(unit(&[7, 3, 200]), 1.0), Some(200));
    }

    #[test]
    fn float_products_land_on_exact_ranks() {
        // 0.6_f32 * 5 lands slightly above 3
        assert_eq!(channel_percentile(unit(&[1, 2, 3, 4, 5]), 0.6), Some(3));
        assert_eq!(channel_percentile(unit(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]), 0.3), Some(3));
    }

    #[test]
    fn weights_act_as_repetitions() {
        assert_eq!(channel_percentile(vec![(10, 3), (20, 1)], 0.8), Some(20));
        assert_eq!(channel_percentile(vec![(10, 3), (20, 1)], 0.75), Some(10));
        assert_eq!(channel_percentile(vec![(20, 1), (10, 0)], 0.0), Some(20));
    }

    #[test]
    fn large_weights_keep_exact_rank() {
        // rank 50,000,000 is only reached by the second value
        let values = vec![(10, 49_999_996), (20, 50_000_004)];
        assert_eq!(channel_percentile(values.clone(), 0.5), Some(20));

        let values = vec![(10, 50_000_000), (20, 50_000_000)];
        assert_eq!(channel_percentile(values, 0.5), Some(10));
    }

    #[test]
    fn empty_channel_has_no_percentile() {
        assert_eq!(channel_percentile(Vec::new(), 0.5), None);
        assert_eq!(channel_percentile(vec![(10, 0)], 0.5), None);
    }

    #[test]
    fn channels_are_picked_independently() {
        let samples = [
            PixelSample::new((10, 200, 50)),
            PixelSample::new((20, 100, 150)),
            PixelSample::new((30, 150, 100)),
        ];

        let representative = representative_of_samples(&samples, RepresentativePercentiles::new(0.0, 1.0, 0.5));
        assert_eq!(representative, Ok((10, 200, 100)));
    }

    #[test]
    fn zero_weight_cluster_is_an_error() {
        let samples = [PixelSample::with_weight((10, 10, 10), 0)];

        assert_eq!(
            representative_of_samples(&samples, RepresentativePercentiles::default()),
            Err(Error::EmptyCluster)
        );
    }

    #[test]
    fn picks_one_representative_per_cluster() {
        let binning = Binning::standard(1, 1).unwrap();
        let samples = [
            PixelSample::with_weight((10, 200, 200), 40),
            PixelSample::with_weight((11, 200, 200), 40),
            PixelSample::with_weight((100, 100, 100), 50),
            // lone noise
            PixelSample::new((170, 10, 10)),
        ];
        let histogram = Histogram::build(&samples, &binning, &[]);
        let bin = histogram.bins().next().unwrap();

        let picker = BinRepresentativesPicker::new(
            RepresentativesPickerConfig {
                dbscan_radius: 3.0,
                dbscan_min_neighbors: 10,
                dbscan_point_multipliers: [1.0, 1.0, 1.0],
            },
            RepresentativePercentiles::default(),
        );

        let representatives = picker.find_representative_colors(bin).unwrap();

        assert_eq!(representatives.len(), 2);
        assert_eq!(representatives[0].hsv(), (10, 200, 200));
        assert_eq!(representatives[1].hsv(), (100, 100, 100));
    }
}
