use crate::{
    color::{PixelSample, HUE_RANGE},
    error::{Error, Result},
    filter::Filter,
};
use std::collections::BTreeMap;

pub const MAX_HUE_BINS: u32 = HUE_RANGE as u32;
pub const MAX_CHANNEL_BINS: u32 = 256;

/// Samples at or below this saturation are binned by brightness only when gray bins are enabled.
pub const GRAY_MAX_SATURATION: u8 = 25;
/// Samples at or below this value are binned by brightness only when gray bins are enabled.
pub const GRAY_MAX_VALUE: u8 = 25;

/// Identifies a histogram cell.
///
/// The derived ordering is used to break ties between bins of equal priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BinIndex {
    Color { hue: u16, saturation: u16, value: u16 },
    Gray(u16),
}

/// The shape of the histogram grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binning {
    hue_bins: u32,
    saturation_bins: u32,
    value_bins: u32,
    gray_bins: Option<u32>,
}

/// A single histogram cell. Samples are aggregated by their HSV value and kept in ascending HSV order, so a bin's
/// contents don't depend on the order the samples were given in. A weight too large for one sample is split over
/// several identical ones.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    index: BinIndex,
    samples: Vec<PixelSample>,
    weight: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    bins: BTreeMap<BinIndex, HistogramBin>,
    total_weight: u64,
}

impl Binning {
    /// Hue × saturation bins covering the whole value range.
    pub fn standard(hue_bins: u32, saturation_bins: u32) -> Result<Self> {
        Self::new(hue_bins, saturation_bins, 1, None)
    }

    /// Hue × saturation × value bins plus a separate axis of gray bins.
    pub fn logo(hue_bins: u32, saturation_bins: u32, value_bins: u32, gray_bins: u32) -> Result<Self> {
        Self::new(hue_bins, saturation_bins, value_bins, Some(gray_bins))
    }

    fn new(hue_bins: u32, saturation_bins: u32, value_bins: u32, gray_bins: Option<u32>) -> Result<Self> {
        check_bins("hue bins", hue_bins, MAX_HUE_BINS)?;
        check_bins("saturation bins", saturation_bins, MAX_CHANNEL_BINS)?;
        check_bins("value bins", value_bins, MAX_CHANNEL_BINS)?;

        if let Some(gray_bins) = gray_bins {
            check_bins("gray bins", gray_bins, MAX_CHANNEL_BINS)?;
        }

        Ok(Self {
            hue_bins,
            saturation_bins,
            value_bins,
            gray_bins,
        })
    }

    pub fn hue_bins(&self) -> u32 {
        self.hue_bins
    }

    pub fn saturation_bins(&self) -> u32 {
        self.saturation_bins
    }

    pub fn index_of(&self, sample: PixelSample) -> BinIndex {
        let (hue, saturation, value) = sample.hsv();

        if let Some(gray_bins) = self.gray_bins {
            if saturation <= GRAY_MAX_SATURATION || value <= GRAY_MAX_VALUE {
                return BinIndex::Gray(scale(value as u32, MAX_CHANNEL_BINS, gray_bins));
            }
        }

        BinIndex::Color {
            hue: scale(hue as u32, MAX_HUE_BINS, self.hue_bins),
            saturation: scale(saturation as u32, MAX_CHANNEL_BINS, self.saturation_bins),
            value: scale(value as u32, MAX_CHANNEL_BINS, self.value_bins),
        }
    }

    /// The center of a bin's saturation range, normalized to `[0, 1]`. Gray bins have no saturation.
    pub fn normalized_saturation(&self, index: BinIndex) -> f32 {
        match index {
            BinIndex::Color { saturation, .. } => (saturation as f32 + 0.5) / self.saturation_bins as f32,
            BinIndex::Gray(_) => 0.0,
        }
    }
}

impl HistogramBin {
    pub fn index(&self) -> BinIndex {
        self.index
    }

    pub fn samples(&self) -> &[PixelSample] {
        &self.samples
    }

    pub fn weight(&self) -> u64 {
        self.weight
    }
}

impl Histogram {
    /// Bins every sample that has a non-zero weight and is allowed by all the given filters.
    pub fn build<'a, I>(samples: I, binning: &Binning, filters: &[Box<dyn Filter>]) -> Histogram
    where
        I: IntoIterator<Item = &'a PixelSample>,
    {
        let mut counts: BTreeMap<BinIndex, BTreeMap<(u8, u8, u8), u64>> = BTreeMap::new();

        for sample in samples.into_iter().copied() {
            if sample.weight() == 0 || filters.iter().any(|filter| !filter.is_allowed(sample)) {
                continue;
            }

            let bin = counts.entry(binning.index_of(sample)).or_default();
            *bin.entry(sample.hsv()).or_insert(0) += sample.weight() as u64;
        }

        let mut total_weight = 0;
        let bins = counts
            .into_iter()
            .map(|(index, colors)| {
                let samples = colors
                    .into_iter()
                    .flat_map(|(hsv, weight)| split_weight(weight).map(move |part| PixelSample::with_weight(hsv, part)))
                    .collect::<Vec<_>>();
                let weight = samples.iter().map(|sample| sample.weight() as u64).sum();
                total_weight += weight;

                (index, HistogramBin { index, samples, weight })
            })
            .collect();

        Self { bins, total_weight }
    }

    pub fn bins(&self) -> impl Iterator<Item = &HistogramBin> {
        self.bins.values()
    }

    pub fn bin(&self, index: BinIndex) -> Option<&HistogramBin> {
        self.bins.get(&index)
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    pub fn total_weight(&self) -> u64 {
        self.total_weight
    }
}

fn check_bins(parameter: &'static str, bins: u32, max: u32) -> Result<()> {
    if (1..=max).contains(&bins) {
        Ok(())
    } else {
        Err(Error::invalid(parameter, bins))
    }
}

/// Splits an aggregated weight into parts that each fit a single sample. Only weights above `u32::MAX` need more than
/// one part.
fn split_weight(weight: u64) -> impl Iterator<Item = u32> {
    let max = u32::MAX as u64;
    let full_parts = weight / max;
    let remainder = weight % max;

    (0..full_parts)
        .map(|_| u32::MAX)
        .chain((remainder > 0).then_some(remainder as u32))
}

fn scale(channel: u32, range: u32, bins: u32) -> u16 {
    (channel * bins / range) as u16
}
