// Copyright 2022 Spanfile
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A library to extract dominant colors from an image.
//!
//! Two processors are provided. [`DominantColorsProcessor`] works on any image: it bins the image's colors by hue
//! and saturation, splits the most important bins into clusters with DBSCAN, picks a representative color for each
//! cluster and scores it by how much of the image lies close to it in LUV space. [`LogoProcessor`] is tuned for
//! flat-color artwork on a background and only looks at foreground pixels. Both return a short list of perceptually
//! distinct colors, most dominant first, each with a score in `(0, 1]`.
//!
//! ```no_run
//! use dominance::{DominantColorsConfig, DominantColorsProcessor};
//!
//! let image = dominance::image::open("photo.jpg")?.to_rgb8();
//! let processor = DominantColorsProcessor::new(DominantColorsConfig::default())?;
//!
//! for color in processor.dominant_colors_in_image(&image, dominance::DEFAULT_MAX_WORKING_RESOLUTION)? {
//!     println!("{:?} {}", color.rgb(), color.score());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod color;
mod config;
mod dominant_color;
mod error;
mod filter;
mod logo;
mod sampling;

pub mod dbscan;
pub mod dedup;
pub mod histogram;
pub mod priority;
pub mod representative;
pub mod score;

pub const DEFAULT_MAX_WORKING_RESOLUTION: u32 = 256;

pub use crate::{
    color::{
        hsv_to_luv, hsv_to_rgb, luv_distance, rgb_to_hsv, rgb_to_luv, warm_up_luv_conversion, PixelSample, HUE_RANGE,
    },
    config::*,
    dominant_color::DominantColor,
    error::{Error, Result},
    filter::{Filter, SaturationValueFilter},
    logo::LogoProcessor,
    sampling::{samples_from_image, SampleGrid, FOREGROUND_MIN_ALPHA},
};
pub use image;
pub use palette;

use dedup::{filter_dominant_colors, ScoredColor};
use histogram::{Binning, Histogram, HistogramBin};
use image::RgbImage;
use log::{debug, trace};
use priority::{prioritize_bins, BinPriority};
use rayon::prelude::*;
use representative::BinRepresentativesPicker;
use score::LuvIndex;

/// Finds dominant colors in an image.
///
/// Algorithm steps:
///
/// 1. Drop samples that are too desaturated or too dark, and divide the hue and saturation ranges into bins. The
///    value range isn't divided, so every bin spans all brightnesses.
/// 2. Sort the bins by their size, boosted by their saturation.
/// 3. For each of the first bins:
///    1. Detect clusters of samples with DBSCAN.
///    2. Pick a representative for each cluster.
///    3. Score every representative as the fraction of the image close to it in LUV space.
///    4. Keep the best scoring representatives of the bin.
/// 4. Sort all representatives by score and keep each one only if it's not close to a color kept before it.
///
/// Constructing a processor validates its configuration and warms up the color conversions, so it's cheaper to
/// create one processor and reuse it than to create one per image.
pub struct DominantColorsProcessor {
    config: DominantColorsConfig,
    binning: Binning,
    picker: BinRepresentativesPicker,
    filters: Vec<Box<dyn Filter>>,
}

impl DominantColorsProcessor {
    pub fn new(config: DominantColorsConfig) -> Result<Self> {
        config.validate()?;

        let binning = Binning::standard(config.num_hue_bins, config.num_saturation_bins)?;
        let picker = BinRepresentativesPicker::new(config.picker, config.representative_percentiles);

        warm_up_luv_conversion();

        Ok(Self {
            config,
            binning,
            picker,
            filters: vec![Box::new(SaturationValueFilter::new(
                config.minimal_saturation,
                config.minimal_value,
            ))],
        })
    }

    pub fn config(&self) -> &DominantColorsConfig {
        &self.config
    }

    /// Adds a filter samples must pass before being binned, on top of the ones already set.
    pub fn add_filter<F>(mut self, filter: F) -> Self
    where
        F: Filter + 'static,
    {
        self.filters.push(Box::new(filter));
        self
    }

    /// Removes every filter, including the default minimal saturation and value filter.
    pub fn clear_filters(self) -> Self {
        Self {
            filters: Vec::new(),
            ..self
        }
    }

    /// Finds the dominant colors of a set of samples. An empty result means no sample passed the filters or no
    /// cluster was dense enough.
    pub fn dominant_colors(&self, samples: &[PixelSample]) -> Result<Vec<DominantColor>> {
        let histogram = Histogram::build(samples, &self.binning, &self.filters);

        if histogram.is_empty() {
            debug!("no admitted samples, no dominant colors");
            return Ok(Vec::new());
        }

        let index = LuvIndex::from_histogram(&histogram);
        let mut bins = prioritize_bins(
            &histogram,
            &self.binning,
            BinPriority::SaturationBoosted {
                factor: self.config.saturated_priority_factor,
            },
        );
        bins.truncate(self.config.max_bins_to_iterate as usize);

        debug!(
            "admitted weight {}, iterating {} of {} bins",
            histogram.total_weight(),
            bins.len(),
            histogram.len()
        );

        let candidates = bins
            .par_iter()
            .map(|bin| self.bin_candidates(bin, &index))
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .flatten()
            .collect::<Vec<_>>();

        let candidate_count = candidates.len();
        let accepted = filter_dominant_colors(candidates, self.config.luv_min_distance, 0.0);

        debug!("{} of {} candidates accepted", accepted.len(), candidate_count);
        Ok(to_dominant_colors(accepted))
    }

    /// Finds the dominant colors of an RGB image. See [`samples_from_image`] for how `max_working_resolution` is
    /// applied.
    pub fn dominant_colors_in_image(&self, image: &RgbImage, max_working_resolution: u32) -> Result<Vec<DominantColor>> {
        self.dominant_colors(&samples_from_image(image, max_working_resolution))
    }

    fn bin_candidates(&self, bin: &HistogramBin, index: &LuvIndex) -> Result<Vec<ScoredColor>> {
        let mut candidates = self
            .picker
            .find_representative_colors(bin)?
            .into_iter()
            .map(|representative| {
                let luv = hsv_to_luv(representative.hsv());
                let score = index.score(luv, self.config.luv_min_distance);

                ScoredColor::with_luv(representative.hsv(), luv, score)
            })
            .filter(|candidate| candidate.score() > 0.0)
            .collect::<Vec<_>>();

        candidates.sort_by(|lhs, rhs| rhs.score().total_cmp(&lhs.score()));
        candidates.truncate(self.config.max_dominant_colors_per_bin as usize);

        trace!("bin {:?}: {} candidates", bin.index(), candidates.len());
        Ok(candidates)
    }
}

fn to_dominant_colors(colors: Vec<ScoredColor>) -> Vec<DominantColor> {
    colors
        .into_iter()
        .map(|color| DominantColor::new(color.hsv(), color.score()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> DominantColorsConfig {
        DominantColorsConfig {
            picker: RepresentativesPickerConfig {
                dbscan_min_neighbors: 3,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn rejects_invalid_configuration() {
        let config = DominantColorsConfig {
            max_bins_to_iterate: 0,
            ..Default::default()
        };

        assert!(matches!(
            DominantColorsProcessor::new(config),
            Err(Error::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn filtered_out_image_has_no_colors() {
        let processor = DominantColorsProcessor::new(config()).unwrap();
        let gray = vec![PixelSample::with_weight((0, 0, 128), 100)];

        assert_eq!(processor.dominant_colors(&gray), Ok(Vec::new()));
        assert_eq!(processor.dominant_colors(&[]), Ok(Vec::new()));
    }

    #[test]
    fn sparse_samples_are_noise() {
        let processor = DominantColorsProcessor::new(config()).unwrap();
        let samples = vec![PixelSample::new((0, 255, 255)), PixelSample::new((90, 255, 255))];

        assert_eq!(processor.dominant_colors(&samples), Ok(Vec::new()));
    }

    #[test]
    fn custom_filters_apply_on_top_of_default() {
        struct NoRed;
        impl Filter for NoRed {
            fn is_allowed(&self, sample: PixelSample) -> bool {
                sample.hue() > 10
            }
        }

        let samples = vec![
            PixelSample::with_weight((0, 255, 255), 50),
            PixelSample::with_weight((60, 255, 255), 50),
            PixelSample::with_weight((60, 0, 255), 50),
        ];

        let processor = DominantColorsProcessor::new(config()).unwrap().add_filter(NoRed);
        let colors = processor.dominant_colors(&samples).unwrap();
        assert_eq!(colors.len(), 1);
        assert_eq!(colors[0].rgb(), (0, 255, 0));
        assert_eq!(colors[0].score(), 1.0);

        let processor = processor.clear_filters();
        let colors = processor.dominant_colors(&samples).unwrap();
        assert_eq!(colors.len(), 3);
    }

    #[test]
    fn keeps_at_most_the_configured_colors_per_bin() {
        // two well separated shades in the same bin
        let samples = vec![
            PixelSample::with_weight((0, 255, 255), 50),
            PixelSample::with_weight((0, 255, 120), 30),
        ];

        let processor = DominantColorsProcessor::new(DominantColorsConfig {
            num_saturation_bins: 1,
            max_bins_to_iterate: 1,
            ..config()
        })
        .unwrap();
        assert_eq!(processor.dominant_colors(&samples).unwrap().len(), 2);

        let processor = DominantColorsProcessor::new(DominantColorsConfig {
            num_saturation_bins: 1,
            max_bins_to_iterate: 1,
            max_dominant_colors_per_bin: 1,
            ..config()
        })
        .unwrap();
        let colors = processor.dominant_colors(&samples).unwrap();
        assert_eq!(colors.len(), 1);
        assert_eq!(colors[0].rgb(), (255, 0, 0));
    }
}
