use crate::{
    color::{warm_up_luv_conversion, PixelSample},
    config::LogoConfig,
    dedup::{filter_dominant_colors, ScoredColor},
    error::{Error, Result},
    histogram::{BinIndex, Binning, Histogram},
    priority::{prioritize_bins, BinPriority},
    representative::representative_of_samples,
    sampling::SampleGrid,
    score::bin_fraction,
    DominantColor,
};
use image::RgbaImage;
use log::{debug, trace};

/// Finds dominant colors in logo images: flat-color artwork on a background that is excluded by a foreground mask.
///
/// Algorithm steps:
///
/// 1. Divide the hue, saturation and value ranges, as well as the gray range, into bins and bin every foreground
///    sample.
/// 2. Drop bins holding less than the configured percentage of the foreground.
/// 3. For each remaining bin, pick a representative from the bin's samples and score it as the fraction of the
///    foreground held by the bin. When the samples are laid out on a grid, only the pixels surviving an erosion of the
///    bin's mask are used for the representative, which keeps anti-aliased edges out of it.
/// 4. Keep representatives by descending score as long as they are far enough in LUV space from the ones already kept.
#[derive(Debug, Clone)]
pub struct LogoProcessor {
    config: LogoConfig,
    binning: Binning,
}

impl LogoProcessor {
    pub fn new(config: LogoConfig) -> Result<Self> {
        config.validate()?;

        let binning = Binning::logo(
            config.num_hue_bins,
            config.num_saturation_bins,
            config.num_value_bins,
            config.num_gray_bins,
        )?;

        warm_up_luv_conversion();
        Ok(Self { config, binning })
    }

    pub fn config(&self) -> &LogoConfig {
        &self.config
    }

    /// Finds the dominant colors among the samples whose corresponding `foreground` entry is set.
    pub fn dominant_colors(&self, samples: &[PixelSample], foreground: &[bool]) -> Result<Vec<DominantColor>> {
        if samples.len() != foreground.len() {
            return Err(Error::InputLengthMismatch {
                expected: samples.len(),
                actual: foreground.len(),
            });
        }

        let histogram = Histogram::build(foreground_samples(samples, foreground), &self.binning, &[]);
        self.extract(&histogram, None)
    }

    /// Like [`LogoProcessor::dominant_colors`], but representatives are picked from the eroded bins of the grid.
    pub fn dominant_colors_in_grid(&self, grid: &SampleGrid) -> Result<Vec<DominantColor>> {
        let histogram = Histogram::build(
            foreground_samples(grid.samples(), grid.foreground()),
            &self.binning,
            &[],
        );
        let eroded = self.eroded_samples(grid);
        let cores = Histogram::build(&eroded, &self.binning, &[]);

        self.extract(&histogram, Some(&cores))
    }

    /// Finds the dominant colors of an RGBA image, using its alpha channel as the foreground mask.
    ///
    /// No background detection is done: every pixel of an opaque image is foreground, so the background of a logo
    /// stored without transparency shows up among its dominant colors. Build the mask yourself and use
    /// [`LogoProcessor::dominant_colors_in_grid`] for such images.
    pub fn dominant_colors_in_image(&self, image: &RgbaImage, max_working_resolution: u32) -> Result<Vec<DominantColor>> {
        self.dominant_colors_in_grid(&SampleGrid::from_image(image, max_working_resolution))
    }

    fn extract(&self, histogram: &Histogram, cores: Option<&Histogram>) -> Result<Vec<DominantColor>> {
        if histogram.is_empty() {
            debug!("no foreground samples, no dominant colors");
            return Ok(Vec::new());
        }

        let total_weight = histogram.total_weight();

        let bins = prioritize_bins(
            histogram,
            &self.binning,
            BinPriority::MinimumSize {
                min_bin_size_percent: self.config.min_bin_size_percent,
            },
        );

        debug!(
            "foreground weight {}, {} of {} bins above {}%",
            total_weight,
            bins.len(),
            histogram.len(),
            self.config.min_bin_size_percent
        );

        let candidates = bins
            .iter()
            .map(|&bin| {
                let source = cores.and_then(|cores| cores.bin(bin.index())).unwrap_or(bin);
                let hsv = representative_of_samples(source.samples(), self.config.representative_percentiles)?;
                let score = bin_fraction(bin.weight(), total_weight);

                trace!("bin {:?}: representative {:?}, score {}", bin.index(), hsv, score);
                Ok(ScoredColor::new(hsv, score))
            })
            .collect::<Result<Vec<_>>>()?;

        let accepted = filter_dominant_colors(
            candidates,
            self.config.initial_min_luv_distance,
            self.config.min_luv_distance_increase_rate,
        );

        debug!("{} dominant colors accepted from {} bins", accepted.len(), bins.len());
        Ok(crate::to_dominant_colors(accepted))
    }

    /// Foreground samples that survive a 3×3 erosion of their bin's mask. Neighbors outside the grid don't erode.
    fn eroded_samples(&self, grid: &SampleGrid) -> Vec<PixelSample> {
        let (width, height) = (grid.width(), grid.height());
        let bins = grid
            .samples()
            .iter()
            .zip(grid.foreground())
            .map(|(&sample, &foreground)| {
                if foreground && sample.weight() > 0 {
                    Some(self.binning.index_of(sample))
                } else {
                    None
                }
            })
            .collect::<Vec<Option<BinIndex>>>();

        let mut eroded = Vec::new();

        for y in 0..height {
            for x in 0..width {
                let index = y * width + x;
                let bin = match bins[index] {
                    Some(bin) => bin,
                    None => continue,
                };

                let neighbors_match = (y.saturating_sub(1)..=(y + 1).min(height - 1)).all(|ny| {
                    (x.saturating_sub(1)..=(x + 1).min(width - 1)).all(|nx| bins[ny * width + nx] == Some(bin))
                });

                if neighbors_match {
                    eroded.push(grid.samples()[index]);
                }
            }
        }

        eroded
    }
}

fn foreground_samples<'a>(
    samples: &'a [PixelSample],
    foreground: &'a [bool],
) -> impl Iterator<Item = &'a PixelSample> + 'a {
    samples
        .iter()
        .zip(foreground)
        .filter(|&(_, &foreground)| foreground)
        .map(|(sample, _)| sample)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RepresentativePercentiles;

    fn processor(min_bin_size_percent: f32) -> LogoProcessor {
        LogoProcessor::new(LogoConfig {
            min_bin_size_percent,
            initial_min_luv_distance: 10.0,
            min_luv_distance_increase_rate: 0.0,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn background_is_ignored() {
        let samples = vec![
            PixelSample::with_weight((0, 255, 255), 30),
            PixelSample::with_weight((120, 255, 255), 70),
        ];

        let colors = processor(0.0).dominant_colors(&samples, &[true, false]).unwrap();

        assert_eq!(colors.len(), 1);
        assert_eq!(colors[0].hsv(), (0, 255, 255));
        assert_eq!(colors[0].score(), 1.0);
    }

    #[test]
    fn score_is_fraction_of_foreground() {
        let samples = vec![
            PixelSample::with_weight((0, 255, 255), 75),
            PixelSample::with_weight((120, 255, 255), 25),
        ];

        let colors = processor(0.0).dominant_colors(&samples, &[true, true]).unwrap();

        let scores = colors.iter().map(|color| color.score()).collect::<Vec<_>>();
        assert_eq!(scores, vec![0.75, 0.25]);
    }

    #[test]
    fn small_bins_contribute_nothing() {
        let samples = vec![
            PixelSample::with_weight((0, 255, 255), 95),
            PixelSample::with_weight((120, 255, 255), 5),
        ];

        let colors = processor(10.0).dominant_colors(&samples, &[true, true]).unwrap();

        assert_eq!(colors.len(), 1);
        assert_eq!(colors[0].hsv(), (0, 255, 255));
    }

    #[test]
    fn gray_bins_are_separate_from_colors() {
        let samples = vec![
            PixelSample::with_weight((0, 0, 250), 50),
            PixelSample::with_weight((0, 0, 10), 50),
        ];

        let colors = processor(0.0).dominant_colors(&samples, &[true, true]).unwrap();

        assert_eq!(colors.len(), 2);
        assert!(colors.iter().any(|color| color.rgb() == (250, 250, 250)));
        assert!(colors.iter().any(|color| color.rgb() == (10, 10, 10)));
    }

    #[test]
    fn empty_foreground_gives_no_colors() {
        let samples = vec![PixelSample::new((0, 255, 255))];

        assert_eq!(processor(0.0).dominant_colors(&samples, &[false]), Ok(Vec::new()));
    }

    #[test]
    fn mismatched_mask_is_an_error() {
        let samples = vec![PixelSample::new((0, 255, 255))];

        assert_eq!(
            processor(0.0).dominant_colors(&samples, &[true, true]),
            Err(Error::InputLengthMismatch { expected: 1, actual: 2 })
        );
    }

    #[test]
    fn erosion_keeps_stray_pixels_out_of_representatives() {
        // bright red on the left, blue on the right and a single dark red pixel inside the blue
        let (width, height) = (6, 6);
        let samples = (0..width * height)
            .map(|index| match (index % width, index / width) {
                (4, 3) => PixelSample::new((0, 255, 200)),
                (x, _) if x < 3 => PixelSample::new((0, 255, 255)),
                _ => PixelSample::new((120, 255, 255)),
            })
            .collect::<Vec<_>>();
        let grid = SampleGrid::new(width, height, samples.clone(), vec![true; width * height]).unwrap();

        let processor = LogoProcessor::new(LogoConfig {
            num_value_bins: 1,
            initial_min_luv_distance: 10.0,
            representative_percentiles: RepresentativePercentiles::new(0.5, 0.5, 0.0),
            ..Default::default()
        })
        .unwrap();

        let plain = processor.dominant_colors(&samples, &vec![true; width * height]).unwrap();
        assert_eq!(plain[0].hsv(), (0, 255, 200));

        let eroded = processor.dominant_colors_in_grid(&grid).unwrap();
        assert_eq!(eroded.len(), 2);
        assert_eq!(eroded[0].hsv(), (0, 255, 255));
        assert_eq!(eroded[0].score(), plain[0].score());
        assert!((eroded[0].score() - 19.0 / 36.0).abs() < 1e-6);
    }

    #[test]
    fn erosion_drops_thin_features_and_falls_back_to_whole_bin() {
        // a one pixel wide blue line across a red field
        let (width, height) = (6, 5);
        let samples = (0..width * height)
            .map(|index| {
                if index / width == 2 {
                    PixelSample::new((120, 255, 255))
                } else {
                    PixelSample::new((0, 255, 255))
                }
            })
            .collect::<Vec<_>>();
        let grid = SampleGrid::new(width, height, samples, vec![true; width * height]).unwrap();

        let colors = processor(0.0).dominant_colors_in_grid(&grid).unwrap();

        assert_eq!(colors.len(), 2);
        assert_eq!(colors[0].hsv(), (0, 255, 255));
        assert_eq!(colors[1].hsv(), (120, 255, 255));
        assert!((colors[1].score() - 0.2).abs() < 1e-6);
    }
}
