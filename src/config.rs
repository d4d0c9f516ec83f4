//! Configuration of the dominant color processors.
//!
//! Every configuration is a plain value object. Processors validate the configuration they are given when they're
//! constructed and keep their own copy of it; out-of-range values are rejected, never clamped.

use crate::{
    error::{Error, Result},
    histogram::{MAX_CHANNEL_BINS, MAX_HUE_BINS},
};

pub const DEFAULT_NUM_HUE_BINS: u32 = 12;
pub const DEFAULT_NUM_SATURATION_BINS: u32 = 4;
pub const DEFAULT_LUV_MIN_DISTANCE: f32 = 25.0;
pub const DEFAULT_MINIMAL_SATURATION: f32 = 0.2;
pub const DEFAULT_MINIMAL_VALUE: f32 = 0.2;
pub const DEFAULT_MAX_BINS_TO_ITERATE: u32 = 12;
pub const DEFAULT_SATURATED_PRIORITY_FACTOR: f32 = 1.0;
pub const DEFAULT_MAX_DOMINANT_COLORS_PER_BIN: u32 = 2;

pub const DEFAULT_DBSCAN_RADIUS: f32 = 4.0;
pub const DEFAULT_DBSCAN_MIN_NEIGHBORS: u32 = 30;
pub const DEFAULT_DBSCAN_POINT_MULTIPLIERS: [f32; 3] = [2.0, 1.0, 0.5];

pub const DEFAULT_LOGO_NUM_HUE_BINS: u32 = 18;
pub const DEFAULT_LOGO_NUM_SATURATION_BINS: u32 = 4;
pub const DEFAULT_LOGO_NUM_VALUE_BINS: u32 = 4;
pub const DEFAULT_LOGO_NUM_GRAY_BINS: u32 = 4;
pub const DEFAULT_LOGO_MIN_BIN_SIZE_PERCENT: f32 = 2.0;
pub const DEFAULT_LOGO_INITIAL_MIN_LUV_DISTANCE: f32 = 20.0;
pub const DEFAULT_LOGO_MIN_LUV_DISTANCE_INCREASE_RATE: f32 = 5.0;

/// Percentiles used to pick a representative from a set of samples. Each channel is picked independently: with a
/// hue percentile of 0.8 the representative's hue is the smallest hue such that 80% of the samples have a hue lower
/// than or equal to it. All percentiles are in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RepresentativePercentiles {
    pub hue: f32,
    pub saturation: f32,
    pub value: f32,
}

/// DBSCAN parameters used to split a bin into clusters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RepresentativesPickerConfig {
    /// Two samples are neighbors iff their scaled distance is smaller than or equal to this value. Must be positive.
    pub dbscan_radius: f32,
    /// A sample is a core point if more than this many samples lie within the radius around it. Larger values give
    /// more robust clusters but may drop less common shades.
    pub dbscan_min_neighbors: u32,
    /// Every HSV axis is multiplied by its multiplier before measuring distances. A larger multiplier stretches the
    /// axis, so clusters end up with less diversity along it. Must be positive.
    pub dbscan_point_multipliers: [f32; 3],
}

/// Configuration of [`crate::DominantColorsProcessor`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DominantColorsConfig {
    /// Bins along the hue axis, in `[1, 180]`. Controls how many shades a cluster may contain.
    pub num_hue_bins: u32,
    /// Bins along the saturation axis, in `[1, 256]`.
    pub num_saturation_bins: u32,
    /// Minimum LUV distance between any two dominant colors, also the distance within which an image color counts
    /// towards a dominant color's score.
    pub luv_min_distance: f32,
    /// Samples with a saturation below this fraction are ignored. In `[0, 1]`.
    pub minimal_saturation: f32,
    /// Samples with a value below this fraction are ignored. In `[0, 1]`.
    pub minimal_value: f32,
    /// Maximum number of bins, in priority order, to extract dominant colors from. At most the total bin count.
    pub max_bins_to_iterate: u32,
    pub representative_percentiles: RepresentativePercentiles,
    /// Raises the priority of saturated bins. Zero orders bins by their size alone.
    pub saturated_priority_factor: f32,
    pub max_dominant_colors_per_bin: u32,
    pub picker: RepresentativesPickerConfig,
}

/// Configuration of [`crate::LogoProcessor`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LogoConfig {
    /// Bins along the hue axis, in `[1, 180]`. One dominant color candidate is extracted from each bin.
    pub num_hue_bins: u32,
    /// Bins along the saturation axis, in `[1, 256]`.
    pub num_saturation_bins: u32,
    /// Bins along the value axis, in `[1, 256]`.
    pub num_value_bins: u32,
    /// Bins splitting the gray range by brightness, in `[1, 256]`.
    pub num_gray_bins: u32,
    /// Bins holding less than this percentage of the foreground weight are ignored. In `[0, 100]`.
    pub min_bin_size_percent: f32,
    /// LUV distance every dominant color must keep from the more dominant ones. Must be positive.
    pub initial_min_luv_distance: f32,
    /// Growth of the LUV distance threshold with every accepted dominant color. Zero keeps the threshold constant.
    pub min_luv_distance_increase_rate: f32,
    pub representative_percentiles: RepresentativePercentiles,
}

impl RepresentativePercentiles {
    pub fn new(hue: f32, saturation: f32, value: f32) -> Self {
        Self { hue, saturation, value }
    }

    pub fn validate(&self) -> Result<()> {
        check_unit("representative hue percentile", self.hue)?;
        check_unit("representative saturation percentile", self.saturation)?;
        check_unit("representative value percentile", self.value)
    }
}

impl RepresentativesPickerConfig {
    pub fn validate(&self) -> Result<()> {
        check_positive("dbscan radius", self.dbscan_radius)?;

        for multiplier in self.dbscan_point_multipliers {
            check_positive("dbscan point multiplier", multiplier)?;
        }

        Ok(())
    }
}

impl DominantColorsConfig {
    pub fn validate(&self) -> Result<()> {
        check_range("number of hue bins", self.num_hue_bins, 1, MAX_HUE_BINS)?;
        check_range("number of saturation bins", self.num_saturation_bins, 1, MAX_CHANNEL_BINS)?;
        check_positive("luv min distance", self.luv_min_distance)?;
        check_unit("minimal saturation", self.minimal_saturation)?;
        check_unit("minimal value", self.minimal_value)?;
        check_range(
            "max bins to iterate",
            self.max_bins_to_iterate,
            1,
            self.num_hue_bins * self.num_saturation_bins,
        )?;
        check_non_negative("saturated priority factor", self.saturated_priority_factor)?;

        if self.max_dominant_colors_per_bin == 0 {
            return Err(Error::invalid(
                "max dominant colors per bin",
                self.max_dominant_colors_per_bin,
            ));
        }

        self.representative_percentiles.validate()?;
        self.picker.validate()
    }
}

impl LogoConfig {
    pub fn validate(&self) -> Result<()> {
        check_range("number of hue bins", self.num_hue_bins, 1, MAX_HUE_BINS)?;
        check_range("number of saturation bins", self.num_saturation_bins, 1, MAX_CHANNEL_BINS)?;
        check_range("number of value bins", self.num_value_bins, 1, MAX_CHANNEL_BINS)?;
        check_range("number of gray bins", self.num_gray_bins, 1, MAX_CHANNEL_BINS)?;

        if !(0.0..=100.0).contains(&self.min_bin_size_percent) {
            return Err(Error::invalid("min bin size percent", self.min_bin_size_percent));
        }

        check_positive("initial min luv distance", self.initial_min_luv_distance)?;
        check_non_negative("min luv distance increase rate", self.min_luv_distance_increase_rate)?;
        self.representative_percentiles.validate()
    }
}

impl Default for RepresentativePercentiles {
    fn default() -> Self {
        Self::new(0.5, 0.5, 0.5)
    }
}

impl Default for RepresentativesPickerConfig {
    fn default() -> Self {
        Self {
            dbscan_radius: DEFAULT_DBSCAN_RADIUS,
            dbscan_min_neighbors: DEFAULT_DBSCAN_MIN_NEIGHBORS,
            dbscan_point_multipliers: DEFAULT_DBSCAN_POINT_MULTIPLIERS,
        }
    }
}

impl Default for DominantColorsConfig {
    fn default() -> Self {
        Self {
            num_hue_bins: DEFAULT_NUM_HUE_BINS,
            num_saturation_bins: DEFAULT_NUM_SATURATION_BINS,
            luv_min_distance: DEFAULT_LUV_MIN_DISTANCE,
            minimal_saturation: DEFAULT_MINIMAL_SATURATION,
            minimal_value: DEFAULT_MINIMAL_VALUE,
            max_bins_to_iterate: DEFAULT_MAX_BINS_TO_ITERATE,
            representative_percentiles: RepresentativePercentiles::new(0.5, 0.7, 0.7),
            saturated_priority_factor: DEFAULT_SATURATED_PRIORITY_FACTOR,
            max_dominant_colors_per_bin: DEFAULT_MAX_DOMINANT_COLORS_PER_BIN,
            picker: RepresentativesPickerConfig::default(),
        }
    }
}

impl Default for LogoConfig {
    fn default() -> Self {
        Self {
            num_hue_bins: DEFAULT_LOGO_NUM_HUE_BINS,
            num_saturation_bins: DEFAULT_LOGO_NUM_SATURATION_BINS,
            num_value_bins: DEFAULT_LOGO_NUM_VALUE_BINS,
            num_gray_bins: DEFAULT_LOGO_NUM_GRAY_BINS,
            min_bin_size_percent: DEFAULT_LOGO_MIN_BIN_SIZE_PERCENT,
            initial_min_luv_distance: DEFAULT_LOGO_INITIAL_MIN_LUV_DISTANCE,
            min_luv_distance_increase_rate: DEFAULT_LOGO_MIN_LUV_DISTANCE_INCREASE_RATE,
            representative_percentiles: RepresentativePercentiles::default(),
        }
    }
}

fn check_range(parameter: &'static str, value: u32, min: u32, max: u32) -> Result<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(Error::invalid(parameter, value))
    }
}

fn check_unit(parameter: &'static str, value: f32) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::invalid(parameter, value))
    }
}

fn check_positive(parameter: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::invalid(parameter, value))
    }
}

fn check_non_negative(parameter: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(Error::invalid(parameter, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(DominantColorsConfig::default().validate(), Ok(()));
        assert_eq!(LogoConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_out_of_range_standard_values() {
        let invalid = [
            DominantColorsConfig {
                num_hue_bins: 0,
                ..Default::default()
            },
            DominantColorsConfig {
                num_saturation_bins: 257,
                ..Default::default()
            },
            DominantColorsConfig {
                luv_min_distance: 0.0,
                ..Default::default()
            },
            DominantColorsConfig {
                minimal_value: 1.5,
                ..Default::default()
            },
            DominantColorsConfig {
                max_bins_to_iterate: DEFAULT_NUM_HUE_BINS * DEFAULT_NUM_SATURATION_BINS + 1,
                ..Default::default()
            },
            DominantColorsConfig {
                saturated_priority_factor: f32::NAN,
                ..Default::default()
            },
            DominantColorsConfig {
                max_dominant_colors_per_bin: 0,
                ..Default::default()
            },
            DominantColorsConfig {
                representative_percentiles: RepresentativePercentiles::new(0.5, -0.1, 0.5),
                ..Default::default()
            },
            DominantColorsConfig {
                picker: RepresentativesPickerConfig {
                    dbscan_radius: -1.0,
                    ..Default::default()
                },
                ..Default::default()
            },
        ];

        for config in invalid {
            assert!(
                matches!(config.validate(), Err(Error::InvalidConfiguration { .. })),
                "{:?}",
                config
            );
        }
    }

    #[test]
    fn rejects_out_of_range_logo_values() {
        let invalid = [
            LogoConfig {
                num_gray_bins: 0,
                ..Default::default()
            },
            LogoConfig {
                num_hue_bins: 181,
                ..Default::default()
            },
            LogoConfig {
                min_bin_size_percent: 101.0,
                ..Default::default()
            },
            LogoConfig {
                initial_min_luv_distance: 0.0,
                ..Default::default()
            },
            LogoConfig {
                min_luv_distance_increase_rate: -1.0,
                ..Default::default()
            },
        ];

        for config in invalid {
            assert!(config.validate().is_err(), "{:?}", config);
        }
    }

    #[test]
    fn error_names_the_parameter() {
        let config = LogoConfig {
            num_value_bins: 300,
            ..Default::default()
        };

        assert_eq!(
            config.validate(),
            Err(Error::InvalidConfiguration {
                parameter: "number of value bins",
                value: "300".to_string()
            })
        );
    }
}
