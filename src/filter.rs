use crate::color::PixelSample;

/// A trait used to implement admission filters for the histogram building process.
///
/// Samples rejected by any filter are dropped before binning: they don't belong to any bin and don't count towards
/// the total weight used for scoring. This trait allows the library consumer to implement custom filters.
///
/// See [`crate::DominantColorsProcessor::add_filter`] on how to add filters to the extraction process.
pub trait Filter: Send + Sync {
    /// Return whether a given sample should be admitted or not.
    fn is_allowed(&self, sample: PixelSample) -> bool;
}

/// The default filter of the standard processor.
///
/// This filter disallows colors that are too desaturated or too dark to act as a theme color.
#[derive(Debug, Clone, Copy)]
pub struct SaturationValueFilter {
    minimal_saturation: f32,
    minimal_value: f32,
}

impl SaturationValueFilter {
    /// Both thresholds are fractions in `[0, 1]` of the full channel range.
    pub fn new(minimal_saturation: f32, minimal_value: f32) -> Self {
        Self {
            minimal_saturation,
            minimal_value,
        }
    }
}

impl Filter for SaturationValueFilter {
    fn is_allowed(&self, sample: PixelSample) -> bool {
        !is_below(sample.saturation(), self.minimal_saturation) && !is_below(sample.value(), self.minimal_value)
    }
}

fn is_below(channel: u8, minimum: f32) -> bool {
    (channel as f32 / 255.0) < minimum
}
