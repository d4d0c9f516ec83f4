//! Color-space utilities shared by both processors.
//!
//! HSV values use the 8-bit convention common to image processing libraries: hue is stored in 2° steps in the range
//! `[0, 180)`, saturation and value span `[0, 255]`. LUV coordinates are CIE L\*u\*v\* under the D65 white point.

use palette::{Hsv, IntoColor, LinSrgb, Luv, Srgb};
use std::sync::OnceLock;

/// The exclusive upper bound of the hue channel.
pub const HUE_RANGE: u16 = 180;

static SRGB_TO_LINEAR: OnceLock<[f32; 256]> = OnceLock::new();

/// A single HSV color sample with a repetition weight.
///
/// The weight lets pre-aggregated data be processed without duplicating entries: a sample with weight `n` behaves
/// exactly like `n` identical samples of weight 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PixelSample {
    hue: u8,
    saturation: u8,
    value: u8,
    weight: u32,
}

impl PixelSample {
    /// Creates a sample with weight 1. Hues outside `[0, 180)` wrap around.
    pub fn new(hsv: (u8, u8, u8)) -> PixelSample {
        Self::with_weight(hsv, 1)
    }

    pub fn with_weight((hue, saturation, value): (u8, u8, u8), weight: u32) -> PixelSample {
        Self {
            hue: (hue as u16 % HUE_RANGE) as u8,
            saturation,
            value,
            weight,
        }
    }

    pub fn from_rgb(rgb: (u8, u8, u8)) -> PixelSample {
        Self::new(rgb_to_hsv(rgb))
    }

    pub fn hsv(self) -> (u8, u8, u8) {
        (self.hue, self.saturation, self.value)
    }

    pub fn hue(self) -> u8 {
        self.hue
    }

    pub fn saturation(self) -> u8 {
        self.saturation
    }

    pub fn value(self) -> u8 {
        self.value
    }

    pub fn weight(self) -> u32 {
        self.weight
    }

    pub fn rgb(self) -> (u8, u8, u8) {
        hsv_to_rgb(self.hsv())
    }
}

/// Builds the sRGB to linear lookup table used by the LUV conversion. The first call pays for building the table;
/// every later call, from any thread, is a no-op. Processors call this when they are constructed so that the first
/// real extraction doesn't.
pub fn warm_up_luv_conversion() {
    srgb_to_linear_table();
}

fn srgb_to_linear_table() -> &'static [f32; 256] {
    SRGB_TO_LINEAR.get_or_init(|| {
        let mut table = [0.0; 256];

        for (channel, entry) in table.iter_mut().enumerate() {
            let linear: LinSrgb = Srgb::new(channel as f32 / 255.0, 0.0, 0.0).into_linear();
            *entry = linear.red;
        }

        table
    })
}

pub fn rgb_to_hsv(rgb: (u8, u8, u8)) -> (u8, u8, u8) {
    let raw = Srgb::from_components(rgb);
    let raw_float: Srgb<f32> = raw.into_format();
    let hsv: Hsv = raw_float.into_color();
    let (h, s, v) = hsv.into_components();

    let hue = (h.into_positive_degrees() / 2.0).round() as u16 % HUE_RANGE;
    (hue as u8, to_channel(s), to_channel(v))
}

pub fn hsv_to_rgb((hue, saturation, value): (u8, u8, u8)) -> (u8, u8, u8) {
    let hsv: Hsv = Hsv::new(
        hue as f32 * 2.0,
        saturation as f32 / 255.0,
        value as f32 / 255.0,
    );
    let rgb: Srgb = hsv.into_color();

    rgb.into_format::<u8>().into_components()
}

pub fn rgb_to_luv((red, green, blue): (u8, u8, u8)) -> Luv {
    let table = srgb_to_linear_table();
    let linear = LinSrgb::new(table[red as usize], table[green as usize], table[blue as usize]);

    linear.into_color()
}

pub fn hsv_to_luv(hsv: (u8, u8, u8)) -> Luv {
    rgb_to_luv(hsv_to_rgb(hsv))
}

/// Euclidean distance between two colors in LUV space.
pub fn luv_distance(lhs: Luv, rhs: Luv) -> f32 {
    let dl = lhs.l - rhs.l;
    let du = lhs.u - rhs.u;
    let dv = lhs.v - rhs.v;

    (dl * dl + du * du + dv * dv).sqrt()
}

fn to_channel(unit: f32) -> u8 {
    (unit.clamp(0.0, 1.0) * 255.0).round() as u8
}
