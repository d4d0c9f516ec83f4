use crate::color::hsv_to_rgb;

/// A dominant color of an image and its score.
///
/// The score is in the range `(0, 1]`. Higher scores mean more of the image is represented by the color.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DominantColor {
    hue: u8,
    saturation: u8,
    value: u8,
    red: u8,
    green: u8,
    blue: u8,
    score: f32,
}

impl DominantColor {
    /// Creates a color from the HSV representative it was picked as. The RGB value is derived from it.
    pub fn new((hue, saturation, value): (u8, u8, u8), score: f32) -> DominantColor {
        let (red, green, blue) = hsv_to_rgb((hue, saturation, value));

        Self {
            hue,
            saturation,
            value,
            red,
            green,
            blue,
            score,
        }
    }

    pub fn rgb(self) -> (u8, u8, u8) {
        (self.red, self.green, self.blue)
    }

    /// The representative exactly as it was picked. Converting [`DominantColor::rgb`] back to HSV may not give the
    /// same value, since several HSV values can map to one RGB value.
    pub fn hsv(self) -> (u8, u8, u8) {
        (self.hue, self.saturation, self.value)
    }

    pub fn score(self) -> f32 {
        self.score
    }
}
