use crate::{
    color::PixelSample,
    error::{Error, Result},
};
use image::{imageops, ImageBuffer, RgbImage, RgbaImage};
use std::borrow::Cow;

/// Pixels with at least this alpha are foreground when a grid is built from an RGBA image.
pub const FOREGROUND_MIN_ALPHA: u8 = 128;

/// Samples laid out on a rectangular grid, row by row, together with a foreground mask.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleGrid {
    width: usize,
    height: usize,
    samples: Vec<PixelSample>,
    foreground: Vec<bool>,
}

impl SampleGrid {
    pub fn new(width: usize, height: usize, samples: Vec<PixelSample>, foreground: Vec<bool>) -> Result<Self> {
        let expected = width * height;

        if samples.len() != expected {
            return Err(Error::InputLengthMismatch {
                expected,
                actual: samples.len(),
            });
        }

        if foreground.len() != expected {
            return Err(Error::InputLengthMismatch {
                expected,
                actual: foreground.len(),
            });
        }

        Ok(Self {
            width,
            height,
            samples,
            foreground,
        })
    }

    /// Builds a grid from an RGBA image, treating opaque enough pixels as foreground. The mask comes from the alpha
    /// channel only, so every pixel of an opaque image is foreground. See [`samples_from_image`] for how
    /// `max_working_resolution` is applied.
    pub fn from_image(image: &RgbaImage, max_working_resolution: u32) -> Self {
        let image = working_image(image, max_working_resolution);
        let (width, height) = image.dimensions();

        let (samples, foreground) = image
            .pixels()
            .map(|pixel| {
                let [red, green, blue, alpha] = pixel.0;
                (PixelSample::from_rgb((red, green, blue)), alpha >= FOREGROUND_MIN_ALPHA)
            })
            .unzip();

        Self {
            width: width as usize,
            height: height as usize,
            samples,
            foreground,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn samples(&self) -> &[PixelSample] {
        &self.samples
    }

    pub fn foreground(&self) -> &[bool] {
        &self.foreground
    }
}

/// Converts every pixel of `image` into a sample. Images whose largest dimension exceeds `max_working_resolution`
/// are scaled down first so that it matches; a resolution of zero disables scaling.
pub fn samples_from_image(image: &RgbImage, max_working_resolution: u32) -> Vec<PixelSample> {
    working_image(image, max_working_resolution)
        .pixels()
        .map(|pixel| PixelSample::from_rgb((pixel.0[0], pixel.0[1], pixel.0[2])))
        .collect()
}

fn working_image<P>(image: &ImageBuffer<P, Vec<u8>>, max_working_resolution: u32) -> Cow<'_, ImageBuffer<P, Vec<u8>>>
where
    P: image::Pixel<Subpixel = u8> + 'static,
{
    let (width, height) = image.dimensions();
    let largest = width.max(height);

    if max_working_resolution == 0 || largest <= max_working_resolution {
        return Cow::Borrowed(image);
    }

    let scale_ratio = max_working_resolution as f32 / largest as f32;
    let scaled = imageops::resize(
        image,
        ((width as f32 * scale_ratio).round() as u32).max(1),
        ((height as f32 * scale_ratio).round() as u32).max(1),
        imageops::FilterType::Nearest,
    );

    Cow::Owned(scaled)
}
