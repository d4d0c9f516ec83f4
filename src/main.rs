use dominance::image::io::Reader as ImageReader;
use dominance::{DominantColorsConfig, DominantColorsProcessor, LogoConfig, LogoProcessor};
use std::error::Error;

const USAGE: &str = "usage: dominance <image> [--logo]

  --logo  treat the image as a logo; only pixels with alpha >= 128 are foreground, so an opaque logo's
          background is reported as one of its colors";

fn main() -> Result<(), Box<dyn Error>> {
    let mut args = std::env::args().skip(1);
    let path = args.next().ok_or(USAGE)?;
    let logo = args.any(|arg| arg == "--logo");

    let img = ImageReader::open(path)?.decode()?;

    let colors = if logo {
        LogoProcessor::new(LogoConfig::default())?
            .dominant_colors_in_image(&img.to_rgba8(), dominance::DEFAULT_MAX_WORKING_RESOLUTION)?
    } else {
        DominantColorsProcessor::new(DominantColorsConfig::default())?
            .dominant_colors_in_image(&img.to_rgb8(), dominance::DEFAULT_MAX_WORKING_RESOLUTION)?
    };

    println!("{:#?}", colors);
    Ok(())
}
