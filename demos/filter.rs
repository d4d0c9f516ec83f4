use dominance::{image::io::Reader as ImageReader, PixelSample};

const MIN_SATURATION: u8 = 40;
const MAX_VALUE: u8 = 230;

// keeps the default minimal saturation and value filter, and additionally blocks very bright and washed out colors
struct NoPastels;
impl dominance::Filter for NoPastels {
    fn is_allowed(&self, sample: PixelSample) -> bool {
        !is_pastel(sample.saturation(), sample.value())
    }
}

fn is_pastel(saturation: u8, value: u8) -> bool {
    saturation < MIN_SATURATION || value > MAX_VALUE
}

fn main() {
    let reader = ImageReader::open("ab67616d0000b2732cd7888600aafe2eb8b6be9f.jpg").unwrap();
    let img = reader.decode().unwrap();
    let buf = img.to_rgb8();

    let processor = dominance::DominantColorsProcessor::new(Default::default())
        .unwrap()
        .add_filter(NoPastels);
    let colors = processor.dominant_colors_in_image(&buf, 0).unwrap();

    for color in colors {
        println!("{:?} {:.3}", color.rgb(), color.score());
    }
}
