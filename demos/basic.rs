use dominance::image::io::Reader as ImageReader;

fn main() {
    let reader = ImageReader::open("ab67616d0000b2732cd7888600aafe2eb8b6be9f.jpg").unwrap();
    let img = reader.decode().unwrap();
    let buf = img.to_rgb8();

    let processor = dominance::DominantColorsProcessor::new(Default::default()).unwrap();
    let colors = processor
        .dominant_colors_in_image(&buf, dominance::DEFAULT_MAX_WORKING_RESOLUTION)
        .unwrap();

    println!("{:#?}", colors);
}
