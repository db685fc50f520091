use image::Rgb;

/// Class colours, cycled by class id.
pub const CLASS_PALETTE: [Rgb<u8>; 10] = [
    Rgb([163, 81, 251]),  // purple
    Rgb([255, 64, 64]),   // red
    Rgb([255, 161, 160]), // pink
    Rgb([255, 118, 51]),  // orange
    Rgb([255, 182, 51]),  // amber
    Rgb([209, 212, 53]),  // olive
    Rgb([76, 251, 18]),   // green
    Rgb([0, 214, 193]),   // teal
    Rgb([0, 196, 255]),   // sky
    Rgb([54, 71, 151]),   // navy
];

pub fn get_class_colour(class: usize) -> Rgb<u8> {
    CLASS_PALETTE[class % CLASS_PALETTE.len()]
}
