mod common;

use bvr_annotate::detection_processing::{detect_and_annotate, into_presentation};
use common::{annotator, gradient_image, grey_image, StubDetector};

#[test]
fn no_detections_keeps_pixels() {
    let model = StubDetector::empty();
    let input = gradient_image(64, 48);
    let result = detect_and_annotate(&model, &annotator(), Some(&input)).unwrap();

    assert_eq!(result.report.lines(), &["Number of detections: 0".to_string()]);
    assert!(result.detections.is_empty());
    assert_eq!(result.image, input.to_rgb8());
}

#[test]
fn no_detections_still_presents_an_image() {
    let model = StubDetector::empty();
    let input = grey_image();
    let (image, text) = into_presentation(detect_and_annotate(&model, &annotator(), Some(&input)));

    assert_eq!(image, Some(input.to_rgb8()));
    assert_eq!(text, "Number of detections: 0");
}

#[test]
fn rgba_input_comes_back_as_rgb() {
    let model = StubDetector::empty();
    let rgba = image::DynamicImage::ImageRgba8(gradient_image(20, 10).to_rgba8());
    let result = detect_and_annotate(&model, &annotator(), Some(&rgba)).unwrap();

    assert_eq!(result.image, rgba.to_rgb8());
}
