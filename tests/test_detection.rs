mod common;

use image::DynamicImage;
use ndarray::array;
use bvr_annotate::common::{BvrDetection, DetectionReport, DETECTION_THRESHOLD};
use bvr_annotate::detection_processing::{
    detect_and_annotate, detect_and_annotate_bytes, into_presentation, PipelineError,
};
use bvr_annotate::run_detection;
use common::{annotator, grey_image, png_bytes, StubDetector};

#[test]
fn single_detection_report() {
    let model = StubDetector::single_text_box();
    let result = detect_and_annotate(&model, &annotator(), Some(&grey_image())).unwrap();

    assert_eq!(
        result.report.lines(),
        &[
            "Number of detections: 1".to_string(),
            "Detection: text, Confidence: 0.75, Coordinates: [10.0, 10.0, 50.0, 50.0]".to_string(),
        ]
    );
    assert_eq!(result.detections[0].caption(), "text 0.75");
}

#[test]
fn model_is_called_with_fixed_threshold() {
    let model = StubDetector::single_text_box();
    detect_and_annotate(&model, &annotator(), Some(&grey_image())).unwrap();

    assert_eq!(*model.thresholds.lock(), vec![DETECTION_THRESHOLD]);
    assert_eq!(DETECTION_THRESHOLD, 0.5);
}

#[test]
fn count_line_matches_detail_lines() {
    let model = StubDetector::with_rows(
        array![[5.0, 5.0, 30.0, 20.0], [40.0, 30.0, 90.0, 70.0], [0.0, 0.0, 99.0, 79.0]],
        array![0.91, 0.6, 0.5],
        array![1.0, 0.0, 1.0],
    );
    let result = detect_and_annotate(&model, &annotator(), Some(&grey_image())).unwrap();
    let lines = result.report.lines();

    assert_eq!(lines[0], "Number of detections: 3");
    assert_eq!(lines.len() - 1, 3);
    assert_eq!(result.report.count(), 3);
    assert!(lines[1].starts_with("Detection: figure, Confidence: 0.91,"));
    assert!(lines[2].starts_with("Detection: text, Confidence: 0.60,"));
    assert!(lines[3].starts_with("Detection: figure, Confidence: 0.50,"));
}

#[test]
fn confidence_has_two_decimals() {
    let model = StubDetector::with_rows(array![[1.0, 2.0, 30.5, 40.25]], array![0.876543], array![0.0]);
    let result = detect_and_annotate(&model, &annotator(), Some(&grey_image())).unwrap();

    assert_eq!(
        result.report.lines()[1],
        "Detection: text, Confidence: 0.88, Coordinates: [1.0, 2.0, 30.5, 40.25]"
    );
    assert_eq!(result.detections[0].caption(), "text 0.88");
}

#[test]
fn report_text_is_newline_joined() {
    let model = StubDetector::single_text_box();
    let (image, text) = run_detection(&model, &annotator(), Some(&grey_image()));

    assert!(image.is_some());
    assert_eq!(
        text,
        "Number of detections: 1\nDetection: text, Confidence: 0.75, Coordinates: [10.0, 10.0, 50.0, 50.0]"
    );
}

#[test]
fn annotation_changes_pixels_but_not_input() {
    let input = grey_image();
    let before = input.to_rgb8();
    let model = StubDetector::single_text_box();
    let result = detect_and_annotate(&model, &annotator(), Some(&input)).unwrap();

    assert_eq!(input.to_rgb8(), before);
    assert_ne!(result.image, before);
    assert_eq!(result.image.dimensions(), before.dimensions());
    // box stroke on the left edge, below the label tag
    assert_ne!(result.image.get_pixel(10, 45), before.get_pixel(10, 45));
    // far corner untouched
    assert_eq!(result.image.get_pixel(95, 75), before.get_pixel(95, 75));
}

#[test]
fn repeated_runs_are_identical() {
    let model = StubDetector::single_text_box();
    let annotator = annotator();
    let image = grey_image();

    let first = detect_and_annotate(&model, &annotator, Some(&image)).unwrap();
    let second = detect_and_annotate(&model, &annotator, Some(&image)).unwrap();

    assert_eq!(first.report, second.report);
    assert_eq!(first.image, second.image);
}

#[test]
fn failing_model_gives_error_text_and_no_image() {
    let model = StubDetector::failing("model exploded");
    let (image, text) = into_presentation(detect_and_annotate(&model, &annotator(), Some(&grey_image())));

    assert!(image.is_none());
    assert_eq!(text, "Error during detection: model exploded");
}

#[test]
fn missing_image_is_input_error() {
    let model = StubDetector::single_text_box();
    let result = detect_and_annotate(&model, &annotator(), None);

    assert!(matches!(result, Err(PipelineError::InputConversion(_))));
    assert!(model.thresholds.lock().is_empty());

    let (image, text) = into_presentation(result);
    assert!(image.is_none());
    assert!(text.starts_with("Error during detection: "));
}

#[test]
fn empty_image_is_input_error() {
    let model = StubDetector::empty();
    let empty = DynamicImage::new_rgb8(0, 0);
    let result = detect_and_annotate(&model, &annotator(), Some(&empty));

    assert!(matches!(result, Err(PipelineError::InputConversion(_))));
}

#[test]
fn undecodable_bytes_are_input_error() {
    let model = StubDetector::single_text_box();
    let result = detect_and_annotate_bytes(&model, &annotator(), b"definitely not a png");
    assert!(matches!(result, Err(PipelineError::InputConversion(_))));

    let result = detect_and_annotate_bytes(&model, &annotator(), &[]);
    assert!(matches!(result, Err(PipelineError::InputConversion(_))));
}

#[test]
fn encoded_bytes_run_the_same_pipeline() {
    let model = StubDetector::single_text_box();
    let image = grey_image();
    let from_bytes = detect_and_annotate_bytes(&model, &annotator(), &png_bytes(&image)).unwrap();
    let direct = detect_and_annotate(&model, &annotator(), Some(&image)).unwrap();

    assert_eq!(from_bytes.report, direct.report);
    assert_eq!(from_bytes.image, direct.image);
}

#[test]
fn unknown_class_is_rejected() {
    let model = StubDetector::with_rows(array![[10.0, 10.0, 50.0, 50.0]], array![0.9], array![7.0]);
    let result = detect_and_annotate(&model, &annotator(), Some(&grey_image()));

    match result {
        Err(PipelineError::UnknownClass { class_id }) => assert_eq!(class_id, 7),
        other => panic!("expected unknown class, got {other:?}"),
    }
}

#[test]
fn malformed_predictions_are_inference_errors() {
    let mismatched = StubDetector::with_rows(
        array![[10.0, 10.0, 50.0, 50.0], [1.0, 1.0, 2.0, 2.0]],
        array![0.9],
        array![0.0, 0.0],
    );
    let negative_class = StubDetector::with_rows(array![[10.0, 10.0, 50.0, 50.0]], array![0.9], array![-1.0]);
    let fractional_class = StubDetector::with_rows(array![[10.0, 10.0, 50.0, 50.0]], array![0.9], array![0.5]);
    let three_coords = StubDetector::with_rows(array![[10.0, 10.0, 50.0]], array![0.9], array![0.0]);

    for model in [mismatched, negative_class, fractional_class, three_coords] {
        let result = detect_and_annotate(&model, &annotator(), Some(&grey_image()));
        assert!(matches!(result, Err(PipelineError::Inference(_))), "{result:?}");
    }
}

#[test]
fn undrawable_boxes_are_rendering_errors() {
    let inverted = StubDetector::with_rows(array![[50.0, 10.0, 10.0, 50.0]], array![0.9], array![0.0]);
    let outside = StubDetector::with_rows(array![[200.0, 200.0, 300.0, 300.0]], array![0.9], array![0.0]);
    let not_finite = StubDetector::with_rows(array![[f32::NAN, 10.0, 50.0, 50.0]], array![0.9], array![0.0]);

    for model in [inverted, outside, not_finite] {
        let result = detect_and_annotate(&model, &annotator(), Some(&grey_image()));
        assert!(matches!(result, Err(PipelineError::Rendering(_))), "{result:?}");
    }
}

#[test]
fn partially_visible_box_is_clipped_and_reported_raw() {
    let model = StubDetector::with_rows(array![[-20.0, 60.0, 40.0, 120.0]], array![0.8], array![1.0]);
    let result = detect_and_annotate(&model, &annotator(), Some(&grey_image())).unwrap();

    assert_eq!(
        result.report.lines()[1],
        "Detection: figure, Confidence: 0.80, Coordinates: [-20.0, 60.0, 40.0, 120.0]"
    );
}

#[test]
fn report_prints_shortest_coordinates() {
    let detection = BvrDetection::default()
        .with_x1y1_x2y2(12.3, 20.7, 55.55, 70.1)
        .with_label("figure")
        .with_confidence(0.5);
    let report = DetectionReport::from_detections(&[detection]);

    assert_eq!(
        report.lines()[1],
        "Detection: figure, Confidence: 0.50, Coordinates: [12.3, 20.7, 55.55, 70.1]"
    );
}
