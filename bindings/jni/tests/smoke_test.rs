use emojify_jni::*;

fn make_test_png(width: u32, height: u32) -> Vec<u8> {
    use image::codecs::png::PngEncoder;
    use image::{ImageEncoder, RgbImage};

    let img = RgbImage::from_pixel(width, height, image::Rgb([20, 40, 60]));
    let mut buffer = Vec::new();
    let encoder = PngEncoder::new(&mut buffer);
    encoder
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
    buffer
}

fn make_emoji_png() -> Vec<u8> {
    use image::codecs::png::PngEncoder;
    use image::{ImageEncoder, RgbaImage};

    let img = RgbaImage::from_pixel(16, 16, image::Rgba([255, 255, 0, 255]));
    let mut buffer = Vec::new();
    PngEncoder::new(&mut buffer)
        .write_image(img.as_raw(), 16, 16, image::ExtendedColorType::Rgba8)
        .unwrap();
    buffer
}

fn face(smiling: f64, left: f64, right: f64) -> DetectedFace {
    DetectedFace {
        x: 100.0,
        y: 100.0,
        width: 50.0,
        height: 50.0,
        smiling_probability: smiling,
        left_eye_open_probability: left,
        right_eye_open_probability: right,
    }
}

#[test]
fn classify_face_works() {
    assert_eq!(classify_face(face(0.9, 0.1, 0.9)), Expression::RightWink);
    assert_eq!(classify_face(face(0.15, 0.5, 0.5)), Expression::Frowning);
}

#[test]
fn emojify_photo_draws_face() {
    let result = emojify_photo(
        make_test_png(200, 200),
        vec![face(0.9, 0.9, 0.9)],
        vec![EmojiAsset {
            expression: Expression::Smiling,
            data: make_emoji_png(),
        }],
        OutputFormat::Png,
        0.9,
    )
    .unwrap();

    assert_eq!(result.detection, Detection::Faces { count: 1 });
    assert_eq!(result.format, OutputFormat::Png);
    assert_eq!((result.width, result.height), (200, 200));
    assert_eq!(
        result.faces[0].overlay,
        OverlayStatus::Drawn {
            placement: OverlayPlacement {
                x: 55,
                y: 69,
                width: 40,
                height: 32,
            }
        }
    );
}

#[test]
fn emojify_photo_reports_missing_emoji() {
    let result = emojify_photo(
        make_test_png(200, 200),
        vec![face(0.0, 0.9, 0.9)],
        Vec::new(),
        OutputFormat::Jpeg,
        0.8,
    )
    .unwrap();
    assert_eq!(result.faces[0].expression, Expression::Frowning);
    assert_eq!(result.faces[0].overlay, OverlayStatus::MissingEmoji);
    assert_eq!(result.data[0], 0xFF);
    assert_eq!(result.data[1], 0xD8);
}

#[test]
fn emojify_photo_reports_oversized_face() {
    let huge = DetectedFace {
        width: 1e10,
        height: 1e10,
        ..face(0.9, 0.9, 0.9)
    };
    let result = emojify_photo(
        make_test_png(64, 64),
        vec![huge],
        vec![EmojiAsset {
            expression: Expression::Smiling,
            data: make_emoji_png(),
        }],
        OutputFormat::Png,
        0.9,
    )
    .unwrap();
    assert_eq!(result.detection, Detection::Faces { count: 1 });
    assert_eq!(result.faces[0].overlay, OverlayStatus::Oversized);
    assert_eq!((result.width, result.height), (64, 64));
}

#[test]
fn emojify_photo_without_faces() {
    let result = emojify_photo(
        make_test_png(32, 32),
        Vec::new(),
        Vec::new(),
        OutputFormat::Jpeg,
        0.8,
    )
    .unwrap();
    assert_eq!(result.detection, Detection::NoFaces);
    assert!(result.faces.is_empty());
}

#[test]
fn emojify_photo_for_display_subsamples() {
    let result = emojify_photo_for_display(
        make_test_png(400, 400),
        Vec::new(),
        Vec::new(),
        OutputFormat::Png,
        0.9,
        100,
        100,
    )
    .unwrap();
    assert_eq!((result.width, result.height), (100, 100));
}

#[test]
fn invalid_inputs_map_to_errors() {
    assert!(matches!(
        emojify_photo(b"not an image".to_vec(), Vec::new(), Vec::new(), OutputFormat::Jpeg, 0.8),
        Err(EmojifyError::DecodeError { .. })
    ));
    assert!(matches!(
        emojify_photo(make_test_png(8, 8), Vec::new(), Vec::new(), OutputFormat::Jpeg, 2.0),
        Err(EmojifyError::InvalidQuality)
    ));
    assert!(matches!(
        emojify_photo(
            make_test_png(8, 8),
            Vec::new(),
            vec![EmojiAsset {
                expression: Expression::Smiling,
                data: b"garbage".to_vec(),
            }],
            OutputFormat::Jpeg,
            0.8,
        ),
        Err(EmojifyError::DecodeError { .. })
    ));
}
