use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageEncoder, ImageFormat, RgbImage};
use tracing::debug;

use crate::emoji_set::EmojiSet;
use crate::error::EmojifyError;
use crate::expression::Thresholds;
use crate::face_detector::FaceDetector;
use crate::{emojify_with, Detection, EmojifiedPhoto, Outcome, OutputFormat};

/// Decode input bytes into a `DynamicImage`.
pub(crate) fn decode_image(input: &[u8]) -> Result<DynamicImage, EmojifyError> {
    image::load_from_memory(input).map_err(|e| EmojifyError::DecodeError(e.to_string()))
}

/// Detect the input image format from the raw bytes.
pub(crate) fn detect_format(input: &[u8]) -> Result<ImageFormat, EmojifyError> {
    image::guess_format(input).map_err(|e| EmojifyError::DecodeError(e.to_string()))
}

/// Power-of-two subsampling factor that brings a photo down towards the
/// display size without going below it.
///
/// The raw factor is `min(src_w / target_w, src_h / target_h)` in integer
/// arithmetic, rounded down to a power of two. Never less than 1.
pub(crate) fn display_sample_size(
    src_width: u32,
    src_height: u32,
    target_width: u32,
    target_height: u32,
) -> u32 {
    let ratio = (src_width / target_width.max(1)).min(src_height / target_height.max(1));
    if ratio <= 1 {
        return 1;
    }
    1 << ratio.ilog2()
}

/// Downscale a photo for a display of `target_width` × `target_height`.
///
/// Photos less than twice the display size in either dimension are
/// returned as-is.
pub(crate) fn resample_for_display(
    image: DynamicImage,
    target_width: u32,
    target_height: u32,
) -> DynamicImage {
    let (src_w, src_h) = (image.width(), image.height());
    let sample = display_sample_size(src_w, src_h, target_width, target_height);
    if sample == 1 {
        return image;
    }

    let (new_w, new_h) = ((src_w / sample).max(1), (src_h / sample).max(1));
    debug!(sample, src_w, src_h, new_w, new_h, "resampling photo for display");
    image.resize_exact(new_w, new_h, FilterType::Triangle)
}

/// Flatten alpha channel by compositing onto a white background.
pub(crate) fn flatten_alpha(image: &DynamicImage) -> RgbImage {
    if !image.color().has_alpha() {
        return image.to_rgb8();
    }

    let rgba = image.to_rgba8();
    let mut rgb = RgbImage::new(rgba.width(), rgba.height());
    for (x, y, pixel) in rgba.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = a as f32 / 255.0;
        let inv_alpha = 1.0 - alpha;
        let over_white = |c: u8| (c as f32 * alpha + 255.0 * inv_alpha).round() as u8;
        rgb.put_pixel(x, y, image::Rgb([over_white(r), over_white(g), over_white(b)]));
    }
    rgb
}

/// Encode an image to the specified format.
///
/// JPEG has no alpha channel, so transparent regions are flattened onto
/// white first. PNG keeps alpha and ignores `quality`.
pub(crate) fn encode_image(
    image: &DynamicImage,
    format: &OutputFormat,
    quality: f32,
) -> Result<Vec<u8>, EmojifyError> {
    let mut buffer = Vec::new();

    match format {
        OutputFormat::Jpeg => {
            let rgb = flatten_alpha(image);
            let quality_percent = (quality * 100.0).round().clamp(1.0, 100.0) as u8;
            JpegEncoder::new_with_quality(&mut buffer, quality_percent)
                .write_image(
                    rgb.as_raw(),
                    rgb.width(),
                    rgb.height(),
                    image::ExtendedColorType::Rgb8,
                )
                .map_err(|e| EmojifyError::EncodeError(e.to_string()))?;
        }
        OutputFormat::Png => {
            let rgba = image.to_rgba8();
            PngEncoder::new(&mut buffer)
                .write_image(
                    rgba.as_raw(),
                    rgba.width(),
                    rgba.height(),
                    image::ExtendedColorType::Rgba8,
                )
                .map_err(|e| EmojifyError::EncodeError(e.to_string()))?;
        }
    }

    Ok(buffer)
}

/// Full pipeline: decode → resample → detect → classify and overlay → encode.
#[allow(clippy::too_many_arguments)]
pub(crate) fn emojify_pipeline(
    input: &[u8],
    detector: Option<&dyn FaceDetector>,
    emojis: &EmojiSet,
    thresholds: &Thresholds,
    scale_factor: f64,
    display_size: Option<(u32, u32)>,
    format: &OutputFormat,
    quality: f32,
) -> Result<EmojifiedPhoto, EmojifyError> {
    let decoded = decode_image(input)?;

    if decoded.width() == 0 || decoded.height() == 0 {
        return Err(EmojifyError::ZeroDimensions);
    }

    let photo = match display_size {
        Some((width, height)) => resample_for_display(decoded, width, height),
        None => decoded,
    };

    let outcome = match detector {
        Some(detector) if detector.is_operational() => {
            let faces = detector.detect(&photo);
            emojify_with(Some(&photo), &faces, emojis, thresholds, scale_factor)
        }
        _ => Outcome::DetectorUnavailable { image: photo },
    };

    let (image, detection, faces) = match outcome {
        Outcome::Emojified { image, faces } => (image, Detection::Faces(faces.len()), faces),
        Outcome::NoFaces { image } => (image, Detection::NoFaces, Vec::new()),
        Outcome::DetectorUnavailable { image } => {
            (image, Detection::DetectorUnavailable, Vec::new())
        }
        Outcome::NoImage => return Err(EmojifyError::ZeroDimensions),
    };

    let data = encode_image(&image, format, quality)?;

    Ok(EmojifiedPhoto {
        data,
        format: format.clone(),
        width: image.width(),
        height: image.height(),
        original_size: input.len(),
        detection,
        faces,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::Expression;
    use crate::face_detector::{FaceAttributes, FaceGeometry, StaticFaces};
    use crate::OverlayStatus;
    use image::{Rgba, RgbaImage};

    fn make_test_rgb(width: u32, height: u32) -> RgbImage {
        let mut img = RgbImage::new(width, height);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            *pixel = image::Rgb([
                (x * 255 / width.max(1)) as u8,
                (y * 255 / height.max(1)) as u8,
                128,
            ]);
        }
        img
    }

    fn make_test_png(width: u32, height: u32) -> Vec<u8> {
        let img = make_test_rgb(width, height);
        let mut buffer = Vec::new();
        PngEncoder::new(&mut buffer)
            .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
            .unwrap();
        buffer
    }

    fn smiling_face() -> FaceAttributes {
        FaceAttributes {
            bounds: FaceGeometry::new(100.0, 100.0, 50.0, 50.0),
            smiling_probability: 0.9,
            left_eye_open_probability: 0.9,
            right_eye_open_probability: 0.9,
        }
    }

    fn smile_only() -> EmojiSet {
        EmojiSet::new().with(
            Expression::Smiling,
            RgbaImage::from_pixel(40, 40, Rgba([255, 255, 0, 255])),
        )
    }

    #[test]
    fn sample_size_rounds_down_to_power_of_two() {
        assert_eq!(display_sample_size(1000, 1000, 1000, 1000), 1);
        assert_eq!(display_sample_size(1999, 1999, 1000, 1000), 1);
        assert_eq!(display_sample_size(2000, 2000, 1000, 1000), 2);
        assert_eq!(display_sample_size(3000, 3000, 1000, 1000), 2);
        assert_eq!(display_sample_size(4000, 3000, 1000, 1000), 2);
        assert_eq!(display_sample_size(4000, 4000, 1000, 1000), 4);
        assert_eq!(display_sample_size(100, 100, 1000, 1000), 1);
    }

    #[test]
    fn resample_shrinks_by_sample_size() {
        let img = DynamicImage::ImageRgb8(make_test_rgb(400, 300));
        let resized = resample_for_display(img, 100, 100);
        // min(400 / 100, 300 / 100) = 3 -> 2
        assert_eq!((resized.width(), resized.height()), (200, 150));
    }

    #[test]
    fn resample_leaves_small_photos_alone() {
        let img = DynamicImage::ImageRgb8(make_test_rgb(120, 80));
        let resized = resample_for_display(img, 100, 100);
        assert_eq!((resized.width(), resized.height()), (120, 80));
    }

    #[test]
    fn encode_jpeg_produces_valid_output() {
        let img = DynamicImage::ImageRgb8(make_test_rgb(48, 64));
        let data = encode_image(&img, &OutputFormat::Jpeg, 0.8).unwrap();
        assert_eq!(data[0], 0xFF);
        assert_eq!(data[1], 0xD8);
    }

    #[test]
    fn encode_png_keeps_alpha() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 8, Rgba([1, 2, 3, 100])));
        let data = encode_image(&img, &OutputFormat::Png, 0.8).unwrap();
        assert_eq!(&data[1..4], b"PNG");
        let decoded = decode_image(&data).unwrap().to_rgba8();
        assert_eq!(decoded.get_pixel(3, 3), &Rgba([1, 2, 3, 100]));
    }

    #[test]
    fn flatten_alpha_composites_over_white() {
        let rgba = RgbaImage::from_pixel(1, 1, Rgba([255, 0, 0, 0]));
        let rgb = flatten_alpha(&DynamicImage::ImageRgba8(rgba));
        assert_eq!(rgb.get_pixel(0, 0), &image::Rgb([255, 255, 255]));
    }

    #[test]
    fn flatten_alpha_preserves_opaque() {
        let rgba = RgbaImage::from_pixel(1, 1, Rgba([100, 150, 200, 255]));
        let rgb = flatten_alpha(&DynamicImage::ImageRgba8(rgba));
        assert_eq!(rgb.get_pixel(0, 0), &image::Rgb([100, 150, 200]));
    }

    #[test]
    fn flatten_alpha_blends_semitransparent() {
        let rgba = RgbaImage::from_pixel(1, 1, Rgba([255, 0, 0, 128]));
        let rgb = flatten_alpha(&DynamicImage::ImageRgba8(rgba));
        let pixel = rgb.get_pixel(0, 0);
        assert!((pixel.0[0] as i16 - 255).abs() <= 1);
        assert!((pixel.0[1] as i16 - 127).abs() <= 2);
        assert!((pixel.0[2] as i16 - 127).abs() <= 2);
    }

    #[test]
    fn full_pipeline_draws_detected_face() {
        let png = make_test_png(200, 200);
        let detector = StaticFaces(vec![smiling_face()]);
        let result = emojify_pipeline(
            &png,
            Some(&detector as &dyn FaceDetector),
            &smile_only(),
            &Thresholds::default(),
            0.8,
            None,
            &OutputFormat::Png,
            0.9,
        )
        .unwrap();

        assert_eq!(result.detection, Detection::Faces(1));
        assert_eq!((result.width, result.height), (200, 200));
        assert_eq!(result.original_size, png.len());
        assert!(matches!(result.faces[0].overlay, OverlayStatus::Drawn(_)));

        let decoded = decode_image(&result.data).unwrap().to_rgba8();
        assert_eq!(decoded.get_pixel(60, 80), &Rgba([255, 255, 0, 255]));
    }

    #[test]
    fn full_pipeline_without_detector_reports_unavailable() {
        let png = make_test_png(64, 64);
        let result = emojify_pipeline(
            &png,
            None,
            &smile_only(),
            &Thresholds::default(),
            0.8,
            None,
            &OutputFormat::Jpeg,
            0.9,
        )
        .unwrap();
        assert_eq!(result.detection, Detection::DetectorUnavailable);
        assert!(result.faces.is_empty());
        assert_eq!(result.data[0], 0xFF);
    }

    #[test]
    fn full_pipeline_resamples_before_detection() {
        let png = make_test_png(400, 400);
        let detector = StaticFaces(Vec::new());
        let result = emojify_pipeline(
            &png,
            Some(&detector as &dyn FaceDetector),
            &smile_only(),
            &Thresholds::default(),
            0.8,
            Some((100, 100)),
            &OutputFormat::Png,
            0.9,
        )
        .unwrap();
        assert_eq!(result.detection, Detection::NoFaces);
        assert_eq!((result.width, result.height), (100, 100));
    }

    #[test]
    fn invalid_input_returns_error() {
        let result = emojify_pipeline(
            b"not an image",
            None,
            &EmojiSet::new(),
            &Thresholds::default(),
            0.8,
            None,
            &OutputFormat::Jpeg,
            0.9,
        );
        assert!(matches!(result, Err(EmojifyError::DecodeError(_))));
    }
}
