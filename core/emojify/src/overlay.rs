use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbaImage};
use tracing::{debug, warn};

use crate::face_detector::FaceGeometry;

/// Emoji width relative to face width, and height relative to the face's
/// own aspect ratio.
pub const EMOJI_SCALE_FACTOR: f64 = 0.8;

/// Divisor applied to the emoji width when centering it horizontally.
pub const HORIZONTAL_OFFSET_DIVISOR: u32 = 2;

/// Divisor applied to the emoji height when offsetting it vertically.
///
/// Deliberately not 2: lifting the emoji by only a fifth of its height keeps
/// it over the eyes and mouth instead of centering it on the box.
pub const VERTICAL_OFFSET_DIVISOR: u32 = 5;

/// Where and how large an emoji is drawn, in background pixel coordinates.
///
/// `x` and `y` may be negative or extend past the background; drawing clips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayPlacement {
    /// Left edge of the emoji.
    pub x: i64,
    /// Top edge of the emoji.
    pub y: i64,
    /// Scaled emoji width.
    pub width: u32,
    /// Scaled emoji height.
    pub height: u32,
}

impl OverlayPlacement {
    /// Whether the scaled emoji is no larger than `background` in either
    /// dimension. Larger emoji are not drawn.
    pub fn fits(&self, background: &DynamicImage) -> bool {
        self.width <= background.width() && self.height <= background.height()
    }
}

/// Compute the emoji placement for a face.
///
/// Width is `trunc(face.width * scale)`; height is
/// `trunc(face.height * width / face.width * scale)`. The anchor is
/// `((face.x + face.width) / 2 - width / 2, (face.y + face.height) / 2 - height / 5)`
/// with integer division on the emoji dimensions, floored to whole pixels.
///
/// Returns `None` when the face is degenerate or the emoji would be
/// scaled to nothing.
pub fn overlay_placement(face: &FaceGeometry, scale: f64) -> Option<OverlayPlacement> {
    if face.width.is_nan() || face.width <= 0.0 {
        return None;
    }

    // Float-to-int casts truncate toward zero and saturate at 0 for negatives.
    let width = (face.width * scale) as u32;
    if width == 0 {
        return None;
    }
    let height = (face.height * width as f64 / face.width * scale) as u32;
    if height == 0 {
        return None;
    }

    let x = (face.x + face.width) / 2.0 - (width / HORIZONTAL_OFFSET_DIVISOR) as f64;
    let y = (face.y + face.height) / 2.0 - (height / VERTICAL_OFFSET_DIVISOR) as f64;

    Some(OverlayPlacement {
        x: x.floor() as i64,
        y: y.floor() as i64,
        width,
        height,
    })
}

/// Draw `emoji` over `face` on a copy of `background`, using
/// [`EMOJI_SCALE_FACTOR`].
///
/// The result always has the background's dimensions and color type.
pub fn composite(
    background: &DynamicImage,
    emoji: &RgbaImage,
    face: &FaceGeometry,
) -> DynamicImage {
    composite_with_scale(background, emoji, face, EMOJI_SCALE_FACTOR)
}

/// Like [`composite`], with a custom scale factor.
///
/// Faces too small to cover a pixel, and faces whose emoji would be larger
/// than the background, leave an unchanged copy.
pub fn composite_with_scale(
    background: &DynamicImage,
    emoji: &RgbaImage,
    face: &FaceGeometry,
    scale: f64,
) -> DynamicImage {
    match overlay_placement(face, scale) {
        Some(placement) if placement.fits(background) => {
            composite_at(background, emoji, placement)
        }
        Some(placement) => {
            warn!(
                ?face,
                width = placement.width,
                height = placement.height,
                "emoji larger than the photo, leaving face bare"
            );
            background.clone()
        }
        None => {
            debug!(?face, scale, "face too small for an emoji, leaving it bare");
            background.clone()
        }
    }
}

/// Draw `emoji`, resized to `placement`, on a copy of `background`.
///
/// The emoji is resized with nearest-neighbour sampling and alpha-blended:
/// opaque pixels replace the background, transparent ones leave it alone.
pub(crate) fn composite_at(
    background: &DynamicImage,
    emoji: &RgbaImage,
    placement: OverlayPlacement,
) -> DynamicImage {
    let mut output = background.clone();
    if emoji.width() == 0 || emoji.height() == 0 {
        return output;
    }

    let scaled = imageops::resize(emoji, placement.width, placement.height, FilterType::Nearest);
    debug!(
        x = placement.x,
        y = placement.y,
        width = placement.width,
        height = placement.height,
        "drawing emoji"
    );
    imageops::overlay(&mut output, &scaled, placement.x, placement.y);
    output
}
