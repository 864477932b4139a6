//! Face expression emoji overlays: classify each detected face as smiling or
//! frowning with open, winking or closed eyes, and draw the matching emoji
//! over it.
//!
//! # Example
//!
//! ```no_run
//! use emojify::{EmojiSet, Emojifier, FaceAttributes, FaceGeometry};
//!
//! let raw_bytes = std::fs::read("photo.jpg").unwrap();
//! let faces = vec![FaceAttributes {
//!     bounds: FaceGeometry::new(120.0, 80.0, 200.0, 200.0),
//!     smiling_probability: 0.92,
//!     left_eye_open_probability: 0.1,
//!     right_eye_open_probability: 0.97,
//! }];
//! let result = Emojifier::new(raw_bytes)
//!     .unwrap()
//!     .emojis(EmojiSet::load_dir("assets/emoji").unwrap())
//!     .faces(faces)
//!     .process()
//!     .unwrap();
//! println!("{:?}: {} bytes", result.detection, result.data.len());
//! ```
#![warn(missing_docs)]

mod emoji_set;
mod error;
mod expression;
/// Face detection traits and data types.
pub mod face_detector;
/// Emoji placement geometry and compositing.
pub mod overlay;
mod pipeline;

use image::DynamicImage;
use tracing::{info, warn};

/// Emoji graphics keyed by expression.
pub use emoji_set::EmojiSet;
/// Error type returned by emojify operations.
pub use error::EmojifyError;
/// Expression categories and the classifier.
pub use expression::{
    classify, Expression, Thresholds, EYE_OPEN_PROB_THRESHOLD, SMILING_PROB_THRESHOLD,
};
/// Face detection trait and face record types.
pub use face_detector::{FaceAttributes, FaceDetector, FaceGeometry, StaticFaces};
/// Compositing entry points and placement type.
pub use overlay::{composite, composite_with_scale, OverlayPlacement, EMOJI_SCALE_FACTOR};

/// Output image format.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// JPEG encoding. Transparent regions are flattened onto white.
    #[default]
    Jpeg,

    /// PNG encoding, alpha preserved.
    Png,
}

/// What happened to the emoji for one face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayStatus {
    /// The emoji was drawn at this placement.
    Drawn(OverlayPlacement),

    /// The emoji set has no graphic for the face's expression; the face was
    /// left bare.
    MissingEmoji,

    /// The face is too small for the scaled emoji to cover a single pixel.
    TooSmall,

    /// The scaled emoji would be larger than the photo; the face was left
    /// bare.
    Oversized,
}

/// Per-face result, in the order the detector reported the faces.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceReport {
    /// The face as reported by the detector.
    pub face: FaceAttributes,

    /// The classified expression.
    pub expression: Expression,

    /// Whether and where the emoji was drawn.
    pub overlay: OverlayStatus,
}

/// Result of [`emojify`].
///
/// Only `Emojified` carries a modified image. The other outcomes are
/// informational, not failures.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// At least one face was found; emoji were layered in detector order.
    Emojified {
        /// The composited photo.
        image: DynamicImage,
        /// One report per face.
        faces: Vec<FaceReport>,
    },

    /// The detector ran and found no faces. Carries the unmodified photo.
    NoFaces {
        /// Copy of the input photo.
        image: DynamicImage,
    },

    /// The detector could not run. Carries the unmodified photo.
    DetectorUnavailable {
        /// The input photo.
        image: DynamicImage,
    },

    /// There was no photo to work on. Nothing to display.
    NoImage,
}

impl Outcome {
    /// The photo to display, if any.
    pub fn image(&self) -> Option<&DynamicImage> {
        match self {
            Outcome::Emojified { image, .. }
            | Outcome::NoFaces { image }
            | Outcome::DetectorUnavailable { image } => Some(image),
            Outcome::NoImage => None,
        }
    }

    /// Take the photo to display, if any.
    pub fn into_image(self) -> Option<DynamicImage> {
        match self {
            Outcome::Emojified { image, .. }
            | Outcome::NoFaces { image }
            | Outcome::DetectorUnavailable { image } => Some(image),
            Outcome::NoImage => None,
        }
    }

    /// Per-face reports; empty unless faces were found.
    pub fn faces(&self) -> &[FaceReport] {
        match self {
            Outcome::Emojified { faces, .. } => faces,
            _ => &[],
        }
    }
}

/// Detection summary attached to an [`EmojifiedPhoto`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detection {
    /// This many faces were found and processed.
    Faces(usize),

    /// The detector ran and found nothing.
    NoFaces,

    /// No operational detector was available.
    DetectorUnavailable,
}

/// Result of [`Emojifier::process`].
#[derive(Debug, Clone)]
pub struct EmojifiedPhoto {
    /// The encoded output image.
    pub data: Vec<u8>,

    /// The output format used.
    pub format: OutputFormat,

    /// Width of the output image in pixels.
    pub width: u32,

    /// Height of the output image in pixels.
    pub height: u32,

    /// Size of the original input in bytes.
    pub original_size: usize,

    /// What the detector found.
    pub detection: Detection,

    /// One report per detected face, in detector order.
    pub faces: Vec<FaceReport>,
}

/// Classify every face and layer its emoji onto `background`, using the
/// default thresholds and scale.
///
/// Each face is drawn onto the result of the previous one, so later faces
/// can cover earlier emoji where boxes overlap. `background` is never
/// modified. An absent or zero-sized background yields [`Outcome::NoImage`].
pub fn emojify(
    background: Option<&DynamicImage>,
    faces: &[FaceAttributes],
    emojis: &EmojiSet,
) -> Outcome {
    emojify_with(
        background,
        faces,
        emojis,
        &Thresholds::default(),
        EMOJI_SCALE_FACTOR,
    )
}

pub(crate) fn emojify_with(
    background: Option<&DynamicImage>,
    faces: &[FaceAttributes],
    emojis: &EmojiSet,
    thresholds: &Thresholds,
    scale_factor: f64,
) -> Outcome {
    let Some(background) = background.filter(|bg| bg.width() > 0 && bg.height() > 0) else {
        return Outcome::NoImage;
    };

    info!(faces = faces.len(), "emojifying photo");
    if faces.is_empty() {
        info!("no faces detected");
        return Outcome::NoFaces {
            image: background.clone(),
        };
    }

    let mut current = background.clone();
    let mut reports = Vec::with_capacity(faces.len());

    for face in faces {
        let expression = thresholds.classify(face);

        let overlay = match emojis.get(expression).filter(|e| e.width() > 0 && e.height() > 0) {
            None => {
                warn!(%expression, "no emoji for expression, leaving face bare");
                OverlayStatus::MissingEmoji
            }
            Some(emoji) => match overlay::overlay_placement(&face.bounds, scale_factor) {
                Some(placement) if placement.fits(&current) => {
                    current = overlay::composite_at(&current, emoji, placement);
                    OverlayStatus::Drawn(placement)
                }
                Some(placement) => {
                    warn!(
                        %expression,
                        width = placement.width,
                        height = placement.height,
                        "emoji larger than the photo, leaving face bare"
                    );
                    OverlayStatus::Oversized
                }
                None => OverlayStatus::TooSmall,
            },
        };

        reports.push(FaceReport {
            face: *face,
            expression,
            overlay,
        });
    }

    Outcome::Emojified {
        image: current,
        faces: reports,
    }
}

/// Builder for emojifying a photo.
///
/// Validates the input format on construction, then decodes, optionally
/// resamples for display, runs the detector, overlays emoji and encodes.
pub struct Emojifier {
    input: Vec<u8>,
    emojis: EmojiSet,
    thresholds: Thresholds,
    /// Emoji width relative to face width. See [`overlay::overlay_placement`].
    scale_factor: f64,
    /// Target display size; the photo is subsampled towards it before detection.
    display_size: Option<(u32, u32)>,
    format: OutputFormat,
    quality: f32,
    /// When `None`, the photo passes through and is reported as
    /// [`Detection::DetectorUnavailable`].
    detector: Option<Box<dyn FaceDetector>>,
}

impl Emojifier {
    /// Create a new emojifier from raw image bytes (JPEG, PNG, or WebP).
    pub fn new(input: Vec<u8>) -> Result<Self, EmojifyError> {
        pipeline::detect_format(&input)?;

        Ok(Self {
            input,
            emojis: EmojiSet::new(),
            thresholds: Thresholds::default(),
            scale_factor: EMOJI_SCALE_FACTOR,
            display_size: None,
            format: OutputFormat::default(),
            quality: 0.9,
            detector: None,
        })
    }

    /// Set the emoji graphics (default: empty, every face reports
    /// [`OverlayStatus::MissingEmoji`]).
    pub fn emojis(mut self, emojis: EmojiSet) -> Self {
        self.emojis = emojis;
        self
    }

    /// Set the classification thresholds (default: 0.15 smiling, 0.5 eye open).
    pub fn thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Set the emoji scale factor relative to the face box (default: 0.8).
    pub fn scale_factor(mut self, scale: f64) -> Self {
        self.scale_factor = scale;
        self
    }

    /// Subsample the photo towards this display size before detection
    /// (default: no resampling).
    pub fn display_size(mut self, width: u32, height: u32) -> Self {
        self.display_size = Some((width, height));
        self
    }

    /// Set the output format (default: `OutputFormat::Jpeg`).
    pub fn format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the JPEG quality from 0.0 (lowest) to 1.0 (highest).
    /// Default: 0.9.
    pub fn quality(mut self, quality: f32) -> Self {
        self.quality = quality;
        self
    }

    /// Provide a face detector implementation.
    ///
    /// ```no_run
    /// use emojify::{Emojifier, FaceAttributes, FaceDetector};
    /// use image::DynamicImage;
    ///
    /// struct MyDetector;
    /// impl FaceDetector for MyDetector {
    ///     fn detect(&self, image: &DynamicImage) -> Vec<FaceAttributes> {
    ///         // Your detection logic here
    ///         vec![]
    ///     }
    /// }
    ///
    /// let bytes = std::fs::read("photo.jpg").unwrap();
    /// let result = Emojifier::new(bytes).unwrap()
    ///     .face_detector(Box::new(MyDetector))
    ///     .process().unwrap();
    /// ```
    pub fn face_detector(mut self, detector: Box<dyn FaceDetector>) -> Self {
        self.detector = Some(detector);
        self
    }

    /// Use faces detected elsewhere, in the given order.
    pub fn faces(self, faces: Vec<FaceAttributes>) -> Self {
        self.face_detector(Box::new(StaticFaces(faces)))
    }

    /// Run the pipeline with the configured settings.
    pub fn process(self) -> Result<EmojifiedPhoto, EmojifyError> {
        if !(0.0..=1.0).contains(&self.quality) {
            return Err(EmojifyError::InvalidQuality(self.quality));
        }
        if !self.scale_factor.is_finite() || self.scale_factor <= 0.0 {
            return Err(EmojifyError::InvalidScaleFactor(self.scale_factor));
        }
        for threshold in [self.thresholds.smiling, self.thresholds.eye_open] {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(EmojifyError::InvalidThreshold(threshold));
            }
        }
        if matches!(self.display_size, Some((w, h)) if w == 0 || h == 0) {
            return Err(EmojifyError::InvalidDisplaySize);
        }

        pipeline::emojify_pipeline(
            &self.input,
            self.detector.as_deref(),
            &self.emojis,
            &self.thresholds,
            self.scale_factor,
            self.display_size,
            &self.format,
            self.quality,
        )
    }
}
