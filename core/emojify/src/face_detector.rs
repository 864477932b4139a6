use image::DynamicImage;

/// Bounding box of a detected face within an image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceGeometry {
    /// X coordinate of the top-left corner (pixels).
    pub x: f64,
    /// Y coordinate of the top-left corner (pixels).
    pub y: f64,
    /// Width of the bounding box (pixels).
    pub width: f64,
    /// Height of the bounding box (pixels).
    pub height: f64,
}

impl FaceGeometry {
    /// Create a bounding box from its top-left corner and size.
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// A face reported by a detector: where it is and how it looks.
///
/// Probabilities are nominally in `[0.0, 1.0]`. Detectors that could not
/// compute an attribute commonly report a negative sentinel; such values
/// simply fall below every threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceAttributes {
    /// Where the face sits in the image.
    pub bounds: FaceGeometry,
    /// Probability that the face is smiling.
    pub smiling_probability: f64,
    /// Probability that the subject's left eye is open.
    pub left_eye_open_probability: f64,
    /// Probability that the subject's right eye is open.
    pub right_eye_open_probability: f64,
}

/// Pluggable face detection backend.
///
/// The backend must report expression probabilities alongside each bounding
/// box, since classification depends on them.
pub trait FaceDetector: Send + Sync {
    /// Detect faces in `image`. Order is preserved through compositing, so a
    /// face reported later is drawn over one reported earlier.
    fn detect(&self, image: &DynamicImage) -> Vec<FaceAttributes>;

    /// Whether the backend is ready to run (models loaded, libraries present).
    ///
    /// An unavailable detector is reported as such rather than as "no faces".
    fn is_operational(&self) -> bool {
        true
    }
}

/// Detector that returns a fixed list of faces.
///
/// Use this when detection already happened elsewhere, e.g. on the device
/// through the platform vision library, and only the results are passed in.
#[derive(Debug, Clone, Default)]
pub struct StaticFaces(pub Vec<FaceAttributes>);

impl FaceDetector for StaticFaces {
    fn detect(&self, _image: &DynamicImage) -> Vec<FaceAttributes> {
        self.0.clone()
    }
}
