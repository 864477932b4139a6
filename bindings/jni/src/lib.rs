uniffi::setup_scaffolding!();

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum EmojifyError {
    #[error("failed to decode image: {message}")]
    DecodeError { message: String },
    #[error("image dimensions are zero")]
    ZeroDimensions,
    #[error("failed to encode image: {message}")]
    EncodeError { message: String },
    #[error("invalid quality value")]
    InvalidQuality,
    #[error("invalid emoji scale factor")]
    InvalidScaleFactor,
    #[error("invalid classification threshold")]
    InvalidThreshold,
    #[error("display width and height must be > 0")]
    InvalidDisplaySize,
    #[error("failed to load emoji asset: {message}")]
    AssetError { message: String },
}

impl From<emojify::EmojifyError> for EmojifyError {
    fn from(e: emojify::EmojifyError) -> Self {
        match e {
            emojify::EmojifyError::DecodeError(msg) => EmojifyError::DecodeError { message: msg },
            emojify::EmojifyError::ZeroDimensions => EmojifyError::ZeroDimensions,
            emojify::EmojifyError::EncodeError(msg) => EmojifyError::EncodeError { message: msg },
            emojify::EmojifyError::InvalidQuality(_) => EmojifyError::InvalidQuality,
            emojify::EmojifyError::InvalidScaleFactor(_) => EmojifyError::InvalidScaleFactor,
            emojify::EmojifyError::InvalidThreshold(_) => EmojifyError::InvalidThreshold,
            emojify::EmojifyError::InvalidDisplaySize => EmojifyError::InvalidDisplaySize,
            e @ emojify::EmojifyError::AssetError { .. } => EmojifyError::AssetError {
                message: e.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum Expression {
    Smiling,
    Frowning,
    LeftWink,
    RightWink,
    LeftWinkFrowning,
    RightWinkFrowning,
    ClosedEyesSmiling,
    ClosedEyesFrowning,
}

impl From<Expression> for emojify::Expression {
    fn from(expression: Expression) -> Self {
        match expression {
            Expression::Smiling => emojify::Expression::Smiling,
            Expression::Frowning => emojify::Expression::Frowning,
            Expression::LeftWink => emojify::Expression::LeftWink,
            Expression::RightWink => emojify::Expression::RightWink,
            Expression::LeftWinkFrowning => emojify::Expression::LeftWinkFrowning,
            Expression::RightWinkFrowning => emojify::Expression::RightWinkFrowning,
            Expression::ClosedEyesSmiling => emojify::Expression::ClosedEyesSmiling,
            Expression::ClosedEyesFrowning => emojify::Expression::ClosedEyesFrowning,
        }
    }
}

impl From<emojify::Expression> for Expression {
    fn from(expression: emojify::Expression) -> Self {
        match expression {
            emojify::Expression::Smiling => Expression::Smiling,
            emojify::Expression::Frowning => Expression::Frowning,
            emojify::Expression::LeftWink => Expression::LeftWink,
            emojify::Expression::RightWink => Expression::RightWink,
            emojify::Expression::LeftWinkFrowning => Expression::LeftWinkFrowning,
            emojify::Expression::RightWinkFrowning => Expression::RightWinkFrowning,
            emojify::Expression::ClosedEyesSmiling => Expression::ClosedEyesSmiling,
            emojify::Expression::ClosedEyesFrowning => Expression::ClosedEyesFrowning,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum OutputFormat {
    Jpeg,
    Png,
}

impl From<OutputFormat> for emojify::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Jpeg => emojify::OutputFormat::Jpeg,
            OutputFormat::Png => emojify::OutputFormat::Png,
        }
    }
}

impl From<emojify::OutputFormat> for OutputFormat {
    fn from(format: emojify::OutputFormat) -> Self {
        match format {
            emojify::OutputFormat::Jpeg => OutputFormat::Jpeg,
            emojify::OutputFormat::Png => OutputFormat::Png,
        }
    }
}

/// A face as reported by the platform vision library.
#[derive(Debug, Clone, uniffi::Record)]
pub struct DetectedFace {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub smiling_probability: f64,
    pub left_eye_open_probability: f64,
    pub right_eye_open_probability: f64,
}

impl From<DetectedFace> for emojify::FaceAttributes {
    fn from(face: DetectedFace) -> Self {
        emojify::FaceAttributes {
            bounds: emojify::FaceGeometry::new(face.x, face.y, face.width, face.height),
            smiling_probability: face.smiling_probability,
            left_eye_open_probability: face.left_eye_open_probability,
            right_eye_open_probability: face.right_eye_open_probability,
        }
    }
}

/// An encoded emoji graphic (PNG recommended) for one expression.
#[derive(uniffi::Record)]
pub struct EmojiAsset {
    pub expression: Expression,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, uniffi::Enum)]
pub enum Detection {
    Faces { count: u64 },
    NoFaces,
    DetectorUnavailable,
}

impl From<emojify::Detection> for Detection {
    fn from(detection: emojify::Detection) -> Self {
        match detection {
            emojify::Detection::Faces(count) => Detection::Faces {
                count: count as u64,
            },
            emojify::Detection::NoFaces => Detection::NoFaces,
            emojify::Detection::DetectorUnavailable => Detection::DetectorUnavailable,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct OverlayPlacement {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, uniffi::Enum)]
pub enum OverlayStatus {
    Drawn { placement: OverlayPlacement },
    MissingEmoji,
    TooSmall,
    Oversized,
}

impl From<emojify::OverlayStatus> for OverlayStatus {
    fn from(status: emojify::OverlayStatus) -> Self {
        match status {
            emojify::OverlayStatus::Drawn(p) => OverlayStatus::Drawn {
                placement: OverlayPlacement {
                    x: p.x,
                    y: p.y,
                    width: p.width,
                    height: p.height,
                },
            },
            emojify::OverlayStatus::MissingEmoji => OverlayStatus::MissingEmoji,
            emojify::OverlayStatus::TooSmall => OverlayStatus::TooSmall,
            emojify::OverlayStatus::Oversized => OverlayStatus::Oversized,
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FaceReport {
    pub expression: Expression,
    pub overlay: OverlayStatus,
}

#[derive(uniffi::Record)]
pub struct EmojifiedPhoto {
    pub data: Vec<u8>,
    pub format: OutputFormat,
    pub width: u32,
    pub height: u32,
    pub original_size: u64,
    pub detection: Detection,
    pub faces: Vec<FaceReport>,
}

impl From<emojify::EmojifiedPhoto> for EmojifiedPhoto {
    fn from(result: emojify::EmojifiedPhoto) -> Self {
        EmojifiedPhoto {
            data: result.data,
            format: result.format.into(),
            width: result.width,
            height: result.height,
            original_size: result.original_size as u64,
            detection: result.detection.into(),
            faces: result
                .faces
                .into_iter()
                .map(|report| FaceReport {
                    expression: report.expression.into(),
                    overlay: report.overlay.into(),
                })
                .collect(),
        }
    }
}

fn emoji_set(emojis: Vec<EmojiAsset>) -> Result<emojify::EmojiSet, emojify::EmojifyError> {
    emojify::EmojiSet::from_encoded(
        emojis
            .into_iter()
            .map(|asset| (asset.expression.into(), asset.data)),
    )
}

/// Classify a single face with the default thresholds.
#[uniffi::export]
pub fn classify_face(face: DetectedFace) -> Expression {
    emojify::classify(&face.into()).into()
}

/// Overlay emoji on a photo, one per face, in the order given.
#[uniffi::export]
pub fn emojify_photo(
    input: Vec<u8>,
    faces: Vec<DetectedFace>,
    emojis: Vec<EmojiAsset>,
    format: OutputFormat,
    quality: f32,
) -> Result<EmojifiedPhoto, EmojifyError> {
    let result = emojify::Emojifier::new(input)?
        .emojis(emoji_set(emojis)?)
        .faces(faces.into_iter().map(Into::into).collect())
        .format(format.into())
        .quality(quality)
        .process()?;

    Ok(result.into())
}

/// Like [`emojify_photo`], but subsamples the photo for a display of the
/// given size first. Face coordinates must be relative to the subsampled
/// photo.
#[uniffi::export]
pub fn emojify_photo_for_display(
    input: Vec<u8>,
    faces: Vec<DetectedFace>,
    emojis: Vec<EmojiAsset>,
    format: OutputFormat,
    quality: f32,
    display_width: u32,
    display_height: u32,
) -> Result<EmojifiedPhoto, EmojifyError> {
    let result = emojify::Emojifier::new(input)?
        .emojis(emoji_set(emojis)?)
        .faces(faces.into_iter().map(Into::into).collect())
        .display_size(display_width, display_height)
        .format(format.into())
        .quality(quality)
        .process()?;

    Ok(result.into())
}
