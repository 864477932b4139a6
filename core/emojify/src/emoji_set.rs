use std::path::Path;

use image::RgbaImage;
use tracing::{debug, warn};

use crate::error::EmojifyError;
use crate::expression::Expression;

/// Emoji graphics, one per [`Expression`].
///
/// A complete set maps every expression to an image. Gaps are tolerated:
/// a face whose expression has no graphic is left without an overlay and
/// reported as such.
#[derive(Debug, Clone, Default)]
pub struct EmojiSet {
    slots: [Option<RgbaImage>; 8],
}

impl EmojiSet {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the graphic for `expression`, returning the one it replaces.
    pub fn insert(&mut self, expression: Expression, emoji: RgbaImage) -> Option<RgbaImage> {
        self.slots[expression.index()].replace(emoji)
    }

    /// Builder-style [`EmojiSet::insert`].
    pub fn with(mut self, expression: Expression, emoji: RgbaImage) -> Self {
        self.insert(expression, emoji);
        self
    }

    /// The graphic for `expression`, if any.
    pub fn get(&self, expression: Expression) -> Option<&RgbaImage> {
        self.slots[expression.index()].as_ref()
    }

    /// Whether every expression has a graphic.
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Expressions that have no graphic.
    pub fn missing(&self) -> Vec<Expression> {
        Expression::ALL
            .into_iter()
            .filter(|e| self.get(*e).is_none())
            .collect()
    }

    /// Load `<asset_name>.png` for every expression from `dir`
    /// (`smile.png`, `frown.png`, `leftwink.png`, ...).
    ///
    /// Missing files are logged and left as gaps; files that exist but fail
    /// to read or decode are errors.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, EmojifyError> {
        let dir = dir.as_ref();
        let mut set = Self::new();

        for expression in Expression::ALL {
            let path = dir.join(format!("{}.png", expression.asset_name()));
            if !path.is_file() {
                warn!(path = %path.display(), %expression, "emoji asset not found");
                continue;
            }

            let bytes = std::fs::read(&path).map_err(|e| EmojifyError::AssetError {
                path: path.clone(),
                message: e.to_string(),
            })?;
            let emoji = image::load_from_memory(&bytes)
                .map_err(|e| EmojifyError::AssetError {
                    path: path.clone(),
                    message: e.to_string(),
                })?
                .to_rgba8();

            debug!(
                path = %path.display(),
                width = emoji.width(),
                height = emoji.height(),
                "loaded emoji"
            );
            set.insert(expression, emoji);
        }

        Ok(set)
    }

    /// Decode in-memory encoded graphics (PNG, JPEG or WebP).
    pub fn from_encoded<I, B>(assets: I) -> Result<Self, EmojifyError>
    where
        I: IntoIterator<Item = (Expression, B)>,
        B: AsRef<[u8]>,
    {
        let mut set = Self::new();
        for (expression, bytes) in assets {
            let emoji = image::load_from_memory(bytes.as_ref())
                .map_err(|e| EmojifyError::DecodeError(format!("{expression}: {e}")))?
                .to_rgba8();
            set.insert(expression, emoji);
        }
        Ok(set)
    }
}
