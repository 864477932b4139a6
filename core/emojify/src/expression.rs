use std::fmt;

use tracing::debug;

use crate::face_detector::FaceAttributes;

/// Smiling probability above which a face counts as smiling.
pub const SMILING_PROB_THRESHOLD: f64 = 0.15;

/// Eye-open probability below which an eye counts as closed.
pub const EYE_OPEN_PROB_THRESHOLD: f64 = 0.5;

/// The eight expressions a face can be classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Expression {
    /// Smiling, both eyes open.
    Smiling,
    /// Not smiling, both eyes open.
    Frowning,
    /// Smiling, right eye closed.
    LeftWink,
    /// Smiling, left eye closed.
    RightWink,
    /// Not smiling, right eye closed.
    LeftWinkFrowning,
    /// Not smiling, left eye closed.
    RightWinkFrowning,
    /// Smiling, both eyes closed.
    ClosedEyesSmiling,
    /// Not smiling, both eyes closed.
    ClosedEyesFrowning,
}

impl Expression {
    /// Every expression, in a fixed order.
    pub const ALL: [Expression; 8] = [
        Expression::Smiling,
        Expression::Frowning,
        Expression::LeftWink,
        Expression::RightWink,
        Expression::LeftWinkFrowning,
        Expression::RightWinkFrowning,
        Expression::ClosedEyesSmiling,
        Expression::ClosedEyesFrowning,
    ];

    /// File stem of the emoji asset drawn for this expression.
    pub const fn asset_name(self) -> &'static str {
        match self {
            Expression::Smiling => "smile",
            Expression::Frowning => "frown",
            Expression::LeftWink => "leftwink",
            Expression::RightWink => "rightwink",
            Expression::LeftWinkFrowning => "leftwinkfrown",
            Expression::RightWinkFrowning => "rightwinkfrown",
            Expression::ClosedEyesSmiling => "closed_smile",
            Expression::ClosedEyesFrowning => "closed_frown",
        }
    }

    /// Position of this expression in [`Expression::ALL`].
    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.asset_name())
    }
}

/// Decision thresholds for [`Thresholds::classify`].
///
/// Both comparisons are strict: a smiling probability equal to `smiling`
/// is not smiling, and an eye-open probability equal to `eye_open` is open.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// Smiling probability must exceed this to count as smiling.
    pub smiling: f64,
    /// Eye-open probability must fall below this to count as closed.
    pub eye_open: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            smiling: SMILING_PROB_THRESHOLD,
            eye_open: EYE_OPEN_PROB_THRESHOLD,
        }
    }
}

impl Thresholds {
    /// Classify a face with these thresholds.
    pub fn classify(&self, face: &FaceAttributes) -> Expression {
        let smiling = face.smiling_probability > self.smiling;
        let left_closed = face.left_eye_open_probability < self.eye_open;
        let right_closed = face.right_eye_open_probability < self.eye_open;

        // Winks are checked before the both-closed case; with both eyes shut
        // there is no wink side to pick.
        let expression = match (smiling, left_closed, right_closed) {
            (true, true, false) => Expression::RightWink,
            (true, false, true) => Expression::LeftWink,
            (true, true, true) => Expression::ClosedEyesSmiling,
            (true, false, false) => Expression::Smiling,
            (false, true, false) => Expression::RightWinkFrowning,
            (false, false, true) => Expression::LeftWinkFrowning,
            (false, true, true) => Expression::ClosedEyesFrowning,
            (false, false, false) => Expression::Frowning,
        };

        debug!(
            smiling = face.smiling_probability,
            left_eye_open = face.left_eye_open_probability,
            right_eye_open = face.right_eye_open_probability,
            %expression,
            "classified face"
        );

        expression
    }
}

/// Classify a face with the default thresholds (0.15 smiling, 0.5 eye open).
pub fn classify(face: &FaceAttributes) -> Expression {
    Thresholds::default().classify(face)
}
