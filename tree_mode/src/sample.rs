//! Classified hand samples — the input side of the interpreter.
//!
//! A [`HandSample`] is produced once per capture frame by whatever
//! classifies the hand (LeapMotion, a camera model, the keyboard
//! simulator).  Everything here is `Copy`; nothing is retained past the
//! decision cycle except the last accepted sample.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

// ════════════════════════════════════════════════════════════════════════════
// SampleError
// ════════════════════════════════════════════════════════════════════════════

/// Rejection of a sample at the classifier boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SampleError {
    #[error("unknown gesture label \"{0}\"")]
    UnknownGesture(String),

    #[error("cursor {axis} = {value} is outside [0, 1]")]
    CursorOutOfRange { axis: char, value: f32 },

    #[error("rotation is not a finite number")]
    NonFiniteRotation,
}

// ════════════════════════════════════════════════════════════════════════════
// Gesture
// ════════════════════════════════════════════════════════════════════════════

/// One of the eight hand poses the classifier can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Gesture {
    #[default]
    None,
    ClosedFist,
    OpenPalm,
    PointingUp,
    ThumbUp,
    ThumbDown,
    Victory,
    ILoveYou,
}

impl Gesture {
    pub const ALL: [Gesture; 8] = [
        Gesture::None,
        Gesture::ClosedFist,
        Gesture::OpenPalm,
        Gesture::PointingUp,
        Gesture::ThumbUp,
        Gesture::ThumbDown,
        Gesture::Victory,
        Gesture::ILoveYou,
    ];

    /// The classifier's wire label for this gesture.
    pub fn label(self) -> &'static str {
        match self {
            Gesture::None       => "None",
            Gesture::ClosedFist => "Closed_Fist",
            Gesture::OpenPalm   => "Open_Palm",
            Gesture::PointingUp => "Pointing_Up",
            Gesture::ThumbUp    => "Thumb_Up",
            Gesture::ThumbDown  => "Thumb_Down",
            Gesture::Victory    => "Victory",
            Gesture::ILoveYou   => "ILoveYou",
        }
    }

    /// Parse a classifier label.  Anything outside the eight known labels
    /// is rejected here so the interpreter never sees it.
    pub fn from_label(label: &str) -> Result<Self, SampleError> {
        Gesture::ALL
            .iter()
            .copied()
            .find(|g| g.label() == label)
            .ok_or_else(|| SampleError::UnknownGesture(label.to_string()))
    }
}

impl FromStr for Gesture {
    type Err = SampleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Gesture::from_label(s)
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Cursor
// ════════════════════════════════════════════════════════════════════════════

/// Normalised hand cursor, both axes in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor {
    pub x: f32,
    pub y: f32,
}

impl Cursor {
    pub const CENTER: Cursor = Cursor { x: 0.5, y: 0.5 };
}

// ════════════════════════════════════════════════════════════════════════════
// HandSample
// ════════════════════════════════════════════════════════════════════════════

/// One classified frame of hand state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandSample {
    pub gesture:     Gesture,
    pub cursor_x:    f32,
    pub cursor_y:    f32,
    pub is_pinching: bool,
    /// Approximate hand roll, radians.
    pub rotation:    f32,
}

impl HandSample {
    /// Build a sample, enforcing the classifier contract on the numeric
    /// fields.
    pub fn new(
        gesture: Gesture,
        cursor_x: f32,
        cursor_y: f32,
        is_pinching: bool,
        rotation: f32,
    ) -> Result<Self, SampleError> {
        check_unit('x', cursor_x)?;
        check_unit('y', cursor_y)?;
        if !rotation.is_finite() {
            return Err(SampleError::NonFiniteRotation);
        }
        Ok(HandSample { gesture, cursor_x, cursor_y, is_pinching, rotation })
    }

    /// No hand pose, centred cursor, not pinching.
    pub const fn idle() -> Self {
        HandSample {
            gesture:     Gesture::None,
            cursor_x:    0.5,
            cursor_y:    0.5,
            is_pinching: false,
            rotation:    0.0,
        }
    }

    /// Shorthand for a sample that only carries a gesture.
    pub fn gesture(gesture: Gesture) -> Self {
        HandSample { gesture, ..HandSample::idle() }
    }

    /// Shorthand for a pinching sample with no gesture label.
    pub fn pinch() -> Self {
        HandSample { is_pinching: true, ..HandSample::idle() }
    }

    pub fn cursor(&self) -> Cursor {
        Cursor { x: self.cursor_x, y: self.cursor_y }
    }
}

impl Default for HandSample {
    fn default() -> Self { HandSample::idle() }
}

fn check_unit(axis: char, value: f32) -> Result<(), SampleError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SampleError::CursorOutOfRange { axis, value })
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_parse_back() {
        for g in Gesture::ALL {
            assert_eq!(g.label().parse::<Gesture>(), Ok(g));
        }
    }

    #[test]
    fn unknown_label_rejected() {
        let err = Gesture::from_label("Middle_Finger").unwrap_err();
        assert_eq!(err, SampleError::UnknownGesture("Middle_Finger".into()));
        assert!(Gesture::from_label("closed_fist").is_err());
    }

    #[test]
    fn cursor_outside_unit_range_rejected() {
        assert!(matches!(
            HandSample::new(Gesture::None, 1.2, 0.5, false, 0.0),
            Err(SampleError::CursorOutOfRange { axis: 'x', .. })
        ));
        assert!(matches!(
            HandSample::new(Gesture::None, 0.5, f32::NAN, false, 0.0),
            Err(SampleError::CursorOutOfRange { axis: 'y', .. })
        ));
    }

    #[test]
    fn rotation_must_be_finite() {
        assert_eq!(
            HandSample::new(Gesture::OpenPalm, 0.0, 1.0, false, f32::INFINITY),
            Err(SampleError::NonFiniteRotation)
        );
    }

    #[test]
    fn edges_of_unit_range_accepted() {
        let s = HandSample::new(Gesture::Victory, 0.0, 1.0, true, -3.0).unwrap();
        assert_eq!(s.cursor(), Cursor { x: 0.0, y: 1.0 });
        assert!(s.is_pinching);
    }

    #[test]
    fn idle_is_default() {
        let s = HandSample::default();
        assert_eq!(s.gesture, Gesture::None);
        assert_eq!(s.cursor(), Cursor::CENTER);
        assert!(!s.is_pinching);
    }
}
