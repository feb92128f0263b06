//! Tracker input types.
//!
//! A [`HandFrame`] can only be built through validation, so everything past
//! this module may assume exactly 21 finite landmarks and a known label.

use std::str::FromStr;

use crate::mapping_engine::constants::NUM_LANDMARKS;
use crate::mapping_engine::errors::FrameError;

/// One tracked point in normalized image space.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LandmarkPoint {
    /// Horizontal position (0.0 to 1.0).
    pub x: f32,
    /// Vertical position (0.0 at the top, 1.0 at the bottom).
    pub y: f32,
    /// Depth relative to the wrist.
    pub z: f32,
}

impl LandmarkPoint {
    pub const ORIGIN: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance in the image plane, ignoring depth.
    pub fn distance_2d(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Which physical hand a set of landmarks belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl FromStr for Handedness {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            _ => Err(FrameError::UnknownHandedness(s.to_string())),
        }
    }
}

/// A validated hand: 21 finite landmarks plus the tracker's handedness label.
#[derive(Debug, Clone, PartialEq)]
pub struct HandFrame {
    landmarks: [LandmarkPoint; NUM_LANDMARKS],
    handedness: Handedness,
}

impl HandFrame {
    /// Validates tracker output for one hand.
    ///
    /// `handedness` is the label exactly as the tracker reported it.
    pub fn new(points: &[LandmarkPoint], handedness: Handedness) -> Result<Self, FrameError> {
        let landmarks: [LandmarkPoint; NUM_LANDMARKS] =
            points.try_into().map_err(|_| FrameError::WrongLandmarkCount {
                expected: NUM_LANDMARKS,
                actual: points.len(),
            })?;

        if let Some(index) = landmarks.iter().position(|p| !p.is_finite()) {
            return Err(FrameError::NonFiniteCoordinate { index });
        }

        Ok(Self {
            landmarks,
            handedness,
        })
    }

    /// Like [`HandFrame::new`] but parses the tracker's label string.
    pub fn from_label(points: &[LandmarkPoint], label: &str) -> Result<Self, FrameError> {
        Self::new(points, label.parse()?)
    }

    pub fn landmarks(&self) -> &[LandmarkPoint; NUM_LANDMARKS] {
        &self.landmarks
    }

    pub fn landmark(&self, index: usize) -> LandmarkPoint {
        self.landmarks[index]
    }

    /// The label as reported by the tracker (camera-mirrored).
    pub fn tracker_handedness(&self) -> Handedness {
        self.handedness
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn flat_hand(x: f32, y: f32) -> Vec<LandmarkPoint> {
        vec![LandmarkPoint::new(x, y, 0.0); NUM_LANDMARKS]
    }

    #[test]
    fn test_distance_2d_ignores_depth() {
        let a = LandmarkPoint::new(0.0, 0.0, 5.0);
        let b = LandmarkPoint::new(0.3, 0.4, -5.0);
        assert!((a.distance_2d(&b) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_handedness_parse_is_case_insensitive() {
        assert_eq!("Left".parse::<Handedness>().unwrap(), Handedness::Left);
        assert_eq!(" RIGHT ".parse::<Handedness>().unwrap(), Handedness::Right);
        assert!(matches!(
            "both".parse::<Handedness>(),
            Err(FrameError::UnknownHandedness(_))
        ));
    }

    #[test]
    fn test_hand_frame_accepts_21_points() {
        let frame = HandFrame::from_label(&flat_hand(0.5, 0.5), "Right").unwrap();
        assert_eq!(frame.tracker_handedness(), Handedness::Right);
        assert_eq!(frame.landmark(8), LandmarkPoint::new(0.5, 0.5, 0.0));
    }

    #[test]
    fn test_hand_frame_rejects_short_input() {
        let points = vec![LandmarkPoint::default(); 20];
        let result = HandFrame::new(&points, Handedness::Left);
        assert_eq!(
            result,
            Err(FrameError::WrongLandmarkCount {
                expected: 21,
                actual: 20
            })
        );
    }

    #[test]
    fn test_hand_frame_rejects_non_finite() {
        let mut points = flat_hand(0.5, 0.5);
        points[7].y = f32::NAN;
        assert_eq!(
            HandFrame::new(&points, Handedness::Left),
            Err(FrameError::NonFiniteCoordinate { index: 7 })
        );

        points[7].y = 0.5;
        points[3].z = f32::INFINITY;
        assert_eq!(
            HandFrame::new(&points, Handedness::Left),
            Err(FrameError::NonFiniteCoordinate { index: 3 })
        );
    }
}
