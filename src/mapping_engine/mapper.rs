//! Interval remapping from hand geometry to instrument parameters.

use crate::mapping_engine::constants::{
    INDEX_TIP, MAX_FREQ, MAX_VOL, MIN_FREQ, MIN_VOL, PINCH_DISTANCE_MAX, PINCH_DISTANCE_MIN,
    SECONDARY_MAX_FREQ, SECONDARY_MIN_FREQ, THUMB_TIP, WETNESS_MAX, WETNESS_MIN,
};
use crate::mapping_engine::landmarks::LandmarkPoint;

/// Affine map of `value` from `[in_min, in_max]` onto `[out_min, out_max]`.
///
/// The result is not clamped. `in_min` and `in_max` must differ.
pub fn map_range(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    debug_assert!(in_min != in_max, "map_range called with an empty input interval");
    (value - in_min) * (out_max - out_min) / (in_max - in_min) + out_min
}

/// Raw (unquantized) primary pitch from the index fingertip's horizontal position.
pub fn primary_frequency(index_tip: LandmarkPoint) -> f32 {
    map_range(index_tip.x, 0.0, 1.0, MIN_FREQ, MAX_FREQ).clamp(MIN_FREQ, MAX_FREQ)
}

/// Primary volume in dB from the thumb tip's height; the top of the frame is loudest.
pub fn primary_volume_db(thumb_tip: LandmarkPoint) -> f32 {
    map_range(thumb_tip.y, 0.0, 1.0, MAX_VOL, MIN_VOL).clamp(MIN_VOL, MAX_VOL)
}

/// Effect wetness from the thumb-index pinch distance.
pub fn wetness(thumb_tip: LandmarkPoint, index_tip: LandmarkPoint) -> f32 {
    let distance = thumb_tip.distance_2d(&index_tip);
    map_range(
        distance,
        PINCH_DISTANCE_MIN,
        PINCH_DISTANCE_MAX,
        WETNESS_MIN,
        WETNESS_MAX,
    )
    .clamp(WETNESS_MIN, WETNESS_MAX)
}

/// Raw secondary pitch from the index fingertip's height; a raised hand plays higher.
pub fn secondary_frequency(index_tip: LandmarkPoint) -> f32 {
    map_range(index_tip.y, 0.0, 1.0, SECONDARY_MAX_FREQ, SECONDARY_MIN_FREQ)
        .clamp(SECONDARY_MIN_FREQ, SECONDARY_MAX_FREQ)
}

/// Clamps a configured level into the instrument's volume range.
pub fn clamp_volume_db(volume_db: f32) -> f32 {
    volume_db.clamp(MIN_VOL, MAX_VOL)
}

/// Unquantized parameters derived from one primary hand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrimaryParams {
    pub raw_frequency: f32,
    pub volume_db: f32,
    pub wetness: f32,
}

impl PrimaryParams {
    pub fn from_landmarks(landmarks: &[LandmarkPoint]) -> Self {
        let index_tip = landmarks[INDEX_TIP];
        let thumb_tip = landmarks[THUMB_TIP];
        Self {
            raw_frequency: primary_frequency(index_tip),
            volume_db: primary_volume_db(thumb_tip),
            wetness: wetness(thumb_tip, index_tip),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(x: f32, y: f32) -> LandmarkPoint {
        LandmarkPoint::new(x, y, 0.0)
    }

    #[test]
    fn test_map_range_reference_values() {
        assert!((map_range(0.5, 0.0, 1.0, 100.0, 1000.0) - 550.0).abs() < 1e-3);
        assert!((map_range(0.0, 0.0, 1.0, -40.0, 0.0) - -40.0).abs() < 1e-6);
    }

    #[test]
    fn test_map_range_inverted_output() {
        assert!((map_range(0.25, 0.0, 1.0, 0.0, -40.0) - -10.0).abs() < 1e-6);
    }

    #[test]
    fn test_map_range_does_not_clamp() {
        assert!((map_range(2.0, 0.0, 1.0, 0.0, 10.0) - 20.0).abs() < 1e-6);
    }

    #[test]
    #[should_panic]
    #[cfg(debug_assertions)]
    fn test_map_range_empty_interval_panics_in_debug() {
        map_range(0.5, 1.0, 1.0, 0.0, 1.0);
    }

    #[test]
    fn test_primary_frequency_is_clamped() {
        assert!((primary_frequency(at(0.5, 0.0)) - 550.0).abs() < 1e-3);
        assert_eq!(primary_frequency(at(-0.2, 0.0)), MIN_FREQ);
        assert_eq!(primary_frequency(at(1.3, 0.0)), MAX_FREQ);
    }

    #[test]
    fn test_primary_volume_top_is_loud() {
        assert!((primary_volume_db(at(0.0, 0.0)) - MAX_VOL).abs() < 1e-6);
        assert!((primary_volume_db(at(0.0, 1.0)) - MIN_VOL).abs() < 1e-6);
        assert!((primary_volume_db(at(0.0, 0.5)) - -20.0).abs() < 1e-6);
        assert_eq!(primary_volume_db(at(0.0, 1.5)), MIN_VOL);
    }

    #[test]
    fn test_wetness_from_pinch() {
        assert_eq!(wetness(at(0.5, 0.5), at(0.5, 0.52)), 0.0);
        assert!((wetness(at(0.5, 0.5), at(0.5, 0.675)) - 0.5).abs() < 1e-4);
        assert_eq!(wetness(at(0.1, 0.1), at(0.9, 0.9)), 1.0);
    }

    #[test]
    fn test_secondary_frequency_rises_with_hand() {
        assert!((secondary_frequency(at(0.0, 0.0)) - SECONDARY_MAX_FREQ).abs() < 1e-3);
        assert!((secondary_frequency(at(0.0, 1.0)) - SECONDARY_MIN_FREQ).abs() < 1e-3);
        assert!(secondary_frequency(at(0.0, 0.2)) > secondary_frequency(at(0.0, 0.8)));
    }

    #[test]
    fn test_clamp_volume_db() {
        assert_eq!(clamp_volume_db(6.0), MAX_VOL);
        assert_eq!(clamp_volume_db(-90.0), MIN_VOL);
        assert_eq!(clamp_volume_db(-12.0), -12.0);
    }
}
