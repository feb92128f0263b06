//! Speed-adaptive exponential smoothing of hand landmarks.
//!
//! Every landmark index has its own persisted point. The blend coefficient is
//! derived from how far that point moved in the image plane since the last
//! frame: slow drift is heavily smoothed, fast motion passes through with
//! little lag.

use crate::mapping_engine::constants::{
    NUM_LANDMARKS, SMOOTHING_ALPHA_MAX, SMOOTHING_ALPHA_MIN, SMOOTHING_SPEED_GAIN,
};
use crate::mapping_engine::landmarks::LandmarkPoint;

/// Blend weight given to the previous smoothed value for a displacement `d`.
pub fn adaptive_alpha(displacement: f32) -> f32 {
    (SMOOTHING_ALPHA_MAX - displacement * SMOOTHING_SPEED_GAIN)
        .clamp(SMOOTHING_ALPHA_MIN, SMOOTHING_ALPHA_MAX)
}

/// Persisted smoothing state, one point per landmark index.
///
/// State starts at the origin, so the very first frame jumps most of the way
/// from there to the hand.
#[derive(Debug, Clone)]
pub struct SmoothingFilter {
    state: [LandmarkPoint; NUM_LANDMARKS],
}

impl SmoothingFilter {
    pub fn new() -> Self {
        Self {
            state: [LandmarkPoint::ORIGIN; NUM_LANDMARKS],
        }
    }

    /// Smooths one landmark and stores the result as the new state for `index`.
    pub fn smooth(&mut self, index: usize, raw: LandmarkPoint) -> LandmarkPoint {
        let previous = self.state[index];
        let alpha = adaptive_alpha(raw.distance_2d(&previous));
        let blend = |prev: f32, cur: f32| prev * alpha + cur * (1.0 - alpha);

        let smoothed = LandmarkPoint {
            x: blend(previous.x, raw.x),
            y: blend(previous.y, raw.y),
            z: blend(previous.z, raw.z),
        };
        self.state[index] = smoothed;
        smoothed
    }

    /// Smooths a full hand, index by index.
    pub fn smooth_all(
        &mut self,
        raw: &[LandmarkPoint; NUM_LANDMARKS],
    ) -> [LandmarkPoint; NUM_LANDMARKS] {
        std::array::from_fn(|i| self.smooth(i, raw[i]))
    }

    /// Current persisted point for `index`.
    pub fn state(&self, index: usize) -> LandmarkPoint {
        self.state[index]
    }

    /// Returns every index to the origin.
    pub fn reset(&mut self) {
        self.state = [LandmarkPoint::ORIGIN; NUM_LANDMARKS];
    }
}

impl Default for SmoothingFilter {
    fn default() -> Self {
        Self::new()
    }
}
