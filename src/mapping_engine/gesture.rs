//! Hand-openness classification and edge-triggered gesture events.

use crate::mapping_engine::constants::{
    FINGER_BASE_OFFSET, FINGER_EXTENSION_RATIO, FINGER_TIPS, INDEX_PIP, NUM_LANDMARKS,
    OPEN_FINGER_COUNT, THUMB_EXTENSION_RATIO, THUMB_MCP, THUMB_TIP, WRIST,
};
use crate::mapping_engine::landmarks::LandmarkPoint;

/// Whether the hand is spread or fisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureState {
    Open,
    Closed,
}

impl GestureState {
    pub fn label(self) -> &'static str {
        match self {
            GestureState::Open => "open",
            GestureState::Closed => "closed",
        }
    }
}

/// Number of extended digits, thumb included.
pub fn extended_finger_count(landmarks: &[LandmarkPoint; NUM_LANDMARKS]) -> usize {
    let palm = landmarks[WRIST];

    let fingers = FINGER_TIPS
        .iter()
        .filter(|&&tip| {
            let base = landmarks[tip - FINGER_BASE_OFFSET];
            landmarks[tip].distance_2d(&palm) > FINGER_EXTENSION_RATIO * base.distance_2d(&palm)
        })
        .count();

    // The thumb folds across the palm rather than toward it.
    let index_base = landmarks[INDEX_PIP];
    let thumb_extended = landmarks[THUMB_TIP].distance_2d(&index_base)
        > landmarks[THUMB_MCP].distance_2d(&index_base) * THUMB_EXTENSION_RATIO;

    fingers + usize::from(thumb_extended)
}

/// Classifies one hand from scratch; no history is consulted.
pub fn classify(landmarks: &[LandmarkPoint; NUM_LANDMARKS]) -> GestureState {
    if extended_finger_count(landmarks) >= OPEN_FINGER_COUNT {
        GestureState::Open
    } else {
        GestureState::Closed
    }
}

/// Remembers the last classified state and reports transitions only.
#[derive(Debug, Clone, Default)]
pub struct EdgeTrigger {
    last: Option<GestureState>,
}

impl EdgeTrigger {
    pub fn new() -> Self {
        Self { last: None }
    }

    /// Records `state` and returns it if it differs from the previous one.
    ///
    /// The first observation after a reset only primes the trigger.
    pub fn update(&mut self, state: GestureState) -> Option<GestureState> {
        let previous = self.last.replace(state);
        match previous {
            Some(prev) if prev != state => Some(state),
            _ => None,
        }
    }

    pub fn last(&self) -> Option<GestureState> {
        self.last
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    const PALM: LandmarkPoint = LandmarkPoint {
        x: 0.5,
        y: 0.8,
        z: 0.0,
    };

    /// Builds a hand whose finger landmarks sit at `reach` above the palm and
    /// whose tips sit at `tip_reach`.
    fn hand(reach: f32, tip_reach: f32, thumb_out: bool) -> [LandmarkPoint; NUM_LANDMARKS] {
        let mut points = [PALM; NUM_LANDMARKS];
        for (finger, &tip) in FINGER_TIPS.iter().enumerate() {
            let x = 0.4 + finger as f32 * 0.06;
            for joint in (tip - 3)..tip {
                points[joint] = LandmarkPoint::new(x, PALM.y - reach, 0.0);
            }
            points[tip] = LandmarkPoint::new(x, PALM.y - tip_reach, 0.0);
        }

        points[1] = LandmarkPoint::new(0.45, 0.75, 0.0);
        points[THUMB_MCP] = LandmarkPoint::new(0.42, 0.72, 0.0);
        points[3] = LandmarkPoint::new(0.40, 0.69, 0.0);
        points[THUMB_TIP] = if thumb_out {
            LandmarkPoint::new(0.25, 0.65, 0.0)
        } else {
            LandmarkPoint::new(0.43, 0.66, 0.0)
        };
        points
    }

    pub(crate) fn open_hand() -> [LandmarkPoint; NUM_LANDMARKS] {
        hand(0.15, 0.4, true)
    }

    pub(crate) fn closed_hand() -> [LandmarkPoint; NUM_LANDMARKS] {
        hand(0.15, 0.05, false)
    }

    #[test]
    fn test_open_hand_classified_open() {
        let points = open_hand();
        assert_eq!(extended_finger_count(&points), 5);
        assert_eq!(classify(&points), GestureState::Open);
    }

    #[test]
    fn test_fist_classified_closed() {
        let points = closed_hand();
        assert_eq!(extended_finger_count(&points), 0);
        assert_eq!(classify(&points), GestureState::Closed);
    }

    #[test]
    fn test_three_fingers_is_open_two_is_closed() {
        let mut points = closed_hand();
        // extend index and middle
        points[8].y = PALM.y - 0.4;
        points[12].y = PALM.y - 0.4;
        assert_eq!(extended_finger_count(&points), 2);
        assert_eq!(classify(&points), GestureState::Closed);

        points[16].y = PALM.y - 0.4;
        assert_eq!(classify(&points), GestureState::Open);
    }

    #[test]
    fn test_thumb_counts_toward_open() {
        let mut points = closed_hand();
        points[8].y = PALM.y - 0.4;
        points[12].y = PALM.y - 0.4;
        points[THUMB_TIP] = LandmarkPoint::new(0.25, 0.65, 0.0);
        assert_eq!(extended_finger_count(&points), 3);
        assert_eq!(classify(&points), GestureState::Open);
    }

    #[test]
    fn test_thumb_measured_against_index_base() {
        let mut points = closed_hand();
        points[8].y = PALM.y - 0.4;
        points[12].y = PALM.y - 0.4;
        // knuckle (5) hugs the thumb tip while the index base (6) stays away
        points[THUMB_TIP] = LandmarkPoint::new(0.30, 0.70, 0.0);
        points[5] = LandmarkPoint::new(0.31, 0.70, 0.0);
        assert_eq!(extended_finger_count(&points), 3);
        assert_eq!(classify(&points), GestureState::Open);
    }

    #[test]
    fn test_finger_base_is_two_joints_proximal() {
        let points = open_hand();
        assert_eq!(8 - FINGER_BASE_OFFSET, INDEX_PIP);
        assert!(points[8].distance_2d(&PALM) > points[INDEX_PIP].distance_2d(&PALM));
    }

    #[test]
    fn test_edge_trigger_fires_on_transitions_only() {
        use GestureState::{Closed, Open};

        let mut trigger = EdgeTrigger::new();
        let fired: Vec<usize> = [Open, Open, Open, Closed, Closed, Open]
            .into_iter()
            .enumerate()
            .filter_map(|(i, s)| trigger.update(s).map(|_| i))
            .collect();
        assert_eq!(fired, vec![3, 5]);
        assert_eq!(trigger.last(), Some(Open));
    }

    #[test]
    fn test_edge_trigger_reports_new_state() {
        let mut trigger = EdgeTrigger::new();
        assert_eq!(trigger.update(GestureState::Closed), None);
        assert_eq!(
            trigger.update(GestureState::Open),
            Some(GestureState::Open)
        );
        assert_eq!(
            trigger.update(GestureState::Closed),
            Some(GestureState::Closed)
        );
    }

    #[test]
    fn test_edge_trigger_reset_reprimes() {
        let mut trigger = EdgeTrigger::new();
        trigger.update(GestureState::Open);
        trigger.reset();
        assert_eq!(trigger.last(), None);
        assert_eq!(trigger.update(GestureState::Closed), None);
    }
}
