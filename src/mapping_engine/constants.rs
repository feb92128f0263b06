//! Mapping engine constants, ranges and landmark indices.

/// Number of landmarks the tracker reports per hand.
pub const NUM_LANDMARKS: usize = 21;

/// Palm center (wrist).
pub const WRIST: usize = 0;

/// Thumb base, two landmarks proximal to the thumb tip.
pub const THUMB_MCP: usize = 2;

/// Thumb tip; also one end of the pinch distance.
pub const THUMB_TIP: usize = 4;

/// Index finger base, two landmarks proximal to the index tip.
pub const INDEX_PIP: usize = 6;

/// Index fingertip; drives pitch and the other end of the pinch distance.
pub const INDEX_TIP: usize = 8;

/// Middle fingertip.
pub const MIDDLE_TIP: usize = 12;

/// Ring fingertip.
pub const RING_TIP: usize = 16;

/// Pinky fingertip.
pub const PINKY_TIP: usize = 20;

/// Fingertips of the four radial fingers (index, middle, ring, pinky).
pub const FINGER_TIPS: [usize; 4] = [INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];

/// A finger's "base" sits this many landmark indices proximal to its tip.
pub const FINGER_BASE_OFFSET: usize = 2;

/// Lowest primary instrument frequency in Hz.
pub const MIN_FREQ: f32 = 100.0;

/// Highest primary instrument frequency in Hz.
pub const MAX_FREQ: f32 = 1000.0;

/// Lowest secondary instrument frequency in Hz.
pub const SECONDARY_MIN_FREQ: f32 = 50.0;

/// Highest secondary instrument frequency in Hz.
pub const SECONDARY_MAX_FREQ: f32 = 500.0;

/// Minimum volume in dB (effectively silent).
pub const MIN_VOL: f32 = -40.0;

/// Maximum volume in dB.
pub const MAX_VOL: f32 = 0.0;

/// Minimum effect wetness.
pub const WETNESS_MIN: f32 = 0.0;

/// Maximum effect wetness.
pub const WETNESS_MAX: f32 = 1.0;

/// Thumb-index distance mapped to zero wetness.
pub const PINCH_DISTANCE_MIN: f32 = 0.05;

/// Thumb-index distance mapped to full wetness.
pub const PINCH_DISTANCE_MAX: f32 = 0.3;

/// Default secondary instrument level in dB.
pub const DEFAULT_SECONDARY_VOLUME_DB: f32 = -12.0;

/// Upper bound of the adaptive smoothing coefficient (slow motion).
pub const SMOOTHING_ALPHA_MAX: f32 = 0.5;

/// Lower bound of the adaptive smoothing coefficient (fast motion).
pub const SMOOTHING_ALPHA_MIN: f32 = 0.1;

/// How fast alpha falls off with per-frame displacement.
pub const SMOOTHING_SPEED_GAIN: f32 = 2.0;

/// Tip must be this much farther from the palm than its base to count as extended.
pub const FINGER_EXTENSION_RATIO: f32 = 1.1;

/// Thumb tip must be this much farther from the index base than the thumb base is.
pub const THUMB_EXTENSION_RATIO: f32 = 1.2;

/// Minimum number of extended fingers for an open hand.
pub const OPEN_FINGER_COUNT: usize = 3;

/// Reference pitch A4 in Hz.
pub const A4_FREQ: f32 = 440.0;

/// Semitone index of A within an octave starting at C.
pub const A4_SEMITONE: i32 = 9;

/// Octave number of the reference pitch.
pub const A4_OCTAVE: i32 = 4;

/// Capacity of the control (UI -> engine) ring buffer.
pub const CONTROL_QUEUE_CAPACITY: usize = 64;

/// Capacity of the command (engine -> audio) ring buffer.
pub const COMMAND_QUEUE_CAPACITY: usize = 1024;
