//! Per-frame assignment of tracked hands to control roles.
//!
//! The tracker labels hands as if the image were a mirror: the hand it calls
//! "Left" is the performer's right hand when they face the camera. That
//! inversion lives in [`user_hand`] and nowhere else.

use std::str::FromStr;

use crate::mapping_engine::errors::ConfigError;
use crate::mapping_engine::landmarks::{HandFrame, Handedness};

/// What a hand controls this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandRole {
    /// Melodic control of the main instrument.
    Primary,
    /// Percussion or the secondary instrument, depending on [`SecondaryMode`].
    Secondary,
}

/// Downstream behaviour for the secondary hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SecondaryMode {
    /// Open/close transitions fire percussion hits.
    #[default]
    Percussion,
    /// The hand's height plays a second sustained voice.
    SecondaryInstrument,
}

impl SecondaryMode {
    pub fn name(self) -> &'static str {
        match self {
            SecondaryMode::Percussion => "percussion",
            SecondaryMode::SecondaryInstrument => "secondary_instrument",
        }
    }
}

impl FromStr for SecondaryMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "percussion" | "drums" => Ok(SecondaryMode::Percussion),
            "secondary_instrument" | "secondaryinstrument" | "instrument" => {
                Ok(SecondaryMode::SecondaryInstrument)
            }
            _ => Err(ConfigError::UnknownSecondaryMode(s.to_string())),
        }
    }
}

/// The performer's physical hand for a label reported by the tracker.
pub fn user_hand(tracker_label: Handedness) -> Handedness {
    tracker_label.opposite()
}

/// Role of the performer's `hand` when `primary_hand` plays the melody.
pub fn role_for(hand: Handedness, primary_hand: Handedness) -> HandRole {
    if hand == primary_hand {
        HandRole::Primary
    } else {
        HandRole::Secondary
    }
}

/// Hands chosen for each role in one frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoleAssignment<'a> {
    pub primary: Option<&'a HandFrame>,
    pub secondary: Option<&'a HandFrame>,
}

impl<'a> RoleAssignment<'a> {
    /// The first hand claiming a role keeps it; later claimants are dropped.
    pub fn assign(hands: &'a [HandFrame], primary_hand: Handedness) -> Self {
        let mut assignment = Self::default();
        for hand in hands {
            let role = role_for(user_hand(hand.tracker_handedness()), primary_hand);
            let slot = match role {
                HandRole::Primary => &mut assignment.primary,
                HandRole::Secondary => &mut assignment.secondary,
            };
            if slot.is_some() {
                log::debug!(
                    "ignoring extra {:?} hand (tracker label {})",
                    role,
                    hand.tracker_handedness().label()
                );
                continue;
            }
            *slot = Some(hand);
        }
        assignment
    }

    pub fn is_empty(&self) -> bool {
        self.primary.is_none() && self.secondary.is_none()
    }
}
