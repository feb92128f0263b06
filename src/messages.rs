//! Message definitions for communication with the gesture mapping engine.
//!
//! [`ControlMessage`] travels from the control surface into the engine through
//! a ring buffer; [`InstrumentCommand`] travels from the engine to whatever
//! drives the audio rendering engine.

use crate::mapping_engine::config::EngineConfig;
use crate::mapping_engine::dispatcher::SecondaryMode;
use crate::mapping_engine::gesture::GestureState;
use crate::mapping_engine::landmarks::Handedness;
use crate::mapping_engine::scale::{NoteNaming, Scale};

/// Configuration update emitted by the control surface.
///
/// Each message is applied as a whole before the next frame is processed.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlMessage {
    /// Select the quantization scale.
    SetScale(Scale),

    /// Set the root note (0 = C through 11 = B).
    SetRootNote(u8),

    /// Select what the secondary hand controls.
    SetSecondaryMode(SecondaryMode),

    /// Set the secondary instrument level in dB.
    SetSecondaryVolume(f32),

    /// Choose which of the performer's hands plays the melody.
    SetPrimaryHand(Handedness),

    /// Choose the note-name table used for display.
    SetNoteNaming(NoteNaming),

    /// Replace the whole configuration at once.
    Configure(EngineConfig),
}

/// Parameter update or trigger pushed to the audio rendering engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InstrumentCommand {
    /// Start the primary voice sounding.
    PrimaryAttack { frequency: f32, volume_db: f32 },

    /// Release the primary voice.
    PrimaryRelease,

    /// Primary frequency in Hz.
    SetFrequency(f32),

    /// Primary volume in dB.
    SetVolume(f32),

    /// Effect wetness (0.0 to 1.0).
    SetWetness(f32),

    /// Fire a percussion hit; `gesture` is the state the hand moved into.
    TriggerPercussion { gesture: GestureState },

    /// Start the secondary voice sounding.
    SecondaryAttack { frequency: f32, volume_db: f32 },

    /// Secondary frequency in Hz.
    SetSecondaryFrequency(f32),

    /// Secondary level in dB.
    SetSecondaryVolume(f32),

    /// Release the held secondary note.
    SecondaryRelease,
}

impl InstrumentCommand {
    /// Short tag used when handing commands to the host.
    pub fn kind(&self) -> &'static str {
        match self {
            InstrumentCommand::PrimaryAttack { .. } => "primary_attack",
            InstrumentCommand::PrimaryRelease => "primary_release",
            InstrumentCommand::SetFrequency(_) => "frequency",
            InstrumentCommand::SetVolume(_) => "volume",
            InstrumentCommand::SetWetness(_) => "wetness",
            InstrumentCommand::TriggerPercussion { .. } => "percussion",
            InstrumentCommand::SecondaryAttack { .. } => "secondary_attack",
            InstrumentCommand::SetSecondaryFrequency(_) => "secondary_frequency",
            InstrumentCommand::SetSecondaryVolume(_) => "secondary_volume",
            InstrumentCommand::SecondaryRelease => "secondary_release",
        }
    }
}
