//! Session configuration written by the control surface.

use crate::mapping_engine::constants::DEFAULT_SECONDARY_VOLUME_DB;
use crate::mapping_engine::dispatcher::SecondaryMode;
use crate::mapping_engine::errors::ConfigError;
use crate::mapping_engine::landmarks::Handedness;
use crate::mapping_engine::scale::{NoteNaming, Scale};

/// Scale and root read by the quantizer on every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QuantizationContext {
    pub scale: Scale,
    /// Root note semitone, 0 = C through 11 = B.
    pub root_note: u8,
}

impl QuantizationContext {
    pub fn quantize(&self, frequency: f32) -> f32 {
        self.scale.quantize(frequency, self.root_note)
    }
}

/// Everything the engine reads from outside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    pub quantization: QuantizationContext,
    pub secondary_mode: SecondaryMode,
    /// Level of the secondary instrument in dB.
    pub secondary_volume_db: f32,
    /// The performer's hand that plays the melody.
    pub primary_hand: Handedness,
    pub note_naming: NoteNaming,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            quantization: QuantizationContext::default(),
            secondary_mode: SecondaryMode::default(),
            secondary_volume_db: DEFAULT_SECONDARY_VOLUME_DB,
            primary_hand: Handedness::Right,
            note_naming: NoteNaming::default(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_root_note(self.quantization.root_note)?;
        validate_volume(self.secondary_volume_db)?;
        Ok(())
    }
}

pub fn validate_root_note(root_note: u8) -> Result<u8, ConfigError> {
    if root_note < 12 {
        Ok(root_note)
    } else {
        Err(ConfigError::RootNoteOutOfRange(root_note))
    }
}

pub fn validate_volume(volume_db: f32) -> Result<f32, ConfigError> {
    if volume_db.is_finite() {
        Ok(volume_db)
    } else {
        Err(ConfigError::NonFiniteVolume(volume_db))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.quantization.scale, Scale::Chromatic);
        assert_eq!(config.quantization.root_note, 0);
        assert_eq!(config.secondary_mode, SecondaryMode::Percussion);
        assert_eq!(config.primary_hand, Handedness::Right);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_root() {
        let mut config = EngineConfig::default();
        config.quantization.root_note = 12;
        assert_eq!(config.validate(), Err(ConfigError::RootNoteOutOfRange(12)));
    }

    #[test]
    fn test_validate_rejects_nan_volume() {
        assert!(matches!(
            validate_volume(f32::NAN),
            Err(ConfigError::NonFiniteVolume(_))
        ));
        assert_eq!(validate_volume(-6.0), Ok(-6.0));
    }

    #[test]
    fn test_context_quantize() {
        let context = QuantizationContext {
            scale: Scale::Major,
            root_note: 0,
        };
        assert!((context.quantize(450.0) - 440.0).abs() < 1e-3);
    }
}
