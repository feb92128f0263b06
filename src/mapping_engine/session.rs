//! Session Module
//!
//! This module wires a mapping session together:
//! - Logger initialisation
//! - Ring buffers for control updates (UI -> engine) and commands (engine -> audio)
//! - The validating [`ControlHandle`] used by the control surface

use env_logger::{Builder, Env};
use rtrb::{Consumer, Producer, RingBuffer};

use crate::mapping_engine::config::{EngineConfig, validate_root_note, validate_volume};
use crate::mapping_engine::constants::{COMMAND_QUEUE_CAPACITY, CONTROL_QUEUE_CAPACITY};
use crate::mapping_engine::dispatcher::SecondaryMode;
use crate::mapping_engine::engine::MappingEngine;
use crate::mapping_engine::errors::ControlError;
use crate::mapping_engine::landmarks::Handedness;
use crate::mapping_engine::scale::{NoteNaming, Scale};
use crate::mapping_engine::sink::RingSink;
use crate::messages::{ControlMessage, InstrumentCommand};

/// Everything a host needs to drive one mapping session.
pub struct SessionHandle {
    pub engine: MappingEngine,
    pub controls: ControlHandle,
    pub sink: RingSink,
    pub commands: Consumer<InstrumentCommand>,
}

/// Setup and configure the logger for engine diagnostics
pub fn setup_logger() {
    // Per-frame messages are debug level; `RUST_LOG=debug` shows them.
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .try_init()
        .unwrap_or(());
}

/// Create the engine with its control and command queues.
pub fn create_session(config: EngineConfig) -> SessionHandle {
    setup_logger();

    let (control_tx, control_rx) = RingBuffer::new(CONTROL_QUEUE_CAPACITY);
    let (command_tx, command_rx) = RingBuffer::new(COMMAND_QUEUE_CAPACITY);

    log::info!(
        "Creating mapping session (scale {}, root {}, secondary {})",
        config.quantization.scale,
        config.quantization.root_note,
        config.secondary_mode.name()
    );

    SessionHandle {
        engine: MappingEngine::with_controls(config, control_rx),
        controls: ControlHandle::new(control_tx),
        sink: RingSink::new(command_tx),
        commands: command_rx,
    }
}

/// Producer side of the control queue.
///
/// Values are validated before they are queued, so the engine never sees an
/// out-of-range update. The handle is `Send` and may live on a UI thread.
pub struct ControlHandle {
    producer: Producer<ControlMessage>,
}

impl ControlHandle {
    pub fn new(producer: Producer<ControlMessage>) -> Self {
        Self { producer }
    }

    pub fn set_scale(&mut self, scale: Scale) -> Result<(), ControlError> {
        self.push(ControlMessage::SetScale(scale))
    }

    pub fn set_root_note(&mut self, root_note: u8) -> Result<(), ControlError> {
        let root_note = validate_root_note(root_note)?;
        self.push(ControlMessage::SetRootNote(root_note))
    }

    pub fn set_secondary_mode(&mut self, mode: SecondaryMode) -> Result<(), ControlError> {
        self.push(ControlMessage::SetSecondaryMode(mode))
    }

    pub fn set_secondary_volume(&mut self, volume_db: f32) -> Result<(), ControlError> {
        let volume_db = validate_volume(volume_db)?;
        self.push(ControlMessage::SetSecondaryVolume(volume_db))
    }

    pub fn set_primary_hand(&mut self, hand: Handedness) -> Result<(), ControlError> {
        self.push(ControlMessage::SetPrimaryHand(hand))
    }

    pub fn set_note_naming(&mut self, naming: NoteNaming) -> Result<(), ControlError> {
        self.push(ControlMessage::SetNoteNaming(naming))
    }

    /// Queue a whole configuration; the engine switches to it in one step.
    pub fn configure(&mut self, config: EngineConfig) -> Result<(), ControlError> {
        config.validate()?;
        self.push(ControlMessage::Configure(config))
    }

    fn push(&mut self, message: ControlMessage) -> Result<(), ControlError> {
        self.producer
            .push(message)
            .map_err(|_| ControlError::QueueFull)
    }
}
