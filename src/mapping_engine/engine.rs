//! The frame-processing core.
//!
//! [`MappingEngine`] owns all mutable session state: the landmark smoothing
//! filter, the percussion edge trigger and the active configuration. It is
//! driven from a single place, the tracker's per-frame callback.
//!
//! One smoothing filter and one edge trigger are shared by whichever hand
//! holds a role; nothing is tracked per hand identity. If the tracker swaps
//! labels between frames the smoothed pitch jumps.

use rtrb::Consumer;

use crate::mapping_engine::config::EngineConfig;
use crate::mapping_engine::constants::{INDEX_TIP, MIN_FREQ, MIN_VOL, WETNESS_MIN};
use crate::mapping_engine::dispatcher::{RoleAssignment, SecondaryMode};
use crate::mapping_engine::errors::ConfigError;
use crate::mapping_engine::gesture::{EdgeTrigger, GestureState, classify};
use crate::mapping_engine::landmarks::HandFrame;
use crate::mapping_engine::mapper::{PrimaryParams, clamp_volume_db, secondary_frequency};
use crate::mapping_engine::scale::note_name;
use crate::mapping_engine::sink::InstrumentSink;
use crate::mapping_engine::smoothing::SmoothingFilter;
use crate::messages::{ControlMessage, InstrumentCommand};

/// Last values pushed to the instruments.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlSnapshot {
    pub frequency: f32,
    /// Display name of `frequency` in the configured naming.
    pub note: Option<String>,
    pub volume_db: f32,
    pub wetness: f32,
    pub secondary_frequency: Option<f32>,
    pub secondary_held: bool,
    pub gesture: Option<GestureState>,
}

/// What happened during one call to [`MappingEngine::process_frame`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameReport {
    pub primary_updated: bool,
    pub secondary_updated: bool,
    pub percussion_hit: Option<GestureState>,
}

#[derive(Debug, Clone, Copy)]
struct Outputs {
    frequency: f32,
    volume_db: f32,
    wetness: f32,
    secondary_frequency: Option<f32>,
}

impl Default for Outputs {
    fn default() -> Self {
        Self {
            frequency: MIN_FREQ,
            volume_db: MIN_VOL,
            wetness: WETNESS_MIN,
            secondary_frequency: None,
        }
    }
}

pub struct MappingEngine {
    config: EngineConfig,
    controls: Option<Consumer<ControlMessage>>,
    smoothing: SmoothingFilter,
    percussion: EdgeTrigger,
    secondary_held: bool,
    running: bool,
    outputs: Outputs,
}

impl MappingEngine {
    /// An engine configured directly, without a control queue.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            controls: None,
            smoothing: SmoothingFilter::new(),
            percussion: EdgeTrigger::new(),
            secondary_held: false,
            running: false,
            outputs: Outputs::default(),
        }
    }

    /// An engine that drains `controls` before every frame.
    pub fn with_controls(config: EngineConfig, controls: Consumer<ControlMessage>) -> Self {
        Self {
            controls: Some(controls),
            ..Self::new(config)
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Begin a session from a clean slate and start the primary voice.
    pub fn start(&mut self, sink: &mut impl InstrumentSink) {
        if self.running {
            return;
        }
        self.reset();
        self.drain_controls(sink);
        self.running = true;

        log::info!("Mapping session started");
        sink.send(InstrumentCommand::PrimaryAttack {
            frequency: self.outputs.frequency,
            volume_db: self.outputs.volume_db,
        });
    }

    /// End the session, releasing any sounding voices.
    pub fn stop(&mut self, sink: &mut impl InstrumentSink) {
        if !self.running {
            return;
        }
        self.release_secondary(sink);
        sink.send(InstrumentCommand::PrimaryRelease);
        self.running = false;
        log::info!("Mapping session stopped");
    }

    /// Clears smoothing, edge-trigger and output state.
    pub fn reset(&mut self) {
        self.smoothing.reset();
        self.percussion.reset();
        self.secondary_held = false;
        self.outputs = Outputs::default();
    }

    /// Applies one configuration update, running any mode-transition action.
    pub fn apply_control(
        &mut self,
        message: ControlMessage,
        sink: &mut impl InstrumentSink,
    ) -> Result<(), ConfigError> {
        let mut next = self.config;
        match message {
            ControlMessage::SetScale(scale) => next.quantization.scale = scale,
            ControlMessage::SetRootNote(root) => next.quantization.root_note = root,
            ControlMessage::SetSecondaryMode(mode) => next.secondary_mode = mode,
            ControlMessage::SetSecondaryVolume(db) => next.secondary_volume_db = db,
            ControlMessage::SetPrimaryHand(hand) => next.primary_hand = hand,
            ControlMessage::SetNoteNaming(naming) => next.note_naming = naming,
            ControlMessage::Configure(config) => next = config,
        }
        next.validate()?;
        self.replace_config(next, sink);
        Ok(())
    }

    fn replace_config(&mut self, next: EngineConfig, sink: &mut impl InstrumentSink) {
        let previous = std::mem::replace(&mut self.config, next);

        if previous.secondary_mode != next.secondary_mode {
            log::debug!(
                "secondary mode {} -> {}",
                previous.secondary_mode.name(),
                next.secondary_mode.name()
            );
            match next.secondary_mode {
                SecondaryMode::Percussion => {
                    self.release_secondary(sink);
                    self.percussion.reset();
                }
                SecondaryMode::SecondaryInstrument => {}
            }
        }

        if self.secondary_held && previous.secondary_volume_db != next.secondary_volume_db {
            sink.send(InstrumentCommand::SetSecondaryVolume(clamp_volume_db(
                next.secondary_volume_db,
            )));
        }

        if previous.quantization != next.quantization {
            log::debug!(
                "quantization {} root {}",
                next.quantization.scale,
                next.quantization.root_note
            );
        }
        if previous.primary_hand != next.primary_hand {
            log::debug!("primary hand {}", next.primary_hand.label());
        }
    }

    fn release_secondary(&mut self, sink: &mut impl InstrumentSink) {
        if self.secondary_held {
            sink.send(InstrumentCommand::SecondaryRelease);
            self.secondary_held = false;
        }
    }

    fn drain_controls(&mut self, sink: &mut impl InstrumentSink) {
        let Some(mut controls) = self.controls.take() else {
            return;
        };
        while let Ok(message) = controls.pop() {
            if let Err(err) = self.apply_control(message, sink) {
                log::warn!("ignoring control update: {err}");
            }
        }
        self.controls = Some(controls);
    }

    /// Processes every hand the tracker reported for one video frame.
    ///
    /// Roles without a hand this frame keep their previous output values.
    pub fn process_frame(
        &mut self,
        hands: &[HandFrame],
        sink: &mut impl InstrumentSink,
    ) -> FrameReport {
        self.drain_controls(sink);

        let mut report = FrameReport::default();
        if !self.running {
            return report;
        }

        let roles = RoleAssignment::assign(hands, self.config.primary_hand);
        if let Some(hand) = roles.primary {
            self.update_primary(hand, sink);
            report.primary_updated = true;
        }
        if let Some(hand) = roles.secondary {
            report.percussion_hit = self.update_secondary(hand, sink);
            report.secondary_updated = true;
        }
        report
    }

    fn update_primary(&mut self, hand: &HandFrame, sink: &mut impl InstrumentSink) {
        let smoothed = self.smoothing.smooth_all(hand.landmarks());
        let params = PrimaryParams::from_landmarks(&smoothed);
        let frequency = self.config.quantization.quantize(params.raw_frequency);

        sink.send(InstrumentCommand::SetFrequency(frequency));
        sink.send(InstrumentCommand::SetVolume(params.volume_db));
        sink.send(InstrumentCommand::SetWetness(params.wetness));

        self.outputs.frequency = frequency;
        self.outputs.volume_db = params.volume_db;
        self.outputs.wetness = params.wetness;
    }

    fn update_secondary(
        &mut self,
        hand: &HandFrame,
        sink: &mut impl InstrumentSink,
    ) -> Option<GestureState> {
        match self.config.secondary_mode {
            SecondaryMode::Percussion => {
                let hit = self.percussion.update(classify(hand.landmarks()));
                if let Some(gesture) = hit {
                    sink.send(InstrumentCommand::TriggerPercussion { gesture });
                }
                hit
            }
            SecondaryMode::SecondaryInstrument => {
                let raw = secondary_frequency(hand.landmark(INDEX_TIP));
                let frequency = self.config.quantization.quantize(raw);
                if self.secondary_held {
                    sink.send(InstrumentCommand::SetSecondaryFrequency(frequency));
                } else {
                    sink.send(InstrumentCommand::SecondaryAttack {
                        frequency,
                        volume_db: clamp_volume_db(self.config.secondary_volume_db),
                    });
                    self.secondary_held = true;
                }
                self.outputs.secondary_frequency = Some(frequency);
                None
            }
        }
    }

    pub fn snapshot(&self) -> ControlSnapshot {
        ControlSnapshot {
            frequency: self.outputs.frequency,
            note: note_name(self.outputs.frequency, self.config.note_naming),
            volume_db: self.outputs.volume_db,
            wetness: self.outputs.wetness,
            secondary_frequency: self.outputs.secondary_frequency,
            secondary_held: self.secondary_held,
            gesture: self.percussion.last(),
        }
    }
}
