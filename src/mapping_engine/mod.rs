//! Gesture Mapping Engine Module
//!
//! This module turns per-frame hand landmarks into instrument control values.
//! It is organized into sub-modules, each with a specific responsibility:
//!
//! - [`session`]: Ring buffers, logger setup and the control handle
//! - [`engine`]: The frame-processing core and its persisted state
//! - [`config`]: Session configuration and validation
//! - [`sink`]: Destinations for outgoing instrument commands
//! - [`smoothing`]: Speed-adaptive landmark smoothing
//! - [`scale`]: Scale registry, quantization and note names
//! - [`gesture`]: Hand-openness classification and edge triggering
//! - [`mapper`]: Range mapping into instrument parameters
//! - [`dispatcher`]: Handedness convention and role assignment
//! - [`constants`]: Ranges, thresholds and landmark indices
//! - [`errors`]: Error types
//!
//! The [`GestureEngine`] class exposes a session to Python, where the hand
//! tracker usually runs.

use numpy::PyReadonlyArray2;
use numpy::ndarray::ArrayView2;
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;
use rtrb::Consumer;
use std::sync::Mutex;

use crate::mapping_engine::config::{EngineConfig, QuantizationContext};
use crate::mapping_engine::constants::DEFAULT_SECONDARY_VOLUME_DB;
use crate::mapping_engine::dispatcher::SecondaryMode;
use crate::mapping_engine::engine::MappingEngine;
use crate::mapping_engine::errors::{ControlError, FrameError};
use crate::mapping_engine::landmarks::{HandFrame, Handedness, LandmarkPoint};
use crate::mapping_engine::scale::{NoteNaming, Scale, note_name};
use crate::mapping_engine::session::{ControlHandle, SessionHandle, create_session};
use crate::mapping_engine::sink::RingSink;
use crate::messages::InstrumentCommand;

pub(crate) mod config;
pub(crate) mod constants;
pub(crate) mod dispatcher;
pub(crate) mod engine;
pub(crate) mod errors;
pub(crate) mod gesture;
pub(crate) mod landmarks;
pub(crate) mod mapper;
pub(crate) mod scale;
pub(crate) mod session;
pub(crate) mod sink;
pub(crate) mod smoothing;

/// Builds a hand from a `21x3` (or `21x2`, depth zero) coordinate array.
fn hand_from_array(points: ArrayView2<'_, f64>, label: &str) -> Result<HandFrame, FrameError> {
    let (rows, cols) = points.dim();
    if !(2..=3).contains(&cols) {
        return Err(FrameError::BadShape { rows, cols });
    }

    let landmarks: Vec<LandmarkPoint> = points
        .outer_iter()
        .map(|row| {
            let z = if cols == 3 { row[2] } else { 0.0 };
            LandmarkPoint::new(row[0] as f32, row[1] as f32, z as f32)
        })
        .collect();
    HandFrame::from_label(&landmarks, label)
}

fn hand_from_tuples(points: &[(f32, f32, f32)], label: &str) -> Result<HandFrame, FrameError> {
    let landmarks: Vec<LandmarkPoint> = points
        .iter()
        .map(|&(x, y, z)| LandmarkPoint::new(x, y, z))
        .collect();
    HandFrame::from_label(&landmarks, label)
}

fn control_err(err: ControlError) -> PyErr {
    match err {
        ControlError::Config(err) => PyValueError::new_err(err.to_string()),
        ControlError::QueueFull => {
            PyRuntimeError::new_err("Failed to send control update - queue may be full")
        }
    }
}

fn value_err(err: impl std::fmt::Display) -> PyErr {
    PyValueError::new_err(err.to_string())
}

/// Frame-side half of the session: the engine and where it writes commands.
struct FramePipeline {
    engine: MappingEngine,
    sink: RingSink,
}

/// GestureEngine maps hand-tracker output to instrument parameters.
#[pyclass]
pub struct GestureEngine {
    pipeline: Mutex<FramePipeline>,
    controls: Mutex<ControlHandle>,
    commands: Mutex<Consumer<InstrumentCommand>>,
}

impl GestureEngine {
    fn with_pipeline<R>(&self, f: impl FnOnce(&mut FramePipeline) -> R) -> PyResult<R> {
        let mut pipeline = self
            .pipeline
            .lock()
            .map_err(|_| PyRuntimeError::new_err("Failed to acquire engine lock"))?;
        Ok(f(&mut *pipeline))
    }

    fn with_controls(
        &self,
        f: impl FnOnce(&mut ControlHandle) -> Result<(), ControlError>,
    ) -> PyResult<()> {
        let mut controls = self
            .controls
            .lock()
            .map_err(|_| PyRuntimeError::new_err("Failed to acquire control lock"))?;
        f(&mut *controls).map_err(control_err)
    }

    fn process_hands(&self, hands: Vec<HandFrame>) -> PyResult<usize> {
        self.with_pipeline(|p| {
            p.engine.process_frame(&hands, &mut p.sink);
            hands.len()
        })
    }
}

fn accept_hand(result: Result<HandFrame, FrameError>, accepted: &mut Vec<HandFrame>) {
    match result {
        Ok(hand) => accepted.push(hand),
        Err(err) => log::debug!("rejecting hand frame: {err}"),
    }
}

#[pymethods]
impl GestureEngine {
    /// Create a new, stopped GestureEngine with the default configuration.
    #[new]
    pub fn new() -> PyResult<Self> {
        let SessionHandle {
            engine,
            controls,
            sink,
            commands,
        } = create_session(EngineConfig::default());

        Ok(GestureEngine {
            pipeline: Mutex::new(FramePipeline { engine, sink }),
            controls: Mutex::new(controls),
            commands: Mutex::new(commands),
        })
    }

    /// Start a session; persisted smoothing and gesture state are reset.
    pub fn start(&self) -> PyResult<()> {
        self.with_pipeline(|p| p.engine.start(&mut p.sink))
    }

    /// Stop the session and release sounding voices.
    pub fn stop(&self) -> PyResult<()> {
        self.with_pipeline(|p| p.engine.stop(&mut p.sink))
    }

    #[getter]
    pub fn is_running(&self) -> PyResult<bool> {
        self.with_pipeline(|p| p.engine.is_running())
    }

    pub fn set_scale(&self, name: &str) -> PyResult<()> {
        let scale: Scale = name.parse().map_err(value_err)?;
        self.with_controls(|c| c.set_scale(scale))
    }

    pub fn set_root_note(&self, root_note: u8) -> PyResult<()> {
        self.with_controls(|c| c.set_root_note(root_note))
    }

    pub fn set_secondary_mode(&self, mode: &str) -> PyResult<()> {
        let mode: SecondaryMode = mode.parse().map_err(value_err)?;
        self.with_controls(|c| c.set_secondary_mode(mode))
    }

    pub fn set_secondary_volume(&self, volume_db: f32) -> PyResult<()> {
        self.with_controls(|c| c.set_secondary_volume(volume_db))
    }

    /// Which of the performer's hands plays the melody ("left" or "right").
    pub fn set_primary_hand(&self, hand: &str) -> PyResult<()> {
        let hand: Handedness = hand.parse().map_err(value_err)?;
        self.with_controls(|c| c.set_primary_hand(hand))
    }

    pub fn set_note_naming(&self, naming: &str) -> PyResult<()> {
        let naming: NoteNaming = naming.parse().map_err(value_err)?;
        self.with_controls(|c| c.set_note_naming(naming))
    }

    /// Replace every setting in one update, applied before the next frame.
    ///
    /// Arguments left out take their default values, not the current ones.
    #[pyo3(signature = (
        scale = "chromatic",
        root_note = 0,
        secondary_mode = "percussion",
        secondary_volume = DEFAULT_SECONDARY_VOLUME_DB,
        primary_hand = "right",
        note_naming = "letter"
    ))]
    pub fn configure(
        &self,
        scale: &str,
        root_note: u8,
        secondary_mode: &str,
        secondary_volume: f32,
        primary_hand: &str,
        note_naming: &str,
    ) -> PyResult<()> {
        let config = EngineConfig {
            quantization: QuantizationContext {
                scale: scale.parse().map_err(value_err)?,
                root_note,
            },
            secondary_mode: secondary_mode.parse().map_err(value_err)?,
            secondary_volume_db: secondary_volume,
            primary_hand: primary_hand.parse().map_err(value_err)?,
            note_naming: note_naming.parse().map_err(value_err)?,
        };
        self.with_controls(|c| c.configure(config))
    }

    /// Process one video frame.
    ///
    /// `hands` is a list of `(landmarks, handedness)` pairs where `landmarks`
    /// is a float64 array of shape (21, 3) or (21, 2) and `handedness` is the
    /// tracker's label. Malformed hands are skipped. Returns the number of
    /// hands accepted.
    pub fn process_frame(
        &self,
        hands: Vec<(PyReadonlyArray2<'_, f64>, String)>,
    ) -> PyResult<usize> {
        let mut accepted = Vec::with_capacity(hands.len());
        for (points, label) in &hands {
            accept_hand(hand_from_array(points.as_array(), label), &mut accepted);
        }
        self.process_hands(accepted)
    }

    /// Like `process_frame`, taking plain `(x, y, z)` tuples.
    pub fn process_landmarks(
        &self,
        hands: Vec<(Vec<(f32, f32, f32)>, String)>,
    ) -> PyResult<usize> {
        let mut accepted = Vec::with_capacity(hands.len());
        for (points, label) in &hands {
            accept_hand(hand_from_tuples(points, label), &mut accepted);
        }
        self.process_hands(accepted)
    }

    /// Receive the next instrument command, or `None` when the queue is empty.
    pub fn receive_command(&self, py: Python<'_>) -> PyResult<Option<Py<PyAny>>> {
        let command = {
            let mut commands = self
                .commands
                .lock()
                .map_err(|_| PyRuntimeError::new_err("Failed to acquire command lock"))?;
            match commands.pop() {
                Ok(command) => command,
                Err(_) => return Ok(None),
            }
        };

        let dict = PyDict::new(py);
        dict.set_item("type", command.kind())?;
        match command {
            InstrumentCommand::PrimaryAttack {
                frequency,
                volume_db,
            }
            | InstrumentCommand::SecondaryAttack {
                frequency,
                volume_db,
            } => {
                dict.set_item("frequency", frequency)?;
                dict.set_item("volume_db", volume_db)?;
            }
            InstrumentCommand::SetFrequency(frequency)
            | InstrumentCommand::SetSecondaryFrequency(frequency) => {
                dict.set_item("frequency", frequency)?;
            }
            InstrumentCommand::SetVolume(volume_db)
            | InstrumentCommand::SetSecondaryVolume(volume_db) => {
                dict.set_item("volume_db", volume_db)?;
            }
            InstrumentCommand::SetWetness(wetness) => {
                dict.set_item("wetness", wetness)?;
            }
            InstrumentCommand::TriggerPercussion { gesture } => {
                dict.set_item("gesture", gesture.label())?;
            }
            InstrumentCommand::PrimaryRelease | InstrumentCommand::SecondaryRelease => {}
        }

        Ok(Some(dict.into_any().unbind()))
    }

    /// The last values pushed to the instruments, for display.
    pub fn snapshot(&self, py: Python<'_>) -> PyResult<Py<PyAny>> {
        let snapshot = self.with_pipeline(|p| p.engine.snapshot())?;

        let dict = PyDict::new(py);
        dict.set_item("frequency", snapshot.frequency)?;
        dict.set_item("note", snapshot.note)?;
        dict.set_item("volume_db", snapshot.volume_db)?;
        dict.set_item("wetness", snapshot.wetness)?;
        dict.set_item("secondary_frequency", snapshot.secondary_frequency)?;
        dict.set_item("secondary_held", snapshot.secondary_held)?;
        dict.set_item("gesture", snapshot.gesture.map(|g| g.label()))?;
        Ok(dict.into_any().unbind())
    }

    /// Commands lost because `receive_command` was not called often enough.
    #[getter]
    pub fn dropped_commands(&self) -> PyResult<usize> {
        self.with_pipeline(|p| p.sink.dropped())
    }
}

/// Note name such as "A4" for a frequency, or `None` if it is not positive.
#[pyfunction]
#[pyo3(name = "note_name", signature = (frequency, naming = "letter"))]
pub fn py_note_name(frequency: f32, naming: &str) -> PyResult<Option<String>> {
    let naming: NoteNaming = naming.parse().map_err(value_err)?;
    Ok(note_name(frequency, naming))
}

/// Snap a frequency to a named scale transposed to `root_note`.
#[pyfunction]
#[pyo3(name = "quantize_frequency")]
pub fn py_quantize_frequency(frequency: f32, scale: &str, root_note: u8) -> PyResult<f32> {
    let scale: Scale = scale.parse().map_err(value_err)?;
    let root_note = config::validate_root_note(root_note).map_err(value_err)?;
    Ok(scale.quantize(frequency, root_note))
}
