use pyo3::pymodule;

mod mapping_engine;
mod messages;

/// The Python module implemented in Rust.
#[pymodule]
mod hand_theremin {
    #[pymodule_export]
    use super::mapping_engine::GestureEngine;

    #[pymodule_export]
    use super::mapping_engine::py_note_name;

    #[pymodule_export]
    use super::mapping_engine::py_quantize_frequency;
}
