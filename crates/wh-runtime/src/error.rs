use thiserror::Error;

#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("{kind} slot {slot} out of range (buffer count {count})")]
    SlotOutOfRange {
        kind: &'static str,
        slot: usize,
        count: usize,
    },
    #[error("buffer length mismatch for slot {slot}: buffer holds {expected} elements, got {got}")]
    ShapeMismatch {
        slot: usize,
        expected: usize,
        got: usize,
    },
    #[error("invalid cache rotation map: {0}")]
    InvalidRotationMap(String),
    #[error("scripted runtime exhausted after {0} forward passes")]
    ScriptExhausted(usize),
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
