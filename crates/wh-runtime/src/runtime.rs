use std::fmt::Debug;

use crate::error::Result;
use crate::slot::SlotId;

/// Trait for pluggable model runtimes (interpreter sessions, compiled
/// sessions, test fixtures).
///
/// A runtime owns a fixed set of input and output tensor buffers, addressed
/// by `SlotId` within each set. Buffer shapes are fixed for the lifetime of
/// a loaded model; `run_forward_pass` is synchronous and deterministic given
/// the current buffer contents. The decoding engine never owns buffer
/// memory, it only writes inputs, runs passes, and reads outputs.
pub trait ModelRuntime: Send + Debug {
    /// Returns the name of this runtime (e.g., "scripted").
    fn name(&self) -> &str;

    /// Number of input buffers.
    fn input_count(&self) -> usize;

    /// Number of output buffers.
    fn output_count(&self) -> usize;

    /// Element length of an input buffer.
    fn input_len(&self, slot: SlotId) -> Result<usize>;

    /// Element length of an output buffer.
    fn output_len(&self, slot: SlotId) -> Result<usize>;

    /// Write i32 values into an input buffer, starting at element 0.
    ///
    /// `data` must not exceed the buffer's element length.
    fn write_input_i32(&mut self, slot: SlotId, data: &[i32]) -> Result<()>;

    /// Write f32 values into an input buffer, starting at element 0.
    ///
    /// `data` must not exceed the buffer's element length.
    fn write_input_f32(&mut self, slot: SlotId, data: &[f32]) -> Result<()>;

    /// Read the full contents of an input buffer as f32.
    fn read_input_f32(&self, slot: SlotId) -> Result<Vec<f32>>;

    /// Read the full contents of an output buffer as f32.
    fn read_output_f32(&self, slot: SlotId) -> Result<Vec<f32>>;

    /// Zero every element of an input buffer.
    fn zero_input(&mut self, slot: SlotId) -> Result<()>;

    /// Execute exactly one forward pass over the current buffer contents.
    fn run_forward_pass(&mut self) -> Result<()>;
}
