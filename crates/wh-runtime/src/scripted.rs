use crate::error::{Result, RuntimeError};
use crate::runtime::ModelRuntime;
use crate::slot::SlotId;

/// In-memory reference implementation of `ModelRuntime`.
///
/// Replays a fixed script of logits frames, one per forward pass, and stamps
/// every other output buffer with the pass count so cache rotation is
/// observable from the outside. Used by the engine tests and the CLI harness
/// in place of a real interpreter or compiled session.
#[derive(Debug)]
pub struct ScriptedRuntime {
    inputs: Vec<Vec<f32>>,
    outputs: Vec<Vec<f32>>,
    logits_slot: Option<SlotId>,
    script: Vec<Vec<f32>>,
    repeat_last: bool,
    forward_passes: usize,
    i32_writes: Vec<(SlotId, Vec<i32>)>,
}

/// Builder for `ScriptedRuntime`.
#[derive(Debug, Default)]
pub struct ScriptedRuntimeBuilder {
    input_lens: Vec<usize>,
    output_lens: Vec<usize>,
    logits_slot: Option<SlotId>,
    script: Vec<Vec<f32>>,
    repeat_last: bool,
}

impl ScriptedRuntimeBuilder {
    /// Declare the input buffer set by element lengths.
    pub fn inputs(mut self, lens: &[usize]) -> Self {
        self.input_lens = lens.to_vec();
        self
    }

    /// Declare the output buffer set by element lengths.
    pub fn outputs(mut self, lens: &[usize]) -> Self {
        self.output_lens = lens.to_vec();
        self
    }

    /// Set the output slot that receives scripted logits frames.
    pub fn logits(mut self, slot: SlotId, frames: Vec<Vec<f32>>) -> Self {
        self.logits_slot = Some(slot);
        self.script = frames;
        self
    }

    /// Keep replaying the final frame once the script runs out, instead of
    /// failing with `ScriptExhausted`.
    pub fn repeat_last(mut self, repeat: bool) -> Self {
        self.repeat_last = repeat;
        self
    }

    pub fn build(self) -> ScriptedRuntime {
        ScriptedRuntime {
            inputs: self.input_lens.iter().map(|&n| vec![0.0; n]).collect(),
            outputs: self.output_lens.iter().map(|&n| vec![0.0; n]).collect(),
            logits_slot: self.logits_slot,
            script: self.script,
            repeat_last: self.repeat_last,
            forward_passes: 0,
            i32_writes: Vec::new(),
        }
    }
}

impl ScriptedRuntime {
    pub fn builder() -> ScriptedRuntimeBuilder {
        ScriptedRuntimeBuilder::default()
    }

    /// Number of forward passes executed so far.
    pub fn forward_passes(&self) -> usize {
        self.forward_passes
    }

    /// Every i32 write performed against an input buffer, in call order.
    /// Lets tests assert the exact token and position sequences fed in.
    pub fn i32_write_history(&self) -> &[(SlotId, Vec<i32>)] {
        &self.i32_writes
    }

    fn check_input(&self, slot: SlotId) -> Result<()> {
        if slot.index() >= self.inputs.len() {
            return Err(RuntimeError::SlotOutOfRange {
                kind: "input",
                slot: slot.index(),
                count: self.inputs.len(),
            });
        }
        Ok(())
    }

    fn check_output(&self, slot: SlotId) -> Result<()> {
        if slot.index() >= self.outputs.len() {
            return Err(RuntimeError::SlotOutOfRange {
                kind: "output",
                slot: slot.index(),
                count: self.outputs.len(),
            });
        }
        Ok(())
    }

    fn check_write_len(&self, slot: SlotId, got: usize) -> Result<()> {
        let expected = self.inputs[slot.index()].len();
        if got > expected {
            return Err(RuntimeError::ShapeMismatch {
                slot: slot.index(),
                expected,
                got,
            });
        }
        Ok(())
    }
}

impl ModelRuntime for ScriptedRuntime {
    fn name(&self) -> &str {
        "scripted"
    }

    fn input_count(&self) -> usize {
        self.inputs.len()
    }

    fn output_count(&self) -> usize {
        self.outputs.len()
    }

    fn input_len(&self, slot: SlotId) -> Result<usize> {
        self.check_input(slot)?;
        Ok(self.inputs[slot.index()].len())
    }

    fn output_len(&self, slot: SlotId) -> Result<usize> {
        self.check_output(slot)?;
        Ok(self.outputs[slot.index()].len())
    }

    fn write_input_i32(&mut self, slot: SlotId, data: &[i32]) -> Result<()> {
        self.check_input(slot)?;
        self.check_write_len(slot, data.len())?;
        for (dst, &v) in self.inputs[slot.index()].iter_mut().zip(data) {
            *dst = v as f32;
        }
        self.i32_writes.push((slot, data.to_vec()));
        Ok(())
    }

    fn write_input_f32(&mut self, slot: SlotId, data: &[f32]) -> Result<()> {
        self.check_input(slot)?;
        self.check_write_len(slot, data.len())?;
        self.inputs[slot.index()][..data.len()].copy_from_slice(data);
        Ok(())
    }

    fn read_input_f32(&self, slot: SlotId) -> Result<Vec<f32>> {
        self.check_input(slot)?;
        Ok(self.inputs[slot.index()].clone())
    }

    fn read_output_f32(&self, slot: SlotId) -> Result<Vec<f32>> {
        self.check_output(slot)?;
        Ok(self.outputs[slot.index()].clone())
    }

    fn zero_input(&mut self, slot: SlotId) -> Result<()> {
        self.check_input(slot)?;
        self.inputs[slot.index()].fill(0.0);
        Ok(())
    }

    fn run_forward_pass(&mut self) -> Result<()> {
        let frame_idx = if self.forward_passes < self.script.len() {
            self.forward_passes
        } else if self.repeat_last && !self.script.is_empty() {
            self.script.len() - 1
        } else if self.logits_slot.is_some() {
            return Err(RuntimeError::ScriptExhausted(self.forward_passes));
        } else {
            usize::MAX
        };

        self.forward_passes += 1;
        let stamp = self.forward_passes as f32;

        // Stamp every non-logits output with the pass count so a later
        // rotation copy is distinguishable from stale data.
        for (idx, out) in self.outputs.iter_mut().enumerate() {
            if Some(SlotId(idx)) == self.logits_slot {
                continue;
            }
            out.fill(stamp);
        }

        if let (Some(slot), true) = (self.logits_slot, frame_idx != usize::MAX) {
            let frame = &self.script[frame_idx];
            let out = &mut self.outputs[slot.index()];
            if frame.len() != out.len() {
                return Err(RuntimeError::ShapeMismatch {
                    slot: slot.index(),
                    expected: out.len(),
                    got: frame.len(),
                });
            }
            out.copy_from_slice(frame);
        }

        Ok(())
    }
}
