use crate::error::{Result, RuntimeError};
use crate::slot::SlotId;

/// Ordered set of (input slot, output slot) pairs describing which forward
/// pass output refills which input before the next step.
///
/// One pair per transformer layer per key/value tensor, fixed when the model
/// is loaded. The set is not a bijection over the buffer sets: control slots
/// appear in neither column, but within the map each input is refilled from
/// exactly one output and each output feeds exactly one input.
#[derive(Debug, Clone, Default)]
pub struct CacheRotationMap {
    pairs: Vec<(SlotId, SlotId)>,
}

impl CacheRotationMap {
    /// Create a rotation map from (input, output) slot pairs.
    pub fn new(pairs: Vec<(SlotId, SlotId)>) -> Self {
        CacheRotationMap { pairs }
    }

    /// Create a rotation map from raw (input index, output index) pairs.
    pub fn from_indices(pairs: &[(usize, usize)]) -> Self {
        CacheRotationMap {
            pairs: pairs
                .iter()
                .map(|&(input, output)| (SlotId(input), SlotId(output)))
                .collect(),
        }
    }

    /// The (input, output) pairs in rotation order.
    pub fn pairs(&self) -> &[(SlotId, SlotId)] {
        &self.pairs
    }

    /// Number of pairs in the map.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns true if the map holds no pairs.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Validate the map against a runtime's buffer counts.
    ///
    /// Every input slot must be in range for the input buffer set and every
    /// output slot for the output buffer set. An input refilled from two
    /// outputs or an output feeding two inputs is a broken configuration and
    /// is rejected.
    pub fn validate(&self, input_count: usize, output_count: usize) -> Result<()> {
        let mut seen_inputs = vec![false; input_count];
        let mut seen_outputs = vec![false; output_count];

        for &(input, output) in &self.pairs {
            if input.index() >= input_count {
                return Err(RuntimeError::SlotOutOfRange {
                    kind: "cache input",
                    slot: input.index(),
                    count: input_count,
                });
            }
            if output.index() >= output_count {
                return Err(RuntimeError::SlotOutOfRange {
                    kind: "cache output",
                    slot: output.index(),
                    count: output_count,
                });
            }
            if seen_inputs[input.index()] {
                return Err(RuntimeError::InvalidRotationMap(format!(
                    "input slot {} refilled by more than one output",
                    input
                )));
            }
            if seen_outputs[output.index()] {
                return Err(RuntimeError::InvalidRotationMap(format!(
                    "output slot {} feeds more than one input",
                    output
                )));
            }
            seen_inputs[input.index()] = true;
            seen_outputs[output.index()] = true;
        }

        Ok(())
    }
}
