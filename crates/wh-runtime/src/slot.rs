use std::fmt;

use crate::error::Result;
use crate::rotation::CacheRotationMap;
use crate::runtime::ModelRuntime;

/// Opaque handle into the runtime's input or output buffer set.
///
/// The runtime owns the buffer memory; the engine only ever holds indices.
/// Whether a `SlotId` refers to an input or an output buffer depends on the
/// call it is passed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(pub usize);

impl SlotId {
    /// Returns the raw buffer index.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Logical role a buffer plays in the decoding loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotRole {
    /// Input buffer receiving the current token id.
    Token,
    /// Input buffer receiving the current sequence position.
    Position,
    /// Input buffer receiving the dense attention mask for the whole window.
    Mask,
    /// Input buffer refilled from a cache output between steps. The index is
    /// the position of its pair in the rotation map.
    CacheIn(usize),
    /// Output buffer feeding a cache input. The index is the position of its
    /// pair in the rotation map.
    CacheOut(usize),
    /// Output buffer holding next-token scores after a forward pass.
    Logits,
}

/// Fixed mapping from logical roles to buffer indices for a loaded model.
///
/// Discovered once at model-load time and invariant afterwards. The control
/// slots (`token`, `position`, `mask`) index into the input buffer set and
/// `logits` into the output buffer set; the per-layer cache pairs live in
/// the rotation map.
#[derive(Debug, Clone)]
pub struct SlotRegistry {
    pub token: SlotId,
    pub position: SlotId,
    pub mask: SlotId,
    pub logits: SlotId,
    pub rotation: CacheRotationMap,
}

impl SlotRegistry {
    /// Create a registry from raw buffer indices and a rotation map.
    pub fn new(
        token: usize,
        position: usize,
        mask: usize,
        logits: usize,
        rotation: CacheRotationMap,
    ) -> Self {
        SlotRegistry {
            token: SlotId(token),
            position: SlotId(position),
            mask: SlotId(mask),
            logits: SlotId(logits),
            rotation,
        }
    }

    /// Check every slot in the registry against a runtime's buffer counts.
    ///
    /// Control slots must be in range for their buffer set, and the rotation
    /// map must pass its own validation (see `CacheRotationMap::validate`).
    pub fn validate(&self, runtime: &dyn ModelRuntime) -> Result<()> {
        let inputs = runtime.input_count();
        let outputs = runtime.output_count();

        for (kind, slot) in [
            ("token", self.token),
            ("position", self.position),
            ("mask", self.mask),
        ] {
            if slot.index() >= inputs {
                return Err(crate::RuntimeError::SlotOutOfRange {
                    kind,
                    slot: slot.index(),
                    count: inputs,
                });
            }
        }
        if self.logits.index() >= outputs {
            return Err(crate::RuntimeError::SlotOutOfRange {
                kind: "logits",
                slot: self.logits.index(),
                count: outputs,
            });
        }

        self.rotation.validate(inputs, outputs)
    }

    /// Returns the role of an input slot, if it has one.
    pub fn input_role(&self, slot: SlotId) -> Option<SlotRole> {
        if slot == self.token {
            return Some(SlotRole::Token);
        }
        if slot == self.position {
            return Some(SlotRole::Position);
        }
        if slot == self.mask {
            return Some(SlotRole::Mask);
        }
        self.rotation
            .pairs()
            .iter()
            .position(|(input, _)| *input == slot)
            .map(SlotRole::CacheIn)
    }

    /// The tensor layout of the 26-layer Gemma 3 CPU export this engine was
    /// brought up against. Token/position/mask inputs at 36/4/37, logits at
    /// output 8, and one K and one V cache pair per layer.
    pub fn gemma3_cpu() -> Self {
        #[rustfmt::skip]
        let pairs: &[(usize, usize)] = &[
            (40, 38), (17, 17), // layer 0 k, v
            (46, 44), (35, 35), // layer 1
            (1, 1),   (45, 43), // layer 2
            (16, 16), (0, 0),   // layer 3
            (12, 12), (49, 47), // layer 4
            (52, 50), (21, 21), // layer 5
            (22, 22), (10, 10), // layer 6
            (25, 25), (33, 33), // layer 7
            (3, 3),   (47, 45), // layer 8
            (14, 14), (44, 42), // layer 9
            (7, 6),   (26, 26), // layer 10
            (50, 48), (20, 20), // layer 11
            (18, 18), (28, 28), // layer 12
            (32, 32), (39, 37), // layer 13
            (30, 30), (54, 52), // layer 14
            (43, 41), (31, 31), // layer 15
            (2, 2),   (27, 27), // layer 16
            (9, 9),   (38, 36), // layer 17
            (23, 23), (19, 19), // layer 18
            (51, 49), (24, 24), // layer 19
            (13, 13), (53, 51), // layer 20
            (41, 39), (34, 34), // layer 21
            (11, 11), (6, 5),   // layer 22
            (29, 29), (15, 15), // layer 23
            (8, 7),   (42, 40), // layer 24
            (48, 46), (5, 4),   // layer 25
        ];
        SlotRegistry::new(36, 4, 37, 8, CacheRotationMap::from_indices(pairs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scripted::ScriptedRuntime;

    #[test]
    fn test_gemma3_cpu_layout() {
        let registry = SlotRegistry::gemma3_cpu();
        assert_eq!(registry.token, SlotId(36));
        assert_eq!(registry.position, SlotId(4));
        assert_eq!(registry.mask, SlotId(37));
        assert_eq!(registry.logits, SlotId(8));
        // 26 layers, one K and one V pair each.
        assert_eq!(registry.rotation.len(), 52);
    }

    #[test]
    fn test_gemma3_cpu_rotation_is_valid() {
        let registry = SlotRegistry::gemma3_cpu();
        // The export exposes 55 input and 53 output buffers.
        assert!(registry.rotation.validate(55, 53).is_ok());
    }

    #[test]
    fn test_validate_against_runtime() {
        let runtime = ScriptedRuntime::builder()
            .inputs(&[1, 1, 8, 4, 4])
            .outputs(&[4, 4, 6])
            .build();
        let rotation = CacheRotationMap::from_indices(&[(3, 0), (4, 1)]);
        let registry = SlotRegistry::new(0, 1, 2, 2, rotation);
        assert!(registry.validate(&runtime).is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range_control_slot() {
        let runtime = ScriptedRuntime::builder()
            .inputs(&[1, 1, 8])
            .outputs(&[6])
            .build();
        let registry =
            SlotRegistry::new(9, 1, 2, 0, CacheRotationMap::from_indices(&[]));
        let err = registry.validate(&runtime).unwrap_err();
        assert!(matches!(
            err,
            crate::RuntimeError::SlotOutOfRange { kind: "token", .. }
        ));
    }

    #[test]
    fn test_input_role_lookup() {
        let rotation = CacheRotationMap::from_indices(&[(3, 0), (4, 1)]);
        let registry = SlotRegistry::new(0, 1, 2, 0, rotation);
        assert_eq!(registry.input_role(SlotId(0)), Some(SlotRole::Token));
        assert_eq!(registry.input_role(SlotId(2)), Some(SlotRole::Mask));
        assert_eq!(registry.input_role(SlotId(4)), Some(SlotRole::CacheIn(1)));
        assert_eq!(registry.input_role(SlotId(7)), None);
    }
}
