use tracing::trace;
use wh_runtime::{CacheRotationMap, ModelRuntime, SlotRegistry};

use crate::error::{EngineError, Result};
use crate::session::DecodeSession;

/// Feed token ids through the runtime one at a time, in order.
///
/// Steps are strictly sequential: token N+1's input writes depend on token
/// N's cache outputs, so there is no reordering and no parallelism. For each
/// token the executor writes the token id and position, marks and rewrites
/// the dense attention mask, runs one forward pass, and rotates every cache
/// output back into its paired input. After the final token the logits
/// output slot holds the next-token scores.
///
/// # Errors
/// `ContextOverflow` if a step would reach the context window; nothing is
/// written for that token and the caller decides whether to rebuild.
/// `CacheShapeMismatch` if a rotation pair's buffer lengths differ.
pub fn feed_tokens(
    runtime: &mut dyn ModelRuntime,
    slots: &SlotRegistry,
    session: &mut DecodeSession,
    tokens: &[u32],
) -> Result<()> {
    for &token in tokens {
        if session.step() >= session.context_window() {
            return Err(EngineError::ContextOverflow {
                step: session.step(),
                context_window: session.context_window(),
            });
        }

        runtime.write_input_i32(slots.token, &[token as i32])?;
        runtime.write_input_i32(slots.position, &[session.step() as i32])?;

        session.attend_current();
        runtime.write_input_f32(slots.mask, &session.encoded_mask())?;

        runtime.run_forward_pass()?;
        rotate_cache(runtime, &slots.rotation)?;

        trace!(token, step = session.step(), "processed token");
        session.advance();
    }
    Ok(())
}

/// Copy every cache output buffer into its paired input buffer.
///
/// Buffer lengths must match exactly. Copying only the overlapping prefix
/// when lengths differ would silently corrupt the cache the moment the
/// model's buffer layout changes, so a mismatch fails fast instead.
fn rotate_cache(
    runtime: &mut dyn ModelRuntime,
    rotation: &CacheRotationMap,
) -> Result<()> {
    for &(input, output) in rotation.pairs() {
        let input_len = runtime.input_len(input)?;
        let output_len = runtime.output_len(output)?;
        if output_len != input_len {
            return Err(EngineError::CacheShapeMismatch {
                input,
                output,
                input_len,
                output_len,
            });
        }
        let content = runtime.read_output_f32(output)?;
        runtime.write_input_f32(input, &content)?;
    }
    Ok(())
}
