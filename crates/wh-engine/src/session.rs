/// Mutable decoding state for one loaded model.
///
/// Tracks how many tokens have been consumed since the last rebuild, which
/// window positions are attendable, and the exact text already fed through
/// the model (the key for prefix-extension reuse). Created once per loaded
/// model; mutated only by the context tracker and the step executor, in
/// strict sequence.
#[derive(Debug)]
pub struct DecodeSession {
    step: usize,
    attendable: Vec<bool>,
    previous_text: String,
    context_window: usize,
}

impl DecodeSession {
    /// Create a fresh session for a model with the given context window.
    pub fn new(context_window: usize) -> Self {
        DecodeSession {
            step: 0,
            attendable: vec![false; context_window],
            previous_text: String::new(),
            context_window,
        }
    }

    /// Tokens processed since the last rebuild. Always < context window
    /// after a successful step.
    pub fn step(&self) -> usize {
        self.step
    }

    /// Maximum number of sequential positions the model attends over.
    pub fn context_window(&self) -> usize {
        self.context_window
    }

    /// The exact text already consumed by the model.
    pub fn previous_text(&self) -> &str {
        &self.previous_text
    }

    /// Record the request text this session now covers.
    pub fn set_previous_text(&mut self, text: &str) {
        self.previous_text.clear();
        self.previous_text.push_str(text);
    }

    /// Drop all decoding progress: step back to 0 and every position
    /// un-attendable. `previous_text` is left alone; the engine overwrites
    /// it once the new request's tokens are actually consumed.
    pub fn restart(&mut self) {
        self.step = 0;
        self.attendable.fill(false);
    }

    /// Mark the current step's position attendable. Positions are filled
    /// monotonically from index 0 and never un-set within a session.
    pub fn attend_current(&mut self) {
        debug_assert!(self.step < self.context_window);
        self.attendable[self.step] = true;
    }

    /// Dense attention mask over the whole window: 0.0 for attendable
    /// positions, negative infinity for the rest. The full window is
    /// re-encoded every step to keep the runtime contract simple, at the
    /// cost of O(context_window) work per token.
    pub fn encoded_mask(&self) -> Vec<f32> {
        self.attendable
            .iter()
            .map(|&on| if on { 0.0 } else { f32::NEG_INFINITY })
            .collect()
    }

    /// Advance to the next step after a completed forward pass.
    pub fn advance(&mut self) {
        self.step += 1;
    }
}
