use tracing::{debug, info};
use wh_runtime::{ModelRuntime, SlotId, SlotRegistry};
use wh_sampler::{normalize, top_scores, Candidate, RouletteSampler, SamplerError};

use crate::context::plan_request;
use crate::error::Result;
use crate::executor::feed_tokens;
use crate::session::DecodeSession;
use crate::template::PromptTemplate;
use crate::tokenizer::Tokenizer;

/// Tunables for a suggestion engine instance.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Maximum sequential positions the model attends over.
    pub context_window: usize,
    /// How many top-scoring vocabulary entries enter the sampling pool.
    pub candidate_pool: usize,
    /// Fixed RNG seed for reproducible suggestions; entropy-seeded if unset.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            context_window: 2048,
            candidate_pool: 200,
            seed: None,
        }
    }
}

/// The caller-facing next-word suggestion engine.
///
/// Owns one `DecodeSession` per loaded model and drives the full pipeline:
/// context tracking, token stepping with cache rotation, top-K candidate
/// extraction, temperature softmax, and roulette sampling.
///
/// Not internally synchronized: `predict_next_words` takes `&mut self` and
/// the borrow checker enforces the one-in-flight-request rule. Callers run
/// it off the UI thread and serialize or queue requests themselves. There is
/// no cancellation primitive; abandoning a long decode means dropping the
/// engine or issuing a non-prefix request, which rebuilds the session.
pub struct SuggestionEngine {
    runtime: Option<Box<dyn ModelRuntime>>,
    tokenizer: Option<Box<dyn Tokenizer>>,
    slots: SlotRegistry,
    session: DecodeSession,
    template: PromptTemplate,
    sampler: RouletteSampler,
    candidate_pool: usize,
}

impl SuggestionEngine {
    /// Build an engine around a loaded runtime and tokenizer.
    ///
    /// Validates the slot registry against the runtime's buffer counts up
    /// front so a bad layout fails at composition time, not mid-decode.
    pub fn new(
        runtime: Box<dyn ModelRuntime>,
        tokenizer: Box<dyn Tokenizer>,
        slots: SlotRegistry,
        template: PromptTemplate,
        config: EngineConfig,
    ) -> Result<Self> {
        slots.validate(runtime.as_ref())?;
        info!(
            runtime = runtime.name(),
            context_window = config.context_window,
            candidate_pool = config.candidate_pool,
            "suggestion engine ready"
        );
        Ok(SuggestionEngine {
            runtime: Some(runtime),
            tokenizer: Some(tokenizer),
            slots,
            session: DecodeSession::new(config.context_window),
            template,
            sampler: match config.seed {
                Some(seed) => RouletteSampler::from_seed(seed),
                None => RouletteSampler::from_entropy(),
            },
            candidate_pool: config.candidate_pool,
        })
    }

    /// An engine with no model attached. Every prediction returns an empty
    /// list; suggestion generation is best-effort and a missing model is
    /// not an error.
    pub fn detached(config: EngineConfig) -> Self {
        SuggestionEngine {
            runtime: None,
            tokenizer: None,
            slots: SlotRegistry::new(0, 0, 0, 0, Default::default()),
            session: DecodeSession::new(config.context_window),
            template: PromptTemplate::default(),
            sampler: match config.seed {
                Some(seed) => RouletteSampler::from_seed(seed),
                None => RouletteSampler::from_entropy(),
            },
            candidate_pool: config.candidate_pool,
        }
    }

    /// The current decode session state.
    pub fn session(&self) -> &DecodeSession {
        &self.session
    }

    /// Returns true if a model runtime is attached.
    pub fn is_ready(&self) -> bool {
        self.runtime.is_some()
    }

    /// Produce up to `top_k` distinct next-word suggestions for the editor
    /// text, sampling at the given temperature.
    ///
    /// Reuses the previous decode when `text` extends the last request;
    /// otherwise zeroes every runtime input buffer and reprocesses the full
    /// formatted prompt. Synchronous; the caller is responsible for
    /// off-thread execution.
    ///
    /// # Errors
    /// `InvalidTemperature` for non-positive temperature,
    /// `TokenizerUnavailable` if no tokenizer is attached,
    /// `ContextOverflow` when the window is exhausted (the caller may retry
    /// after a non-prefix request), plus runtime failures. A missing model
    /// is NOT an error: the result is `Ok` and empty.
    pub fn predict_next_words(
        &mut self,
        text: &str,
        top_k: usize,
        temperature: f32,
    ) -> Result<Vec<String>> {
        if temperature <= 0.0 || !temperature.is_finite() {
            return Err(SamplerError::InvalidTemperature(temperature).into());
        }

        let Some(runtime) = self.runtime.as_deref_mut() else {
            debug!("no model runtime attached, returning no suggestions");
            return Ok(Vec::new());
        };
        let tokenizer = self
            .tokenizer
            .as_deref()
            .ok_or(crate::EngineError::TokenizerUnavailable)?;

        let plan = plan_request(&mut self.session, tokenizer, &self.template, text)?;
        if plan.is_rebuild() {
            for slot in 0..runtime.input_count() {
                runtime.zero_input(SlotId(slot))?;
            }
        }
        debug!(
            rebuild = plan.is_rebuild(),
            tokens = plan.tokens().len(),
            step = self.session.step(),
            "context plan"
        );

        if let Err(err) = feed_tokens(runtime, &self.slots, &mut self.session, plan.tokens()) {
            // Part of the plan may already be in the cache, so the session
            // no longer matches any request text. Clearing the consumed
            // text forces the next request onto the rebuild path.
            self.session.set_previous_text("");
            return Err(err);
        }
        self.session.set_previous_text(text);

        let logits = runtime.read_output_f32(self.slots.logits)?;
        let scores = top_scores(&logits, self.candidate_pool);
        debug!(candidates = scores.len(), "extracted candidate pool");

        let mut candidates = Vec::with_capacity(scores.len());
        for score in scores {
            let piece = tokenizer.decode_piece(score.id)?;
            candidates.push(Candidate::from_score(score, piece));
        }

        let weighted = normalize(candidates, temperature)?;
        Ok(self.sampler.suggest(weighted, top_k))
    }
}
