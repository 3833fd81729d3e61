use thiserror::Error;
use wh_runtime::{RuntimeError, SlotId};
use wh_sampler::SamplerError;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("context window exhausted: step {step} of {context_window}")]
    ContextOverflow { step: usize, context_window: usize },
    #[error(
        "cache rotation {output} -> {input}: output holds {output_len} \
         elements, input expects {input_len}"
    )]
    CacheShapeMismatch {
        input: SlotId,
        output: SlotId,
        input_len: usize,
        output_len: usize,
    },
    #[error("tokenizer not initialized")]
    TokenizerUnavailable,
    #[error("tokenizer error: {0}")]
    Tokenizer(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("runtime error: {0}")]
    Runtime(#[from] RuntimeError),
    #[error("sampler error: {0}")]
    Sampler(#[from] SamplerError),
}

pub type Result<T> = std::result::Result<T, EngineError>;
