//! `wh-engine` - Incremental next-word decoding engine for wordhint.
//!
//! This crate provides:
//! - `DecodeSession` tracking step count, attention mask state, and the
//!   text already consumed
//! - The context tracker deciding between prefix-extension reuse and a full
//!   session rebuild
//! - The step executor driving a `ModelRuntime` one token at a time while
//!   rotating key/value cache buffers between forward passes
//! - The `Tokenizer` boundary plus a vocabulary-table reference tokenizer
//! - `SuggestionEngine`, the caller-facing `predict_next_words` API

pub mod context;
pub mod engine;
pub mod error;
pub mod executor;
pub mod session;
pub mod template;
pub mod tokenizer;

pub use context::ContextPlan;
pub use engine::{EngineConfig, SuggestionEngine};
pub use error::{EngineError, Result};
pub use session::DecodeSession;
pub use template::PromptTemplate;
pub use tokenizer::{Tokenizer, VocabTokenizer};
