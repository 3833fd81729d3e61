//! `wh-sampler` - Candidate selection and word sampling for wordhint.
//!
//! The pipeline runs in three explicit stages, each producing new values:
//! 1. `top_scores` extracts the K highest raw logits from a vocabulary-sized
//!    score vector (`TokenScore`).
//! 2. `normalize` turns candidates carrying raw logits into a
//!    temperature-scaled probability distribution (`WeightedCandidate`).
//! 3. `RouletteSampler` draws without replacement from the weighted pool,
//!    applying a lexical filter, to build the final suggestion list.

pub mod candidate;
pub mod error;
pub mod lexical;
pub mod roulette;
pub mod softmax;
pub mod top_k;

pub use candidate::{Candidate, TokenScore, WeightedCandidate};
pub use error::{Result, SamplerError};
pub use lexical::is_suggestible;
pub use roulette::RouletteSampler;
pub use softmax::normalize;
pub use top_k::top_scores;
