/// A vocabulary entry paired with its raw logit, before any decoding.
///
/// Produced by `top_scores`; text decoding is deferred until the survivors
/// are known, so the tokenizer is consulted K times rather than once per
/// vocabulary entry.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenScore {
    pub id: u32,
    pub logit: f32,
}

/// A decoded candidate still carrying its raw logit.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub id: u32,
    pub text: String,
    pub logit: f32,
}

impl Candidate {
    /// Attach decoded text to a `TokenScore`.
    pub fn from_score(score: TokenScore, text: String) -> Self {
        Candidate {
            id: score.id,
            text,
            logit: score.logit,
        }
    }
}

/// A candidate whose score has been normalized into a probability.
///
/// Each pipeline stage returns a distinct type, so a raw logit, an
/// unnormalized weight, and a probability never share a field whose unit
/// depends on which stage last touched it.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedCandidate {
    pub id: u32,
    pub text: String,
    /// Probability in [0, 1]; a full pool sums to 1 within float tolerance.
    pub probability: f32,
}
