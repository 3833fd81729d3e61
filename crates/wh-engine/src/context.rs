use tracing::debug;

use crate::error::Result;
use crate::session::DecodeSession;
use crate::template::PromptTemplate;
use crate::tokenizer::Tokenizer;

/// The minimal decoding work for one suggestion request.
#[derive(Debug, Clone, PartialEq)]
pub enum ContextPlan {
    /// The request extends the text already consumed; only the appended
    /// suffix needs to be processed and all cache state is kept.
    Extend { tokens: Vec<u32> },
    /// The request does not extend the previous text; the session was
    /// restarted and the whole formatted prompt must be reprocessed. The
    /// caller is responsible for zeroing the runtime's input buffers before
    /// feeding these tokens.
    Rebuild { tokens: Vec<u32> },
}

impl ContextPlan {
    /// The ordered token ids to feed to the step executor.
    pub fn tokens(&self) -> &[u32] {
        match self {
            ContextPlan::Extend { tokens } | ContextPlan::Rebuild { tokens } => tokens,
        }
    }

    /// Returns true for the rebuild path.
    pub fn is_rebuild(&self) -> bool {
        matches!(self, ContextPlan::Rebuild { .. })
    }
}

/// Decide how much of the previous computation survives the new request.
///
/// If the request text starts with the text already consumed, only the new
/// suffix is tokenized and the session keeps its step count and mask state.
/// Anything else (including an identical or shorter request, or an empty
/// previous text) restarts the session and tokenizes the full formatted
/// prompt, force-prepending the beginning-of-sequence id if the tokenizer
/// did not emit it first. An empty request still runs the rebuild path
/// deterministically, template wrapper included.
///
/// `session.previous_text` is NOT touched here: it must keep describing the
/// text actually consumed, so the engine records the request text only once
/// the planned tokens have all been fed.
pub fn plan_request(
    session: &mut DecodeSession,
    tokenizer: &dyn Tokenizer,
    template: &PromptTemplate,
    request: &str,
) -> Result<ContextPlan> {
    if !session.previous_text().is_empty() && request.starts_with(session.previous_text()) {
        let delta = &request[session.previous_text().len()..];
        let tokens = tokenizer.encode(delta)?;
        debug!(
            delta_chars = delta.len(),
            delta_tokens = tokens.len(),
            "extending previous context"
        );
        return Ok(ContextPlan::Extend { tokens });
    }

    session.restart();

    let prompt = template.format(request);
    let mut tokens = tokenizer.encode(&prompt)?;
    if tokens.first() != Some(&tokenizer.bos_id()) {
        tokens.insert(0, tokenizer.bos_id());
    }
    debug!(prompt_tokens = tokens.len(), "rebuilding context");
    Ok(ContextPlan::Rebuild { tokens })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::VocabTokenizer;

    fn tokenizer() -> VocabTokenizer {
        let mut pieces: Vec<String> = vec!["<unk>".into(), "<bos>".into()];
        // Single-char coverage of the template plus a few word pieces.
        for c in "<>_startofunrmodel\n\u{2581}Theca.sWrip!Xyz".chars() {
            let piece = c.to_string();
            if !pieces.contains(&piece) {
                pieces.push(piece);
            }
        }
        for piece in ["\u{2581}The", "\u{2581}cat", "\u{2581}sat", "The"] {
            pieces.push(piece.to_string());
        }
        VocabTokenizer::new(pieces, 1).unwrap()
    }

    #[test]
    fn test_prefix_extension_tokenizes_only_the_suffix() {
        let tok = tokenizer();
        let template = PromptTemplate::default();
        let mut session = DecodeSession::new(64);
        session.set_previous_text("The cat");

        let plan = plan_request(&mut session, &tok, &template, "The cat sat").unwrap();
        assert!(!plan.is_rebuild());
        assert_eq!(plan.tokens(), tok.encode(" sat").unwrap().as_slice());
        // Consuming the suffix is the engine's job; the plan alone must not
        // claim the new text was fed.
        assert_eq!(session.previous_text(), "The cat");
    }

    #[test]
    fn test_extension_keeps_step() {
        let tok = tokenizer();
        let template = PromptTemplate::default();
        let mut session = DecodeSession::new(64);
        session.set_previous_text("The");
        session.attend_current();
        session.advance();

        plan_request(&mut session, &tok, &template, "The cat").unwrap();
        assert_eq!(session.step(), 1);
        assert_eq!(session.encoded_mask()[0], 0.0);
    }

    #[test]
    fn test_non_prefix_request_restarts() {
        let tok = tokenizer();
        let template = PromptTemplate::default();
        let mut session = DecodeSession::new(64);
        session.set_previous_text("The cat sat");
        session.attend_current();
        session.advance();

        let plan =
            plan_request(&mut session, &tok, &template, "Xyz entirely").unwrap();
        assert!(plan.is_rebuild());
        assert_eq!(session.step(), 0);
        assert!(session.encoded_mask().iter().all(|&m| m == f32::NEG_INFINITY));
        assert_eq!(session.previous_text(), "The cat sat");
    }

    #[test]
    fn test_first_request_is_a_rebuild() {
        let tok = tokenizer();
        let template = PromptTemplate::default();
        let mut session = DecodeSession::new(64);

        let plan = plan_request(&mut session, &tok, &template, "The cat").unwrap();
        assert!(plan.is_rebuild());
        // Full formatted prompt, not just the request.
        let expected = {
            let mut t = tok.encode(&template.format("The cat")).unwrap();
            t.insert(0, tok.bos_id());
            t
        };
        assert_eq!(plan.tokens(), expected.as_slice());
    }

    #[test]
    fn test_bos_is_prepended_once() {
        let tok = tokenizer();
        let template = PromptTemplate::default();
        let mut session = DecodeSession::new(64);

        let plan = plan_request(&mut session, &tok, &template, "The").unwrap();
        let tokens = plan.tokens();
        assert_eq!(tokens[0], tok.bos_id());
        assert_ne!(tokens.get(1), Some(&tok.bos_id()));
    }

    #[test]
    fn test_empty_request_still_rebuilds() {
        let tok = tokenizer();
        let template = PromptTemplate::default();
        let mut session = DecodeSession::new(64);
        session.set_previous_text("The cat");

        let plan = plan_request(&mut session, &tok, &template, "").unwrap();
        assert!(plan.is_rebuild());
        assert!(!plan.tokens().is_empty());
        assert_eq!(session.previous_text(), "The cat");
    }

    #[test]
    fn test_identical_request_is_a_noop_extension() {
        // startswith holds with an empty delta: an exact repeat is an
        // extension with nothing left to feed.
        let tok = tokenizer();
        let template = PromptTemplate::default();
        let mut session = DecodeSession::new(64);
        session.set_previous_text("The cat");

        let plan = plan_request(&mut session, &tok, &template, "The cat").unwrap();
        assert!(!plan.is_rebuild());
        assert!(plan.tokens().is_empty());
    }
}
