pub mod vocab;

pub use vocab::VocabTokenizer;

use crate::error::Result;

/// The sentencepiece whitespace marker (U+2581, "lower one eighth block").
/// Model vocabularies store leading spaces as this character.
pub const PIECE_MARKER: char = '\u{2581}';

/// Subword tokenizer boundary.
///
/// Implementations must perform the whitespace <-> piece-marker substitution
/// consistently on both sides: `encode` sees marker-substituted text and
/// `decode_piece` returns plain text with real spaces. Implementations must
/// be fully initialized before first use and report failure through
/// `Result` rather than panicking.
pub trait Tokenizer: Send + Sync {
    /// Encode text into an ordered sequence of token ids.
    fn encode(&self, text: &str) -> Result<Vec<u32>>;

    /// Decode a single token id into its text fragment, with piece markers
    /// already replaced by spaces.
    fn decode_piece(&self, id: u32) -> Result<String>;

    /// The beginning-of-sequence token id.
    fn bos_id(&self) -> u32;
}

/// Replace spaces with the piece marker before vocabulary matching.
pub fn mark_spaces(text: &str) -> String {
    text.replace(' ', &PIECE_MARKER.to_string())
}

/// Replace piece markers with spaces after vocabulary lookup.
pub fn unmark_spaces(piece: &str) -> String {
    piece.replace(PIECE_MARKER, " ")
}
