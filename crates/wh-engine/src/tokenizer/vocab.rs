use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{EngineError, Result};
use super::{mark_spaces, unmark_spaces, Tokenizer};

/// Greedy longest-match tokenizer over a plain piece table.
///
/// Stands in for the real sentencepiece service behind the same trait: it
/// matches the longest vocabulary piece at each position of the
/// marker-substituted input, falling back to the unknown id for a single
/// character when nothing matches. Good enough for tests and harnesses; a
/// production build swaps in a real subword implementation.
#[derive(Debug)]
pub struct VocabTokenizer {
    pieces: Vec<String>,
    piece_to_id: HashMap<String, u32>,
    max_piece_chars: usize,
    bos_id: u32,
    unk_id: u32,
}

impl VocabTokenizer {
    /// Build a tokenizer from a piece table. Piece index is token id.
    ///
    /// # Errors
    /// `Tokenizer` if the table is empty or the bos id is out of range.
    pub fn new(pieces: Vec<String>, bos_id: u32) -> Result<Self> {
        if pieces.is_empty() {
            return Err(EngineError::Tokenizer(
                "empty vocabulary table".to_string(),
            ));
        }
        if bos_id as usize >= pieces.len() {
            return Err(EngineError::Tokenizer(format!(
                "bos id {} out of range for vocabulary of {}",
                bos_id,
                pieces.len()
            )));
        }

        let mut piece_to_id = HashMap::with_capacity(pieces.len());
        let mut max_piece_chars = 1;
        for (id, piece) in pieces.iter().enumerate() {
            max_piece_chars = max_piece_chars.max(piece.chars().count());
            piece_to_id.insert(piece.clone(), id as u32);
        }

        Ok(VocabTokenizer {
            pieces,
            piece_to_id,
            max_piece_chars,
            bos_id,
            unk_id: 0,
        })
    }

    /// Load a newline-delimited piece table from disk. Line number is token
    /// id; blank trailing lines are ignored.
    pub fn from_file(path: &Path, bos_id: u32) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let pieces: Vec<String> = raw
            .lines()
            .map(|line| line.to_string())
            .filter(|line| !line.is_empty())
            .collect();
        VocabTokenizer::new(pieces, bos_id)
    }

    /// Number of pieces in the table.
    pub fn vocab_size(&self) -> usize {
        self.pieces.len()
    }
}

impl Tokenizer for VocabTokenizer {
    fn encode(&self, text: &str) -> Result<Vec<u32>> {
        let marked = mark_spaces(text);
        let chars: Vec<char> = marked.chars().collect();

        let mut ids = Vec::new();
        let mut pos = 0;
        while pos < chars.len() {
            let limit = self.max_piece_chars.min(chars.len() - pos);
            let mut matched = None;
            // Longest match first.
            for len in (1..=limit).rev() {
                let candidate: String = chars[pos..pos + len].iter().collect();
                if let Some(&id) = self.piece_to_id.get(&candidate) {
                    matched = Some((id, len));
                    break;
                }
            }
            match matched {
                Some((id, len)) => {
                    ids.push(id);
                    pos += len;
                }
                None => {
                    ids.push(self.unk_id);
                    pos += 1;
                }
            }
        }
        Ok(ids)
    }

    fn decode_piece(&self, id: u32) -> Result<String> {
        let piece = self.pieces.get(id as usize).ok_or_else(|| {
            EngineError::Tokenizer(format!(
                "token id {} out of range for vocabulary of {}",
                id,
                self.pieces.len()
            ))
        })?;
        Ok(unmark_spaces(piece))
    }

    fn bos_id(&self) -> u32 {
        self.bos_id
    }
}
