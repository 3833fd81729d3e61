/// Returns true if a decoded token fragment is presentable as a word
/// suggestion: non-empty and composed only of ASCII letters, whitespace,
/// apostrophes, and light punctuation.
///
/// This screens out subword debris, digits, markup and control tokens that
/// the model ranks highly but that make no sense as an inline suggestion.
pub fn is_suggestible(text: &str) -> bool {
    !text.is_empty()
        && text.chars().all(|c| {
            c.is_ascii_alphabetic()
                || c.is_whitespace()
                || matches!(c, '\'' | ',' | '.' | ':' | ';' | '-')
        })
}
