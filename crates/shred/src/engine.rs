//! Greedy longest-match substitution over a single string.

use lexicon::{Lexicon, Morpheme};

/// Rewrite `input` by scanning left to right and replacing every dictionary
/// match, longest key first.
///
/// Lookup ignores ASCII case; replacement text is emitted exactly as the
/// dictionary spells it. On a match the cursor advances by the matched key's
/// length in the input, otherwise by one character. Total over all inputs;
/// an empty dictionary or empty input comes back unchanged.
pub fn translate(lexicon: &Lexicon, input: &str) -> String {
    if lexicon.is_empty() || input.is_empty() {
        return input.to_string();
    }
    let bytes = input.as_bytes();
    let mut out = String::with_capacity(bytes.len());
    let mut cursor = 0;
    while cursor < bytes.len() {
        if lexicon.could_match(bytes[cursor]) {
            if let Some(hit) = match_at(lexicon, &bytes[cursor..]) {
                out.push_str(&hit.replacement);
                // Non-ASCII bytes only match exactly, so the matched window
                // shares the key's UTF-8 structure and ends on a char
                // boundary.
                cursor += hit.source.len();
                continue;
            }
        }
        match input[cursor..].chars().next() {
            Some(ch) => {
                out.push(ch);
                cursor += ch.len_utf8();
            }
            None => break,
        }
    }
    out
}

/// First dictionary entry whose source is an ASCII-case-insensitive prefix
/// of `rest`. Entries are ordered longest first, so the first hit is the
/// greedy one.
fn match_at<'a>(lexicon: &'a Lexicon, rest: &[u8]) -> Option<&'a Morpheme> {
    lexicon.morphemes().iter().find(|morpheme| {
        let key = morpheme.source.as_bytes();
        rest.len() >= key.len() && rest[..key.len()].eq_ignore_ascii_case(key)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lexicon(raw: &[(&str, &str)]) -> Lexicon {
        Lexicon::from_pairs(raw.iter().map(|(k, v)| (k.to_string(), v.to_string())))
            .expect("test dictionary")
    }

    #[test]
    fn longest_match_wins() {
        let lex = lexicon(&[("a", "X"), ("ab", "Y")]);
        assert_eq!(translate(&lex, "ab"), "Y");
        assert_eq!(translate(&lex, "aab"), "XY");
    }

    #[test]
    fn lookup_ignores_case_replacement_does_not() {
        let lex = lexicon(&[("cat", "DOG")]);
        assert_eq!(translate(&lex, "CAT"), "DOG");
        assert_eq!(translate(&lex, "CaT and cat"), "DOG and DOG");
    }

    #[test]
    fn unmatched_text_passes_through() {
        let lex = lexicon(&[("hello", "HI")]);
        assert_eq!(translate(&lex, "nothing here"), "nothing here");
        assert_eq!(translate(&lex, ""), "");
    }

    #[test]
    fn empty_dictionary_is_identity() {
        let lex = lexicon(&[]);
        assert_eq!(translate(&lex, "heLLo"), "heLLo");
    }

    #[test]
    fn overlapping_keys_resolve_left_to_right() {
        let lex = lexicon(&[("hello", "HI"), ("lo", "LOW")]);
        assert_eq!(translate(&lex, "heLLo world, LO!"), "HI world, LOW!");
    }

    #[test]
    fn cursor_advances_by_source_not_replacement_length() {
        let lex = lexicon(&[("ab", "ABAB")]);
        assert_eq!(translate(&lex, "abab"), "ABABABAB");
    }

    #[test]
    fn matches_inside_words() {
        // Substring semantics: no word-boundary check is applied.
        let lex = lexicon(&[("lo", "LOW")]);
        assert_eq!(translate(&lex, "balloon"), "balLOWon");
    }

    #[test]
    fn multibyte_neighbours_survive() {
        let lex = lexicon(&[("lo", "LOW")]);
        assert_eq!(translate(&lex, "héllo wörld"), "hélLOW wörld");
    }

    #[test]
    fn non_ascii_keys_match_exactly() {
        let lex = lexicon(&[("grüß", "greet")]);
        assert_eq!(translate(&lex, "grüß dich"), "greet dich");
        // ASCII folding never touches non-ASCII bytes.
        assert_eq!(translate(&lex, "GRÜSS dich"), "GRÜSS dich");
    }

    #[test]
    fn replacement_may_be_empty() {
        let lex = lexicon(&[("noise", "")]);
        assert_eq!(translate(&lex, "a noise b"), "a  b");
    }

    #[test]
    fn equal_length_keys_apply_deterministically() {
        let lex = lexicon(&[("ab", "1"), ("ba", "2")]);
        assert_eq!(translate(&lex, "abba"), "12");
        assert_eq!(translate(&lex, "baab"), "21");
    }
}
