//! Morpheme dictionary: load, validate, and order substitution pairs.
//!
//! A dictionary file is a flat JSON object mapping source strings to
//! replacement strings. Keys are folded to ASCII lowercase on load and kept
//! sorted longest first, so a scanner trying entries in order performs
//! greedy longest-match substitution.

use serde::Deserialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug)]
pub enum LexiconError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    EmptyKey,
    DuplicateKey(String),
}

impl std::fmt::Display for LexiconError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LexiconError::Io(err) => write!(f, "cannot read dictionary: {err}"),
            LexiconError::Parse(err) => write!(f, "cannot parse dictionary: {err}"),
            LexiconError::EmptyKey => write!(f, "dictionary contains an empty key"),
            LexiconError::DuplicateKey(key) => {
                write!(f, "dictionary keys collide after case folding: {key:?}")
            }
        }
    }
}

impl std::error::Error for LexiconError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LexiconError::Io(err) => Some(err),
            LexiconError::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for LexiconError {
    fn from(err: std::io::Error) -> Self {
        LexiconError::Io(err)
    }
}

impl From<serde_json::Error> for LexiconError {
    fn from(err: serde_json::Error) -> Self {
        LexiconError::Parse(err)
    }
}

#[derive(Deserialize)]
#[serde(transparent)]
struct MorphemeFile(BTreeMap<String, String>);

/// One substitution pair. `source` is ASCII lowercase; `replacement` is
/// kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Morpheme {
    pub source: String,
    pub replacement: String,
}

/// Validated dictionary, ordered for greedy matching.
#[derive(Debug)]
pub struct Lexicon {
    morphemes: Vec<Morpheme>,
    // Which bytes can start a key, with ASCII letters folded to lowercase.
    leading: [bool; 256],
}

impl Lexicon {
    /// Read and validate a dictionary file.
    pub fn load(path: &Path) -> Result<Self, LexiconError> {
        let bytes = std::fs::read(path)?;
        let lexicon = Self::from_json(&bytes)?;
        log::debug!(
            target: "shred.lexicon",
            "loaded {} morphemes from {}",
            lexicon.len(),
            path.display()
        );
        Ok(lexicon)
    }

    /// Parse a dictionary from raw JSON bytes.
    pub fn from_json(bytes: &[u8]) -> Result<Self, LexiconError> {
        let file: MorphemeFile = serde_json::from_slice(bytes)?;
        Self::from_pairs(file.0)
    }

    /// Build a dictionary from source/replacement pairs.
    ///
    /// Keys are folded to ASCII lowercase; the empty key and keys that
    /// collide after folding are rejected. An empty dictionary is legal and
    /// simply matches nothing.
    pub fn from_pairs<I>(pairs: I) -> Result<Self, LexiconError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut morphemes = Vec::new();
        for (key, replacement) in pairs {
            if key.is_empty() {
                return Err(LexiconError::EmptyKey);
            }
            morphemes.push(Morpheme {
                source: key.to_ascii_lowercase(),
                replacement,
            });
        }
        // Longest first so the first hit is the greedy match; equal lengths
        // fall back to byte order to keep scans deterministic.
        morphemes.sort_by(|a, b| match b.source.len().cmp(&a.source.len()) {
            Ordering::Equal => a.source.cmp(&b.source),
            unequal => unequal,
        });
        for pair in morphemes.windows(2) {
            if pair[0].source == pair[1].source {
                return Err(LexiconError::DuplicateKey(pair[0].source.clone()));
            }
        }
        let mut leading = [false; 256];
        for morpheme in &morphemes {
            leading[morpheme.source.as_bytes()[0] as usize] = true;
        }
        Ok(Self { morphemes, leading })
    }

    /// Entries in match order: longest source first.
    pub fn morphemes(&self) -> &[Morpheme] {
        &self.morphemes
    }

    /// Whether any key starts with this byte, ASCII case ignored. A cheap
    /// reject before per-entry comparisons.
    pub fn could_match(&self, byte: u8) -> bool {
        self.leading[byte.to_ascii_lowercase() as usize]
    }

    pub fn len(&self) -> usize {
        self.morphemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.morphemes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn orders_longest_source_first() {
        let lexicon =
            Lexicon::from_pairs(pairs(&[("lo", "LOW"), ("hello", "HI"), ("he", "EH")]))
                .expect("valid");
        let sources: Vec<&str> = lexicon.morphemes().iter().map(|m| m.source.as_str()).collect();
        assert_eq!(sources, vec!["hello", "he", "lo"]);
    }

    #[test]
    fn equal_lengths_fall_back_to_byte_order() {
        let lexicon = Lexicon::from_pairs(pairs(&[("zz", "1"), ("aa", "2"), ("mm", "3")]))
            .expect("valid");
        let sources: Vec<&str> = lexicon.morphemes().iter().map(|m| m.source.as_str()).collect();
        assert_eq!(sources, vec!["aa", "mm", "zz"]);
    }

    #[test]
    fn keys_fold_to_lowercase_and_values_stay_verbatim() {
        let lexicon = Lexicon::from_pairs(pairs(&[("HeLLo", "HI")])).expect("valid");
        assert_eq!(lexicon.morphemes()[0].source, "hello");
        assert_eq!(lexicon.morphemes()[0].replacement, "HI");
    }

    #[test]
    fn empty_key_is_rejected() {
        let err = Lexicon::from_pairs(pairs(&[("", "nothing")])).unwrap_err();
        assert!(matches!(err, LexiconError::EmptyKey));
    }

    #[test]
    fn case_folded_collisions_are_rejected() {
        let err = Lexicon::from_pairs(pairs(&[("Hello", "A"), ("hello", "B")])).unwrap_err();
        assert!(matches!(err, LexiconError::DuplicateKey(key) if key == "hello"));
    }

    #[test]
    fn empty_dictionary_is_legal() {
        let lexicon = Lexicon::from_pairs(Vec::new()).expect("valid");
        assert!(lexicon.is_empty());
        assert!(!lexicon.could_match(b'h'));
    }

    #[test]
    fn leading_byte_table_folds_probe_case() {
        let lexicon = Lexicon::from_pairs(pairs(&[("hello", "HI")])).expect("valid");
        assert!(lexicon.could_match(b'h'));
        assert!(lexicon.could_match(b'H'));
        assert!(!lexicon.could_match(b'x'));
    }

    #[test]
    fn parses_a_json_object() {
        let lexicon =
            Lexicon::from_json(br#"{ "hello": "HI", "lo": "LOW" }"#).expect("valid json");
        assert_eq!(lexicon.len(), 2);
        assert_eq!(lexicon.morphemes()[0].source, "hello");
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = Lexicon::from_json(b"[1, 2, 3]").unwrap_err();
        assert!(matches!(err, LexiconError::Parse(_)));
    }

    #[test]
    fn non_ascii_keys_survive_folding() {
        let lexicon = Lexicon::from_pairs(pairs(&[("grüß", "greet")])).expect("valid");
        assert_eq!(lexicon.morphemes()[0].source, "grüß");
        assert!(lexicon.could_match("grüß".as_bytes()[0]));
    }
}
