//! Token translation for producing anonymized analysis fixtures.
//!
//! Translation rewrites every path and class-name token in an analysis and
//! replaces encoded API and source-info blobs with random base64 text. The
//! result still parses, merges, and splits like the original, but it is not a
//! valid analysis for the compiler and is never fed back into a build.

use std::collections::{HashMap, HashSet};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Maps real tokens to translated tokens.
pub trait TokenTranslator {
    /// Translates a path or class-name token.
    ///
    /// Must be stable: the same input always yields the same output within
    /// one translator, so keys and values referring to the same file stay
    /// linked.
    fn convert(&mut self, token: &str) -> String;

    /// Translates a base64-encoded blob.
    fn convert_base64(&mut self, blob: &str) -> String;
}

const BASE64_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Words left untouched so anonymized paths keep their recognizable shape.
const DEFAULT_KEEP_WORDS: &[&str] = &[
    "class", "com", "jar", "java", "lang", "net", "org", "scala", "src", "main", "test",
];

/// Attempts at drawing an unused replacement before accepting a collision.
const MAX_DRAWS: usize = 16;

/// Seeded, memoizing [`TokenTranslator`].
///
/// Splits each token into alphanumeric words and separators. Separators and
/// purely numeric words are kept; words in the keep list are kept; every
/// other word is replaced by a random word of the same length and letter
/// case. Replacements are memoized so a word maps to the same replacement
/// everywhere it appears.
pub struct Anonymizer {
    rng: StdRng,
    words: HashMap<String, String>,
    used: HashSet<String>,
    keep: HashSet<String>,
}

impl Anonymizer {
    /// Creates a translator whose output is fully determined by `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            words: HashMap::new(),
            used: HashSet::new(),
            keep: DEFAULT_KEEP_WORDS.iter().map(|w| w.to_string()).collect(),
        }
    }

    /// Adds a word that must never be replaced.
    pub fn keep_word(mut self, word: impl Into<String>) -> Self {
        self.keep.insert(word.into());
        self
    }

    fn translate_word(&mut self, word: &str) -> String {
        if self.keep.contains(word) || word.bytes().all(|b| b.is_ascii_digit()) {
            return word.to_string();
        }
        if let Some(existing) = self.words.get(word) {
            return existing.clone();
        }
        let mut candidate = self.draw_word(word);
        for _ in 1..MAX_DRAWS {
            if candidate != word && !self.used.contains(&candidate) {
                break;
            }
            candidate = self.draw_word(word);
        }
        self.used.insert(candidate.clone());
        self.words.insert(word.to_string(), candidate.clone());
        candidate
    }

    fn draw_word(&mut self, shape: &str) -> String {
        shape
            .chars()
            .map(|c| {
                if c.is_ascii_digit() {
                    char::from(self.rng.gen_range(b'0'..=b'9'))
                } else if c.is_uppercase() {
                    char::from(self.rng.gen_range(b'A'..=b'Z'))
                } else {
                    char::from(self.rng.gen_range(b'a'..=b'z'))
                }
            })
            .collect()
    }
}

impl TokenTranslator for Anonymizer {
    fn convert(&mut self, token: &str) -> String {
        let mut out = String::with_capacity(token.len());
        let mut word = String::new();
        for c in token.chars() {
            if c.is_alphanumeric() {
                word.push(c);
            } else {
                if !word.is_empty() {
                    out.push_str(&self.translate_word(&word));
                    word.clear();
                }
                out.push(c);
            }
        }
        if !word.is_empty() {
            out.push_str(&self.translate_word(&word));
        }
        out
    }

    fn convert_base64(&mut self, blob: &str) -> String {
        let body = blob.trim_end_matches('=');
        let padding = &blob[body.len()..];
        let mut out: String = (0..body.len())
            .map(|_| char::from(BASE64_ALPHABET[self.rng.gen_range(0..BASE64_ALPHABET.len())]))
            .collect();
        out.push_str(padding);
        out
    }
}
