use std::sync::LazyLock;

use conmap_core::language::{Token, Tokenizer};
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Decimal numbers, then words (apostrophes and hyphens join), then single punctuation
static JOINED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\p{N}+(?:[.,]\p{N}+)+|[\p{L}\p{M}\p{N}]+(?:['’-][\p{L}\p{M}\p{N}]+)*|[^\s\p{L}\p{M}\p{N}]")
        .expect("valid joined token pattern")
});

/// Same as [`JOINED`] but hyphens always separate
static SPLIT_HYPHENS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\p{N}+(?:[.,]\p{N}+)+|[\p{L}\p{M}\p{N}]+(?:['’][\p{L}\p{M}\p{N}]+)*|[^\s\p{L}\p{M}\p{N}]")
        .expect("valid split token pattern")
});

pub const WORD: &str = "word";
pub const NUMBER: &str = "number";
pub const PUNCT: &str = "punct";

/// English tokenizer: NFKC normalization, then word/number/punctuation segmentation
pub struct EnglishTokenizer {
    split_hyphens: bool,
    keep_punctuation: bool,
    /// NFKC form of the text being tokenized
    buffer: String,
}

impl EnglishTokenizer {
    pub fn new() -> Self {
        Self {
            split_hyphens: false,
            keep_punctuation: true,
            buffer: String::new(),
        }
    }

    /// Emit `new-york` as three tokens instead of one
    pub fn split_hyphens(mut self, split: bool) -> Self {
        self.split_hyphens = split;
        self
    }

    /// Drop punctuation tokens entirely
    pub fn keep_punctuation(mut self, keep: bool) -> Self {
        self.keep_punctuation = keep;
        self
    }

    fn pattern(&self) -> &'static Regex {
        if self.split_hyphens { &SPLIT_HYPHENS } else { &JOINED }
    }
}

impl Default for EnglishTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

fn kind_of(surface: &str) -> &'static str {
    if surface.starts_with(char::is_numeric) && surface.chars().all(|c| c.is_numeric() || c == '.' || c == ',') {
        NUMBER
    } else if surface.chars().any(char::is_alphanumeric) {
        WORD
    } else {
        PUNCT
    }
}

impl Tokenizer for EnglishTokenizer {
    fn language_code(&self) -> &str {
        "en"
    }

    fn tokenize(&mut self, text: &str, language: &str) -> Vec<Token> {
        if !language.is_empty() && !language.starts_with("en") {
            tracing::debug!("english tokenizer used for language '{}'", language);
        }

        self.buffer.clear();
        self.buffer.extend(text.nfkc());

        let pattern = self.pattern();
        let keep_punctuation = self.keep_punctuation;

        pattern
            .find_iter(&self.buffer)
            .map(|m| (m.as_str(), kind_of(m.as_str())))
            .filter(|(_, kind)| keep_punctuation || *kind != PUNCT)
            .enumerate()
            .map(|(position, (surface, kind))| Token {
                surface: surface.to_string(),
                normalized: surface.to_lowercase(),
                kind: kind.to_string(),
                position,
            })
            .collect()
    }
}
