use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Segments dictionary text exactly as the runtime matcher segments documents.
///
/// Calls take `&mut self`: implementations may reuse a per-call buffer, so a
/// tokenizer is never invoked concurrently.
pub trait Tokenizer {
    /// Language identifier this tokenizer was built for
    fn language_code(&self) -> &str;

    /// Break `text` into tokens, in document order
    fn tokenize(&mut self, text: &str, language: &str) -> Vec<Token>;
}

/// Builds a [`Tokenizer`] from its configuration handle.
pub trait TokenizerFactory {
    fn build(&self, config: &TokenizerConfig) -> Result<Box<dyn Tokenizer>, TokenizerInitError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub surface: String,
    pub normalized: String,
    /// Token class, e.g. `word`, `number`, `punct`
    pub kind: String,
    pub position: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenizerInitError {
    #[error("Unknown tokenizer: {0}")]
    UnknownTokenizer(String),

    #[error("Invalid tokenizer option {name}={value}: {reason}")]
    InvalidOption {
        name: String,
        value: String,
        reason: String,
    },
}

/// Names a tokenizer and its options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenizerConfig {
    pub name: String,
    #[serde(default)]
    pub options: BTreeMap<String, String>,
}

impl TokenizerConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: BTreeMap::new(),
        }
    }

    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(name.into(), value.into());
        self
    }

    pub fn option(&self, name: &str) -> Option<&str> {
        self.options.get(name).map(String::as_str)
    }
}

impl fmt::Display for TokenizerConfig {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for (name, value) in &self.options {
            write!(f, " {name}={value}")?;
        }
        Ok(())
    }
}

/// Which token field carries the text used for a phrase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenField {
    #[default]
    Surface,
    Normalized,
}

/// Picks the tokens and the token text the dictionary is built from.
///
/// Textual form: `[kind:]field`, e.g. `surface` or `word:normalized`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TokenSelector {
    /// Only tokens of this kind count; all kinds if unset
    pub kind: Option<String>,
    pub field: TokenField,
}

impl TokenSelector {
    pub fn select(&self, tokens: Vec<Token>) -> Vec<String> {
        tokens
            .into_iter()
            .filter(|token| self.kind.as_deref().is_none_or(|kind| token.kind == kind))
            .map(|token| match self.field {
                TokenField::Surface => token.surface,
                TokenField::Normalized => token.normalized,
            })
            .collect()
    }
}

impl FromStr for TokenSelector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, field) = match s.split_once(':') {
            Some((kind, field)) if !kind.is_empty() => (Some(kind.to_string()), field),
            Some((_, field)) => (None, field),
            None => (None, s),
        };

        let field = match field {
            "" | "surface" => TokenField::Surface,
            "normalized" => TokenField::Normalized,
            other => return Err(format!("unknown token field '{other}'")),
        };

        Ok(Self { kind, field })
    }
}

impl TryFrom<String> for TokenSelector {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TokenSelector> for String {
    fn from(selector: TokenSelector) -> Self {
        selector.to_string()
    }
}

impl fmt::Display for TokenSelector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let field = match self.field {
            TokenField::Surface => "surface",
            TokenField::Normalized => "normalized",
        };
        match &self.kind {
            Some(kind) => write!(f, "{kind}:{field}"),
            None => write!(f, "{field}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(surface: &str, kind: &str) -> Token {
        Token {
            surface: surface.to_string(),
            normalized: surface.to_lowercase(),
            kind: kind.to_string(),
            position: 0,
        }
    }

    #[test]
    fn test_selector_parsing() {
        let selector: TokenSelector = "word:normalized".parse().unwrap();
        assert_eq!(selector.kind.as_deref(), Some("word"));
        assert_eq!(selector.field, TokenField::Normalized);
        assert_eq!(selector.to_string(), "word:normalized");

        assert_eq!("surface".parse::<TokenSelector>().unwrap(), TokenSelector::default());
        assert!("word:lemma".parse::<TokenSelector>().is_err());
    }

    #[test]
    fn test_selector_filters_kind_and_picks_field() {
        let tokens = vec![token("Fish", "word"), token(",", "punct"), token("Chips", "word")];

        let all = TokenSelector::default().select(tokens.clone());
        assert_eq!(all, vec!["Fish", ",", "Chips"]);

        let words: TokenSelector = "word:normalized".parse().unwrap();
        assert_eq!(words.select(tokens), vec!["fish", "chips"]);
    }

    #[test]
    fn test_selector_serde_uses_text_form() {
        let selector: TokenSelector = serde_json::from_str("\"word:surface\"").unwrap();
        assert_eq!(selector.kind.as_deref(), Some("word"));
        assert_eq!(serde_json::to_string(&selector).unwrap(), "\"word:surface\"");
    }

    #[test]
    fn test_tokenizer_config_display() {
        let config = TokenizerConfig::new("english").with_option("split_hyphens", "true");
        assert_eq!(config.to_string(), "english split_hyphens=true");
        assert_eq!(config.option("split_hyphens"), Some("true"));
    }
}
