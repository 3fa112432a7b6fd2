use std::cell::Cell;
use std::rc::Rc;

use crate::language::{Token, Tokenizer, TokenizerConfig, TokenizerFactory, TokenizerInitError};
use crate::loader::ElementNames;
use crate::resource::LoadOptions;

/// Splits on whitespace and on the punctuation listed in `split_on`.
pub struct SplitTokenizer {
    split_on: Vec<char>,
    calls: Rc<Cell<usize>>,
}

impl SplitTokenizer {
    pub fn new() -> Self {
        Self {
            split_on: Vec::new(),
            calls: Rc::new(Cell::new(0)),
        }
    }

    pub fn boxed() -> Box<dyn Tokenizer> {
        Box::new(Self::new())
    }
}

impl Tokenizer for SplitTokenizer {
    fn language_code(&self) -> &str {
        "en"
    }

    fn tokenize(&mut self, text: &str, _language: &str) -> Vec<Token> {
        self.calls.set(self.calls.get() + 1);
        text.split(|c: char| c.is_whitespace() || self.split_on.contains(&c))
            .filter(|s| !s.is_empty())
            .enumerate()
            .map(|(position, s)| Token {
                surface: s.to_string(),
                normalized: s.to_lowercase(),
                kind: if s.chars().all(|c| c.is_ascii_digit()) { "number" } else { "word" }.to_string(),
                position,
            })
            .collect()
    }
}

/// Builds [`SplitTokenizer`]s for the name `split`; option `punct` lists
/// extra separator characters.
#[derive(Default)]
pub struct SplitFactory {
    pub calls: Rc<Cell<usize>>,
}

impl TokenizerFactory for SplitFactory {
    fn build(&self, config: &TokenizerConfig) -> Result<Box<dyn Tokenizer>, TokenizerInitError> {
        if config.name != "split" {
            return Err(TokenizerInitError::UnknownTokenizer(config.name.clone()));
        }
        Ok(Box::new(SplitTokenizer {
            split_on: config.option("punct").unwrap_or_default().chars().collect(),
            calls: Rc::clone(&self.calls),
        }))
    }
}

pub fn options(order_independent: bool) -> LoadOptions {
    LoadOptions {
        case_match: None,
        token_selector: Default::default(),
        tokenizer: TokenizerConfig::new("split"),
        attribute_names: vec!["base".into(), "id".into(), "pos".into()],
        order_independent,
        language: "en".into(),
        dump_on_load: false,
        element_names: ElementNames::default(),
    }
}
