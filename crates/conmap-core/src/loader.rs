use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::entities::decode_entities;
use crate::error::LoadError;
use crate::events::SourceEvent;
use crate::index::PhraseIndex;
use crate::language::{TokenSelector, Tokenizer};
use crate::normalizer::TokenNormalizer;
use crate::phrase::join_tokens;
use crate::properties::{PropertyBag, PropertySchema};

/// Progress is logged every this many variants
const PROGRESS_INTERVAL: usize = 10_000;

fn default_token() -> String {
    "token".to_string()
}

fn default_variant() -> String {
    "variant".to_string()
}

fn default_key() -> String {
    "base".to_string()
}

/// Element and attribute names of the dictionary format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementNames {
    /// Element carrying token-level attributes
    #[serde(default = "default_token")]
    pub token: String,
    /// Element nested under a token, one per surface form
    #[serde(default = "default_variant")]
    pub variant: String,
    /// Attribute holding the text handed to the tokenizer
    #[serde(default = "default_key")]
    pub key: String,
}

impl Default for ElementNames {
    fn default() -> Self {
        Self {
            token: default_token(),
            variant: default_variant(),
            key: default_key(),
        }
    }
}

/// Counters reported when a load completes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Variants stored as phrase entries
    pub variants: usize,
    /// Variants dropped: no tokens, or no key attribute
    pub skipped: usize,
    /// Distinct lookup keys in the index
    pub keys: usize,
}

/// Builds the phrase index from a stream of [`SourceEvent`]s.
pub struct DictionaryLoader<'a> {
    index: &'a mut PhraseIndex,
    schema: &'a PropertySchema,
    tokenizer: Box<dyn Tokenizer>,
    normalizer: TokenNormalizer,
    selector: TokenSelector,
    language: String,
    order_independent: bool,
    names: ElementNames,
    source_id: String,

    /// Attributes of the enclosing token element
    token_props: Option<PropertyBag>,
    undeclared: HashSet<String>,
    stats: LoadStats,
}

impl<'a> DictionaryLoader<'a> {
    pub fn new(
        index: &'a mut PhraseIndex,
        schema: &'a PropertySchema,
        tokenizer: Box<dyn Tokenizer>,
        normalizer: TokenNormalizer,
    ) -> Self {
        Self {
            index,
            schema,
            tokenizer,
            normalizer,
            selector: TokenSelector::default(),
            language: String::new(),
            order_independent: false,
            names: ElementNames::default(),
            source_id: String::new(),
            token_props: None,
            undeclared: HashSet::new(),
            stats: LoadStats::default(),
        }
    }

    pub fn selector(mut self, selector: TokenSelector) -> Self {
        self.selector = selector;
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn order_independent(mut self, order_independent: bool) -> Self {
        self.order_independent = order_independent;
        self
    }

    pub fn element_names(mut self, names: ElementNames) -> Self {
        self.names = names;
        self
    }

    /// Name reported in syntax diagnostics
    pub fn source_id(mut self, source_id: impl Into<String>) -> Self {
        self.source_id = source_id.into();
        self
    }

    /// Consume events until the end of the source or a fatal syntax error.
    pub fn run<I>(mut self, events: I) -> Result<LoadStats, LoadError>
    where
        I: IntoIterator<Item = SourceEvent>,
    {
        tracing::info!("loading dictionary with these settings:");
        tracing::info!("token selector: {}", self.selector);
        tracing::info!("tokenizer language: {}", self.tokenizer.language_code());
        tracing::info!("normalizer: {}", self.normalizer);

        for event in events {
            match event {
                SourceEvent::ElementStart { name, attributes } => {
                    if name == self.names.token {
                        self.start_token(attributes);
                    } else if name == self.names.variant {
                        self.add_variant(attributes);
                    }
                }
                SourceEvent::ElementEnd { name } => {
                    if name == self.names.token {
                        self.token_props = None;
                    }
                }
                SourceEvent::Text(_) => {}
                SourceEvent::EndOfSource => break,
                SourceEvent::Error(err) if err.is_fatal() => {
                    tracing::error!("Parse error occurred - [Fatal Error]{}:{}: {}", self.source_id, err.offset, err.message);
                    return Err(LoadError::Syntax {
                        source_id: self.source_id,
                        offset: err.offset,
                        message: err.message,
                    });
                }
                SourceEvent::Error(err) => {
                    tracing::warn!("[Warning]{}:{}: {}", self.source_id, err.offset, err.message);
                }
            }
        }

        self.stats.keys = self.index.len();
        tracing::info!(
            "Finished loading {} entries ({} skipped, {} keys)",
            self.stats.variants,
            self.stats.skipped,
            self.stats.keys
        );
        Ok(self.stats)
    }

    fn start_token(&mut self, attributes: Vec<(String, String)>) {
        let mut props = self.schema.new_bag();
        for (name, value) in attributes {
            self.note_undeclared(&name);
            props.set(name, decode_entities(&value));
        }
        self.token_props = Some(props);
    }

    fn add_variant(&mut self, attributes: Vec<(String, String)>) {
        let mut props = match &self.token_props {
            Some(parent) => PropertyBag::inherit(parent),
            None => {
                tracing::warn!("{} element outside of a {} element", self.names.variant, self.names.token);
                self.schema.new_bag()
            }
        };

        let mut key_text = None;
        for (name, value) in attributes {
            let value = decode_entities(&value).into_owned();
            if name == self.names.key {
                key_text = Some(value);
            } else {
                self.note_undeclared(&name);
                props.set(name, value);
            }
        }

        let Some(text) = key_text else {
            tracing::warn!("{} without '{}' attribute skipped", self.names.variant, self.names.key);
            self.stats.skipped += 1;
            return;
        };

        let tokens = self.tokenizer.tokenize(&text, &self.language);
        let mut elements: Vec<String> = self
            .selector
            .select(tokens)
            .iter()
            .map(|token| self.normalizer.normalize(token))
            .collect();

        if elements.is_empty() {
            tracing::info!("Dictionary tokenization of: '{}' produced no tokens", text);
            self.stats.skipped += 1;
            return;
        }

        if self.order_independent {
            let mut seen = HashSet::new();
            let keys: Vec<String> = elements
                .iter()
                .filter(|token| seen.insert(token.as_str()))
                .cloned()
                .collect();

            let unsorted = join_tokens(&elements);
            elements.sort();

            let entry = self.index.put(&keys[0], elements, Some(unsorted), props);
            for key in &keys[1..] {
                self.index.put_shared(key, Arc::clone(&entry));
            }
        } else {
            let key = elements[0].clone();
            self.index.put(&key, elements, None, props);
        }

        self.stats.variants += 1;
        if self.stats.variants % PROGRESS_INTERVAL == 0 {
            tracing::info!("processed {} entries", self.stats.variants);
        }
    }

    fn note_undeclared(&mut self, name: &str) {
        if !self.schema.contains(name) && self.undeclared.insert(name.to_string()) {
            tracing::debug!("attribute '{}' is not declared in the dictionary schema", name);
        }
    }
}
