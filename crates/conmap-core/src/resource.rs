use std::fmt;
use std::io::{Read, Write};

use crate::error::{LoadError, SnapshotError};
use crate::events::{SourceEvent, XmlEvents};
use crate::index::PhraseIndex;
use crate::language::{TokenSelector, Tokenizer, TokenizerConfig, TokenizerFactory};
use crate::loader::{DictionaryLoader, ElementNames, LoadStats};
use crate::normalizer::TokenNormalizer;
use crate::persist;
use crate::phrase::PhrasesByLength;
use crate::properties::PropertySchema;
use crate::source::{Classpath, DictionarySource};

/// Everything a dictionary load needs. There are no defaults: callers
/// supply every field, usually from configuration.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// `insensitive`, `digitfold`, `ignoreall`, or `None` for no folding
    pub case_match: Option<String>,
    pub token_selector: TokenSelector,
    pub tokenizer: TokenizerConfig,
    pub attribute_names: Vec<String>,
    pub order_independent: bool,
    pub language: String,
    pub dump_on_load: bool,
    pub element_names: ElementNames,
}

/// A phrase dictionary: opened once, loaded once, then read-only.
#[derive(Debug, Default)]
pub struct DictionaryResource {
    index: PhraseIndex,
    schema: PropertySchema,
    classpath: Classpath,
    source: Option<DictionarySource>,
    loaded: bool,
    sort_elements: bool,
    dump_on_load: bool,
}

impl DictionaryResource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-size the key table for about `initial_entries` keys
    pub fn with_capacity(initial_entries: usize) -> Self {
        Self {
            index: PhraseIndex::with_capacity(initial_entries),
            ..Self::default()
        }
    }

    pub fn with_classpath(mut self, classpath: Classpath) -> Self {
        self.classpath = classpath;
        self
    }

    /// Open and validate the dictionary source. Does not read it.
    pub fn load(&mut self, locator: &str) -> Result<(), LoadError> {
        let source = DictionarySource::resolve(locator, &self.classpath)?;
        self.source = Some(source);
        Ok(())
    }

    pub fn load_source(&mut self, source: DictionarySource) {
        self.source = Some(source);
    }

    /// Read the opened source into the phrase index.
    ///
    /// On failure the partial index is discarded and the resource stays
    /// not loaded.
    pub fn load_contents(
        &mut self,
        options: &LoadOptions,
        tokenizers: &dyn TokenizerFactory,
    ) -> Result<LoadStats, LoadError> {
        let source = self.source.clone().ok_or(LoadError::NotOpened)?;

        self.load_with(options, source.source_id(), || {
            let tokenizer = tokenizers.build(&options.tokenizer)?;
            let events = XmlEvents::new(source.open()?);
            Ok((tokenizer, events))
        })
    }

    /// Load from already produced parse events, bypassing the source.
    pub fn load_events<I>(
        &mut self,
        options: &LoadOptions,
        tokenizer: Box<dyn Tokenizer>,
        events: I,
    ) -> Result<LoadStats, LoadError>
    where
        I: IntoIterator<Item = SourceEvent>,
    {
        self.load_with(options, "events", || Ok((tokenizer, events)))
    }

    fn load_with<I, F>(&mut self, options: &LoadOptions, source_id: &str, prepare: F) -> Result<LoadStats, LoadError>
    where
        I: IntoIterator<Item = SourceEvent>,
        F: FnOnce() -> Result<(Box<dyn Tokenizer>, I), LoadError>,
    {
        if self.loaded {
            return Err(LoadError::AlreadyLoaded);
        }

        self.sort_elements = options.order_independent;
        tracing::info!("order independent lookup: {}", self.sort_elements);
        self.dump_on_load = options.dump_on_load;
        tracing::info!("dict processing language: {}", options.language);
        tracing::info!("dictionary attributes: {:?}", options.attribute_names);
        tracing::info!("tokenizer: {}", options.tokenizer);

        self.schema = PropertySchema::new(options.attribute_names.iter().cloned());
        tracing::info!("Loading Dictionary...");

        let result = prepare().and_then(|(tokenizer, events)| {
            DictionaryLoader::new(
                &mut self.index,
                &self.schema,
                tokenizer,
                TokenNormalizer::new(options.case_match.as_deref()),
            )
            .selector(options.token_selector.clone())
            .language(options.language.as_str())
            .order_independent(options.order_independent)
            .element_names(options.element_names.clone())
            .source_id(source_id)
            .run(events)
        });

        match result {
            Ok(stats) => {
                tracing::info!("...done");
                self.loaded = true;
                if self.dump_on_load {
                    tracing::info!("dictionary dump:\n{}", self.index);
                }
                Ok(stats)
            }
            Err(e) => {
                tracing::error!("dictionary load failed: {}", e);
                self.index.clear();
                self.schema = PropertySchema::default();
                self.sort_elements = false;
                self.dump_on_load = false;
                Err(e)
            }
        }
    }

    /// Phrases reachable from `key`; always absent before a successful load.
    pub fn lookup(&self, key: &str) -> Option<&PhrasesByLength> {
        if !self.loaded {
            return None;
        }
        self.index.get(key)
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_order_independent(&self) -> bool {
        self.sort_elements
    }

    pub fn schema(&self) -> &PropertySchema {
        &self.schema
    }

    pub fn index(&self) -> &PhraseIndex {
        &self.index
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.index.keys()
    }

    pub fn source(&self) -> Option<&DictionarySource> {
        self.source.as_ref()
    }

    /// Write the schema and phrase index as a versioned snapshot
    pub fn serialize<W: Write>(&self, sink: W) -> Result<(), SnapshotError> {
        if !self.loaded {
            return Err(SnapshotError::NotLoaded("dictionary has not been loaded"));
        }
        persist::write_snapshot(sink, &self.index, &self.schema, self.sort_elements)
    }

    /// Restore a loaded resource from a snapshot
    pub fn deserialize<R: Read>(source: R) -> Result<Self, SnapshotError> {
        let restored = persist::read_snapshot(source)?;
        tracing::info!("restored dictionary snapshot with {} keys", restored.index.len());

        Ok(Self {
            index: restored.index,
            schema: restored.schema,
            sort_elements: restored.order_independent,
            loaded: true,
            ..Self::default()
        })
    }
}

impl fmt::Display for DictionaryResource {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.index)
    }
}
