//! Phrase dictionary core: a first-token index of multi-token phrases with
//! per-entry attributes, and the loader that builds it from a dictionary
//! source through a tokenizer collaborator.

pub mod entities;
pub mod error;
pub mod events;
pub mod index;
pub mod language;
pub mod loader;
pub mod normalizer;
pub mod persist;
pub mod phrase;
pub mod properties;
pub mod resource;
pub mod source;

#[cfg(test)]
mod test_utils;

pub use entities::decode_entities;
pub use error::{EmptyIndexEntry, LoadError, SnapshotError};
pub use events::{SourceEvent, SyntaxError, XmlEvents};
pub use index::PhraseIndex;
pub use language::{Token, TokenField, TokenSelector, Tokenizer, TokenizerConfig, TokenizerFactory, TokenizerInitError};
pub use loader::{DictionaryLoader, ElementNames, LoadStats};
pub use normalizer::{CaseFold, TokenNormalizer};
pub use phrase::{PhraseEntry, PhraseGroup, PhrasesByLength, join_tokens};
pub use properties::{PropertyBag, PropertySchema};
pub use resource::{DictionaryResource, LoadOptions};
pub use source::{Classpath, DictionarySource};
