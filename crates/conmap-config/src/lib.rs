use std::env;
use std::fs;
use std::path::Path;

use conmap_core::{Classpath, LoadOptions, TokenizerConfig};
use serde::{Deserialize, Serialize};

use self::dictionary::DictionaryConfig;
pub use self::error::ConfigError;
use self::matching::MatchingConfig;

pub mod dictionary;
pub mod error;
pub mod matching;

fn default_tokenizer() -> TokenizerConfig {
    TokenizerConfig::new("english")
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub dictionary: DictionaryConfig,
    pub matching: MatchingConfig,
    #[serde(default = "default_tokenizer")]
    pub tokenizer: TokenizerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dictionary: DictionaryConfig::default(),
            matching: MatchingConfig::default(),
            tokenizer: default_tokenizer(),
        }
    }
}

impl Config {
    /// Defaults overridden by `CONMAP_*` environment variables
    pub fn new() -> Self {
        Self::default().with_env()
    }

    /// Read a JSON config file. Missing fields take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn with_env(self) -> Self {
        self.with_overrides(|name| env::var(name).ok())
    }

    /// Apply overrides looked up by variable name. Unparsable values are ignored.
    pub fn with_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(locator) = var("CONMAP_DICTIONARY") {
            self.dictionary.locator = locator;
        }

        if let Some(roots) = var("CONMAP_RESOURCE_ROOTS") {
            self.dictionary.resource_roots = env::split_paths(&roots).collect();
        }

        if let Some(attributes) = var("CONMAP_ATTRIBUTES") {
            self.dictionary.attributes = attributes
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect();
        }

        self.dictionary.dump_on_load = var("CONMAP_DUMP_ON_LOAD")
            .and_then(|v| v.parse().ok())
            .unwrap_or(self.dictionary.dump_on_load);

        if let Some(case_match) = var("CONMAP_CASE_MATCH") {
            self.matching.case_match = Some(case_match).filter(|v| !v.is_empty());
        }

        if let Some(language) = var("CONMAP_LANGUAGE") {
            self.matching.language = language;
        }

        self.matching.order_independent = var("CONMAP_ORDER_INDEPENDENT")
            .and_then(|v| v.parse().ok())
            .unwrap_or(self.matching.order_independent);

        if let Some(selector) = var("CONMAP_TOKEN_SELECTOR").and_then(|v| v.parse().ok()) {
            self.matching.token_selector = selector;
        }

        if let Some(name) = var("CONMAP_TOKENIZER") {
            self.tokenizer = TokenizerConfig::new(name);
        }

        self
    }

    /// Explicit options for one dictionary load
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            case_match: self.matching.case_match.clone(),
            token_selector: self.matching.token_selector.clone(),
            tokenizer: self.tokenizer.clone(),
            attribute_names: self.dictionary.attributes.clone(),
            order_independent: self.matching.order_independent,
            language: self.matching.language.clone(),
            dump_on_load: self.dictionary.dump_on_load,
            element_names: self.dictionary.element_names.clone(),
        }
    }

    /// Resource roots searched for `classpath:` locators
    pub fn classpath(&self) -> Classpath {
        self.dictionary
            .resource_roots
            .iter()
            .fold(Classpath::new(), |classpath, root| classpath.with_root(root))
    }
}
