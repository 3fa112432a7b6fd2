use conmap_core::TokenSelector;
use serde::{Deserialize, Serialize};

fn default_language() -> String {
    "en".to_string()
}

/// How dictionary text becomes lookup keys
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct MatchingConfig {
    /// `insensitive`, `digitfold` or `ignoreall`; no folding when unset
    #[serde(default)]
    pub case_match: Option<String>,
    #[serde(default = "default_language")]
    pub language: String,
    /// Index every token of a phrase, with the phrase tokens sorted
    #[serde(default)]
    pub order_independent: bool,
    #[serde(default)]
    pub token_selector: TokenSelector,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            case_match: None,
            language: default_language(),
            order_independent: false,
            token_selector: TokenSelector::default(),
        }
    }
}
