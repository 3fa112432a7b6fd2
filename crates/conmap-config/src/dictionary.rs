use std::path::PathBuf;

use conmap_core::ElementNames;
use serde::{Deserialize, Serialize};

fn default_locator() -> String {
    "classpath:dictionary.xml".to_string()
}

fn default_attributes() -> Vec<String> {
    vec!["base".to_string()]
}

fn default_capacity() -> usize {
    500_000
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct DictionaryConfig {
    /// `classpath:<path>` or `file:<absolute path>`
    #[serde(default = "default_locator")]
    pub locator: String,
    /// Directories searched for `classpath:` resources
    #[serde(default)]
    pub resource_roots: Vec<PathBuf>,
    /// Attribute names declared for each entry
    #[serde(default = "default_attributes")]
    pub attributes: Vec<String>,
    #[serde(default)]
    pub element_names: ElementNames,
    /// Log the whole index after loading
    #[serde(default)]
    pub dump_on_load: bool,
    /// Expected number of keys
    #[serde(default = "default_capacity")]
    pub initial_capacity: usize,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            locator: default_locator(),
            resource_roots: vec![],
            attributes: default_attributes(),
            element_names: ElementNames::default(),
            dump_on_load: false,
            initial_capacity: default_capacity(),
        }
    }
}
