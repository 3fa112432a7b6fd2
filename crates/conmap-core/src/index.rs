use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::sync::Arc;

use crate::phrase::{PhraseEntry, PhrasesByLength};
use crate::properties::PropertyBag;

/// Phrase table keyed by lookup token.
///
/// Keys enumerate in insertion order, which keeps dumps and snapshots
/// deterministic.
#[derive(Debug, Clone, Default)]
pub struct PhraseIndex {
    table: HashMap<String, PhrasesByLength>,
    keys: Vec<String>,
}

impl PhraseIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            table: HashMap::with_capacity(capacity),
            keys: Vec::with_capacity(capacity),
        }
    }

    pub fn get(&self, key: &str) -> Option<&PhrasesByLength> {
        self.table.get(key)
    }

    /// Append a phrase under `key`, grouped by its token count.
    ///
    /// Duplicates are kept; lookups may see several equal-length candidates.
    pub fn put(
        &mut self,
        key: &str,
        elements: Vec<String>,
        unsorted: Option<String>,
        properties: PropertyBag,
    ) -> Arc<PhraseEntry> {
        let entry = Arc::new(PhraseEntry::new(elements, unsorted, properties));
        self.put_shared(key, Arc::clone(&entry));
        entry
    }

    /// Register an existing entry under another key
    pub fn put_shared(&mut self, key: &str, entry: Arc<PhraseEntry>) {
        match self.table.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => occupied.get_mut().put(entry),
            Entry::Vacant(vacant) => {
                self.keys.push(key.to_string());
                vacant.insert(PhrasesByLength::with_entry(entry));
            }
        }
    }

    pub(crate) fn insert_restored(&mut self, key: String, phrases: PhrasesByLength) -> bool {
        match self.table.entry(key) {
            Entry::Occupied(_) => false,
            Entry::Vacant(vacant) => {
                self.keys.push(vacant.key().clone());
                vacant.insert(phrases);
                true
            }
        }
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PhrasesByLength)> {
        self.keys
            .iter()
            .filter_map(|key| self.table.get(key).map(|phrases| (key.as_str(), phrases)))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn clear(&mut self) {
        self.table.clear();
        self.keys.clear();
    }
}

impl fmt::Display for PhraseIndex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (key, phrases) in self.iter() {
            writeln!(f, "<DictionaryItem key='{key}'>")?;
            write!(f, "{phrases}")?;
            writeln!(f, "</DictionaryItem>")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn test_longest_tracks_maximum_inserted_length() {
        let mut index = PhraseIndex::new();
        for phrase in ["heart", "heart attack", "heart rate variability", "heart rate"] {
            let elements = tokens(phrase);
            index.put("heart", elements, None, PropertyBag::default());
        }

        let phrases = index.get("heart").expect("key present");
        assert_eq!(phrases.longest(), Ok(3));
        assert_eq!(phrases.shortest(), Ok(1));

        let lengths: Vec<_> = phrases.lengths().collect();
        assert!(lengths.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn test_keys_keep_insertion_order() {
        let mut index = PhraseIndex::new();
        for key in ["zebra", "apple", "mango", "apple"] {
            index.put(key, vec![key.to_string()], None, PropertyBag::default());
        }

        assert_eq!(index.keys().collect::<Vec<_>>(), vec!["zebra", "apple", "mango"]);
        assert_eq!(index.len(), 3);
        assert_eq!(index.get("apple").map(|p| p.entry_count()), Some(2));
    }

    #[test]
    fn test_shared_entry_is_reachable_from_every_key() {
        let mut index = PhraseIndex::new();
        let entry = index.put(
            "city",
            tokens("city new york"),
            Some("new york city".into()),
            PropertyBag::default(),
        );
        index.put_shared("new", Arc::clone(&entry));
        index.put_shared("york", Arc::clone(&entry));

        for key in ["city", "new", "york"] {
            let group = index.get(key).and_then(|p| p.get(3)).expect("group present");
            assert!(Arc::ptr_eq(&group.entries()[0], &entry));
        }
    }

    #[test]
    fn test_entry_is_grouped_by_token_count() {
        let mut index = PhraseIndex::new();
        let entry = index.put("new", tokens("new york city"), None, PropertyBag::default());

        let phrases = index.get("new").expect("key present");
        assert_eq!(phrases.lengths().collect::<Vec<_>>(), vec![3]);
        assert!(Arc::ptr_eq(&phrases.get(3).expect("group present").entries()[0], &entry));
        assert!(phrases.get(1).is_none());
    }

    #[test]
    fn test_missing_key() {
        let index = PhraseIndex::new();
        assert!(index.get("nothing").is_none());
        assert!(index.is_empty());
    }

    #[test]
    fn test_dump_lists_keys_in_order() {
        let mut index = PhraseIndex::new();
        index.put("b", tokens("b"), None, PropertyBag::default());
        index.put("a", tokens("a"), None, PropertyBag::default());

        let dump = index.to_string();
        let b = dump.find("key='b'").expect("b dumped");
        let a = dump.find("key='a'").expect("a dumped");
        assert!(b < a);
    }
}
