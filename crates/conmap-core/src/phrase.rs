//! Phrase entries and their grouping by token count.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::EmptyIndexEntry;
use crate::properties::PropertyBag;

/// One dictionary phrase: its normalized tokens and attribute values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhraseEntry {
    elements: Vec<String>,
    /// Space-joined tokens before sorting, kept only in order-independent mode
    unsorted: Option<String>,
    properties: PropertyBag,
}

impl PhraseEntry {
    pub fn new(elements: Vec<String>, unsorted: Option<String>, properties: PropertyBag) -> Self {
        Self {
            elements,
            unsorted,
            properties,
        }
    }

    pub fn elements(&self) -> &[String] {
        &self.elements
    }

    pub fn unsorted(&self) -> Option<&str> {
        self.unsorted.as_deref()
    }

    pub fn properties(&self) -> &PropertyBag {
        &self.properties
    }

    /// Number of tokens
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Surface form in source token order
    pub fn text(&self) -> String {
        match &self.unsorted {
            Some(unsorted) => unsorted.clone(),
            None => join_tokens(&self.elements),
        }
    }
}

impl fmt::Display for PhraseEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "<DictEntry Text ='[{}]''></DictEntry>",
            self.elements.join(", ")
        )
    }
}

/// Join tokens with single spaces
pub fn join_tokens<S: AsRef<str>>(elements: &[S]) -> String {
    let mut joined = String::new();
    for (i, element) in elements.iter().enumerate() {
        if i > 0 {
            joined.push(' ');
        }
        joined.push_str(element.as_ref());
    }
    joined
}

/// All entries of one token count, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhraseGroup {
    entries: Vec<Arc<PhraseEntry>>,
}

impl PhraseGroup {
    pub fn push(&mut self, entry: Arc<PhraseEntry>) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[Arc<PhraseEntry>] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &PhraseEntry> {
        self.entries.iter().map(AsRef::as_ref)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for PhraseGroup {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<DictEntries>")?;
        for entry in &self.entries {
            write!(f, "{entry}")?;
        }
        write!(f, "</DictEntries>")
    }
}

/// Groups reachable from one key, enumerated longest first.
///
/// Never empty: it is only created together with its first entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhrasesByLength {
    groups: BTreeMap<usize, PhraseGroup>,
}

impl PhrasesByLength {
    pub(crate) fn with_entry(entry: Arc<PhraseEntry>) -> Self {
        let mut phrases = Self {
            groups: BTreeMap::new(),
        };
        phrases.put(entry);
        phrases
    }

    /// Rebuild from restored groups; `None` if nothing would be stored.
    pub(crate) fn from_groups(groups: BTreeMap<usize, PhraseGroup>) -> Option<Self> {
        if groups.is_empty() || groups.values().any(PhraseGroup::is_empty) {
            return None;
        }
        Some(Self { groups })
    }

    pub(crate) fn put(&mut self, entry: Arc<PhraseEntry>) {
        self.groups.entry(entry.len()).or_default().push(entry);
    }

    pub fn get(&self, length: usize) -> Option<&PhraseGroup> {
        self.groups.get(&length)
    }

    pub fn longest(&self) -> Result<usize, EmptyIndexEntry> {
        self.groups
            .last_key_value()
            .map(|(length, _)| *length)
            .ok_or(EmptyIndexEntry)
    }

    pub fn shortest(&self) -> Result<usize, EmptyIndexEntry> {
        self.groups
            .first_key_value()
            .map(|(length, _)| *length)
            .ok_or(EmptyIndexEntry)
    }

    /// Groups in strictly descending length order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &PhraseGroup)> {
        self.groups.iter().rev().map(|(length, group)| (*length, group))
    }

    pub fn lengths(&self) -> impl Iterator<Item = usize> + '_ {
        self.groups.keys().rev().copied()
    }

    /// Total entries over all lengths
    pub fn entry_count(&self) -> usize {
        self.groups.values().map(PhraseGroup::len).sum()
    }
}

impl fmt::Display for PhrasesByLength {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (length, group) in self.iter() {
            writeln!(f, "<DictEntriesByLength length='{length}'>")?;
            write!(f, "{group}")?;
            writeln!(f, "</DictEntriesByLength>")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(tokens: &[&str]) -> Arc<PhraseEntry> {
        Arc::new(PhraseEntry::new(
            tokens.iter().map(|t| t.to_string()).collect(),
            None,
            PropertyBag::default(),
        ))
    }

    #[test]
    fn test_lengths_enumerate_descending() {
        let mut phrases = PhrasesByLength::with_entry(entry(&["new"]));
        phrases.put(entry(&["new", "york", "city"]));
        phrases.put(entry(&["new", "york"]));
        phrases.put(entry(&["new", "jersey", "turnpike", "authority"]));

        assert_eq!(phrases.lengths().collect::<Vec<_>>(), vec![4, 3, 2, 1]);
        assert_eq!(phrases.longest(), Ok(4));
        assert_eq!(phrases.shortest(), Ok(1));
    }

    #[test]
    fn test_duplicates_are_preserved_in_insertion_order() {
        let mut phrases = PhrasesByLength::with_entry(entry(&["big", "apple"]));
        phrases.put(entry(&["big", "apple"]));
        phrases.put(entry(&["big", "ben"]));

        let group = phrases.get(2).expect("group of length 2");
        let texts: Vec<_> = group.iter().map(PhraseEntry::text).collect();
        assert_eq!(texts, vec!["big apple", "big apple", "big ben"]);
        assert_eq!(phrases.entry_count(), 3);
    }

    #[test]
    fn test_empty_groups_are_rejected() {
        assert!(PhrasesByLength::from_groups(BTreeMap::new()).is_none());

        let mut groups = BTreeMap::new();
        groups.insert(2, PhraseGroup::default());
        assert!(PhrasesByLength::from_groups(groups).is_none());
    }

    #[test]
    fn test_text_prefers_unsorted_form() {
        let sorted = PhraseEntry::new(
            vec!["City".into(), "New".into(), "York".into()],
            Some("New York City".into()),
            PropertyBag::default(),
        );
        assert_eq!(sorted.text(), "New York City");
        assert_eq!(entry(&["a", "b"]).text(), "a b");
    }

    #[test]
    fn test_dump_format() {
        let phrases = PhrasesByLength::with_entry(entry(&["new", "york"]));
        assert_eq!(
            phrases.to_string(),
            "<DictEntriesByLength length='2'>\n<DictEntries><DictEntry Text ='[new, york]''></DictEntry>\n</DictEntries></DictEntriesByLength>\n"
        );
    }
}
