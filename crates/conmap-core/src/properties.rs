use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Attribute names declared for one dictionary load.
///
/// The schema is descriptive: bags accept names it does not declare.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertySchema {
    names: Vec<String>,
}

impl PropertySchema {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Empty bag for an entry of this dictionary
    pub fn new_bag(&self) -> PropertyBag {
        PropertyBag::default()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Names present in `bag` that this schema does not declare
    pub fn undeclared<'a>(&self, bag: &'a PropertyBag) -> Vec<&'a str> {
        bag.names().filter(|name| !self.contains(name)).collect()
    }
}

/// Attribute values of one phrase entry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyBag {
    values: BTreeMap<String, String>,
}

impl PropertyBag {
    /// Copy every value of `parent` into a new bag. Later changes to either
    /// bag are not seen by the other.
    pub fn inherit(parent: &PropertyBag) -> Self {
        parent.clone()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for PropertyBag
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_overrides_copy_of_token_bag() {
        let schema = PropertySchema::new(["pos", "id"]);
        let mut token = schema.new_bag();
        token.set("pos", "NN");

        let mut variant = PropertyBag::inherit(&token);
        variant.set("pos", "NNS");

        assert_eq!(variant.get("pos"), Some("NNS"));
        assert_eq!(token.get("pos"), Some("NN"));
    }

    #[test]
    fn test_parent_changes_after_copy_do_not_propagate() {
        let mut token: PropertyBag = [("id", "C001")].into_iter().collect();
        let variant = PropertyBag::inherit(&token);
        token.set("id", "C002");
        token.set("pos", "VB");

        assert_eq!(variant.get("id"), Some("C001"));
        assert_eq!(variant.get("pos"), None);
    }

    #[test]
    fn test_undeclared_names_are_accepted() {
        let schema = PropertySchema::new(["pos"]);
        let mut bag = schema.new_bag();
        bag.set("pos", "NN");
        bag.set("source", "umls");

        assert_eq!(bag.get("source"), Some("umls"));
        assert_eq!(schema.undeclared(&bag), vec!["source"]);
    }

    #[test]
    fn test_schema_keeps_declared_order() {
        let schema = PropertySchema::new(vec!["id".to_string(), "pos".to_string(), "base".to_string()]);
        assert_eq!(schema.names().to_vec(), vec!["id", "pos", "base"]);
        assert!(schema.contains("base"));
        assert!(!schema.contains("lemma"));
    }
}
