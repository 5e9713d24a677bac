//! Canonical multi-valued section maps.
//!
//! Analysis files are made of sections. Each section is introduced by a
//! header and holds lines of the form `K -> V`, where the same `K` repeats
//! once per value. For example the `products:` section maps a source file to
//! every class file it produced:
//!
//! ```text
//! products:
//! 2 items
//! /src/org/example/Foo.scala -> /out/org/example/Foo$.class
//! /src/org/example/Foo.scala -> /out/org/example/Foo.class
//! ```
//!
//! A [`Section`] holds one such map in canonical form: keys sorted, each
//! value list sorted and deduplicated, and no key ever mapped to an empty
//! list. Canonical form is what makes structural equality and reproducible
//! output possible.

use std::collections::BTreeMap;

use incra_common::{rebase_line, Rebase};
use serde::{Deserialize, Serialize};

/// A canonical map from key to a sorted, deduplicated, non-empty value list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, Vec<String>>", into = "BTreeMap<String, Vec<String>>")]
pub struct Section {
    entries: BTreeMap<String, Vec<String>>,
}

fn canonicalize(values: &mut Vec<String>) {
    values.sort();
    values.dedup();
}

impl Section {
    /// Creates an empty section.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the values for `key`, replacing any previous values.
    ///
    /// Empty value lists are never stored. Returns `true` if `key` already
    /// had values that were replaced.
    pub fn insert<I, S>(&mut self, key: impl Into<String>, values: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut values: Vec<String> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return false;
        }
        canonicalize(&mut values);
        self.entries.insert(key.into(), values).is_some()
    }

    /// Adds a single value under `key`, keeping the value list canonical.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let values = self.entries.entry(key.into()).or_default();
        let value = value.into();
        if let Err(pos) = values.binary_search(&value) {
            values.insert(pos, value);
        }
    }

    /// Adds every value in `values` under `key`.
    pub fn extend<I, S>(&mut self, key: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let key = key.into();
        let mut added = values.into_iter().map(Into::into).peekable();
        if added.peek().is_none() {
            return;
        }
        let slot = self.entries.entry(key).or_default();
        slot.extend(added);
        canonicalize(slot);
    }

    /// Returns the values recorded under `key`.
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// Returns `true` if `key` has at least one value.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Removes `key`, returning its values.
    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        self.entries.remove(key)
    }

    /// Iterates over keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterates over every value of every key.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.entries.values().flatten().map(String::as_str)
    }

    /// Iterates over `(key, values)` pairs in sorted key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(k, vs)| (k.as_str(), vs.as_slice()))
    }

    /// Returns the number of keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the section has no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the total number of `key -> value` items.
    pub fn item_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Returns a new section holding only the keys accepted by `keep`.
    pub fn filter_keys(&self, mut keep: impl FnMut(&str) -> bool) -> Section {
        let entries = self
            .entries
            .iter()
            .filter(|(k, _)| keep(k.as_str()))
            .map(|(k, vs)| (k.clone(), vs.clone()))
            .collect();
        Section { entries }
    }

    /// Keeps only the entries accepted by `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(&str, &[String]) -> bool) {
        self.entries.retain(|k, vs| keep(k.as_str(), vs.as_slice()));
    }

    /// Rewrites every key through `convert`.
    ///
    /// Keys that collide after conversion have their values unioned.
    pub fn map_keys(&self, mut convert: impl FnMut(&str) -> String) -> Section {
        let mut out = Section::new();
        for (k, vs) in &self.entries {
            out.extend(convert(k), vs.iter().cloned());
        }
        out
    }

    /// Rewrites every value through `convert`, re-canonicalizing each list.
    pub fn map_values(&self, mut convert: impl FnMut(&str) -> String) -> Section {
        let mut out = Section::new();
        for (k, vs) in &self.entries {
            out.extend(k.clone(), vs.iter().map(|v| convert(v)));
        }
        out
    }

    /// Renders this section under `header` into `buf`.
    ///
    /// Every value becomes one `key -> value` item, or `key -> ` followed by
    /// the value on the next line when `inline_values` is false. Each item is
    /// passed through `rebasings`; dropped or emptied items are omitted, and
    /// the remaining items are written in lexicographic order after the
    /// header and item count lines.
    pub fn render_into(
        &self,
        buf: &mut String,
        header: &str,
        inline_values: bool,
        rebasings: &[Rebase],
    ) {
        let separator = if inline_values { "" } else { "\n" };
        let mut items: Vec<String> = self
            .entries
            .iter()
            .flat_map(|(k, vs)| vs.iter().map(move |v| format!("{k} -> {separator}{v}")))
            .filter_map(|item| rebase_line(&item, rebasings))
            .filter(|item| !item.is_empty())
            .collect();
        items.sort();

        buf.push_str(header);
        buf.push_str(":\n");
        buf.push_str(&format!("{} items\n", items.len()));
        for item in &items {
            buf.push_str(item);
            buf.push('\n');
        }
    }
}

impl<K, I, S> FromIterator<(K, I)> for Section
where
    K: Into<String>,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    /// Collects `(key, values)` pairs, unioning the values of repeated keys.
    fn from_iter<T: IntoIterator<Item = (K, I)>>(iter: T) -> Self {
        let mut section = Section::new();
        for (k, vs) in iter {
            section.extend(k, vs);
        }
        section
    }
}

impl From<BTreeMap<String, Vec<String>>> for Section {
    fn from(map: BTreeMap<String, Vec<String>>) -> Self {
        map.into_iter().collect()
    }
}

impl From<Section> for BTreeMap<String, Vec<String>> {
    fn from(section: Section) -> Self {
        section.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(section: &Section, header: &str, inline: bool, rebasings: &[Rebase]) -> String {
        let mut buf = String::new();
        section.render_into(&mut buf, header, inline, rebasings);
        buf
    }

    #[test]
    fn construction_sorts_and_dedups() {
        let section: Section = [("a", vec!["z", "x", "z", "y"])].into_iter().collect();
        assert_eq!(section.get("a").unwrap(), ["x", "y", "z"]);
    }

    #[test]
    fn repeated_keys_union() {
        let section: Section = [("a", vec!["2"]), ("a", vec!["1"]), ("b", vec!["3"])]
            .into_iter()
            .collect();
        assert_eq!(section.get("a").unwrap(), ["1", "2"]);
        assert_eq!(section.len(), 2);
        assert_eq!(section.item_count(), 3);
    }

    #[test]
    fn empty_values_never_stored() {
        let mut section = Section::new();
        assert!(!section.insert("a", Vec::<String>::new()));
        section.extend("b", Vec::<String>::new());
        assert!(section.is_empty());
        let collected: Section = [("c", Vec::<String>::new())].into_iter().collect();
        assert!(collected.is_empty());
    }

    #[test]
    fn insert_replaces() {
        let mut section = Section::new();
        assert!(!section.insert("a", ["1"]));
        assert!(section.insert("a", ["2"]));
        assert_eq!(section.get("a").unwrap(), ["2"]);
    }

    #[test]
    fn push_keeps_order() {
        let mut section = Section::new();
        section.push("k", "b");
        section.push("k", "a");
        section.push("k", "b");
        assert_eq!(section.get("k").unwrap(), ["a", "b"]);
    }

    #[test]
    fn equality_ignores_input_order() {
        let a: Section = [("k", vec!["1", "2"]), ("j", vec!["3"])].into_iter().collect();
        let b: Section = [("j", vec!["3"]), ("k", vec!["2", "1"])].into_iter().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn filter_and_retain() {
        let section: Section = [("a", vec!["1"]), ("b", vec!["2"]), ("c", vec!["3"])]
            .into_iter()
            .collect();
        let filtered = section.filter_keys(|k| k != "b");
        assert_eq!(filtered.keys().collect::<Vec<_>>(), ["a", "c"]);

        let mut retained = section.clone();
        retained.retain(|_, vs| vs[0] != "3");
        assert_eq!(retained.keys().collect::<Vec<_>>(), ["a", "b"]);
    }

    #[test]
    fn map_keys_unions_collisions() {
        let section: Section = [("a1", vec!["x"]), ("a2", vec!["y"])].into_iter().collect();
        let mapped = section.map_keys(|_| "a".to_string());
        assert_eq!(mapped.get("a").unwrap(), ["x", "y"]);
    }

    #[test]
    fn map_values_recanonicalizes() {
        let section: Section = [("k", vec!["b", "a"])].into_iter().collect();
        let mapped = section.map_values(|v| if v == "a" { "z".into() } else { v.into() });
        assert_eq!(mapped.get("k").unwrap(), ["b", "z"]);
    }

    #[test]
    fn render_inline() {
        let section: Section = [
            ("/src/B.scala", vec!["/out/B.class"]),
            ("/src/A.scala", vec!["/out/A.class", "/out/A$.class"]),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            render(&section, "products", true, &[]),
            "products:\n3 items\n\
             /src/A.scala -> /out/A$.class\n\
             /src/A.scala -> /out/A.class\n\
             /src/B.scala -> /out/B.class\n"
        );
    }

    #[test]
    fn render_split_values() {
        let section: Section = [("/src/A.scala", vec!["AAAB"])].into_iter().collect();
        assert_eq!(
            render(&section, "internal apis", false, &[]),
            "internal apis:\n1 items\n/src/A.scala -> \nAAAB\n"
        );
    }

    #[test]
    fn render_empty_section() {
        assert_eq!(render(&Section::new(), "used names", true, &[]), "used names:\n0 items\n");
    }

    #[test]
    fn render_applies_rebasings_to_count() {
        let section: Section = [
            ("/home/user/proj/A.scala", vec!["x"]),
            ("/tmp/scratch/B.scala", vec!["y"]),
        ]
        .into_iter()
        .collect();
        let rules = [
            Rebase::replace("/home/user/proj", ""),
            Rebase::drop_lines("/tmp/scratch"),
        ];
        assert_eq!(
            render(&section, "source stamps", true, &rules),
            "source stamps:\n1 items\n/A.scala -> x\n"
        );
    }

    #[test]
    fn render_is_idempotent() {
        let section: Section = [("k", vec!["b", "a"]), ("j", vec!["c"])].into_iter().collect();
        let first = render(&section, "class names", true, &[]);
        let second = render(&section, "class names", true, &[]);
        assert_eq!(first, second);
    }

    #[test]
    fn serde_roundtrip_canonicalizes() {
        let json = r#"{"k":["b","a","b"],"empty":[]}"#;
        let section: Section = serde_json::from_str(json).unwrap();
        assert_eq!(section.get("k").unwrap(), ["a", "b"]);
        assert!(!section.contains_key("empty"));
        let back = serde_json::to_string(&section).unwrap();
        assert_eq!(back, r#"{"k":["a","b"]}"#);
    }
}
