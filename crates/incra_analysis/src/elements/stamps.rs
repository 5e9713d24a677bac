//! Fingerprints of products, sources, and binaries.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::element::Element;
use crate::section::Section;
use crate::translate::TokenTranslator;

/// Product, source, and binary stamps plus the jar to class-name cache.
///
/// `classnames` maps each jar to one representative class inside it. The
/// representative is a debugging aid and may change between compiles, so
/// equality, hashing, and diffs only look at its key set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Stamps {
    /// Class file to stamp.
    pub products: Section,
    /// Source file to stamp.
    pub sources: Section,
    /// Jar or binary class file to stamp.
    pub binaries: Section,
    /// Jar to a representative class name inside it.
    pub classnames: Section,
}

impl PartialEq for Stamps {
    fn eq(&self, other: &Self) -> bool {
        self.products == other.products
            && self.sources == other.sources
            && self.binaries == other.binaries
            && self.classnames.keys().eq(other.classnames.keys())
    }
}

impl Eq for Stamps {}

impl Hash for Stamps {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.products.hash(state);
        self.sources.hash(state);
        self.binaries.hash(state);
        for key in self.classnames.keys() {
            key.hash(state);
        }
    }
}

impl Element for Stamps {
    const NAME: &'static str = "stamps";
    const HEADERS: &'static [&'static str] =
        &["product stamps", "source stamps", "binary stamps", "class names"];
    const KEYS_ONLY_HEADERS: &'static [&'static str] = &["class names"];

    fn sections(&self) -> Vec<&Section> {
        vec![&self.products, &self.sources, &self.binaries, &self.classnames]
    }

    fn from_sections(sections: impl IntoIterator<Item = Section>) -> Self {
        let mut s = sections.into_iter();
        Self {
            products: s.next().unwrap_or_default(),
            sources: s.next().unwrap_or_default(),
            binaries: s.next().unwrap_or_default(),
            classnames: s.next().unwrap_or_default(),
        }
    }

    fn translate(&mut self, translator: &mut dyn TokenTranslator) {
        self.products = self.products.map_keys(|k| translator.convert(k));
        self.sources = self.sources.map_keys(|k| translator.convert(k));
        self.binaries = self.binaries.map_keys(|k| translator.convert(k));
        self.classnames = self
            .classnames
            .map_keys(|k| translator.convert(k))
            .map_values(|v| translator.convert(v));
    }
}
