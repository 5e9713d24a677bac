//! The shared shape of every analysis element.
//!
//! Related consecutive sections of an analysis file are bundled into
//! elements: the stamps element bundles product, source, and binary stamps,
//! and so on. Each element is a plain struct owning one [`Section`] per
//! declared header. This trait supplies the behaviour common to all of them
//! (writing, diffing) on top of the fixed header list.

use incra_common::Rebase;

use crate::diff::{DiffInput, Differ, ElementDiff};
use crate::section::Section;
use crate::translate::TokenTranslator;

/// A named group of sections with a fixed, declared order.
pub trait Element: Sized {
    /// Human-readable element name used in diff reports.
    const NAME: &'static str;

    /// Section headers, in the order they appear on disk.
    const HEADERS: &'static [&'static str];

    /// Whether values are written on the same line as their key.
    ///
    /// Elements holding large encoded blobs put the value on the next line.
    const INLINE_VALUES: bool = true;

    /// Headers whose values are ignored by equality and diff.
    const KEYS_ONLY_HEADERS: &'static [&'static str] = &[];

    /// Returns the sections in [`HEADERS`](Self::HEADERS) order.
    fn sections(&self) -> Vec<&Section>;

    /// Builds the element from sections in [`HEADERS`](Self::HEADERS) order.
    ///
    /// Missing trailing sections are treated as empty.
    fn from_sections(sections: impl IntoIterator<Item = Section>) -> Self;

    /// Rewrites the element's tokens in place for anonymized fixtures.
    fn translate(&mut self, translator: &mut dyn TokenTranslator);

    /// Appends the serialized form of every section to `buf`.
    fn render_into(&self, buf: &mut String, rebasings: &[Rebase]) {
        for (header, section) in Self::HEADERS.iter().zip(self.sections()) {
            section.render_into(buf, header, Self::INLINE_VALUES, rebasings);
        }
    }

    /// Compares this element against `other` using `differ`.
    fn diff(&self, other: &Self, differ: &dyn Differ) -> ElementDiff {
        differ.diff(DiffInput {
            element: Self::NAME,
            headers: Self::HEADERS,
            keys_only: Self::KEYS_ONLY_HEADERS,
            left: self.sections(),
            right: other.sections(),
        })
    }
}
