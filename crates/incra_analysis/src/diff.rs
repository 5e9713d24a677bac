//! Structural diffs between analyses.
//!
//! The engine only needs to know *whether* two elements differ; rendering
//! the difference is delegated to a [`Differ`]. [`KeyDiffer`] is the default
//! implementation and reports added, removed, and changed keys per section.

use std::fmt;

use serde::Serialize;

use crate::section::Section;

/// The sections of two same-kind elements handed to a [`Differ`].
#[derive(Debug)]
pub struct DiffInput<'a> {
    /// Element name (e.g. `"stamps"`).
    pub element: &'static str,
    /// Section headers in declared order.
    pub headers: &'static [&'static str],
    /// Headers whose values must not be compared, only their key sets.
    pub keys_only: &'static [&'static str],
    /// Sections of the left-hand element, in header order.
    pub left: Vec<&'a Section>,
    /// Sections of the right-hand element, in header order.
    pub right: Vec<&'a Section>,
}

/// Produces a diff report for two elements of the same kind.
pub trait Differ {
    /// Compares the sections in `input`.
    fn diff(&self, input: DiffInput<'_>) -> ElementDiff;
}

/// Per-section difference.
///
/// `added` keys exist only on the right, `removed` keys only on the left,
/// and `changed` keys exist on both sides with different values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SectionDiff {
    /// Section header.
    pub header: String,
    /// Keys present only in the right-hand section.
    pub added: Vec<String>,
    /// Keys present only in the left-hand section.
    pub removed: Vec<String>,
    /// Keys present in both with differing values.
    pub changed: Vec<String>,
}

impl SectionDiff {
    /// Returns `true` if any key was added, removed, or changed.
    pub fn is_different(&self) -> bool {
        !(self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty())
    }
}

/// Difference report for one element; holds only differing sections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ElementDiff {
    /// Element name.
    pub element: String,
    /// Sections that differ.
    pub sections: Vec<SectionDiff>,
}

impl ElementDiff {
    /// Returns `true` if any section differs.
    pub fn is_different(&self) -> bool {
        self.sections.iter().any(SectionDiff::is_different)
    }
}

impl fmt::Display for ElementDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}:", self.element)?;
        for section in &self.sections {
            writeln!(f, "  {}:", section.header)?;
            for key in &section.added {
                writeln!(f, "    + {key}")?;
            }
            for key in &section.removed {
                writeln!(f, "    - {key}")?;
            }
            for key in &section.changed {
                writeln!(f, "    ~ {key}")?;
            }
        }
        Ok(())
    }
}

/// Default [`Differ`] comparing key sets and per-key values.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyDiffer;

impl KeyDiffer {
    fn diff_section(header: &str, left: &Section, right: &Section, keys_only: bool) -> SectionDiff {
        let added = right
            .keys()
            .filter(|k| !left.contains_key(k))
            .map(str::to_string)
            .collect();
        let removed = left
            .keys()
            .filter(|k| !right.contains_key(k))
            .map(str::to_string)
            .collect();
        let changed = if keys_only {
            Vec::new()
        } else {
            left.iter()
                .filter(|(k, vs)| right.get(k).is_some_and(|other| other != *vs))
                .map(|(k, _)| k.to_string())
                .collect()
        };
        SectionDiff {
            header: header.to_string(),
            added,
            removed,
            changed,
        }
    }
}

impl Differ for KeyDiffer {
    fn diff(&self, input: DiffInput<'_>) -> ElementDiff {
        let sections = input
            .headers
            .iter()
            .zip(input.left.iter().zip(input.right.iter()))
            .map(|(header, (left, right))| {
                let keys_only = input.keys_only.contains(header);
                Self::diff_section(header, left, right, keys_only)
            })
            .filter(SectionDiff::is_different)
            .collect();
        ElementDiff {
            element: input.element.to_string(),
            sections,
        }
    }
}
