//! Compile-run identifiers.

use serde::{Deserialize, Serialize};

use crate::element::Element;
use crate::section::Section;
use crate::translate::TokenTranslator;

/// Compile-run identifiers, always empty once constructed.
///
/// Compilations accumulate without bound and slow down parsing, while nothing
/// downstream reads them, so every constructor discards its input. This keeps
/// them from propagating through merges and splits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Section", into = "Section")]
pub struct Compilations {
    compilations: Section,
}

impl Compilations {
    /// Builds the element from a compilations section, discarding its contents.
    pub fn new(compilations: Section) -> Self {
        if !compilations.is_empty() {
            tracing::trace!(
                discarded = compilations.item_count(),
                "clearing compilations"
            );
        }
        Self::default()
    }

    /// Returns the (always empty) compilations section.
    pub fn section(&self) -> &Section {
        &self.compilations
    }
}

impl From<Section> for Compilations {
    fn from(section: Section) -> Self {
        Self::new(section)
    }
}

impl From<Compilations> for Section {
    fn from(compilations: Compilations) -> Self {
        compilations.compilations
    }
}

impl Element for Compilations {
    const NAME: &'static str = "compilations";
    const HEADERS: &'static [&'static str] = &["compilations"];

    fn sections(&self) -> Vec<&Section> {
        vec![&self.compilations]
    }

    fn from_sections(sections: impl IntoIterator<Item = Section>) -> Self {
        Self::new(sections.into_iter().next().unwrap_or_default())
    }

    fn translate(&mut self, _translator: &mut dyn TokenTranslator) {}
}
