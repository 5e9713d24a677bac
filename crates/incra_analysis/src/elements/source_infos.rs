//! Opaque per-source diagnostic blobs.

use serde::{Deserialize, Serialize};

use crate::element::Element;
use crate::section::Section;
use crate::translate::TokenTranslator;

/// Source file to its encoded compiler diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceInfos {
    /// Source file to encoded source info.
    pub source_infos: Section,
}

impl Element for SourceInfos {
    const NAME: &'static str = "source infos";
    const HEADERS: &'static [&'static str] = &["source infos"];
    const INLINE_VALUES: bool = false;

    fn sections(&self) -> Vec<&Section> {
        vec![&self.source_infos]
    }

    fn from_sections(sections: impl IntoIterator<Item = Section>) -> Self {
        Self {
            source_infos: sections.into_iter().next().unwrap_or_default(),
        }
    }

    fn translate(&mut self, translator: &mut dyn TokenTranslator) {
        self.source_infos = self
            .source_infos
            .map_values(|v| translator.convert_base64(v))
            .map_keys(|k| translator.convert(k));
    }
}
