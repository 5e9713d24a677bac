//! Per-class API digests.

use serde::{Deserialize, Serialize};

use crate::element::Element;
use crate::section::Section;
use crate::translate::TokenTranslator;

/// Encoded API digests for sources in this analysis and for external classes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Apis {
    /// Source file to the API digest of the classes it defines.
    pub internal: Section,
    /// Fully-qualified external class name to its API digest.
    pub external: Section,
}

impl Element for Apis {
    const NAME: &'static str = "apis";
    const HEADERS: &'static [&'static str] = &["internal apis", "external apis"];
    const INLINE_VALUES: bool = false;

    fn sections(&self) -> Vec<&Section> {
        vec![&self.internal, &self.external]
    }

    fn from_sections(sections: impl IntoIterator<Item = Section>) -> Self {
        let mut s = sections.into_iter();
        Self {
            internal: s.next().unwrap_or_default(),
            external: s.next().unwrap_or_default(),
        }
    }

    fn translate(&mut self, translator: &mut dyn TokenTranslator) {
        self.internal = self
            .internal
            .map_values(|v| translator.convert_base64(v))
            .map_keys(|k| translator.convert(k));
        self.external = self
            .external
            .map_values(|v| translator.convert_base64(v))
            .map_keys(|k| translator.convert(k));
    }
}
