//! Compiler configuration recorded alongside an analysis.

use serde::{Deserialize, Serialize};

use crate::element::Element;
use crate::section::Section;
use crate::translate::TokenTranslator;

/// Option prefixes that load compiler plugins; scrubbed by translation.
const PLUGIN_OPTION_PREFIXES: &[&str] = &["-Xplugin", "-P"];

/// Output layout, compiler flags, compiler version, and ordering mode.
///
/// Passed through merge and split untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompileSetup {
    /// Single or multiple output directories.
    pub output_mode: Section,
    /// Source directory to output directory mapping.
    pub output_dirs: Section,
    /// Scala compiler options, keyed by position.
    pub compile_options: Section,
    /// Javac options, keyed by position.
    pub javac_options: Section,
    /// Compiler version string.
    pub compiler_version: Section,
    /// Mixed, java-then-scala, or scala-then-java.
    pub compile_order: Section,
    /// Whether name hashing was enabled.
    pub name_hashing: Section,
}

impl Element for CompileSetup {
    const NAME: &'static str = "compile setup";
    const HEADERS: &'static [&'static str] = &[
        "output mode",
        "output directories",
        "compile options",
        "javac options",
        "compiler version",
        "compile order",
        "name hashing",
    ];

    fn sections(&self) -> Vec<&Section> {
        vec![
            &self.output_mode,
            &self.output_dirs,
            &self.compile_options,
            &self.javac_options,
            &self.compiler_version,
            &self.compile_order,
            &self.name_hashing,
        ]
    }

    fn from_sections(sections: impl IntoIterator<Item = Section>) -> Self {
        let mut s = sections.into_iter();
        Self {
            output_mode: s.next().unwrap_or_default(),
            output_dirs: s.next().unwrap_or_default(),
            compile_options: s.next().unwrap_or_default(),
            javac_options: s.next().unwrap_or_default(),
            compiler_version: s.next().unwrap_or_default(),
            compile_order: s.next().unwrap_or_default(),
            name_hashing: s.next().unwrap_or_default(),
        }
    }

    fn translate(&mut self, translator: &mut dyn TokenTranslator) {
        self.output_dirs = self.output_dirs.map_values(|v| translator.convert(v));
        self.compile_options.retain(|_, values| {
            !values.iter().any(|v| {
                PLUGIN_OPTION_PREFIXES
                    .iter()
                    .any(|prefix| v.starts_with(prefix))
            })
        });
    }
}
