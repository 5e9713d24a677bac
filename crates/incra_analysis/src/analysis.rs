//! The aggregate analysis and its whole-file operations.

use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use incra_common::{ContentHash, Rebase};
use serde::{Deserialize, Serialize};

use crate::diff::{Differ, ElementDiff};
use crate::element::Element;
use crate::elements::{Apis, CompileSetup, Compilations, Relations, SourceInfos, Stamps};
use crate::error::{AnalysisError, AnalysisResult};
use crate::parser::parse_analysis;
use crate::translate::TokenTranslator;

/// First line of every serialized analysis.
pub const FORMAT_VERSION_LINE: &str = "format version: 5";

/// Parsed representation of an incremental-compilation analysis.
///
/// All file names in keys and values are absolute paths, exactly as they
/// appear on disk; the engine never resolves them further.
///
/// The compile setup and compilations are shared by reference between an
/// analysis and the analyses split from it. Analyses are treated as
/// immutable values once built; only [`translate`](Self::translate) mutates
/// in place, and copies the shared parts on write.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Analysis {
    /// Compiler configuration.
    pub compile_setup: Arc<CompileSetup>,
    /// Dependency graph.
    pub relations: Relations,
    /// Fingerprints.
    pub stamps: Stamps,
    /// API digests.
    pub apis: Apis,
    /// Per-source diagnostics.
    pub source_infos: SourceInfos,
    /// Compile-run identifiers (always empty).
    pub compilations: Arc<Compilations>,
}

impl Analysis {
    /// Assembles an analysis from its elements.
    pub fn new(
        compile_setup: CompileSetup,
        relations: Relations,
        stamps: Stamps,
        apis: Apis,
        source_infos: SourceInfos,
        compilations: Compilations,
    ) -> Self {
        Self {
            compile_setup: Arc::new(compile_setup),
            relations,
            stamps,
            apis,
            source_infos,
            compilations: Arc::new(compilations),
        }
    }

    /// Reads and parses an analysis file.
    pub fn read_from(path: &Path) -> AnalysisResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| AnalysisError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        parse_analysis(&text)
    }

    /// Every source this analysis tracks: stamped sources plus sources with
    /// products.
    pub fn sources(&self) -> BTreeSet<String> {
        self.stamps
            .sources
            .keys()
            .chain(self.relations.products.keys())
            .map(str::to_string)
            .collect()
    }

    /// Returns one report per element that differs from `other`.
    ///
    /// An empty result means the analyses are equal.
    pub fn diff(&self, other: &Analysis, differ: &dyn Differ) -> Vec<ElementDiff> {
        [
            self.compile_setup.diff(&other.compile_setup, differ),
            self.relations.diff(&other.relations, differ),
            self.stamps.diff(&other.stamps, differ),
            self.apis.diff(&other.apis, differ),
            self.source_infos.diff(&other.source_infos, differ),
            self.compilations.diff(&other.compilations, differ),
        ]
        .into_iter()
        .filter(ElementDiff::is_different)
        .collect()
    }

    /// Serializes the analysis to its on-disk text form.
    ///
    /// `rebasings` are applied, in order, to every `key -> value` item.
    pub fn render(&self, rebasings: &[Rebase]) -> String {
        let mut buf = String::new();
        buf.push_str(FORMAT_VERSION_LINE);
        buf.push('\n');
        self.compile_setup.render_into(&mut buf, rebasings);
        self.relations.render_into(&mut buf, rebasings);
        self.stamps.render_into(&mut buf, rebasings);
        self.apis.render_into(&mut buf, rebasings);
        self.source_infos.render_into(&mut buf, rebasings);
        self.compilations.render_into(&mut buf, rebasings);
        buf
    }

    /// Writes the serialized analysis to `out`.
    pub fn write<W: Write>(&self, out: &mut W, rebasings: &[Rebase]) -> std::io::Result<()> {
        out.write_all(self.render(rebasings).as_bytes())
    }

    /// Writes the serialized analysis to a file, creating parent directories.
    pub fn write_to_path(&self, path: &Path, rebasings: &[Rebase]) -> AnalysisResult<()> {
        let io_err = |e| AnalysisError::Io {
            path: path.to_path_buf(),
            source: e,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(path, self.render(rebasings)).map_err(io_err)
    }

    /// Hash of the canonical serialization, without rebasings.
    pub fn content_hash(&self) -> ContentHash {
        ContentHash::of(self.render(&[]))
    }

    /// Rewrites every token through `translator` for anonymized fixtures.
    ///
    /// Also strips compiler-plugin options from the compile setup. Never
    /// apply this to an analysis the build will consume.
    pub fn translate(&mut self, translator: &mut dyn TokenTranslator) {
        Arc::make_mut(&mut self.compile_setup).translate(translator);
        self.relations.translate(translator);
        self.stamps.translate(translator);
        self.apis.translate(translator);
        self.source_infos.translate(translator);
        Arc::make_mut(&mut self.compilations).translate(translator);
    }
}
