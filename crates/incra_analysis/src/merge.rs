//! Merging per-unit analyses into one joint analysis.
//!
//! Inputs are expected to cover disjoint sets of sources. Dependencies that
//! an input recorded as external (source to class name) become internal
//! (source to source) when the class's owning source is part of the merge.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use crate::analysis::Analysis;
use crate::elements::{Apis, Compilations, DependencyKind, Relations, SourceInfos, Stamps};
use crate::error::{AnalysisError, AnalysisResult};
use crate::section::Section;

/// Unions sections whose key sets are expected to be disjoint.
///
/// A key that does recur takes the last value seen.
fn merge_disjoint<'a>(what: &str, sections: impl IntoIterator<Item = &'a Section>) -> Section {
    let mut merged = Section::new();
    let mut overwritten = 0usize;
    for section in sections {
        for (key, values) in section.iter() {
            if merged.insert(key, values.iter().cloned()) {
                overwritten += 1;
            }
        }
    }
    if overwritten > 0 {
        tracing::warn!(
            section = what,
            overwritten,
            "keys recur across merged analyses; keeping the last value"
        );
    }
    merged
}

/// Unions tables keyed by things several units depend on, such as external
/// classes and jars. A recurring key takes the last value seen.
fn merge_shared<'a>(sections: impl IntoIterator<Item = &'a Section>) -> Section {
    let mut merged = Section::new();
    for section in sections {
        for (key, values) in section.iter() {
            merged.insert(key, values.iter().cloned());
        }
    }
    merged
}

/// Unions binary stamps, keeping the greatest value list for a shared jar.
///
/// Stamps of the form `lastModified(...)` compare by time this way, so the
/// most recent fingerprint wins.
fn merge_overlapping<'a>(sections: impl IntoIterator<Item = &'a Section>) -> Section {
    let mut merged = Section::new();
    for section in sections {
        for (key, values) in section.iter() {
            if merged.get(key).map_or(true, |current| current < values) {
                merged.insert(key, values.iter().cloned());
            }
        }
    }
    merged
}

/// Resolves class names to the source that defines them within a merge.
struct Internalizer<'a> {
    class_to_source: HashMap<&'a str, &'a str>,
    products: &'a Section,
}

impl<'a> Internalizer<'a> {
    fn new(classes: &'a Section, products: &'a Section) -> Self {
        let class_to_source = classes
            .iter()
            .flat_map(|(source, names)| names.iter().map(move |name| (name.as_str(), source)))
            .collect();
        Self {
            class_to_source,
            products,
        }
    }

    /// Returns the source owning `class`, if that source has products here.
    fn owner(&self, class: &str) -> Option<&'a str> {
        self.class_to_source
            .get(class)
            .copied()
            .filter(|source| self.products.contains_key(source))
    }

    /// Merges one dependency kind, moving external edges whose target is
    /// now owned by a merged source into the internal map.
    fn merge_dependencies(
        &self,
        kind: DependencyKind,
        analyses: &[Analysis],
    ) -> (Section, Section) {
        let mut internal = merge_disjoint(
            "internal dependencies",
            analyses.iter().map(|a| a.relations.internal(kind)),
        );
        let naive_external = merge_disjoint(
            "external dependencies",
            analyses.iter().map(|a| a.relations.external(kind)),
        );

        let mut external = Section::new();
        let mut internalized = 0usize;
        for (source, classes) in naive_external.iter() {
            for class in classes {
                match self.owner(class) {
                    Some(owner) => {
                        tracing::trace!(
                            ?kind,
                            source,
                            class = class.as_str(),
                            owner,
                            "internalized dependency"
                        );
                        internal.push(source, owner);
                        internalized += 1;
                    }
                    None => external.push(source, class.as_str()),
                }
            }
        }
        tracing::debug!(?kind, internalized, "merged dependencies");
        (internal, external)
    }

    /// Moves external API digests of now-internal classes to their source.
    fn merge_apis(&self, analyses: &[Analysis]) -> Apis {
        let mut internal =
            merge_disjoint("internal apis", analyses.iter().map(|a| &a.apis.internal));
        let naive_external = merge_shared(analyses.iter().map(|a| &a.apis.external));

        let mut external = Section::new();
        for (class, digests) in naive_external.iter() {
            match self.owner(class) {
                Some(owner) => {
                    internal.insert(owner, digests.iter().cloned());
                }
                None => {
                    external.insert(class, digests.iter().cloned());
                }
            }
        }
        Apis { internal, external }
    }
}

impl Analysis {
    /// Merges analyses covering disjoint sets of sources into one.
    ///
    /// Overlapping sources are not rejected: the last input wins for every
    /// per-source table. Binary stamps may legitimately overlap and keep the
    /// greatest stamp; shared external API digests and jar class names keep
    /// the last input's value. The compile setup is taken from the first input.
    /// Use [`merge_checked`](Self::merge_checked) to reject overlaps.
    pub fn merge(analyses: &[Analysis]) -> Analysis {
        let compile_setup = analyses
            .first()
            .map(|a| Arc::clone(&a.compile_setup))
            .unwrap_or_default();

        let products = merge_disjoint("products", analyses.iter().map(|a| &a.relations.products));
        let binary_deps = merge_disjoint(
            "binary dependencies",
            analyses.iter().map(|a| &a.relations.binary_deps),
        );
        let classes = merge_disjoint("class names", analyses.iter().map(|a| &a.relations.classes));
        let used_names = merge_disjoint(
            "used names",
            analyses.iter().map(|a| &a.relations.used_names),
        );

        let internalizer = Internalizer::new(&classes, &products);
        let dependencies: Vec<(DependencyKind, Section, Section)> = DependencyKind::ALL
            .into_iter()
            .map(|kind| {
                let (internal, external) = internalizer.merge_dependencies(kind, analyses);
                (kind, internal, external)
            })
            .collect();
        let apis = internalizer.merge_apis(analyses);

        let stamps = Stamps {
            products: merge_disjoint(
                "product stamps",
                analyses.iter().map(|a| &a.stamps.products),
            ),
            sources: merge_disjoint("source stamps", analyses.iter().map(|a| &a.stamps.sources)),
            binaries: merge_overlapping(analyses.iter().map(|a| &a.stamps.binaries)),
            classnames: merge_shared(analyses.iter().map(|a| &a.stamps.classnames)),
        };

        let source_infos = SourceInfos {
            source_infos: merge_disjoint(
                "source infos",
                analyses.iter().map(|a| &a.source_infos.source_infos),
            ),
        };

        let mut relations = Relations {
            products,
            binary_deps,
            classes,
            used_names,
            ..Relations::default()
        };
        for (kind, internal, external) in dependencies {
            relations.set_dependencies(kind, internal, external);
        }

        tracing::debug!(
            inputs = analyses.len(),
            sources = relations.products.len(),
            "merged analyses"
        );

        Analysis {
            compile_setup,
            relations,
            stamps,
            apis,
            source_infos,
            compilations: Arc::new(merge_compilations(analyses)),
        }
    }

    /// Like [`merge`](Self::merge), but fails if any source is claimed by
    /// more than one input.
    pub fn merge_checked(analyses: &[Analysis]) -> AnalysisResult<Analysis> {
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        for analysis in analyses {
            let owned: BTreeSet<&str> = analysis
                .relations
                .products
                .keys()
                .chain(analysis.relations.classes.keys())
                .chain(analysis.stamps.sources.keys())
                .collect();
            if let Some(source) = owned.iter().find(|s| seen.contains(*s)) {
                return Err(AnalysisError::OverlappingSources {
                    source_file: source.to_string(),
                });
            }
            seen.extend(owned);
        }
        Ok(Self::merge(analyses))
    }
}

/// Renumbers the distinct compile runs of all inputs.
///
/// The resulting element is cleared on construction like every
/// [`Compilations`]; the renumbering only keeps the input shape intact.
fn merge_compilations(analyses: &[Analysis]) -> Compilations {
    let runs: BTreeSet<&str> = analyses
        .iter()
        .flat_map(|a| a.compilations.section().values())
        .collect();
    let renumbered: Section = runs
        .into_iter()
        .enumerate()
        .map(|(i, run)| (format!("{i:03}"), [run]))
        .collect();
    Compilations::new(renumbered)
}
