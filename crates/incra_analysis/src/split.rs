//! Splitting a joint analysis back into per-unit analyses.
//!
//! Internal dependencies are recorded source to source, while external ones
//! are recorded source to class name. When a split separates a source from
//! the source it depends on, the edge must become external, so each source
//! needs one consistently chosen representative class name.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use incra_common::PathResolver;

use crate::analysis::Analysis;
use crate::elements::{Apis, DependencyKind, Relations, SourceInfos, Stamps};
use crate::error::{AnalysisError, AnalysisResult};
use crate::section::Section;

/// Picks the class that stands in for `source` in external dependencies.
///
/// Prefers a class whose simple name matches the source file's base name,
/// which makes split analyses easier to read; otherwise takes the class that
/// sorts lowest. The choice does not depend on the order of `classes`.
pub fn representative<'a>(source: &str, classes: &'a [String]) -> Option<&'a str> {
    let primary = Path::new(source)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(source);
    let simple_name = |fqcn: &str| fqcn.rsplit('.').next().unwrap_or(fqcn).to_string();
    classes
        .iter()
        .filter(|fqcn| simple_name(fqcn) == primary)
        .min()
        .or_else(|| classes.iter().min())
        .map(String::as_str)
}

/// Lookup tables shared by every split of one analysis.
struct Externalizer<'a> {
    /// Source to its representative class.
    representatives: HashMap<&'a str, &'a str>,
    /// Representative class to the original internal API of its source.
    representative_apis: HashMap<&'a str, &'a [String]>,
}

impl<'a> Externalizer<'a> {
    fn new(analysis: &'a Analysis) -> Self {
        let representatives: HashMap<&str, &str> = analysis
            .relations
            .classes
            .iter()
            .filter_map(|(source, classes)| {
                representative(source, classes).map(|class| (source, class))
            })
            .collect();
        let representative_apis = representatives
            .iter()
            .filter_map(|(source, class)| {
                analysis
                    .apis
                    .internal
                    .get(source)
                    .map(|digests| (*class, digests))
            })
            .collect();
        Self {
            representatives,
            representative_apis,
        }
    }

    /// Splits one dependency kind for `split`, rewriting internal edges whose
    /// target lies outside the split as external edges to its representative.
    fn split_dependencies(
        &self,
        all_internal: &Section,
        all_external: &Section,
        split: &BTreeSet<String>,
    ) -> AnalysisResult<(Section, Section)> {
        let mut external = all_external.filter_keys(|source| split.contains(source));
        let mut internal = Section::new();
        for (source, targets) in all_internal.iter() {
            if !split.contains(source) {
                continue;
            }
            for target in targets {
                if split.contains(target) {
                    internal.push(source, target.as_str());
                } else {
                    let class = self.representatives.get(target.as_str()).ok_or_else(|| {
                        AnalysisError::MissingRepresentative {
                            source_file: target.clone(),
                        }
                    })?;
                    tracing::trace!(
                        source,
                        target = target.as_str(),
                        class = *class,
                        "externalized dependency"
                    );
                    external.push(source, *class);
                }
            }
        }
        Ok((internal, external))
    }

    /// Collects API digests for every external target of `relations`.
    ///
    /// Targets externalized by this split copy the original internal API of
    /// their source; targets that were already external keep their recorded
    /// digest, which must exist.
    fn external_apis(&self, relations: &Relations, original: &Section) -> AnalysisResult<Section> {
        let mut external = Section::new();
        for class in relations.external_targets() {
            if external.contains_key(class) {
                continue;
            }
            let digests = match self.representative_apis.get(class) {
                Some(digests) => *digests,
                None => original
                    .get(class)
                    .ok_or_else(|| AnalysisError::MissingExternalApi {
                        class: class.to_string(),
                    })?,
            };
            external.insert(class, digests.iter().cloned());
        }
        Ok(external)
    }
}

impl Analysis {
    /// Splits this analysis into one analysis per source set in `splits`.
    ///
    /// Sources are resolved to absolute identities through `resolver`. With
    /// `catchall`, one extra trailing analysis covers every stamped source not
    /// named by any split; without it such sources are dropped. The compile
    /// setup and compilations are shared with every result.
    ///
    /// Fails if an externalized dependency has no representative class or an
    /// external dependency has no recorded API digest.
    pub fn split<I, S>(
        &self,
        splits: impl IntoIterator<Item = I>,
        catchall: bool,
        resolver: &dyn PathResolver,
    ) -> AnalysisResult<Vec<Analysis>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut splits: Vec<BTreeSet<String>> = splits
            .into_iter()
            .map(|split| {
                split
                    .into_iter()
                    .map(|source| resolver.resolve(source.as_ref()))
                    .collect()
            })
            .collect();
        if catchall {
            let covered: HashSet<&str> = splits.iter().flatten().map(String::as_str).collect();
            let remainder: BTreeSet<String> = self
                .stamps
                .sources
                .keys()
                .filter(|source| !covered.contains(source))
                .map(str::to_string)
                .collect();
            splits.push(remainder);
        }

        let externalizer = Externalizer::new(self);
        let analyses = splits
            .iter()
            .map(|split| self.split_one(split, &externalizer))
            .collect::<AnalysisResult<Vec<_>>>()?;
        tracing::debug!(
            splits = analyses.len(),
            catchall,
            sources = self.relations.products.len(),
            "split analysis"
        );
        Ok(analyses)
    }

    fn split_one(
        &self,
        split: &BTreeSet<String>,
        externalizer: &Externalizer<'_>,
    ) -> AnalysisResult<Analysis> {
        let in_split = |source: &str| split.contains(source);

        let mut relations = Relations {
            products: self.relations.products.filter_keys(in_split),
            binary_deps: self.relations.binary_deps.filter_keys(in_split),
            classes: self.relations.classes.filter_keys(in_split),
            used_names: self.relations.used_names.filter_keys(in_split),
            ..Relations::default()
        };
        for kind in DependencyKind::ALL {
            let (internal, external) = externalizer.split_dependencies(
                self.relations.internal(kind),
                self.relations.external(kind),
                split,
            )?;
            relations.set_dependencies(kind, internal, external);
        }

        let product_files: HashSet<&str> = relations.products.values().collect();
        let binary_files: HashSet<&str> = relations.binary_deps.values().collect();
        let stamps = Stamps {
            products: self
                .stamps
                .products
                .filter_keys(|product| product_files.contains(product)),
            sources: self.stamps.sources.filter_keys(in_split),
            binaries: self
                .stamps
                .binaries
                .filter_keys(|binary| binary_files.contains(binary)),
            classnames: self
                .stamps
                .classnames
                .filter_keys(|binary| binary_files.contains(binary)),
        };

        let apis = Apis {
            internal: self.apis.internal.filter_keys(in_split),
            external: externalizer.external_apis(&relations, &self.apis.external)?,
        };

        let source_infos = SourceInfos {
            source_infos: self.source_infos.source_infos.filter_keys(in_split),
        };

        Ok(Analysis {
            compile_setup: Arc::clone(&self.compile_setup),
            relations,
            stamps,
            apis,
            source_infos,
            compilations: Arc::clone(&self.compilations),
        })
    }
}
