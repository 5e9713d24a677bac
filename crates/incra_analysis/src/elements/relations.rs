//! The dependency graph of an analysis.

use serde::{Deserialize, Serialize};

use crate::element::Element;
use crate::section::Section;
use crate::translate::TokenTranslator;

/// The four kinds of source dependency tracked by the compiler.
///
/// Each kind has an internal map (source to source within this analysis) and
/// an external map (source to class name).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyKind {
    /// Any direct use of a type or member.
    Direct,
    /// Inheritance visible through the public API.
    PublicInherited,
    /// Reference to a member of another class.
    MemberRef,
    /// Any inheritance relation.
    Inheritance,
}

impl DependencyKind {
    /// Every dependency kind, in on-disk order.
    pub const ALL: [DependencyKind; 4] = [
        DependencyKind::Direct,
        DependencyKind::PublicInherited,
        DependencyKind::MemberRef,
        DependencyKind::Inheritance,
    ];
}

/// Products, binary dependencies, source dependencies, class names, and
/// used names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relations {
    /// Source to produced class files.
    pub products: Section,
    /// Source to jar or class file dependencies outside the build.
    pub binary_deps: Section,
    /// Direct dependencies on sources in this analysis.
    pub direct_internal: Section,
    /// Direct dependencies on classes outside this analysis.
    pub direct_external: Section,
    /// Public-inherited dependencies on sources in this analysis.
    pub public_inherited_internal: Section,
    /// Public-inherited dependencies on classes outside this analysis.
    pub public_inherited_external: Section,
    /// Member-reference dependencies on sources in this analysis.
    pub member_ref_internal: Section,
    /// Member-reference dependencies on classes outside this analysis.
    pub member_ref_external: Section,
    /// Inheritance dependencies on sources in this analysis.
    pub inheritance_internal: Section,
    /// Inheritance dependencies on classes outside this analysis.
    pub inheritance_external: Section,
    /// Source to fully-qualified names of the classes it defines.
    pub classes: Section,
    /// Source to names it uses.
    pub used_names: Section,
}

impl Relations {
    /// Returns the internal (source to source) edges of `kind`.
    pub fn internal(&self, kind: DependencyKind) -> &Section {
        match kind {
            DependencyKind::Direct => &self.direct_internal,
            DependencyKind::PublicInherited => &self.public_inherited_internal,
            DependencyKind::MemberRef => &self.member_ref_internal,
            DependencyKind::Inheritance => &self.inheritance_internal,
        }
    }

    /// Returns the external (source to class) edges of `kind`.
    pub fn external(&self, kind: DependencyKind) -> &Section {
        match kind {
            DependencyKind::Direct => &self.direct_external,
            DependencyKind::PublicInherited => &self.public_inherited_external,
            DependencyKind::MemberRef => &self.member_ref_external,
            DependencyKind::Inheritance => &self.inheritance_external,
        }
    }

    /// Replaces both edge maps of `kind`.
    pub fn set_dependencies(&mut self, kind: DependencyKind, internal: Section, external: Section) {
        let (int_slot, ext_slot) = match kind {
            DependencyKind::Direct => (&mut self.direct_internal, &mut self.direct_external),
            DependencyKind::PublicInherited => (
                &mut self.public_inherited_internal,
                &mut self.public_inherited_external,
            ),
            DependencyKind::MemberRef => {
                (&mut self.member_ref_internal, &mut self.member_ref_external)
            }
            DependencyKind::Inheritance => (
                &mut self.inheritance_internal,
                &mut self.inheritance_external,
            ),
        };
        *int_slot = internal;
        *ext_slot = external;
    }

    /// Iterates over every external class name referenced by any kind.
    pub fn external_targets(&self) -> impl Iterator<Item = &str> {
        DependencyKind::ALL
            .into_iter()
            .flat_map(move |kind| self.external(kind).values())
    }
}

impl Element for Relations {
    const NAME: &'static str = "relations";
    const HEADERS: &'static [&'static str] = &[
        "products",
        "binary dependencies",
        "direct source dependencies",
        "direct external dependencies",
        "public inherited source dependencies",
        "public inherited external dependencies",
        "member reference internal dependencies",
        "member reference external dependencies",
        "inheritance internal dependencies",
        "inheritance external dependencies",
        "class names",
        "used names",
    ];

    fn sections(&self) -> Vec<&Section> {
        vec![
            &self.products,
            &self.binary_deps,
            &self.direct_internal,
            &self.direct_external,
            &self.public_inherited_internal,
            &self.public_inherited_external,
            &self.member_ref_internal,
            &self.member_ref_external,
            &self.inheritance_internal,
            &self.inheritance_external,
            &self.classes,
            &self.used_names,
        ]
    }

    fn from_sections(sections: impl IntoIterator<Item = Section>) -> Self {
        let mut s = sections.into_iter();
        Self {
            products: s.next().unwrap_or_default(),
            binary_deps: s.next().unwrap_or_default(),
            direct_internal: s.next().unwrap_or_default(),
            direct_external: s.next().unwrap_or_default(),
            public_inherited_internal: s.next().unwrap_or_default(),
            public_inherited_external: s.next().unwrap_or_default(),
            member_ref_internal: s.next().unwrap_or_default(),
            member_ref_external: s.next().unwrap_or_default(),
            inheritance_internal: s.next().unwrap_or_default(),
            inheritance_external: s.next().unwrap_or_default(),
            classes: s.next().unwrap_or_default(),
            used_names: s.next().unwrap_or_default(),
        }
    }

    fn translate(&mut self, translator: &mut dyn TokenTranslator) {
        let translated: Vec<Section> = self
            .sections()
            .into_iter()
            .map(|section| {
                section
                    .map_values(|v| translator.convert(v))
                    .map_keys(|k| translator.convert(k))
            })
            .collect();
        *self = Self::from_sections(translated);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_accessors_are_paired() {
        let mut relations = Relations::default();
        for (i, kind) in DependencyKind::ALL.into_iter().enumerate() {
            let internal: Section = [("/src/A.scala", [format!("/src/I{i}.scala")])]
                .into_iter()
                .collect();
            let external: Section = [("/src/A.scala", [format!("com.x.E{i}")])]
                .into_iter()
                .collect();
            relations.set_dependencies(kind, internal.clone(), external.clone());
            assert_eq!(relations.internal(kind), &internal);
            assert_eq!(relations.external(kind), &external);
        }
        assert_eq!(
            relations.inheritance_external.get("/src/A.scala").unwrap(),
            ["com.x.E3"]
        );
        assert_eq!(
            relations.direct_internal.get("/src/A.scala").unwrap(),
            ["/src/I0.scala"]
        );
    }

    #[test]
    fn external_targets_spans_kinds() {
        let mut relations = Relations::default();
        relations.direct_external.push("/src/A.scala", "com.x.B");
        relations.member_ref_external.push("/src/A.scala", "com.x.C");
        let mut targets: Vec<&str> = relations.external_targets().collect();
        targets.sort();
        assert_eq!(targets, ["com.x.B", "com.x.C"]);
    }

    #[test]
    fn header_count_matches_sections() {
        let relations = Relations::default();
        assert_eq!(relations.sections().len(), Relations::HEADERS.len());
    }

    #[test]
    fn translate_rewrites_keys_and_values() {
        let mut relations = Relations::default();
        relations.products.push("/work/Alpha.scala", "/work/Alpha.class");
        relations.classes.push("/work/Alpha.scala", "pkg.Alpha");
        relations.translate(&mut crate::translate::Anonymizer::new(1));
        assert!(!relations.products.contains_key("/work/Alpha.scala"));
        assert_eq!(relations.products.len(), 1);
        let (src, classes) = relations.classes.iter().next().unwrap();
        assert!(src.ends_with(".scala"));
        assert_eq!(classes.len(), 1);
        assert!(relations.products.contains_key(src));
    }
}
