//! The canonical store of extracted entities.
//!
//! A [`Registry`] lives for exactly one document parse. Find-or-create is the
//! only way entities come into existence, so each category holds at most one
//! record per definition.

use std::collections::{BTreeMap, BTreeSet};

use petgraph::{algo::tarjan_scc, graphmap::DiGraphMap};

use crate::domain::{
    ConformanceClass, Image, Recommendation, Requirement, RequirementClass, RegistryView,
};

/// Removes `namespace` from the front of `definition`.
///
/// The prefix is removed repeatedly, so the result never starts with the
/// namespace and stripping twice is the same as stripping once. An empty
/// namespace strips nothing.
#[must_use]
pub fn strip_namespace<'a>(namespace: &str, definition: &'a str) -> &'a str {
    if namespace.is_empty() {
        return definition;
    }
    let mut stripped = definition;
    while let Some(rest) = stripped.strip_prefix(namespace) {
        stripped = rest;
    }
    stripped
}

/// All entities found in one document, keyed by definition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    namespace: String,
    requirements: BTreeMap<String, Requirement>,
    recommendations: BTreeMap<String, Recommendation>,
    requirement_classes: BTreeMap<String, RequirementClass>,
    conformance_classes: BTreeMap<String, ConformanceClass>,
}

impl Registry {
    /// Creates an empty registry which strips `namespace` from every
    /// definition it is given.
    #[must_use]
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            ..Self::default()
        }
    }

    /// The namespace stripped from definitions.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Normalizes a definition into a registry key.
    #[must_use]
    pub fn key<'a>(&self, definition: &'a str) -> &'a str {
        strip_namespace(&self.namespace, definition)
    }

    /// Returns the requirement for `definition`, creating it if needed, and
    /// counts the reference.
    pub fn find_or_create_requirement(&mut self, definition: &str) -> &mut Requirement {
        let key = strip_namespace(&self.namespace, definition).to_string();
        let item = self
            .requirements
            .entry(key)
            .or_insert_with_key(|key| Requirement::new(key.clone()));
        item.ref_count += 1;
        item
    }

    /// Returns the recommendation for `definition`, creating it if needed,
    /// and counts the reference.
    pub fn find_or_create_recommendation(&mut self, definition: &str) -> &mut Recommendation {
        let key = strip_namespace(&self.namespace, definition).to_string();
        let item = self
            .recommendations
            .entry(key)
            .or_insert_with_key(|key| Recommendation::new(key.clone()));
        item.ref_count += 1;
        item
    }

    /// Returns the requirements class for `definition`, creating it if
    /// needed, and counts the reference.
    pub fn find_or_create_requirement_class(
        &mut self,
        definition: &str,
    ) -> &mut RequirementClass {
        let key = strip_namespace(&self.namespace, definition).to_string();
        let item = self
            .requirement_classes
            .entry(key)
            .or_insert_with_key(|key| RequirementClass::new(key.clone()));
        item.ref_count += 1;
        item
    }

    /// Returns the conformance class for `definition`, creating it if needed.
    ///
    /// Conformance classes are not reference counted.
    pub fn find_or_create_conformance_class(
        &mut self,
        definition: &str,
    ) -> &mut ConformanceClass {
        let key = strip_namespace(&self.namespace, definition).to_string();
        self.conformance_classes
            .entry(key)
            .or_insert_with_key(|key| ConformanceClass::new(key.clone()))
    }

    /// Adds `images` to every entity whose key equals `definition`.
    ///
    /// Tags are only ever added; existing tags are kept.
    pub fn check_image_for_relation(&mut self, definition: &str, images: &BTreeSet<Image>) {
        let key = strip_namespace(&self.namespace, definition);
        if let Some(class) = self.requirement_classes.get_mut(key) {
            class.in_image.extend(images.iter().copied());
        }
        if let Some(req) = self.requirements.get_mut(key) {
            req.in_image.extend(images.iter().copied());
        }
        if let Some(rec) = self.recommendations.get_mut(key) {
            rec.in_image.extend(images.iter().copied());
        }
    }

    /// Looks up a requirement without counting a reference.
    #[must_use]
    pub fn requirement(&self, definition: &str) -> Option<&Requirement> {
        self.requirements.get(self.key(definition))
    }

    /// Looks up a recommendation without counting a reference.
    #[must_use]
    pub fn recommendation(&self, definition: &str) -> Option<&Recommendation> {
        self.recommendations.get(self.key(definition))
    }

    /// Looks up a requirements class without counting a reference.
    #[must_use]
    pub fn requirement_class(&self, definition: &str) -> Option<&RequirementClass> {
        self.requirement_classes.get(self.key(definition))
    }

    /// Looks up a conformance class.
    #[must_use]
    pub fn conformance_class(&self, definition: &str) -> Option<&ConformanceClass> {
        self.conformance_classes.get(self.key(definition))
    }

    pub(crate) fn requirement_class_mut(&mut self, key: &str) -> Option<&mut RequirementClass> {
        self.requirement_classes.get_mut(key)
    }

    pub(crate) fn conformance_class_mut(&mut self, key: &str) -> Option<&mut ConformanceClass> {
        self.conformance_classes.get_mut(key)
    }

    /// All requirements, ordered by definition.
    pub fn requirements(&self) -> impl Iterator<Item = &Requirement> {
        self.requirements.values()
    }

    /// All recommendations, ordered by definition.
    pub fn recommendations(&self) -> impl Iterator<Item = &Recommendation> {
        self.recommendations.values()
    }

    /// All requirements classes, ordered by definition.
    pub fn requirement_classes(&self) -> impl Iterator<Item = &RequirementClass> {
        self.requirement_classes.values()
    }

    /// All conformance classes, ordered by definition.
    pub fn conformance_classes(&self) -> impl Iterator<Item = &ConformanceClass> {
        self.conformance_classes.values()
    }

    /// A read-only view over every requirement, recommendation and class.
    #[must_use]
    pub fn view(&self) -> RegistryView<'_> {
        RegistryView {
            requirement_classes: self
                .requirement_classes
                .iter()
                .map(|(key, class)| (key.as_str(), class))
                .collect(),
            requirements: self
                .requirements
                .iter()
                .map(|(key, req)| (key.as_str(), req))
                .collect(),
            recommendations: self
                .recommendations
                .iter()
                .map(|(key, rec)| (key.as_str(), rec))
                .collect(),
        }
    }

    /// The class-to-class import graph. Edges point from the importing class
    /// to the imported class.
    pub(crate) fn import_graph(&self) -> DiGraphMap<&str, ()> {
        let mut graph = DiGraphMap::with_capacity(
            self.requirement_classes.len(),
            self.requirement_classes.len() * 2,
        );
        for (key, class) in &self.requirement_classes {
            graph.add_node(key.as_str());
            for import in &class.imports {
                graph.add_edge(key.as_str(), import.as_str(), ());
            }
        }
        graph
    }

    /// Returns every cycle in the import graph as a sorted list of class
    /// definitions.
    #[must_use]
    pub fn import_cycles(&self) -> Vec<Vec<String>> {
        let graph = self.import_graph();
        let mut cycles = Vec::new();

        for component in tarjan_scc(&graph) {
            if component.len() > 1 {
                let mut definitions: Vec<_> =
                    component.iter().map(|key| (*key).to_string()).collect();
                definitions.sort();
                cycles.push(definitions);
                continue;
            }

            let Some(&node) = component.first() else {
                continue;
            };

            if graph.contains_edge(node, node) {
                cycles.push(vec![node.to_string()]);
            }
        }

        cycles.sort();
        cycles
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    const NS: &str = "http://www.opengis.net/spec/OMS/3.0";

    #[test_case(NS, "http://www.opengis.net/spec/OMS/3.0/req/core", "/req/core"; "absolute url")]
    #[test_case(NS, "/req/core", "/req/core"; "already relative")]
    #[test_case("", "/req/core", "/req/core"; "empty namespace")]
    #[test_case("/a", "/a/a/b", "/b"; "repeated prefix")]
    fn strips_namespace(namespace: &str, definition: &str, expected: &str) {
        let once = strip_namespace(namespace, definition);
        assert_eq!(once, expected);
        assert_eq!(strip_namespace(namespace, once), once);
    }

    #[test]
    fn find_or_create_returns_same_record_and_counts() {
        let mut registry = Registry::new(NS);
        registry.find_or_create_requirement("/req/core/r1");
        registry.find_or_create_requirement(&format!("{NS}/req/core/r1"));
        let req = registry.find_or_create_requirement("/req/core/r1");

        assert_eq!(req.definition, "/req/core/r1");
        assert_eq!(req.ref_count, 3);
        assert_eq!(registry.requirements().count(), 1);
    }

    #[test]
    fn lookups_do_not_count_references() {
        let mut registry = Registry::new("");
        registry.find_or_create_requirement_class("/req/core");
        assert_eq!(registry.requirement_class("/req/core").unwrap().ref_count, 1);
        assert_eq!(registry.requirement_class("/req/core").unwrap().ref_count, 1);
        assert!(registry.requirement_class("/req/missing").is_none());
    }

    #[test]
    fn conformance_classes_are_deduplicated() {
        let mut registry = Registry::new(NS);
        registry.find_or_create_conformance_class("/conf/core").purpose = "p".to_string();
        let conf = registry.find_or_create_conformance_class(&format!("{NS}/conf/core"));
        assert_eq!(conf.purpose, "p");
        assert_eq!(registry.conformance_classes().count(), 1);
    }

    #[test]
    fn iteration_is_sorted_by_definition() {
        let mut registry = Registry::new("");
        for def in ["/req/b", "/req/c", "/req/a"] {
            registry.find_or_create_requirement(def);
        }
        let order: Vec<_> = registry.requirements().map(|r| r.definition.as_str()).collect();
        assert_eq!(order, ["/req/a", "/req/b", "/req/c"]);
    }

    #[test]
    fn image_propagation_only_adds() {
        let mut registry = Registry::new("");
        registry.find_or_create_requirement("/req/core/r1");
        registry.find_or_create_recommendation("/req/core/r1");

        registry.check_image_for_relation("/req/core/r1", &BTreeSet::from([Image::Obs]));
        registry.check_image_for_relation("/req/core/r1", &BTreeSet::from([Image::Sam]));

        let expected = BTreeSet::from([Image::Obs, Image::Sam, Image::None]);
        assert_eq!(registry.requirement("/req/core/r1").unwrap().in_image, expected);
        assert_eq!(registry.recommendation("/req/core/r1").unwrap().in_image, expected);
    }

    #[test]
    fn finds_import_cycles() {
        let mut registry = Registry::new("");
        registry
            .find_or_create_requirement_class("/req/a")
            .imports
            .push("/req/b".to_string());
        registry
            .find_or_create_requirement_class("/req/b")
            .imports
            .push("/req/a".to_string());
        registry
            .find_or_create_requirement_class("/req/c")
            .imports
            .push("/req/c".to_string());
        registry.find_or_create_requirement_class("/req/d");

        assert_eq!(
            registry.import_cycles(),
            vec![
                vec!["/req/a".to_string(), "/req/b".to_string()],
                vec!["/req/c".to_string()],
            ]
        );
    }
}
