//! Per-class slices of the registry.
//!
//! A slice holds a root requirements class, every class reachable from it
//! through `imports`, and the requirements and recommendations those classes
//! own directly.

use std::collections::BTreeMap;

use petgraph::visit::Dfs;
use thiserror::Error;

use crate::domain::{Recommendation, Registry, Requirement, RequirementClass};

/// A definition-ordered, read-only selection of registry entries.
///
/// Renderers consume views, so a full registry and a single-class slice go
/// through the same code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryView<'a> {
    /// Selected requirements classes.
    pub requirement_classes: BTreeMap<&'a str, &'a RequirementClass>,
    /// Selected requirements.
    pub requirements: BTreeMap<&'a str, &'a Requirement>,
    /// Selected recommendations.
    pub recommendations: BTreeMap<&'a str, &'a Recommendation>,
}

/// The root of a slice was not found in the registry.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("requirements class {0} not found")]
pub struct SliceError(pub String);

/// Collects the closure of `root` over the import graph.
///
/// Each reachable class is visited once, so import cycles terminate.
///
/// # Errors
///
/// Returns [`SliceError`] if `root` is not a known requirements class.
pub fn slice<'a>(registry: &'a Registry, root: &str) -> Result<RegistryView<'a>, SliceError> {
    let root_class = registry
        .requirement_class(root)
        .ok_or_else(|| SliceError(registry.key(root).to_string()))?;

    let graph = registry.import_graph();
    let mut view = RegistryView::default();
    let mut dfs = Dfs::new(&graph, root_class.definition.as_str());

    while let Some(key) = dfs.next(&graph) {
        let Some(class) = registry.requirement_class(key) else {
            continue;
        };
        view.requirement_classes
            .insert(class.definition.as_str(), class);

        for req in class
            .requirements
            .iter()
            .filter_map(|def| registry.requirement(def))
        {
            view.requirements.insert(req.definition.as_str(), req);
        }
        for rec in class
            .recommendations
            .iter()
            .filter_map(|def| registry.recommendation(def))
        {
            view.recommendations.insert(rec.definition.as_str(), rec);
        }
    }

    tracing::trace!(
        root = %root_class.definition,
        classes = view.requirement_classes.len(),
        requirements = view.requirements.len(),
        "sliced registry"
    );
    Ok(view)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class_with(
        registry: &mut Registry,
        definition: &str,
        imports: &[&str],
        requirements: &[&str],
    ) {
        for import in imports {
            registry.find_or_create_requirement_class(import);
        }
        for req in requirements {
            registry
                .find_or_create_requirement(req)
                .in_class
                .insert(definition.to_string());
        }
        let class = registry.find_or_create_requirement_class(definition);
        class.imports.extend(imports.iter().map(ToString::to_string));
        class
            .requirements
            .extend(requirements.iter().map(ToString::to_string));
    }

    fn keys<T>(map: &BTreeMap<&str, T>) -> Vec<String> {
        map.keys().map(ToString::to_string).collect()
    }

    #[test]
    fn collects_transitive_imports_and_their_requirements() {
        let mut registry = Registry::new("");
        class_with(&mut registry, "/req/c", &[], &["/req/c/r1"]);
        class_with(&mut registry, "/req/b", &["/req/c"], &["/req/b/r1"]);
        class_with(&mut registry, "/req/a", &["/req/b"], &["/req/a/r1"]);
        class_with(&mut registry, "/req/unrelated", &[], &["/req/unrelated/r1"]);
        registry.find_or_create_recommendation("/rec/b/x");
        registry
            .requirement_class_mut("/req/b")
            .unwrap()
            .recommendations
            .push("/rec/b/x".to_string());

        let view = slice(&registry, "/req/a").unwrap();

        assert_eq!(keys(&view.requirement_classes), ["/req/a", "/req/b", "/req/c"]);
        assert_eq!(
            keys(&view.requirements),
            ["/req/a/r1", "/req/b/r1", "/req/c/r1"]
        );
        assert_eq!(keys(&view.recommendations), ["/rec/b/x"]);
    }

    #[test]
    fn leaf_class_slices_to_itself() {
        let mut registry = Registry::new("");
        class_with(&mut registry, "/req/c", &[], &["/req/c/r1"]);
        class_with(&mut registry, "/req/b", &["/req/c"], &[]);

        let view = slice(&registry, "/req/c").unwrap();
        assert_eq!(keys(&view.requirement_classes), ["/req/c"]);
        assert_eq!(keys(&view.requirements), ["/req/c/r1"]);
    }

    #[test]
    fn terminates_on_import_cycles() {
        let mut registry = Registry::new("");
        class_with(&mut registry, "/req/a", &["/req/b"], &["/req/a/r1"]);
        class_with(&mut registry, "/req/b", &["/req/a", "/req/b"], &["/req/b/r1"]);

        let view = slice(&registry, "/req/b").unwrap();
        assert_eq!(keys(&view.requirement_classes), ["/req/a", "/req/b"]);
        assert_eq!(keys(&view.requirements), ["/req/a/r1", "/req/b/r1"]);
    }

    #[test]
    fn slicing_does_not_count_references() {
        let mut registry = Registry::new("");
        class_with(&mut registry, "/req/b", &[], &[]);
        class_with(&mut registry, "/req/a", &["/req/b"], &[]);
        let before = registry.clone();

        slice(&registry, "/req/a").unwrap();
        assert_eq!(registry, before);
    }

    #[test]
    fn unknown_root_is_an_error() {
        let registry = Registry::new("");
        assert_eq!(
            slice(&registry, "/req/missing"),
            Err(SliceError("/req/missing".to_string()))
        );
    }
}
