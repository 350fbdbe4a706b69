//! Cross-reference resolution shared by every dialect.
//!
//! The [`Resolver`] owns the registry during a parse. Dialects hand it
//! cleaned values; it applies the ignore filters and shortenings, links
//! entities to their owning class, and propagates image tags.

use std::collections::BTreeSet;

use regex::Regex;

use crate::domain::{Config, ConfigError, Image, Registry, Shortening};

/// Compiled ignore patterns and dependency shortenings.
#[derive(Debug, Clone, Default)]
pub struct Filters {
    ignore_requirements: Vec<Regex>,
    ignore_dependencies: Vec<Regex>,
    shortenings: Vec<Shortening>,
}

impl Filters {
    /// Compiles the filters of a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Pattern`] if any pattern is not a valid
    /// regular expression.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Self::new(
            config.ignore_requirements.as_slice(),
            config.ignore_dependencies.as_slice(),
            config.shortenings.clone(),
        )
    }

    /// Compiles ignore patterns. Each pattern must match a whole value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Pattern`] if any pattern is not a valid
    /// regular expression.
    pub fn new<S: AsRef<str>>(
        ignore_requirements: &[S],
        ignore_dependencies: &[S],
        shortenings: Vec<Shortening>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            ignore_requirements: compile_all(ignore_requirements)?,
            ignore_dependencies: compile_all(ignore_dependencies)?,
            shortenings,
        })
    }

    /// Whether a requirement, recommendation or class definition is ignored.
    #[must_use]
    pub fn ignores_requirement(&self, value: &str) -> bool {
        self.ignore_requirements.iter().any(|p| p.is_match(value))
    }

    /// Whether a dependency citation is ignored.
    #[must_use]
    pub fn ignores_dependency(&self, value: &str) -> bool {
        self.ignore_dependencies.iter().any(|p| p.is_match(value))
    }

    /// Applies the first shortening whose prefix matches.
    #[must_use]
    pub fn shorten(&self, dependency: &str) -> String {
        self.shortenings
            .iter()
            .find_map(|rule| rule.apply(dependency))
            .unwrap_or_else(|| dependency.to_string())
    }
}

fn compile_all<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<Regex>, ConfigError> {
    patterns
        .iter()
        .map(|pattern| {
            let pattern = pattern.as_ref();
            Regex::new(&format!("^(?:{pattern})$")).map_err(|source| ConfigError::Pattern {
                pattern: pattern.to_string(),
                source,
            })
        })
        .collect()
}

/// The requirements class a table is currently filling in, together with
/// the images derived from its definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassScope {
    key: String,
    images: BTreeSet<Image>,
}

impl ClassScope {
    /// The registry key of the class.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

/// The result of parsing one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Every entity found.
    pub registry: Registry,
    /// Dependency citations dropped by the ignore filter.
    pub ignored_dependencies: BTreeSet<String>,
}

/// Populates a [`Registry`] from cleaned table values.
#[derive(Debug)]
pub struct Resolver<'a> {
    registry: Registry,
    filters: &'a Filters,
    ignored_dependencies: BTreeSet<String>,
}

impl<'a> Resolver<'a> {
    /// Starts a fresh registry stripping `namespace` from definitions.
    #[must_use]
    pub fn new(namespace: &str, filters: &'a Filters) -> Self {
        Self {
            registry: Registry::new(namespace),
            filters,
            ignored_dependencies: BTreeSet::new(),
        }
    }

    /// The registry built so far.
    #[must_use]
    pub const fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Whether `value`, as written or with the namespace stripped, matches an
    /// identifier ignore pattern.
    #[must_use]
    pub fn is_ignored(&self, value: &str) -> bool {
        self.filters.ignores_requirement(value)
            || self.filters.ignores_requirement(self.registry.key(value))
    }

    /// Declares (or re-opens) a requirements class.
    ///
    /// Returns `None` if the definition is ignored.
    pub fn declare_class(&mut self, definition: &str) -> Option<ClassScope> {
        if self.is_ignored(definition) {
            tracing::debug!("Ignoring requirements class {definition}");
            return None;
        }
        let class = self.registry.find_or_create_requirement_class(definition);
        Some(ClassScope {
            images: Image::matching(&class.definition),
            key: class.definition.clone(),
        })
    }

    /// Sets the target type of the class in scope.
    pub fn set_target_type(&mut self, scope: &ClassScope, target_type: String) {
        if let Some(class) = self.registry.requirement_class_mut(&scope.key) {
            class.target_type = target_type;
        }
    }

    /// Sets the name of the class in scope.
    pub fn set_name(&mut self, scope: &ClassScope, name: String) {
        if let Some(class) = self.registry.requirement_class_mut(&scope.key) {
            class.name = name;
        }
    }

    /// Adds a requirement to the class in scope.
    pub fn link_requirement(&mut self, scope: &ClassScope, definition: &str) {
        if self.is_ignored(definition) {
            return;
        }
        let req = self.registry.find_or_create_requirement(definition);
        req.in_class.insert(scope.key.clone());
        let key = req.definition.clone();
        if let Some(class) = self.registry.requirement_class_mut(&scope.key) {
            class.requirements.push(key.clone());
        }
        self.registry.check_image_for_relation(&key, &scope.images);
    }

    /// Adds a recommendation to the class in scope.
    pub fn link_recommendation(&mut self, scope: &ClassScope, definition: &str) {
        if self.is_ignored(definition) {
            return;
        }
        let key = self
            .registry
            .find_or_create_recommendation(definition)
            .definition
            .clone();
        if let Some(class) = self.registry.requirement_class_mut(&scope.key) {
            class.recommendations.push(key.clone());
        }
        self.registry.check_image_for_relation(&key, &scope.images);
    }

    /// Records that the class in scope imports another class.
    pub fn link_import(&mut self, scope: &ClassScope, definition: &str) {
        if self.is_ignored(definition) {
            return;
        }
        let key = self
            .registry
            .find_or_create_requirement_class(definition)
            .definition
            .clone();
        if let Some(class) = self.registry.requirement_class_mut(&scope.key) {
            class.imports.push(key.clone());
        }
        self.registry.check_image_for_relation(&key, &scope.images);
    }

    /// Records an external dependency citation of the class in scope.
    ///
    /// Ignored citations are collected for the report instead. Stored
    /// citations are shortened first.
    pub fn add_dependency(&mut self, scope: &ClassScope, citation: &str) {
        if self.filters.ignores_dependency(citation) {
            self.ignored_dependencies.insert(citation.to_string());
            return;
        }
        let citation = self.filters.shorten(citation);
        self.registry.check_image_for_relation(&citation, &scope.images);
        if let Some(class) = self.registry.requirement_class_mut(&scope.key) {
            class.dependencies.push(citation);
        }
    }

    /// Declares (or re-opens) a conformance class, returning its key.
    ///
    /// Returns `None` if the definition is ignored.
    pub fn declare_conformance_class(&mut self, definition: &str) -> Option<String> {
        if self.is_ignored(definition) {
            tracing::debug!("Ignoring conformance class {definition}");
            return None;
        }
        Some(
            self.registry
                .find_or_create_conformance_class(definition)
                .definition
                .clone(),
        )
    }

    /// Sets the requirements class tested by a conformance class.
    pub fn link_conformance_requirement(&mut self, conformance: &str, definition: &str) {
        if self.is_ignored(definition) {
            return;
        }
        let key = self
            .registry
            .find_or_create_requirement_class(definition)
            .definition
            .clone();
        if let Some(conf) = self.registry.conformance_class_mut(conformance) {
            conf.set_requirement(key);
        }
    }

    /// Updates a field of a conformance class.
    pub fn update_conformance_class(
        &mut self,
        conformance: &str,
        update: impl FnOnce(&mut crate::domain::ConformanceClass),
    ) {
        if let Some(conf) = self.registry.conformance_class_mut(conformance) {
            update(conf);
        }
    }

    /// Sets the statement text of a requirement.
    ///
    /// Overwriting an existing description is logged; the new text wins.
    pub fn describe_requirement(&mut self, definition: &str, description: String) {
        if self.is_ignored(definition) {
            return;
        }
        let req = self.registry.find_or_create_requirement(definition);
        if !req.description.is_empty() {
            tracing::warn!(
                "Requirement {} already has a description: {}",
                req.definition,
                req.description
            );
        }
        req.description = description;
    }

    /// Sets the text of a recommendation.
    ///
    /// Overwriting an existing description is logged; the new text wins.
    pub fn describe_recommendation(&mut self, definition: &str, description: String) {
        if self.is_ignored(definition) {
            return;
        }
        let rec = self.registry.find_or_create_recommendation(definition);
        if !rec.description.is_empty() {
            tracing::warn!(
                "Recommendation {} already has a description: {}",
                rec.definition,
                rec.description
            );
        }
        rec.description = description;
    }

    /// Finishes the parse, logging the ignored dependencies.
    #[must_use]
    pub fn finish(self) -> Extraction {
        if !self.ignored_dependencies.is_empty() {
            tracing::info!("Ignored Dependencies:");
            for dependency in &self.ignored_dependencies {
                tracing::info!("  '{dependency}'");
            }
        }
        Extraction {
            registry: self.registry,
            ignored_dependencies: self.ignored_dependencies,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filters() -> Filters {
        Filters::new(
            &["/req/skip.*"],
            &["ISO 19103.*"],
            vec![
                Shortening {
                    start: "http://www.opengis.net/spec/".to_string(),
                    replace: "ogc:".to_string(),
                },
                Shortening {
                    start: "http://www.opengis.net/".to_string(),
                    replace: "net:".to_string(),
                },
            ],
        )
        .unwrap()
    }

    #[test]
    fn invalid_pattern_is_a_config_error() {
        let error = Filters::new(&["("], &[], Vec::new()).unwrap_err();
        assert!(matches!(error, ConfigError::Pattern { pattern, .. } if pattern == "("));
    }

    #[test]
    fn patterns_match_whole_values() {
        let filters = filters();
        assert!(filters.ignores_requirement("/req/skip/x"));
        assert!(!filters.ignores_requirement("/x/req/skip"));
    }

    #[test]
    fn first_shortening_wins_once() {
        let filters = filters();
        assert_eq!(
            filters.shorten("http://www.opengis.net/spec/iso19156"),
            "ogc:iso19156"
        );
        assert_eq!(filters.shorten("http://www.opengis.net/doc"), "net:doc");
        assert_eq!(filters.shorten("ISO 8601"), "ISO 8601");
    }

    #[test]
    fn linked_entities_inherit_class_images() {
        let filters = filters();
        let mut resolver = Resolver::new("", &filters);
        let scope = resolver.declare_class("/req/obs-core").unwrap();
        resolver.link_requirement(&scope, "/req/core/r1");
        resolver.link_recommendation(&scope, "/rec/core/r1");
        resolver.link_import(&scope, "/req/core");

        let registry = resolver.registry();
        let expected = BTreeSet::from([Image::Obs, Image::None]);
        assert_eq!(registry.requirement("/req/core/r1").unwrap().in_image, expected);
        assert_eq!(registry.recommendation("/rec/core/r1").unwrap().in_image, expected);
        assert_eq!(registry.requirement_class("/req/core").unwrap().in_image, expected);

        let class = registry.requirement_class("/req/obs-core").unwrap();
        assert_eq!(class.requirements, ["/req/core/r1"]);
        assert_eq!(class.recommendations, ["/rec/core/r1"]);
        assert_eq!(class.imports, ["/req/core"]);
        assert_eq!(
            registry.requirement("/req/core/r1").unwrap().in_class,
            BTreeSet::from(["/req/obs-core".to_string()])
        );
    }

    #[test]
    fn ignored_values_never_reach_the_registry() {
        let filters = filters();
        let mut resolver = Resolver::new("", &filters);
        assert!(resolver.declare_class("/req/skip").is_none());

        let scope = resolver.declare_class("/req/core").unwrap();
        resolver.link_requirement(&scope, "/req/skip/r1");
        resolver.link_recommendation(&scope, "/req/skip/rec");
        resolver.link_import(&scope, "/req/skipped");
        resolver.describe_requirement("/req/skip/r2", "text".to_string());

        let extraction = resolver.finish();
        assert_eq!(extraction.registry.requirements().count(), 0);
        assert_eq!(extraction.registry.recommendations().count(), 0);
        assert_eq!(extraction.registry.requirement_classes().count(), 1);
    }

    #[test]
    fn namespaced_values_are_ignored_by_their_key() {
        const NS: &str = "http://www.opengis.net/spec/OMS/3.0";
        let filters = filters();
        let mut resolver = Resolver::new(NS, &filters);
        assert!(resolver.declare_class(&format!("{NS}/req/skip")).is_none());
        assert!(resolver
            .declare_conformance_class(&format!("{NS}/req/skip/conf"))
            .is_none());

        let scope = resolver.declare_class(&format!("{NS}/req/core")).unwrap();
        resolver.link_requirement(&scope, &format!("{NS}/req/skip/r1"));
        resolver.link_recommendation(&scope, &format!("{NS}/req/skip/rec"));
        resolver.link_import(&scope, &format!("{NS}/req/skip"));
        resolver.describe_requirement(&format!("{NS}/req/skip/r2"), "text".to_string());
        resolver.describe_recommendation(&format!("{NS}/req/skip/rec"), "text".to_string());

        let registry = resolver.finish().registry;
        assert_eq!(registry.requirements().count(), 0);
        assert_eq!(registry.recommendations().count(), 0);
        assert_eq!(registry.conformance_classes().count(), 0);
        let classes: Vec<_> = registry
            .requirement_classes()
            .map(|class| class.definition.as_str())
            .collect();
        assert_eq!(classes, ["/req/core"]);
        assert!(registry.requirement_class("/req/core").unwrap().imports.is_empty());
    }

    #[test]
    fn dependencies_are_filtered_then_shortened() {
        let filters = filters();
        let mut resolver = Resolver::new("", &filters);
        let scope = resolver.declare_class("/req/core").unwrap();
        resolver.add_dependency(&scope, "ISO 19103:2015");
        resolver.add_dependency(&scope, "http://www.opengis.net/spec/iso19156");

        let extraction = resolver.finish();
        assert_eq!(
            extraction.ignored_dependencies,
            BTreeSet::from(["ISO 19103:2015".to_string()])
        );
        assert_eq!(
            extraction.registry.requirement_class("/req/core").unwrap().dependencies,
            ["ogc:iso19156"]
        );
    }

    #[test]
    fn second_conformance_link_overwrites_first() {
        let filters = Filters::default();
        let mut resolver = Resolver::new("", &filters);
        let conf = resolver.declare_conformance_class("/conf/core").unwrap();
        resolver.link_conformance_requirement(&conf, "/req/a");
        resolver.link_conformance_requirement(&conf, "/req/b");

        let registry = resolver.registry();
        assert_eq!(
            registry.conformance_class("/conf/core").unwrap().requirement.as_deref(),
            Some("/req/b")
        );
        assert_eq!(registry.requirement_class("/req/a").unwrap().ref_count, 1);
    }

    #[test]
    fn overwritten_description_keeps_latest() {
        let filters = Filters::default();
        let mut resolver = Resolver::new("", &filters);
        resolver.describe_requirement("/req/a/r1", "first".to_string());
        resolver.describe_requirement("/req/a/r1", "second".to_string());

        let req = resolver.registry().requirement("/req/a/r1").unwrap();
        assert_eq!(req.description, "second");
        assert_eq!(req.ref_count, 2);
    }
}
