//! The specification entities extracted from a document.
//!
//! Entities never own each other. Relationships are held as definition keys
//! into the [`Registry`](crate::domain::Registry) that created them.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::domain::Image;

/// A single normative statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Requirement {
    /// The unique path-like identifier, e.g. `/req/obs-core/Observation`.
    pub definition: String,
    /// The statement text. Empty until a requirement table supplies it.
    pub description: String,
    /// The images this requirement belongs to.
    pub in_image: BTreeSet<Image>,
    /// Definitions of the requirement classes that list this requirement.
    pub in_class: BTreeSet<String>,
    /// Number of table rows that referenced this definition.
    pub ref_count: u32,
}

impl Requirement {
    pub(crate) fn new(definition: String) -> Self {
        let in_image = Image::matching(&definition);
        Self {
            definition,
            description: String::new(),
            in_image,
            in_class: BTreeSet::new(),
            ref_count: 0,
        }
    }
}

/// A non-normative recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    /// The unique path-like identifier, e.g. `/rec/obs-core/Observation`.
    pub definition: String,
    /// The recommendation text. Empty until a recommendation table supplies
    /// it.
    pub description: String,
    /// The images this recommendation belongs to.
    pub in_image: BTreeSet<Image>,
    /// Number of table rows that referenced this definition.
    pub ref_count: u32,
}

impl Recommendation {
    pub(crate) fn new(definition: String) -> Self {
        let in_image = Image::matching(&definition);
        Self {
            definition,
            description: String::new(),
            in_image,
            ref_count: 0,
        }
    }
}

/// A requirements class: a named group of requirements and recommendations
/// which may import other classes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequirementClass {
    /// The unique path-like identifier, e.g. `/req/obs-core`.
    pub definition: String,
    /// The kind of artefact the class applies to.
    pub target_type: String,
    /// Human readable name.
    pub name: String,
    /// Free-text citations of external dependencies, in document order.
    pub dependencies: Vec<String>,
    /// Definitions of imported classes, in document order.
    pub imports: Vec<String>,
    /// Definitions of the requirements in this class, in document order.
    pub requirements: Vec<String>,
    /// Definitions of the recommendations in this class, in document order.
    pub recommendations: Vec<String>,
    /// The images this class belongs to.
    pub in_image: BTreeSet<Image>,
    /// Number of table rows that referenced this definition.
    pub ref_count: u32,
}

impl RequirementClass {
    pub(crate) fn new(definition: String) -> Self {
        let in_image = Image::matching(&definition);
        Self {
            definition,
            target_type: String::new(),
            name: String::new(),
            dependencies: Vec::new(),
            imports: Vec::new(),
            requirements: Vec::new(),
            recommendations: Vec::new(),
            in_image,
            ref_count: 0,
        }
    }
}

/// A conformance class, testing exactly one requirements class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConformanceClass {
    /// The unique path-like identifier, e.g. `/conf/obs-core`.
    pub definition: String,
    /// The purpose of the test.
    pub purpose: String,
    /// The test method.
    pub method: String,
    /// The test type.
    pub test_type: String,
    /// Definition of the requirements class under test.
    pub requirement: Option<String>,
}

impl ConformanceClass {
    pub(crate) const fn new(definition: String) -> Self {
        Self {
            definition,
            purpose: String::new(),
            method: String::new(),
            test_type: String::new(),
            requirement: None,
        }
    }

    /// Sets the requirements class under test.
    ///
    /// A conformance class tests a single requirements class. Replacing an
    /// existing link is logged, and the new link wins.
    pub fn set_requirement(&mut self, requirement_class: String) {
        if let Some(existing) = &self.requirement {
            tracing::error!(
                "Conformance class {} already tests {existing}, overwriting with {requirement_class}",
                self.definition
            );
        }
        self.requirement = Some(requirement_class);
    }
}
