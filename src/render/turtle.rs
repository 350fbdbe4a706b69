use std::fmt;

use crate::domain::{Metadata, Registry};

const PREFIXES: &str = "@prefix adms: <http://www.w3.org/ns/adms#> .
@prefix dcat: <http://www.w3.org/ns/dcat#> .
@prefix dct: <http://purl.org/dc/terms/> .
@prefix na: <http://www.opengis.net/def/metamodel/ogc-na/> .
@prefix ogcdt: <http://www.opengis.net/def/doc-type/> .
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix reg: <http://purl.org/linked-data/registry#> .
@prefix skos: <http://www.w3.org/2004/02/skos/core#> .
@prefix spec: <http://www.opengis.net/def/ont/modspec/> .
@prefix specrel: <http://www.opengis.net/def/ont/specrel/> .
@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .
@prefix dcterms: <http://purl.org/dc/terms/> .
";

const CONFORMANCE_TEST_TEXT: &str =
    "Verify that all requirements from the requirements class have been fulfilled.";
const CONFORMANCE_TEST_METHOD: &str =
    "Inspect the documentation of the application, schema or profile.";

/// A SKOS/ModSpec ontology of a registry in Turtle syntax.
///
/// Every definition becomes an IRI by prefixing it with
/// [`Metadata::identifier_spec`]. Each requirement also yields a
/// conformance test at its `/req/` to `/conf/` rewritten path.
#[derive(Debug, Clone, Copy)]
pub struct Turtle<'a> {
    registry: &'a Registry,
    metadata: &'a Metadata,
}

impl<'a> Turtle<'a> {
    /// Prepares an ontology of `registry` described by `metadata`.
    #[must_use]
    pub const fn new(registry: &'a Registry, metadata: &'a Metadata) -> Self {
        Self { registry, metadata }
    }

    fn iri(&self, definition: &str) -> Iri<'_> {
        Iri {
            base: &self.metadata.identifier_spec,
            path: definition.to_string(),
        }
    }

    fn conformance_iri(&self, definition: &str) -> Iri<'_> {
        Iri {
            base: &self.metadata.identifier_spec,
            path: conformance_path(definition),
        }
    }

    fn write_specification(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let meta = self.metadata;
        let document = format!("http://www.opengis.net/def/docs/{}", meta.document_number);
        let ontology = format!("http://www.opengis.net/spec/docs/{}-anno", meta.document_number);

        writeln!(f, "{} a owl:Ontology .", Iri::of(&ontology))?;
        writeln!(f, "\n\n")?;
        writeln!(f, "{} a spec:Specification ;", Iri::of(&document))?;
        writeln!(f, "    dcterms:creator {} ;", Literal(&meta.creator))?;
        writeln!(f, "    dcterms:dateAccepted \"{}\"^^xsd:date ;", meta.date_accepted)?;
        writeln!(f, "    dcterms:dateSubmitted \"{}\"^^xsd:date ;", meta.date_submitted)?;
        writeln!(f, "    dcterms:identifier {} ;", Literal(&meta.identifier_doc))?;
        writeln!(f, "    reg:status reg:statusValid ;")?;
        writeln!(f, "    na:doctype ogcdt:ip ;")?;
        writeln!(f, "    spec:authority {} ;", Literal(&meta.authority))?;
        for (index, conf) in self.registry.conformance_classes().enumerate() {
            if index == 0 {
                write!(f, "    spec:class ")?;
            } else {
                write!(f, ",\n\t\t")?;
            }
            write!(f, "{}", self.iri(&conf.definition))?;
        }
        if self.registry.conformance_classes().next().is_some() {
            writeln!(f, " ;")?;
        }
        writeln!(f, "    spec:date \"{}\"^^xsd:date ;", meta.date_approved)?;
        writeln!(f, "    specrel:implementation {} ;", Iri::of(&document))?;
        writeln!(f, "    skos:notation {}^^na:doc_no ;", Literal(&meta.document_number))?;
        writeln!(f, "    skos:prefLabel {} ;", Literal(&format!("OGC® {}", meta.title)))?;
        writeln!(f, "    adms:version {} ;", Literal(&meta.version))?;
        writeln!(f, "    dcat:landingPage {} .", Iri::of(&meta.landing_page))?;
        writeln!(f)
    }

    fn write_conformance_tests(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scheme = &self.metadata.identifier_spec;
        for req in self.registry.requirements() {
            writeln!(
                f,
                "{} a spec:ConformanceTest,",
                self.conformance_iri(&req.definition)
            )?;
            writeln!(f, "        skos:Concept ;")?;
            writeln!(f, "    spec:method {} ;", Literal(CONFORMANCE_TEST_METHOD))?;
            writeln!(f, "    spec:purpose {} ;", Literal(CONFORMANCE_TEST_TEXT))?;
            writeln!(f, "    spec:requirement {} ;", self.iri(&req.definition))?;
            writeln!(f, "    spec:testType spec:Capabilities ;")?;
            for class in &req.in_class {
                writeln!(f, "    skos:broader {} ;", self.conformance_iri(class))?;
            }
            writeln!(f, "    skos:definition {} ;", Literal(CONFORMANCE_TEST_TEXT))?;
            writeln!(f, "    skos:inScheme {} ;", Iri::of(scheme))?;
            writeln!(
                f,
                "    skos:prefLabel {} .",
                Literal(&format!("Conformance Test {scheme}{}", req.definition))
            )?;
            writeln!(f)?;
        }
        writeln!(f, "\n\n")
    }

    fn write_requirement_classes(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scheme = &self.metadata.identifier_spec;
        for class in self.registry.requirement_classes() {
            writeln!(f, "{} a spec:RequirementClass,", self.iri(&class.definition))?;
            writeln!(f, "        skos:Concept ;")?;
            for req in &class.requirements {
                writeln!(f, "    spec:normativeStatement {} ;", self.iri(req))?;
            }
            for import in &class.imports {
                writeln!(f, "    skos:broader {} ;", self.iri(import))?;
            }
            writeln!(f, "    skos:definition {} ;", Literal(&class.definition))?;
            writeln!(f, "    skos:inScheme {} ;", Iri::of(scheme))?;
            writeln!(
                f,
                "    skos:prefLabel {} .",
                Literal(&format!("Requirement Class {}", class.definition))
            )?;
            writeln!(f)?;
        }
        writeln!(f, "\n\n")
    }

    fn write_requirements(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scheme = &self.metadata.identifier_spec;
        for req in self.registry.requirements() {
            writeln!(f, "{} a spec:Requirement,", self.iri(&req.definition))?;
            writeln!(f, "        skos:Concept ;")?;
            writeln!(f, "    dcterms:description {} ;", Literal(&req.description))?;
            for class in &req.in_class {
                writeln!(f, "    skos:broader {} ;", self.iri(class))?;
            }
            writeln!(f, "    skos:definition {} ;", Literal(&req.description))?;
            writeln!(f, "    skos:inScheme {} ;", Iri::of(scheme))?;
            writeln!(
                f,
                "    skos:prefLabel {} .",
                Literal(&format!("Requirement: {}", req.definition))
            )?;
            writeln!(f)?;
        }
        writeln!(f, "\n\n")
    }

    fn write_conformance_classes(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scheme = &self.metadata.identifier_spec;
        for conf in self.registry.conformance_classes() {
            writeln!(f, "{} a spec:ConformanceClass,", self.iri(&conf.definition))?;
            writeln!(f, "        skos:Concept ;")?;
            writeln!(f, "    skos:definition {} ;", Literal(&conf.definition))?;
            writeln!(f, "    skos:inScheme {} ;", Iri::of(scheme))?;
            writeln!(
                f,
                "    skos:prefLabel {} ;",
                Literal(&format!("Conformance Class {}", conf.definition))
            )?;
            writeln!(f, "    skos:topConceptOf {} .", Iri::of(scheme))?;
            writeln!(f)?;
        }
        writeln!(f, "\n\n")
    }

    fn write_concept_scheme(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let meta = self.metadata;
        writeln!(f, "{} a skos:ConceptScheme ;", Iri::of(&meta.identifier_spec))?;
        writeln!(f, "    dcterms:created \"{}\"^^xsd:date ;", meta.date_created)?;
        writeln!(f, "    dcterms:modified \"{}\"^^xsd:date ;", meta.date_modified)?;
        let source = format!("http://www.opengis.net/def/docs/{}", meta.document_number);
        writeln!(f, "    dcterms:source {} ;", Iri::of(&source))?;
        writeln!(
            f,
            "    skos:definition {} ;",
            Literal(
                "A convenience hierarchy for navigating the elements of a specification using the SKOS model"
            )
        )?;
        for (index, conf) in self.registry.conformance_classes().enumerate() {
            if index == 0 {
                write!(f, "    skos:hasTopConcept ")?;
            } else {
                write!(f, ",\n\t\t")?;
            }
            write!(f, "{}", self.iri(&conf.definition))?;
        }
        if self.registry.conformance_classes().next().is_some() {
            writeln!(f, " ;")?;
        }
        writeln!(
            f,
            "    skos:prefLabel {} .",
            Literal(&format!(
                "Specification elements for OGC {} {}",
                meta.document_number, meta.title
            ))
        )?;
        writeln!(f)
    }
}

impl fmt::Display for Turtle<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{PREFIXES}")?;
        self.write_specification(f)?;
        self.write_conformance_tests(f)?;
        self.write_requirement_classes(f)?;
        self.write_requirements(f)?;
        self.write_conformance_classes(f)?;
        self.write_concept_scheme(f)
    }
}

/// Rewrites a requirement path into the path of its conformance test.
#[must_use]
pub fn conformance_path(definition: &str) -> String {
    definition.replace("/req/", "/conf/")
}

/// An IRI reference built from the specification identifier and a path.
struct Iri<'s> {
    base: &'s str,
    path: String,
}

impl<'s> Iri<'s> {
    /// A complete IRI taken as is.
    const fn of(iri: &'s str) -> Self {
        Self {
            base: iri,
            path: String::new(),
        }
    }
}

impl fmt::Display for Iri<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<")?;
        for c in self.base.chars().chain(self.path.chars()) {
            match c {
                '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\' | ' ' => {
                    write!(f, "%{:02X}", u32::from(c))?;
                }
                c => write!(f, "{c}")?,
            }
        }
        write!(f, ">")
    }
}

/// A quoted Turtle string literal.
struct Literal<'s>(&'s str);

impl fmt::Display for Literal<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"")?;
        for c in self.0.chars() {
            match c {
                '"' => write!(f, "\\\"")?,
                '\\' => write!(f, "\\\\")?,
                '\n' => write!(f, "\\n")?,
                '\r' => write!(f, "\\r")?,
                '\t' => write!(f, "\\t")?,
                c => write!(f, "{c}")?,
            }
        }
        write!(f, "\"")
    }
}
