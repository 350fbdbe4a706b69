//! OGC ModSpec extraction
//!
//! Reads the requirement, recommendation and conformance tables of an HTML
//! specification into a [`Registry`], then renders Graphviz diagrams, an
//! HTML summary and a Turtle ontology from it.

pub mod domain;
pub use domain::{Config, DialectKind, Image, Registry, RegistryView};

pub mod parse;
pub use parse::{parse_document, Document, Extraction};

pub mod render;

/// Runs a whole extraction and writes every artifact.
pub mod generator;
pub use generator::{Artifact, GenerateError, Generator};
