//! Table extraction.
//!
//! A [`Dialect`] decides what each table of a [`Document`] describes and
//! feeds its rows to a [`Resolver`], which builds the registry.

mod clean;
pub use clean::{clean_key, clean_text};

/// The table tree of a loaded HTML document.
pub mod document;
pub use document::{Cell, CellKind, Document, DocumentError, Row, Table};

mod fields;

mod oms;
pub use oms::Oms;

mod resolver;
pub use resolver::{ClassScope, Extraction, Filters, Resolver};

mod sta;
pub use sta::Sta;

use tracing::instrument;

use crate::domain::DialectKind;

/// What a table describes, decided from its first cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableKind {
    /// Declares a requirements class and its members.
    RequirementsClass,
    /// Declares a conformance class.
    ConformanceClass,
    /// Holds the statement text of a requirement.
    Requirement,
    /// Holds the text of a recommendation.
    Recommendation,
    /// A kind the dialect knows about and deliberately skips.
    Ignored,
    /// The first row has no usable cell.
    Empty,
    /// Anything else. Carries the cleaned first cell.
    Unknown(String),
}

/// A table layout.
pub trait Dialect {
    /// Decides what a table describes.
    fn classify(&self, table: &Table) -> TableKind;

    /// Reads a classified table into the resolver. Tables of kind
    /// [`TableKind::Empty`], [`TableKind::Ignored`] or
    /// [`TableKind::Unknown`] are left alone.
    fn parse_table(&self, kind: &TableKind, table: &Table, resolver: &mut Resolver<'_>);
}

/// The parser for a configured table layout.
#[must_use]
pub fn dialect(kind: DialectKind) -> &'static dyn Dialect {
    match kind {
        DialectKind::Oms => &Oms,
        DialectKind::Sta => &Sta,
    }
}

/// Extracts every entity from a document.
///
/// Tables are read in document order. Malformed tables and rows are logged
/// and skipped; parsing never fails.
#[instrument(skip_all, fields(tables = document.tables.len()))]
pub fn parse_document(
    document: &Document,
    dialect: &dyn Dialect,
    namespace: &str,
    filters: &Filters,
) -> Extraction {
    tracing::info!("Found {} tables.", document.tables.len());
    let mut resolver = Resolver::new(namespace, filters);
    for (index, table) in document.tables.iter().enumerate() {
        match dialect.classify(table) {
            TableKind::Empty => {
                tracing::warn!("    Empty first row in table {index}, {} rows", table.rows.len());
            }
            TableKind::Ignored => tracing::debug!("    Table {index} ignored"),
            TableKind::Unknown(kind) => tracing::warn!(
                "    Unknown table type: '{kind}' in table {index}, {} rows",
                table.rows.len()
            ),
            kind => dialect.parse_table(&kind, table, &mut resolver),
        }
    }
    let extraction = resolver.finish();
    let registry = &extraction.registry;
    tracing::info!(
        "Found {} requirement classes, {} requirements, {} recommendations, {} conformance classes",
        registry.requirement_classes().count(),
        registry.requirements().count(),
        registry.recommendations().count(),
        registry.conformance_classes().count(),
    );
    extraction
}
