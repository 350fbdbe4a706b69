//! Field-level dispatch shared by the dialects.
//!
//! A table kind's recognized fields are a static list of
//! `(lowercase field name, handler)` pairs. [`walk_fields`] feeds every
//! two-cell row to the handler named by its first cell.

use crate::parse::{
    clean::{clean_key, clean_text},
    document::{Cell, Row, Table},
    resolver::{ClassScope, Resolver},
};

/// Whether the rest of the table should be read after a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next row.
    Continue,
    /// Skip the rest of the table.
    Abandon,
}

/// Handles the raw text of a field's value cell.
pub type Handler<S> = fn(&mut Resolver<'_>, &mut S, &str) -> Flow;

/// A recognized field name and its handler.
pub type Field<S> = (&'static str, Handler<S>);

/// Finds the handler for a lowercase field name.
pub fn handler<S>(fields: &[Field<S>], name: &str) -> Option<Handler<S>> {
    fields
        .iter()
        .find(|(field, _)| *field == name)
        .map(|(_, handler)| *handler)
}

/// Feeds each `name | value` row to its field handler.
///
/// Rows without exactly two cells are logged and skipped. Unknown field
/// names are logged and skipped.
pub fn walk_fields<'c, S>(
    rows: impl IntoIterator<Item = Vec<&'c Cell>>,
    fields: &[Field<S>],
    resolver: &mut Resolver<'_>,
    state: &mut S,
    table: &str,
) {
    for cells in rows {
        let [name_cell, value_cell] = cells.as_slice() else {
            tracing::error!(
                "    {table} row found with {} cells, expected 2 ({})",
                cells.len(),
                preview(&cells)
            );
            continue;
        };
        let name = clean_key(&name_cell.text).to_lowercase();
        if let Some(handle) = handler(fields, &name) {
            if handle(resolver, state, &value_cell.text) == Flow::Abandon {
                return;
            }
        } else {
            tracing::warn!("Unknown row: {name} - {}", clean_text(&value_cell.text));
        }
    }
}

/// The first two cells of a malformed row, cleaned as keys.
pub fn preview(cells: &[&Cell]) -> String {
    cells
        .iter()
        .take(2)
        .map(|cell| clean_key(&cell.text))
        .collect::<Vec<_>>()
        .join(" ; ")
}

/// Progress through a requirements class table.
#[derive(Debug, Default)]
pub struct ClassTable {
    /// The class declared by the table, once its declaration row is read.
    pub scope: Option<ClassScope>,
}

impl ClassTable {
    fn scope(&self, field: &str) -> Option<&ClassScope> {
        if self.scope.is_none() {
            tracing::error!("    Field '{field}' found before the requirements class definition");
        }
        self.scope.as_ref()
    }
}

/// Progress through a conformance class table.
#[derive(Debug, Default)]
pub struct ConformanceTable {
    /// Key of the conformance class, once its declaration row is read.
    pub key: Option<String>,
}

impl ConformanceTable {
    fn key(&self, field: &str) -> Option<&str> {
        if self.key.is_none() {
            tracing::error!("    Field '{field}' found before the conformance class definition");
        }
        self.key.as_deref()
    }
}

pub fn target_type(resolver: &mut Resolver<'_>, table: &mut ClassTable, value: &str) -> Flow {
    if let Some(scope) = table.scope("targettype") {
        resolver.set_target_type(scope, clean_text(value));
    }
    Flow::Continue
}

pub fn name(resolver: &mut Resolver<'_>, table: &mut ClassTable, value: &str) -> Flow {
    if let Some(scope) = table.scope("name") {
        let name = clean_text(value);
        tracing::debug!("Class {} - Name {name}", scope.key());
        resolver.set_name(scope, name);
    }
    Flow::Continue
}

pub fn requirement(resolver: &mut Resolver<'_>, table: &mut ClassTable, value: &str) -> Flow {
    if let Some(scope) = table.scope("requirement") {
        resolver.link_requirement(scope, &clean_key(value));
    }
    Flow::Continue
}

pub fn recommendation(resolver: &mut Resolver<'_>, table: &mut ClassTable, value: &str) -> Flow {
    if let Some(scope) = table.scope("recommendation") {
        resolver.link_recommendation(scope, &clean_key(value));
    }
    Flow::Continue
}

pub fn import(resolver: &mut Resolver<'_>, table: &mut ClassTable, value: &str) -> Flow {
    if let Some(scope) = table.scope("imports") {
        resolver.link_import(scope, &clean_key(value));
    }
    Flow::Continue
}

/// Fields of a conformance class table. Both dialects share this layout.
pub const CONFORMANCE_FIELDS: &[Field<ConformanceTable>] = &[
    ("conformanceclass", conformance_class),
    ("testpurpose", test_purpose),
    ("testmethod", test_method),
    ("testtype", test_type),
    ("requirements", conformance_requirements),
];

fn conformance_class(
    resolver: &mut Resolver<'_>,
    table: &mut ConformanceTable,
    value: &str,
) -> Flow {
    match resolver.declare_conformance_class(&clean_key(value)) {
        Some(key) => {
            table.key = Some(key);
            Flow::Continue
        }
        None => Flow::Abandon,
    }
}

fn test_purpose(resolver: &mut Resolver<'_>, table: &mut ConformanceTable, value: &str) -> Flow {
    if let Some(key) = table.key("testpurpose") {
        let purpose = clean_text(value);
        resolver.update_conformance_class(key, |conf| conf.purpose = purpose);
    }
    Flow::Continue
}

fn test_method(resolver: &mut Resolver<'_>, table: &mut ConformanceTable, value: &str) -> Flow {
    if let Some(key) = table.key("testmethod") {
        let method = clean_text(value);
        resolver.update_conformance_class(key, |conf| conf.method = method);
    }
    Flow::Continue
}

fn test_type(resolver: &mut Resolver<'_>, table: &mut ConformanceTable, value: &str) -> Flow {
    if let Some(key) = table.key("testtype") {
        let test_type = clean_text(value);
        resolver.update_conformance_class(key, |conf| conf.test_type = test_type);
    }
    Flow::Continue
}

fn conformance_requirements(
    resolver: &mut Resolver<'_>,
    table: &mut ConformanceTable,
    value: &str,
) -> Flow {
    if let Some(key) = table.key("requirements") {
        resolver.link_conformance_requirement(key, &clean_key(value));
    }
    Flow::Continue
}

/// Reads a `definition | description` table.
///
/// `label` is stripped from the front of the definition cell, so both
/// `Recommendation /rec/x` and `/rec/x` name the same entity.
pub fn description_table(
    table: &Table,
    label: &str,
    resolver: &mut Resolver<'_>,
    describe: fn(&mut Resolver<'_>, &str, String),
) {
    if table.rows.len() > 1 {
        tracing::warn!("{label} table with {} rows found", table.rows.len());
    }
    for cells in table.rows.iter().map(Row::data_cells) {
        let [definition_cell, description_cell] = cells.as_slice() else {
            tracing::error!(
                "    {label} row found with {} cells, expected 2 ({})",
                cells.len(),
                preview(&cells)
            );
            continue;
        };
        let definition = clean_key(&definition_cell.text);
        let definition = definition.strip_prefix(label).unwrap_or(&definition);
        describe(resolver, definition, clean_text(&description_cell.text));
    }
}
