use std::sync::LazyLock;

use regex::Regex;

use crate::parse::{
    clean::{clean_key, clean_text},
    document::{Row, Table},
    fields::{self, ClassTable, ConformanceTable, Field, Flow, CONFORMANCE_FIELDS},
    resolver::Resolver,
    Dialect, TableKind,
};

static REQUIREMENT_TABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Req[0-9]+:").expect("valid requirement table pattern"));
static IGNORED_TABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:Name|Entitytype|Operator|Function|Scenario)$")
        .expect("valid ignored table pattern")
});

/// The offset table layout: definitions sit at fixed row positions and a row
/// without `td` cells is read from its `th` cells.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sta;

const CLASS_FIELDS: &[Field<ClassTable>] = &[
    ("targettype", fields::target_type),
    ("name", fields::name),
    ("type", fields::name),
    ("dependency", dependency),
    ("requirementsclass", fields::import),
    ("requirementssub-class", fields::import),
    ("imports", fields::import),
    ("requirement", fields::requirement),
    ("recommendation", fields::recommendation),
];

/// A dependency inside the namespace is a requirement of the class, anything
/// else is an external citation.
fn dependency(resolver: &mut Resolver<'_>, table: &mut ClassTable, value: &str) -> Flow {
    let Some(scope) = table.scope.as_ref() else {
        return Flow::Continue;
    };
    let citation = clean_text(value);
    if citation.is_empty() {
        return Flow::Continue;
    }
    let namespace = resolver.registry().namespace();
    if !namespace.is_empty() && citation.starts_with(namespace) {
        resolver.link_requirement(scope, &clean_key(value));
    } else {
        resolver.add_dependency(scope, &citation);
    }
    Flow::Continue
}

/// Text of the cell at `row`, `column`, reading `th` cells when a row has
/// no `td`.
fn cell_text(table: &Table, row: usize, column: usize) -> Option<&str> {
    table
        .rows
        .get(row)?
        .data_or_header_cells()
        .get(column)
        .map(|cell| cell.text.as_str())
}

fn parse_class(table: &Table, resolver: &mut Resolver<'_>) {
    let Some(definition) = cell_text(table, 1, 0) else {
        tracing::error!(
            "    Requirements class table with {} rows has no definition",
            table.rows.len()
        );
        return;
    };
    let Some(scope) = resolver.declare_class(&clean_key(definition)) else {
        return;
    };
    fields::walk_fields(
        table.rows.iter().skip(2).map(Row::data_or_header_cells),
        CLASS_FIELDS,
        resolver,
        &mut ClassTable { scope: Some(scope) },
        "Requirement",
    );
}

fn parse_requirement(table: &Table, resolver: &mut Resolver<'_>) {
    let (Some(description), Some(definition)) = (cell_text(table, 1, 0), cell_text(table, 2, 0))
    else {
        tracing::error!(
            "    Requirement table found with {} rows, expected at least 3",
            table.rows.len()
        );
        return;
    };
    resolver.describe_requirement(&clean_key(definition), clean_text(description));
}

impl Dialect for Sta {
    fn classify(&self, table: &Table) -> TableKind {
        let Some(first) = table.rows.first().and_then(|row| {
            row.data_or_header_cells()
                .first()
                .map(|cell| clean_key(&cell.text))
        }) else {
            return TableKind::Empty;
        };
        let rows = table.rows.len();
        tracing::debug!("  Rows: {rows}, Type: '{first}'");

        if first.eq_ignore_ascii_case("RequirementsClass") {
            TableKind::RequirementsClass
        } else if first.eq_ignore_ascii_case("ConformanceClass") {
            TableKind::ConformanceClass
        } else if REQUIREMENT_TABLE.is_match(&first) {
            TableKind::Requirement
        } else if rows == 1 && ["Recommendation/rec", "/rec"].iter().any(|p| first.starts_with(p)) {
            TableKind::Recommendation
        } else if IGNORED_TABLE.is_match(&first) {
            TableKind::Ignored
        } else {
            TableKind::Unknown(first)
        }
    }

    fn parse_table(&self, kind: &TableKind, table: &Table, resolver: &mut Resolver<'_>) {
        match kind {
            TableKind::RequirementsClass => parse_class(table, resolver),
            TableKind::ConformanceClass => fields::walk_fields(
                table.rows.iter().map(Row::data_cells),
                CONFORMANCE_FIELDS,
                resolver,
                &mut ConformanceTable::default(),
                "Conformance",
            ),
            TableKind::Requirement => parse_requirement(table, resolver),
            TableKind::Recommendation => fields::description_table(
                table,
                "Recommendation",
                resolver,
                |resolver, definition, text| resolver.describe_recommendation(definition, text),
            ),
            TableKind::Empty | TableKind::Ignored | TableKind::Unknown(_) => {}
        }
    }
}
