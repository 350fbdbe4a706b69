use crate::parse::{
    clean::{clean_key, clean_text},
    document::{Row, Table},
    fields::{self, ClassTable, ConformanceTable, Field, Flow, CONFORMANCE_FIELDS},
    resolver::Resolver,
    Dialect, TableKind,
};

/// The key/value table layout: every field is a two-cell `td` row and the
/// declaration is itself a field.
#[derive(Debug, Clone, Copy, Default)]
pub struct Oms;

const CLASS_FIELDS: &[Field<ClassTable>] = &[
    ("requirementsclass", declare_class),
    ("requirementssub-class", declare_class),
    ("targettype", fields::target_type),
    ("name", fields::name),
    ("dependency", dependency),
    ("imports", fields::import),
    ("requirement", fields::requirement),
    ("recommendation", fields::recommendation),
];

fn declare_class(resolver: &mut Resolver<'_>, table: &mut ClassTable, value: &str) -> Flow {
    table.scope = resolver.declare_class(&clean_key(value));
    if table.scope.is_some() {
        Flow::Continue
    } else {
        Flow::Abandon
    }
}

fn dependency(resolver: &mut Resolver<'_>, table: &mut ClassTable, value: &str) -> Flow {
    let Some(scope) = table.scope.as_ref() else {
        tracing::error!("    Field 'dependency' found before the requirements class definition");
        return Flow::Continue;
    };
    let mut citation = clean_text(value);
    if citation.starts_with('/') {
        citation = clean_key(value);
    }
    if !citation.is_empty() {
        resolver.add_dependency(scope, &citation);
    }
    Flow::Continue
}

impl Dialect for Oms {
    fn classify(&self, table: &Table) -> TableKind {
        let Some(first) = table
            .rows
            .first()
            .and_then(|row| row.data_cells().first().map(|cell| clean_key(&cell.text)))
        else {
            return TableKind::Empty;
        };
        let rows = table.rows.len();
        tracing::debug!("  Rows: {rows}, Type: '{first}'");

        if first.eq_ignore_ascii_case("RequirementsClass")
            || first.eq_ignore_ascii_case("RequirementsSub-class")
        {
            TableKind::RequirementsClass
        } else if first.eq_ignore_ascii_case("ConformanceClass") {
            TableKind::ConformanceClass
        } else if rows == 1 && ["Requirement/req", "/req", "req"].iter().any(|p| first.starts_with(p))
        {
            TableKind::Requirement
        } else if rows == 1 && ["Recommendation/rec", "/rec"].iter().any(|p| first.starts_with(p)) {
            TableKind::Recommendation
        } else {
            TableKind::Unknown(first)
        }
    }

    fn parse_table(&self, kind: &TableKind, table: &Table, resolver: &mut Resolver<'_>) {
        match kind {
            TableKind::RequirementsClass => fields::walk_fields(
                table.rows.iter().map(Row::data_cells),
                CLASS_FIELDS,
                resolver,
                &mut ClassTable::default(),
                "Requirement",
            ),
            TableKind::ConformanceClass => {
                let rows = table.rows.iter().map(Row::data_cells).filter(|cells| {
                    if cells.len() == 3 {
                        tracing::debug!(
                            "    Conformance row with 3 cells skipped ({})",
                            fields::preview(cells)
                        );
                    }
                    cells.len() != 3
                });
                fields::walk_fields(
                    rows,
                    CONFORMANCE_FIELDS,
                    resolver,
                    &mut ConformanceTable::default(),
                    "Conformance",
                );
            }
            TableKind::Requirement => fields::description_table(
                table,
                "Requirement",
                resolver,
                |resolver, definition, text| resolver.describe_requirement(definition, text),
            ),
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
