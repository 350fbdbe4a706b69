//! This bench parses a large generated specification document and renders
//! the full diagram from it.

#![allow(missing_docs)]

use std::fmt::Write;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use modspec::{
    parse::{dialect, Filters},
    parse_document,
    render::{Dot, DotOptions},
    DialectKind, Document,
};

/// Generates a document of interlinked requirements classes
fn generate_html(classes: usize, requirements: usize) -> String {
    let mut html = String::from("<html><body>\n");
    for class in 0..classes {
        html.push_str("<table>\n");
        let _ = writeln!(
            html,
            "<tr><td>Requirements Class</td><td>/req/obs-{class}</td></tr>"
        );
        let _ = writeln!(html, "<tr><td>Name</td><td>Class {class}</td></tr>");
        if class > 0 {
            let _ = writeln!(
                html,
                "<tr><td>Imports</td><td>/req/obs-{}</td></tr>",
                class - 1
            );
        }
        for req in 0..requirements {
            let _ = writeln!(
                html,
                "<tr><td>Requirement</td><td>/req/obs-{class}/r{req}</td></tr>"
            );
        }
        html.push_str("</table>\n");
        for req in 0..requirements {
            let _ = writeln!(
                html,
                "<table><tr><td>Requirement /req/obs-{class}/r{req}</td><td>Each thing SHALL do {req}.</td></tr></table>"
            );
        }
    }
    html.push_str("</body></html>\n");
    html
}

fn parse_document_bench(c: &mut Criterion) {
    let html = generate_html(50, 20);
    let filters = Filters::default();

    c.bench_function("parse document", |b| {
        b.iter(|| {
            let document = Document::from_html(&html);
            parse_document(&document, dialect(DialectKind::Oms), "", &filters)
        });
    });

    c.bench_function("render full diagram", |b| {
        b.iter_batched(
            || {
                let document = Document::from_html(&html);
                parse_document(&document, dialect(DialectKind::Oms), "", &filters)
            },
            |extraction| Dot::new(&extraction.registry.view(), DotOptions::full()).to_string(),
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, parse_document_bench);
criterion_main!(benches);
