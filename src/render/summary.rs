use std::fmt;

use crate::domain::Registry;

/// A plain HTML page listing every entity with its reference count.
///
/// The page holds four tables: requirements, recommendations, requirements
/// classes and conformance classes.
#[derive(Debug, Clone, Copy)]
pub struct Summary<'a> {
    registry: &'a Registry,
}

impl<'a> Summary<'a> {
    /// Prepares a summary of `registry`.
    #[must_use]
    pub const fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }
}

const HEAD: &str = r#"<!DOCTYPE HTML PUBLIC "-//W3C//DTD HTML 4.01//EN" "http://www.w3.org/TR/html4/strict.dtd"><html><head>
  <title>All Requirements</title>
  <meta http-equiv="Content-Type" content="text/html; charset=UTF-8">
  <style>
    .def {white-space:nowrap}
    td {border-top:1px solid #999; vertical-align:top;padding:3px;}
  </style>
</head>
<body>"#;

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.registry;
        writeln!(f, "{HEAD}")?;

        writeln!(f, "  <table>")?;
        writeln!(f, r#"    <tr><th colspan="3">Requirements</th></tr>"#)?;
        writeln!(f, "    <tr><th>#</th><th>definition</th><th>description</th></tr>")?;
        for req in registry.requirements() {
            writeln!(
                f,
                "    <tr><td>{}</td><td class='def'>{}</td><td>{}</td></tr>",
                req.ref_count,
                Escaped(&req.definition),
                Escaped(&req.description),
            )?;
        }
        writeln!(f, "  </table>")?;

        writeln!(f, "  <table>")?;
        writeln!(f, r#"    <tr><th colspan="3">Recommendations</th></tr>"#)?;
        writeln!(f, "    <tr><th>#</th><th>definition</th><th>description</th></tr>")?;
        for rec in registry.recommendations() {
            writeln!(
                f,
                "    <tr><td>{}</td><td class='def'>{}</td><td>{}</td></tr>",
                rec.ref_count,
                Escaped(&rec.definition),
                Escaped(&rec.description),
            )?;
        }
        writeln!(f, "  </table>")?;

        writeln!(f, "  <table>")?;
        writeln!(f, r#"    <tr><th colspan="4">RequirementClasses</th></tr>"#)?;
        writeln!(f, "    <tr><th>#</th><th>definition</th><th>name</th><th>type</th></tr>")?;
        for class in registry.requirement_classes() {
            writeln!(
                f,
                "    <tr><td>{}</td><td class='def'>{}</td><td>{}</td><td>{}</td></tr>",
                class.ref_count,
                Escaped(&class.definition),
                Escaped(&class.name),
                Escaped(&class.target_type),
            )?;
        }
        writeln!(f, "  </table>")?;

        writeln!(f, "  <table>")?;
        writeln!(f, r#"    <tr><th colspan="5">Conformance Classes</th></tr>"#)?;
        writeln!(
            f,
            "    <tr><th>definition</th><th>requirement</th><th>purpose</th><th>method</th><th>type</th></tr>"
        )?;
        for conf in registry.conformance_classes() {
            writeln!(
                f,
                "    <tr><td class='def'>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                Escaped(&conf.definition),
                Escaped(conf.requirement.as_deref().unwrap_or_default()),
                Escaped(&conf.purpose),
                Escaped(&conf.method),
                Escaped(&conf.test_type),
            )?;
        }
        writeln!(f, "  </table>")?;

        write!(f, "</body></html>")
    }
}

struct Escaped<'s>(&'s str);

impl fmt::Display for Escaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.0.chars() {
            match c {
                '&' => write!(f, "&amp;")?,
                '<' => write!(f, "&lt;")?,
                '>' => write!(f, "&gt;")?,
                '"' => write!(f, "&quot;")?,
                '\'' => write!(f, "&#39;")?,
                c => write!(f, "{c}")?,
            }
        }
        Ok(())
    }
}
