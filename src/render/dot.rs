use std::fmt;

use crate::domain::{Image, RegistryView};

/// Which parts of a view a [`Dot`] graph shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DotOptions {
    /// Only show entities tagged with this image.
    pub image: Option<Image>,
    /// Only show classes and their import edges.
    pub classes_only: bool,
}

impl DotOptions {
    /// Every entity of the view.
    #[must_use]
    pub const fn full() -> Self {
        Self {
            image: None,
            classes_only: false,
        }
    }

    /// Classes and import edges of the view.
    #[must_use]
    pub const fn classes_only() -> Self {
        Self {
            image: None,
            classes_only: true,
        }
    }

    /// Restricts the graph to one image.
    #[must_use]
    pub const fn with_image(mut self, image: Option<Image>) -> Self {
        self.image = image;
        self
    }

    fn shows(&self, in_image: &std::collections::BTreeSet<Image>) -> bool {
        self.image.is_none_or(|image| in_image.contains(&image))
    }
}

/// A Graphviz `digraph` of a registry view.
///
/// Requirements are boxes, recommendations dotted boxes and classes plain
/// nodes labelled with their definition, name and target type. Edges run
/// from a class to its requirements (solid), recommendations (dotted),
/// imports (dashed) and dependency citations (dotted).
#[derive(Debug, Clone, Copy)]
pub struct Dot<'v, 'a> {
    view: &'v RegistryView<'a>,
    options: DotOptions,
}

impl<'v, 'a> Dot<'v, 'a> {
    /// Prepares a graph of `view`.
    #[must_use]
    pub const fn new(view: &'v RegistryView<'a>, options: DotOptions) -> Self {
        Self { view, options }
    }
}

impl fmt::Display for Dot<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = self.view;
        let options = self.options;

        writeln!(f, "digraph G {{")?;
        writeln!(f, "  rankdir=LR;splines=polyline;")?;

        if !options.classes_only {
            writeln!(f, "  node [shape=box];")?;
            writeln!(f, "  {{")?;
            for req in view.requirements.values() {
                if options.shows(&req.in_image) {
                    writeln!(f, "    {}", Id(&req.definition))?;
                }
            }
            writeln!(f, "  }};")?;
            writeln!(f)?;

            writeln!(f, "  node [shape=box;style=dotted];")?;
            writeln!(f, "  {{")?;
            for rec in view.recommendations.values() {
                if options.shows(&rec.in_image) {
                    writeln!(f, "    {}", Id(&rec.definition))?;
                }
            }
            writeln!(f, "  }};")?;
            writeln!(f)?;
        }

        writeln!(f, "  node [shape=plain];")?;
        writeln!(f, "  {{")?;
        for class in view.requirement_classes.values() {
            if options.shows(&class.in_image) {
                writeln!(
                    f,
                    "    {}[label=<<TABLE><TR><TD>{}</TD></TR><TR><TD>{}</TD></TR><TR><TD>{}</TD></TR></TABLE>>]",
                    Id(&class.definition),
                    Label(&class.definition),
                    Label(&class.name),
                    Label(&class.target_type),
                )?;
            }
        }
        writeln!(f, "  }};")?;
        writeln!(f)?;

        writeln!(f, "  node [shape=ellipse;style=solid];")?;
        for class in view.requirement_classes.values() {
            if !options.shows(&class.in_image) {
                continue;
            }
            let from = Id(&class.definition);
            if !options.classes_only {
                for req in &class.requirements {
                    writeln!(f, "      {from} -> {};", Id(req))?;
                }
                for rec in &class.recommendations {
                    writeln!(f, "      {from} -> {}[style=dotted];", Id(rec))?;
                }
            }
            for import in &class.imports {
                writeln!(f, "      {from} -> {}[style=dashed];", Id(import))?;
            }
            if !options.classes_only {
                for dependency in &class.dependencies {
                    writeln!(f, "      {from} -> {}[style=dotted];", Id(dependency))?;
                }
            }
        }
        writeln!(f, "}}")
    }
}

/// A quoted DOT identifier.
struct Id<'s>(&'s str);

impl fmt::Display for Id<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"")?;
        for c in self.0.chars() {
            match c {
                '"' => write!(f, "\\\"")?,
                '\\' => write!(f, "\\\\")?,
                '\n' => write!(f, " ")?,
                c => write!(f, "{c}")?,
            }
        }
        write!(f, "\"")
    }
}

/// Text inside an HTML-like DOT label.
struct Label<'s>(&'s str);

impl fmt::Display for Label<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.0.chars() {
            match c {
                '&' => write!(f, "&amp;")?,
                '<' => write!(f, "&lt;")?,
                '>' => write!(f, "&gt;")?,
                '"' => write!(f, "&quot;")?,
                c => write!(f, "{c}")?,
            }
        }
        Ok(())
    }
}
