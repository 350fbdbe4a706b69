//! `modspec` command-line tool.
//!
//! Extracts the requirement tables of an OGC specification and writes
//! Graphviz diagrams, an HTML summary and a Turtle ontology.

use clap::Parser;

mod cli;

fn main() -> anyhow::Result<()> {
    cli::Cli::parse().run()
}
