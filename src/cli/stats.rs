use clap::Parser;
use modspec::{Config, Extraction, Generator};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser, Default)]
#[command(about = "Show entity counts, ignored dependencies and import cycles")]
pub struct Stats {
    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,

    /// Suppress headers and format for scripting
    #[arg(long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// What the stats report is made of.
#[derive(Debug, PartialEq, Eq)]
struct Report {
    counts: Vec<(&'static str, usize)>,
    undescribed: Vec<String>,
    ignored_dependencies: Vec<String>,
    cycles: Vec<Vec<String>>,
}

impl Report {
    fn new(extraction: &Extraction) -> Self {
        let registry = &extraction.registry;
        Self {
            counts: vec![
                ("requirement classes", registry.requirement_classes().count()),
                ("requirements", registry.requirements().count()),
                ("recommendations", registry.recommendations().count()),
                ("conformance classes", registry.conformance_classes().count()),
            ],
            undescribed: registry
                .requirements()
                .filter(|req| req.description.is_empty())
                .map(|req| req.definition.clone())
                .collect(),
            ignored_dependencies: extraction.ignored_dependencies.iter().cloned().collect(),
            cycles: registry.import_cycles(),
        }
    }
}

impl Stats {
    #[instrument(level = "debug", skip_all)]
    pub fn run(self, config: Config) -> anyhow::Result<()> {
        let extraction = Generator::new(config)?.load()?;
        let report = Report::new(&extraction);

        match self.output {
            OutputFormat::Json => Self::output_json(&report)?,
            OutputFormat::Table if self.quiet => Self::output_quiet(&report),
            OutputFormat::Table => Self::output_table(&report),
        }
        Ok(())
    }

    fn output_json(report: &Report) -> anyhow::Result<()> {
        use serde_json::json;

        let counts: serde_json::Map<_, _> = report
            .counts
            .iter()
            .map(|(kind, count)| ((*kind).to_string(), json!(count)))
            .collect();

        let output = json!({
            "counts": counts,
            "undescribed_requirements": report.undescribed,
            "ignored_dependencies": report.ignored_dependencies,
            "cycles": {
                "count": report.cycles.len(),
                "members": report.cycles,
            }
        });

        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }

    fn output_quiet(report: &Report) {
        let counts: Vec<_> = report
            .counts
            .iter()
            .map(|(kind, count)| format!("{}={count}", kind.replace(' ', "_")))
            .collect();
        println!(
            "{} undescribed={} ignored={} cycles={}",
            counts.join(" "),
            report.undescribed.len(),
            report.ignored_dependencies.len(),
            report.cycles.len()
        );
    }

    fn output_table(report: &Report) {
        const MAX_DISPLAY: usize = 5;

        println!("Entity counts");
        println!("{}", "─────────────".dim());
        for (kind, count) in &report.counts {
            println!("{kind:<20} {count}");
        }
        println!();

        if report.undescribed.is_empty() {
            println!("Undescribed requirements: {} ✅", "0".success());
        } else {
            println!(
                "Undescribed requirements: {} ⚠️",
                report.undescribed.len().to_string().warning()
            );
            for definition in report.undescribed.iter().take(MAX_DISPLAY) {
                println!("  - {definition}");
            }
            if report.undescribed.len() > MAX_DISPLAY {
                println!("  - ... and {} more", report.undescribed.len() - MAX_DISPLAY);
            }
        }
        println!();

        if report.ignored_dependencies.is_empty() {
            println!("Ignored dependencies: {}", "0".info());
        } else {
            println!(
                "Ignored dependencies: {}",
                report.ignored_dependencies.len().to_string().info()
            );
            for dependency in &report.ignored_dependencies {
                println!("  - {dependency}");
            }
        }
        println!();

        if report.cycles.is_empty() {
            println!("Import cycles: {} ✅", "0".success());
        } else {
            println!("Import cycles: {} ⚠️", report.cycles.len().to_string().warning());
            for cycle in report.cycles.iter().take(MAX_DISPLAY) {
                println!("  - {}", cycle.join(" -> "));
            }
            if report.cycles.len() > MAX_DISPLAY {
                println!("  - ... and {} more cycles", report.cycles.len() - MAX_DISPLAY);
            }
            println!("{}", "Diagrams of classes in a cycle include every member.".dim());
        }
    }
}
