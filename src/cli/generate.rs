use clap::Parser;
use modspec::{Config, Generator};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser, Default)]
#[command(about = "Parse the document and write every output")]
pub struct Generate {
    /// List every file written
    #[arg(long)]
    list: bool,
}

impl Generate {
    #[instrument(level = "debug", skip_all)]
    pub fn run(self, config: Config) -> anyhow::Result<()> {
        let generator = Generator::new(config)?;
        let (extraction, written) = generator.run()?;

        if self.list {
            for path in &written {
                println!("{}", path.display());
            }
        }

        let registry = &extraction.registry;
        println!(
            "{} {} files from {} requirement classes and {} requirements",
            "Wrote".success(),
            written.len(),
            registry.requirement_classes().count(),
            registry.requirements().count(),
        );
        if !extraction.ignored_dependencies.is_empty() {
            println!(
                "{}",
                format!(
                    "{} dependencies ignored, run 'modspec stats' to list them",
                    extraction.ignored_dependencies.len()
                )
                .dim()
            );
        }
        Ok(())
    }
}
