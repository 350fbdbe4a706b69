use std::path::{Path, PathBuf};

mod generate;
mod stats;
mod terminal;

use anyhow::Context;
use clap::ArgAction;
use generate::Generate;
use modspec::{Config, DialectKind};
use stats::Stats;
use tracing::instrument;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The configuration file
    #[arg(short, long, default_value = "modspec.toml", global = true)]
    config: PathBuf,

    #[command(flatten)]
    overrides: Overrides,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        match self.command.unwrap_or_default() {
            Command::Init(command) => command.run(&self.config),
            Command::Generate(command) => {
                command.run(self.overrides.apply(load_config(&self.config)?))
            }
            Command::Stats(command) => command.run(self.overrides.apply(load_config(&self.config)?)),
        }
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

/// Settings that take precedence over the configuration file.
#[derive(Debug, Default, clap::Args)]
struct Overrides {
    /// The HTML document to parse
    #[arg(short, long, global = true)]
    source: Option<PathBuf>,

    /// Path prefix for every generated file
    #[arg(short, long, global = true)]
    target: Option<String>,

    /// The table layout of the source document
    #[arg(short, long, global = true)]
    dialect: Option<DialectKind>,
}

impl Overrides {
    fn apply(self, mut config: Config) -> Config {
        if let Some(source) = self.source {
            config.source = source;
        }
        if let Some(target) = self.target {
            config.target = target;
        }
        if let Some(dialect) = self.dialect {
            config.dialect = dialect;
        }
        config
    }
}

/// Loads the configuration file, falling back to defaults when it does not
/// exist.
fn load_config(path: &Path) -> anyhow::Result<Config> {
    if !path.exists() {
        tracing::info!(
            "No configuration found at {}, using defaults",
            path.display()
        );
        return Ok(Config::default());
    }
    Config::load(path).with_context(|| format!("failed to load {}", path.display()))
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Parse the document and write every output (default)
    Generate(Generate),

    /// Write a default configuration file
    Init(Init),

    /// Parse the document and report what was found
    Stats(Stats),
}

impl Default for Command {
    fn default() -> Self {
        Self::Generate(Generate::default())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Init {
    /// Overwrite an existing configuration file
    #[arg(long)]
    force: bool,
}

impl Init {
    #[instrument]
    fn run(&self, path: &Path) -> anyhow::Result<()> {
        if path.exists() && !self.force {
            anyhow::bail!(
                "{} already exists (use --force to overwrite)",
                path.display()
            );
        }

        Config::default()
            .save(path)
            .with_context(|| format!("failed to create {}", path.display()))?;

        println!("Created {}", path.display());
        println!();
        println!("Next steps:");
        println!("  edit 'source', 'target' and 'namespace' in {}", path.display());
        println!("  modspec generate");
        Ok(())
    }
}
