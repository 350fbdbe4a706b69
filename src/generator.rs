use std::path::PathBuf;

use tracing::instrument;

use crate::{
    domain::{slice, Config, ConfigError, Image, SliceError},
    parse::{self, Document, DocumentError, Extraction, Filters},
    render::{Dot, DotOptions, Summary, Turtle},
};

/// Errors that stop a run.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// The configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The source document could not be loaded.
    #[error(transparent)]
    Document(#[from] DocumentError),
    /// A per-class diagram referred to an unknown class.
    #[error(transparent)]
    Slice(#[from] SliceError),
    /// An output file could not be written.
    #[error("failed to write {path}: {source}")]
    Write {
        /// The file that was written.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },
}

/// One rendered output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Where the file goes.
    pub path: PathBuf,
    /// The rendered text.
    pub contents: String,
}

/// Runs extraction and rendering for one configuration.
#[derive(Debug)]
pub struct Generator {
    config: Config,
    filters: Filters,
}

impl Generator {
    /// Prepares a run, compiling the configured ignore patterns.
    ///
    /// # Errors
    ///
    /// Returns an error if an ignore pattern is not a valid regular
    /// expression.
    pub fn new(config: Config) -> Result<Self, GenerateError> {
        let filters = Filters::from_config(&config)?;
        Ok(Self { config, filters })
    }

    /// The configuration of this run.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Extracts every entity from an already loaded document.
    #[must_use]
    pub fn extract(&self, document: &Document) -> Extraction {
        parse::parse_document(
            document,
            parse::dialect(self.config.dialect),
            &self.config.namespace,
            &self.filters,
        )
    }

    /// Loads the configured source document and extracts every entity.
    ///
    /// # Errors
    ///
    /// Returns an error if the source document cannot be read.
    pub fn load(&self) -> Result<Extraction, GenerateError> {
        let document = Document::load(&self.config.source)?;
        Ok(self.extract(&document))
    }

    /// Renders every output of an extraction.
    ///
    /// This is a full and a classes-only diagram for each image and for the
    /// unfiltered registry, one diagram per requirements class, the HTML
    /// summary and the ontology.
    ///
    /// # Errors
    ///
    /// Returns an error if a requirements class cannot be sliced.
    pub fn artifacts(&self, extraction: &Extraction) -> Result<Vec<Artifact>, GenerateError> {
        let registry = &extraction.registry;
        let view = registry.view();
        let mut artifacts = Vec::new();

        let images = Image::ALL.into_iter().map(Some).chain([None]);
        for image in images {
            let name = image.map_or("all", Image::as_str);
            artifacts.push(self.artifact(
                &format!("_{name}.dot"),
                Dot::new(&view, DotOptions::full().with_image(image)).to_string(),
            ));
            artifacts.push(self.artifact(
                &format!("_{name}_cls.dot"),
                Dot::new(&view, DotOptions::classes_only().with_image(image)).to_string(),
            ));
        }

        for class in registry.requirement_classes() {
            let closure = slice(registry, &class.definition)?;
            artifacts.push(Artifact {
                path: class_diagram_path(&self.config.target, &class.definition),
                contents: Dot::new(&closure, DotOptions::full()).to_string(),
            });
        }

        artifacts.push(self.artifact("_requirements.html", Summary::new(registry).to_string()));
        artifacts.push(self.artifact(
            ".ttl",
            Turtle::new(registry, &self.config.metadata).to_string(),
        ));
        Ok(artifacts)
    }

    fn artifact(&self, suffix: &str, contents: String) -> Artifact {
        Artifact {
            path: PathBuf::from(format!("{}{suffix}", self.config.target)),
            contents,
        }
    }

    /// Loads, parses, renders and writes every output.
    ///
    /// Returns the extraction together with the paths written.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read or an output cannot be
    /// written.
    #[instrument(skip(self), fields(source = %self.config.source.display(), target = %self.config.target))]
    pub fn run(&self) -> Result<(Extraction, Vec<PathBuf>), GenerateError> {
        tracing::info!("Working on: {}", self.config.source.display());
        tracing::info!(" Output to: {}", self.config.target);

        let extraction = self.load()?;
        let artifacts = self.artifacts(&extraction)?;
        let mut written = Vec::with_capacity(artifacts.len());
        for artifact in artifacts {
            write(&artifact)?;
            written.push(artifact.path);
        }

        tracing::info!("Wrote {} files", written.len());
        Ok((extraction, written))
    }
}

fn write(artifact: &Artifact) -> Result<(), GenerateError> {
    let to_error = |source| GenerateError::Write {
        path: artifact.path.clone(),
        source,
    };
    if let Some(parent) = artifact.path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(to_error)?;
    }
    tracing::debug!("Writing {}", artifact.path.display());
    std::fs::write(&artifact.path, &artifact.contents).map_err(to_error)
}

/// The per-class diagram path for a class definition.
#[must_use]
pub fn class_diagram_path(target: &str, definition: &str) -> PathBuf {
    PathBuf::from(format!("{target}_{}.dot", definition.replace('/', "_")))
}
