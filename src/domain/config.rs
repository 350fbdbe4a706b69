use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The table layout used by the source document.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum DialectKind {
    /// Every field is a two-cell `name | value` row.
    #[default]
    Oms,
    /// Definitions sit at fixed row offsets and header cells carry data.
    Sta,
}

/// Configuration for one extraction run.
///
/// This struct holds the input and output locations, the filters applied
/// while parsing, and the bibliographic metadata written to the ontology.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// The table layout of the source document.
    pub dialect: DialectKind,

    /// The HTML document to parse.
    pub source: PathBuf,

    /// Path prefix for every generated file.
    ///
    /// For example, `output/OMSv3/OMSv3` produces `output/OMSv3/OMSv3.ttl`
    /// and `output/OMSv3/OMSv3_all.dot`.
    pub target: String,

    /// Namespace removed from the front of every definition.
    ///
    /// For example, with `http://www.opengis.net/spec/OMS/3.0` both
    /// `http://www.opengis.net/spec/OMS/3.0/req/core` and `/req/core`
    /// refer to the same class.
    pub namespace: String,

    /// Patterns for requirement, recommendation and class definitions to
    /// drop. A pattern must match the whole definition.
    pub ignore_requirements: Vec<String>,

    /// Patterns for dependency citations to drop. A pattern must match the
    /// whole citation.
    pub ignore_dependencies: Vec<String>,

    /// Prefix rewrites applied to dependency citations. The first matching
    /// rule wins.
    pub shortenings: Vec<Shortening>,

    /// Bibliographic metadata for the ontology output.
    pub metadata: Metadata,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dialect: DialectKind::default(),
            source: default_source(),
            target: default_target(),
            namespace: String::new(),
            ignore_requirements: Vec::new(),
            ignore_dependencies: Vec::new(),
            shortenings: Vec::new(),
            metadata: Metadata::default(),
        }
    }
}

/// Errors raised while loading, saving or compiling a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// The file that was read.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },
    /// The configuration file could not be written.
    #[error("failed to write config file {path}: {source}")]
    Write {
        /// The file that was written.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },
    /// The configuration file is not valid TOML for this schema.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    /// The configuration could not be serialized.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// An ignore pattern is not a valid regular expression.
    #[error("invalid pattern '{pattern}': {source}")]
    Pattern {
        /// The offending pattern.
        pattern: String,
        /// The underlying error.
        source: regex::Error,
    },
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// A literal-prefix rewrite for dependency citations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortening {
    /// The prefix to replace.
    pub start: String,
    /// The replacement for the prefix.
    pub replace: String,
}

impl Shortening {
    /// Rewrites `input` if it starts with this rule's prefix.
    #[must_use]
    pub fn apply(&self, input: &str) -> Option<String> {
        input
            .strip_prefix(&self.start)
            .map(|rest| format!("{}{rest}", self.replace))
    }
}

/// Document metadata written verbatim into the ontology.
///
/// None of these values are read from the document itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    /// When the document was created.
    pub date_created: NaiveDate,
    /// When the document was last modified.
    pub date_modified: NaiveDate,
    /// When the document was approved.
    pub date_approved: NaiveDate,
    /// When the document was submitted.
    pub date_submitted: NaiveDate,
    /// When the document was accepted.
    pub date_accepted: NaiveDate,
    /// The document identifier, e.g. `http://www.opengis.net/doc/is/OMS/3.0`.
    pub identifier_doc: String,
    /// The specification identifier, prepended to every definition in the
    /// ontology, e.g. `http://www.opengis.net/spec/OMS/3.0`.
    pub identifier_spec: String,
    /// The OGC document number, e.g. `20-082r2`.
    pub document_number: String,
    /// The specification title.
    pub title: String,
    /// The document editor.
    pub creator: String,
    /// The publishing authority.
    pub authority: String,
    /// The specification version.
    pub version: String,
    /// Where the published document can be read.
    pub landing_page: String,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            date_created: default_date(),
            date_modified: default_date(),
            date_approved: default_date(),
            date_submitted: default_date(),
            date_accepted: default_date(),
            identifier_doc: "http://www.opengis.net/doc/is/OMS/3.0".to_string(),
            identifier_spec: "http://www.opengis.net/spec/OMS/3.0".to_string(),
            document_number: "20-082r2".to_string(),
            title: "OGC Abstract Specification Topic 20 - Observations and measurements"
                .to_string(),
            creator: "Kathi Schleidt".to_string(),
            authority: "Open Geospatial Consortium".to_string(),
            version: "3.0".to_string(),
            landing_page: "http://docs.opengeospatial.org/is/20-082r2/20-082r2.html"
                .to_string(),
        }
    }
}

fn default_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1990, 1, 1).unwrap_or_default()
}

fn default_source() -> PathBuf {
    PathBuf::from("document.html")
}

fn default_target() -> String {
    "output/modspec".to_string()
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default)]
        dialect: DialectKind,

        #[serde(default = "default_source")]
        source: PathBuf,

        #[serde(default = "default_target")]
        target: String,

        #[serde(default)]
        namespace: String,

        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        ignore_requirements: Vec<String>,

        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        ignore_dependencies: Vec<String>,

        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        shortenings: Vec<Shortening>,

        #[serde(default)]
        metadata: Metadata,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                dialect,
                source,
                target,
                namespace,
                ignore_requirements,
                ignore_dependencies,
                shortenings,
                metadata,
            } => Self {
                dialect,
                source,
                target,
                namespace,
                ignore_requirements,
                ignore_dependencies,
                shortenings,
                metadata,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            dialect: config.dialect,
            source: config.source,
            target: config.target,
            namespace: config.namespace,
            ignore_requirements: config.ignore_requirements,
            ignore_dependencies: config.ignore_dependencies,
            shortenings: config.shortenings,
            metadata: config.metadata,
        }
    }
}
