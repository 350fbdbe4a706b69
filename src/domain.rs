//! Domain models for specification extraction.
//!
//! This module contains the entity types, the per-parse [`Registry`], image
//! classification, per-class slicing, and configuration.

/// The per-class graph closure.
pub mod closure;
pub use closure::{slice, RegistryView, SliceError};

mod config;
pub use config::{Config, ConfigError, DialectKind, Metadata, Shortening};

/// Specification entity types.
pub mod entity;
pub use entity::{ConformanceClass, Recommendation, Requirement, RequirementClass};

mod image;
pub use image::Image;

/// The canonical entity store.
pub mod registry;
pub use registry::{strip_namespace, Registry};
