use std::{collections::BTreeSet, fmt, sync::LazyLock};

use regex::Regex;
use serde::Serialize;

static OBS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/re[qc]/obs.*$").expect("valid image pattern"));
static SAM_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/re[qc]/sam.*$").expect("valid image pattern"));
static NONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^$").expect("valid image pattern"));

/// A coarse subset of the specification, used to scope diagrams.
///
/// Every image carries a pattern over definition paths. A definition may
/// match several images; one that matches none falls back to
/// [`Image::None`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Image {
    /// Observations.
    Obs,
    /// Samples.
    Sam,
    /// Entities that belong to no other image.
    None,
}

impl Image {
    /// All images, in declaration order.
    pub const ALL: [Self; 3] = [Self::Obs, Self::Sam, Self::None];

    /// The pattern a definition must match (in full) to be part of this image.
    #[must_use]
    pub fn pattern(self) -> &'static Regex {
        match self {
            Self::Obs => &OBS_PATTERN,
            Self::Sam => &SAM_PATTERN,
            Self::None => &NONE_PATTERN,
        }
    }

    /// Lowercase name, used in output file names.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Obs => "obs",
            Self::Sam => "sam",
            Self::None => "none",
        }
    }

    /// Returns every image whose pattern matches `definition`.
    ///
    /// The result is never empty: a definition matching nothing yields
    /// exactly `{None}`.
    #[must_use]
    pub fn matching(definition: &str) -> BTreeSet<Self> {
        let mut images: BTreeSet<Self> = Self::ALL
            .into_iter()
            .filter(|image| image.pattern().is_match(definition))
            .collect();
        if images.is_empty() {
            images.insert(Self::None);
        }
        images
    }
}

impl fmt::Display for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
