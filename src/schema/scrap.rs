use bitflags::bitflags;
use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hasher;

/// Newtype wrapper for scrap IDs.
///
/// Scraps are authored by name and addressed by the hash of that name.
/// Ids are derived when content is loaded and are never persisted, so they
/// only need to agree within a single build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ScrapId(pub u64);

impl ScrapId {
    /// Hash an authoring name into a scrap id.
    pub fn from_name(name: &str) -> Self {
        let mut hasher = FxHasher::default();
        hasher.write(name.as_bytes());
        Self(hasher.finish())
    }
}

impl fmt::Display for ScrapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Editorial quality of a scrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ScrapQuality {
    Bad,
    #[default]
    Good,
    Great,
}

/// What kind of material a scrap is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ScrapKind {
    #[default]
    Text,
    Quote,
    Picture,
    Graph,
    Photo,
}

impl ScrapKind {
    /// Pictures, graphs and photos all fill the story's image requirement.
    pub fn is_image(&self) -> bool {
        matches!(self, Self::Picture | Self::Graph | Self::Photo)
    }
}

bitflags! {
    /// Content attributes carried by a scrap. A scrap may carry several.
    ///
    /// In RON these are written as a flag string, e.g. `"FACTS | USEFUL"`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct ScrapAttributes: u8 {
        const FACTS  = 1 << 0;
        const COLOR  = 1 << 1;
        const USEFUL = 1 << 2;
    }
}

/// One narrative fragment the player can place into a story slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapRecord {
    pub name: String,
    #[serde(default)]
    pub kind: ScrapKind,
    #[serde(default)]
    pub quality: ScrapQuality,
    #[serde(default)]
    pub attributes: ScrapAttributes,
}

impl ScrapRecord {
    pub fn new(
        name: &str,
        kind: ScrapKind,
        quality: ScrapQuality,
        attributes: ScrapAttributes,
    ) -> Self {
        Self {
            name: name.to_string(),
            kind,
            quality,
            attributes,
        }
    }

    pub fn id(&self) -> ScrapId {
        ScrapId::from_name(&self.name)
    }

    pub fn has_image(&self) -> bool {
        self.kind.is_image()
    }
}
