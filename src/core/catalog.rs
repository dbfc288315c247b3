/// Scrap catalog — the lookup service the scoring engine resolves ids against.
use rustc_hash::FxHashMap;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use crate::schema::scrap::{ScrapId, ScrapRecord};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("duplicate scrap '{name}' ({id})")]
    DuplicateScrap { id: ScrapId, name: String },
    #[error("scrap names '{existing}' and '{incoming}' hash to the same id {id}")]
    IdCollision {
        id: ScrapId,
        existing: String,
        incoming: String,
    },
}

/// Resolves scrap ids to their records.
///
/// Implementations must be read-only; the scorer holds only `&self`.
pub trait ScrapLookup {
    fn lookup(&self, id: ScrapId) -> Option<&ScrapRecord>;
}

impl ScrapLookup for HashMap<ScrapId, ScrapRecord> {
    fn lookup(&self, id: ScrapId) -> Option<&ScrapRecord> {
        self.get(&id)
    }
}

impl ScrapLookup for FxHashMap<ScrapId, ScrapRecord> {
    fn lookup(&self, id: ScrapId) -> Option<&ScrapRecord> {
        self.get(&id)
    }
}

/// All scraps available to a story, keyed by the hash of their name.
#[derive(Debug, Clone, Default)]
pub struct ScrapCatalog {
    scraps: FxHashMap<ScrapId, ScrapRecord>,
}

impl ScrapCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a scrap. Two scraps with the same name are an authoring error,
    /// as are two names that hash to the same id.
    pub fn register(&mut self, scrap: ScrapRecord) -> Result<ScrapId, CatalogError> {
        let id = scrap.id();
        self.insert_with_id(id, scrap)?;
        Ok(id)
    }

    fn insert_with_id(&mut self, id: ScrapId, scrap: ScrapRecord) -> Result<(), CatalogError> {
        if let Some(existing) = self.scraps.get(&id) {
            if existing.name == scrap.name {
                return Err(CatalogError::DuplicateScrap {
                    id,
                    name: scrap.name,
                });
            }
            return Err(CatalogError::IdCollision {
                id,
                existing: existing.name.clone(),
                incoming: scrap.name,
            });
        }
        self.scraps.insert(id, scrap);
        Ok(())
    }

    pub fn get(&self, id: ScrapId) -> Option<&ScrapRecord> {
        self.scraps.get(&id)
    }

    pub fn get_by_name(&self, name: &str) -> Option<&ScrapRecord> {
        self.get(ScrapId::from_name(name))
    }

    pub fn len(&self) -> usize {
        self.scraps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scraps.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ScrapId, &ScrapRecord)> {
        self.scraps.iter()
    }

    /// Merge another catalog into this one. Scraps from `other` replace
    /// scraps with the same name.
    pub fn merge(&mut self, other: ScrapCatalog) {
        for (id, scrap) in other.scraps {
            if self.scraps.insert(id, scrap).is_some() {
                tracing::trace!(%id, "scrap overridden by merge");
            }
        }
    }

    /// Parse a catalog from a RON list of scrap records.
    pub fn parse_ron(input: &str) -> Result<Self, CatalogError> {
        let scraps: Vec<ScrapRecord> = ron::from_str(input)?;
        let mut catalog = Self::new();
        for scrap in scraps {
            catalog.register(scrap)?;
        }
        Ok(catalog)
    }

    /// Load a catalog from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<Self, CatalogError> {
        let contents = std::fs::read_to_string(path)?;
        let catalog = Self::parse_ron(&contents)?;
        tracing::debug!(path = %path.display(), scraps = catalog.len(), "loaded scrap catalog");
        Ok(catalog)
    }

    /// Load and merge every `.ron` file in a directory.
    pub fn load_dir(dir: &Path) -> Result<Self, CatalogError> {
        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|s| s.to_str()) == Some("ron") {
                paths.push(path);
            }
        }
        // read_dir order is platform dependent; sort so merge overrides are stable
        paths.sort();

        let mut catalog = Self::new();
        for path in &paths {
            catalog.merge(Self::load_from_ron(path)?);
        }
        Ok(catalog)
    }
}

impl ScrapLookup for ScrapCatalog {
    fn lookup(&self, id: ScrapId) -> Option<&ScrapRecord> {
        self.get(id)
    }
}
