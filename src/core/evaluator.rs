/// The story evaluator: owns a catalog and story config, scores selections
/// and notifies listeners once fresh stats are available.
use std::path::PathBuf;
use thiserror::Error;

use crate::core::catalog::{CatalogError, ScrapCatalog};
use crate::core::stats::{self, ScoreError, StoryStats};
use crate::schema::scrap::ScrapId;
use crate::schema::story::{ConfigError, SelectionSet, StoryConfig};

#[derive(Debug, Error)]
pub enum EvaluatorError {
    #[error("score error: {0}")]
    Score(#[from] ScoreError),
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("no story config provided")]
    MissingConfig,
    #[error("selection has {actual} slots but the story has {expected}")]
    SlotMismatch { expected: usize, actual: usize },
    #[error("unknown scrap name: {0}")]
    UnknownScrapName(String),
}

/// Receives a notification each time a story is re-scored.
pub trait StatsListener: Send {
    fn stats_refreshed(&mut self, stats: &StoryStats);
}

impl<F> StatsListener for F
where
    F: FnMut(&StoryStats) + Send,
{
    fn stats_refreshed(&mut self, stats: &StoryStats) {
        self(stats)
    }
}

/// Built via `StoryEvaluator::builder()`.
pub struct StoryEvaluator {
    catalog: ScrapCatalog,
    config: StoryConfig,
    listeners: Vec<Box<dyn StatsListener>>,
}

/// Builder for constructing a `StoryEvaluator`.
#[derive(Default)]
pub struct StoryEvaluatorBuilder {
    catalog_dir: Option<PathBuf>,
    catalog_files: Vec<PathBuf>,
    story_config_path: Option<PathBuf>,
    /// Directly provided catalog (for testing without files).
    catalog: Option<ScrapCatalog>,
    /// Directly provided config (for testing without files).
    config: Option<StoryConfig>,
    listeners: Vec<Box<dyn StatsListener>>,
}

impl StoryEvaluator {
    pub fn builder() -> StoryEvaluatorBuilder {
        StoryEvaluatorBuilder::default()
    }

    pub fn config(&self) -> &StoryConfig {
        &self.config
    }

    pub fn catalog(&self) -> &ScrapCatalog {
        &self.catalog
    }

    /// An empty selection sized for this story.
    pub fn new_selection(&self) -> SelectionSet {
        SelectionSet::for_config(&self.config)
    }

    pub fn add_listener<L: StatsListener + 'static>(&mut self, listener: L) {
        self.listeners.push(Box::new(listener));
    }

    /// Score a selection, then tell every listener about the new stats.
    ///
    /// Listeners are not called when scoring fails.
    pub fn evaluate(&mut self, selection: &SelectionSet) -> Result<StoryStats, EvaluatorError> {
        let expected = self.config.slot_count as usize;
        if selection.slot_count() != expected {
            return Err(EvaluatorError::SlotMismatch {
                expected,
                actual: selection.slot_count(),
            });
        }

        let stats = stats::compute(selection, &self.config, &self.catalog)?;
        for listener in &mut self.listeners {
            listener.stats_refreshed(&stats);
        }
        Ok(stats)
    }

    /// Build a selection from scrap names, `None` for an empty slot.
    pub fn selection_from_names(&self, names: &[Option<&str>]) -> Result<SelectionSet, EvaluatorError> {
        let mut slots = Vec::with_capacity(names.len());
        for name in names {
            let slot = match name {
                Some(name) => {
                    let scrap = self
                        .catalog
                        .get_by_name(name)
                        .ok_or_else(|| EvaluatorError::UnknownScrapName(name.to_string()))?;
                    Some(scrap.id())
                }
                None => None,
            };
            slots.push(slot);
        }
        Ok(SelectionSet::from_slots(slots))
    }

    /// Names of the scraps in a selection, in slot order.
    pub fn scrap_names(&self, selection: &SelectionSet) -> Vec<Option<String>> {
        selection
            .slots()
            .iter()
            .map(|slot| slot.and_then(|id: ScrapId| self.catalog.get(id)).map(|s| s.name.clone()))
            .collect()
    }
}

impl StoryEvaluatorBuilder {
    /// Load every `.ron` scrap file in a directory.
    pub fn catalog_dir(mut self, path: &str) -> Self {
        self.catalog_dir = Some(PathBuf::from(path));
        self
    }

    /// Load a single scrap file. May be called more than once; later files
    /// override earlier ones.
    pub fn catalog_file(mut self, path: &str) -> Self {
        self.catalog_files.push(PathBuf::from(path));
        self
    }

    pub fn story_config(mut self, path: &str) -> Self {
        self.story_config_path = Some(PathBuf::from(path));
        self
    }

    /// Provide a catalog directly (for testing without files).
    pub fn with_catalog(mut self, catalog: ScrapCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Provide a config directly (for testing without files).
    pub fn with_config(mut self, config: StoryConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn listener<L: StatsListener + 'static>(mut self, listener: L) -> Self {
        self.listeners.push(Box::new(listener));
        self
    }

    pub fn build(self) -> Result<StoryEvaluator, EvaluatorError> {
        let mut catalog = self.catalog.unwrap_or_default();

        if let Some(ref dir) = self.catalog_dir {
            if dir.exists() {
                catalog.merge(ScrapCatalog::load_dir(dir)?);
            } else {
                tracing::warn!(path = %dir.display(), "catalog directory not found");
            }
        }

        for path in &self.catalog_files {
            catalog.merge(ScrapCatalog::load_from_ron(path)?);
        }

        // A config file takes precedence over one provided directly
        let config = match self.story_config_path {
            Some(ref path) => StoryConfig::load_from_ron(path)?,
            None => self.config.ok_or(EvaluatorError::MissingConfig)?,
        };

        if catalog.is_empty() {
            tracing::warn!(story = %config.name, "story evaluator built with an empty catalog");
        }

        Ok(StoryEvaluator {
            catalog,
            config,
            listeners: self.listeners,
        })
    }
}
