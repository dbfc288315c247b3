use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use super::scrap::ScrapId;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("story '{0}' has no slots")]
    ZeroSlots(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("slot {slot} is out of range for a story with {slot_count} slots")]
    SlotOutOfRange { slot: usize, slot_count: usize },
}

/// Author-defined target for a story: how many slots it has and the
/// attribute mix the editor is asking for.
///
/// Weights are proportions, not counts. `(2, 1, 1)` asks for half facts,
/// a quarter color and a quarter useful content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryConfig {
    #[serde(default)]
    pub name: String,
    pub slot_count: u32,
    #[serde(default)]
    pub fact_weight: u32,
    #[serde(default)]
    pub color_weight: u32,
    #[serde(default)]
    pub useful_weight: u32,
}

impl StoryConfig {
    pub fn new(slot_count: u32, fact_weight: u32, color_weight: u32, useful_weight: u32) -> Self {
        Self {
            name: String::new(),
            slot_count,
            fact_weight,
            color_weight,
            useful_weight,
        }
    }

    /// Sum of the three target weights. Widened so any weights can be summed.
    pub fn target_count(&self) -> u64 {
        u64::from(self.fact_weight) + u64::from(self.color_weight) + u64::from(self.useful_weight)
    }

    /// Parse and validate a story config from a RON string.
    pub fn parse_ron(input: &str) -> Result<Self, ConfigError> {
        let config: StoryConfig = ron::from_str(input)?;
        if config.slot_count == 0 {
            return Err(ConfigError::ZeroSlots(config.name));
        }
        Ok(config)
    }

    /// Load and validate a story config from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config = Self::parse_ron(&contents)?;
        tracing::debug!(
            path = %path.display(),
            story = %config.name,
            slots = config.slot_count,
            "loaded story config"
        );
        Ok(config)
    }
}

/// The player's current scrap placement: one optional scrap per slot.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectionSet {
    slots: Vec<Option<ScrapId>>,
}

impl SelectionSet {
    /// An empty selection with `slot_count` slots.
    pub fn new(slot_count: usize) -> Self {
        Self {
            slots: vec![None; slot_count],
        }
    }

    pub fn for_config(config: &StoryConfig) -> Self {
        Self::new(config.slot_count as usize)
    }

    pub fn from_slots(slots: Vec<Option<ScrapId>>) -> Self {
        Self { slots }
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn slots(&self) -> &[Option<ScrapId>] {
        &self.slots
    }

    pub fn get(&self, slot: usize) -> Option<ScrapId> {
        self.slots.get(slot).copied().flatten()
    }

    /// Place a scrap into a slot, returning whatever was there before.
    pub fn assign(&mut self, slot: usize, id: ScrapId) -> Result<Option<ScrapId>, SelectionError> {
        let slot_count = self.slots.len();
        let entry = self
            .slots
            .get_mut(slot)
            .ok_or(SelectionError::SlotOutOfRange { slot, slot_count })?;
        Ok(entry.replace(id))
    }

    /// Empty a slot, returning the scrap that was removed.
    pub fn remove(&mut self, slot: usize) -> Result<Option<ScrapId>, SelectionError> {
        let slot_count = self.slots.len();
        let entry = self
            .slots
            .get_mut(slot)
            .ok_or(SelectionError::SlotOutOfRange { slot, slot_count })?;
        Ok(entry.take())
    }

    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = None);
    }

    pub fn contains(&self, id: ScrapId) -> bool {
        self.slots.contains(&Some(id))
    }

    /// Iterate over the filled slots in order.
    pub fn filled(&self) -> impl Iterator<Item = ScrapId> + '_ {
        self.slots.iter().flatten().copied()
    }

    pub fn filled_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Index of the first empty slot, if any.
    pub fn first_empty(&self) -> Option<usize> {
        self.slots.iter().position(|s| s.is_none())
    }
}
