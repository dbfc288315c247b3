//! WASM bindings for story-score — powers the interactive story desk demo.

use wasm_bindgen::prelude::*;

use story_score::core::catalog::ScrapCatalog;
use story_score::core::evaluator::StoryEvaluator;
use story_score::core::stats::StoryStats;
use story_score::schema::scrap::{ScrapAttributes, ScrapRecord};
use story_score::schema::story::{SelectionSet, StoryConfig};

// ---------------------------------------------------------------------------
// Embedded story data — compiled into the WASM binary
// ---------------------------------------------------------------------------
mod data {
    pub const RIVER_FLOOD_SCRAPS: &str = include_str!("../../story_data/river_flood/scraps.ron");
    pub const RIVER_FLOOD_STORY: &str = include_str!("../../story_data/river_flood/story.ron");

    pub const MILL_STRIKE_SCRAPS: &str = include_str!("../../story_data/mill_strike/scraps.ron");
    pub const MILL_STRIKE_STORY: &str = include_str!("../../story_data/mill_strike/story.ron");
}

// ---------------------------------------------------------------------------
// JSON helper types for communication across the WASM boundary
// ---------------------------------------------------------------------------
#[derive(serde::Serialize)]
struct ScrapInfo {
    name: String,
    kind: String,
    quality: String,
    has_image: bool,
    attributes: Vec<&'static str>,
}

#[derive(serde::Serialize)]
struct StoryInfo {
    name: String,
    slot_count: u32,
    fact_weight: u32,
    color_weight: u32,
    useful_weight: u32,
}

#[derive(serde::Serialize)]
struct DeskState {
    slots: Vec<Option<String>>,
    stats: StoryStats,
}

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------
fn attribute_labels(attributes: ScrapAttributes) -> Vec<&'static str> {
    let mut labels = Vec::new();
    if attributes.contains(ScrapAttributes::FACTS) {
        labels.push("facts");
    }
    if attributes.contains(ScrapAttributes::COLOR) {
        labels.push("color");
    }
    if attributes.contains(ScrapAttributes::USEFUL) {
        labels.push("useful");
    }
    labels
}

fn scrap_info(scrap: &ScrapRecord) -> ScrapInfo {
    ScrapInfo {
        name: scrap.name.clone(),
        kind: format!("{:?}", scrap.kind).to_lowercase(),
        quality: format!("{:?}", scrap.quality).to_lowercase(),
        has_image: scrap.has_image(),
        attributes: attribute_labels(scrap.attributes),
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsError> {
    serde_json::to_string(value).map_err(|e| JsError::new(&format!("Serialization error: {e}")))
}

// ---------------------------------------------------------------------------
// StoryDesk — the main exported struct
// ---------------------------------------------------------------------------
#[wasm_bindgen]
pub struct StoryDesk {
    evaluator: StoryEvaluator,
    selection: SelectionSet,
}

#[wasm_bindgen]
impl StoryDesk {
    /// Open one of the built-in stories.
    #[wasm_bindgen(constructor)]
    pub fn new(story: &str) -> Result<StoryDesk, JsError> {
        let (scraps_src, story_src) = match story {
            "river_flood" => (data::RIVER_FLOOD_SCRAPS, data::RIVER_FLOOD_STORY),
            "mill_strike" => (data::MILL_STRIKE_SCRAPS, data::MILL_STRIKE_STORY),
            _ => return Err(JsError::new(&format!("Unknown story: {story}"))),
        };
        StoryDesk::from_ron(scraps_src, story_src)
    }

    /// Open a story from caller-supplied RON content.
    pub fn from_ron(scraps_ron: &str, story_ron: &str) -> Result<StoryDesk, JsError> {
        let catalog = ScrapCatalog::parse_ron(scraps_ron)
            .map_err(|e| JsError::new(&format!("Scrap catalog error: {e}")))?;
        let config = StoryConfig::parse_ron(story_ron)
            .map_err(|e| JsError::new(&format!("Story config error: {e}")))?;

        let evaluator = StoryEvaluator::builder()
            .with_catalog(catalog)
            .with_config(config)
            .build()
            .map_err(|e| JsError::new(&format!("Evaluator build error: {e}")))?;
        let selection = evaluator.new_selection();

        Ok(StoryDesk {
            evaluator,
            selection,
        })
    }

    /// Place a scrap into a slot and return the refreshed desk state as JSON.
    pub fn assign(&mut self, slot: usize, scrap_name: &str) -> Result<String, JsError> {
        let id = self
            .evaluator
            .catalog()
            .get_by_name(scrap_name)
            .map(|s| s.id())
            .ok_or_else(|| JsError::new(&format!("Unknown scrap: {scrap_name}")))?;
        self.selection
            .assign(slot, id)
            .map_err(|e| JsError::new(&e.to_string()))?;
        self.state()
    }

    /// Empty a slot and return the refreshed desk state as JSON.
    pub fn remove(&mut self, slot: usize) -> Result<String, JsError> {
        self.selection
            .remove(slot)
            .map_err(|e| JsError::new(&e.to_string()))?;
        self.state()
    }

    /// Empty every slot and return the refreshed desk state as JSON.
    pub fn clear(&mut self) -> Result<String, JsError> {
        self.selection.clear();
        self.state()
    }

    /// Current slots and stats as JSON.
    pub fn state(&mut self) -> Result<String, JsError> {
        let stats = self
            .evaluator
            .evaluate(&self.selection)
            .map_err(|e| JsError::new(&format!("Scoring error: {e}")))?;
        to_json(&DeskState {
            slots: self.evaluator.scrap_names(&self.selection),
            stats,
        })
    }

    /// Score an arbitrary layout without touching the desk.
    ///
    /// Expected JSON shape: `["levee_breach_report", null, "gauge_readings"]`
    pub fn score(&mut self, selection_json: &str) -> Result<String, JsError> {
        let names: Vec<Option<String>> = serde_json::from_str(selection_json)
            .map_err(|e| JsError::new(&format!("Invalid selection JSON: {e}")))?;
        let names: Vec<Option<&str>> = names.iter().map(|n| n.as_deref()).collect();
        let selection = self
            .evaluator
            .selection_from_names(&names)
            .map_err(|e| JsError::new(&e.to_string()))?;
        let stats = self
            .evaluator
            .evaluate(&selection)
            .map_err(|e| JsError::new(&format!("Scoring error: {e}")))?;
        to_json(&stats)
    }

    /// Return a JSON array describing every scrap in the catalog.
    pub fn scraps(&self) -> Result<String, JsError> {
        let mut scraps: Vec<ScrapInfo> = self
            .evaluator
            .catalog()
            .iter()
            .map(|(_, s)| scrap_info(s))
            .collect();
        scraps.sort_by(|a, b| a.name.cmp(&b.name));
        to_json(&scraps)
    }

    /// Return the story's slot count and target weights as JSON.
    pub fn story(&self) -> Result<String, JsError> {
        let config = self.evaluator.config();
        to_json(&StoryInfo {
            name: config.name.clone(),
            slot_count: config.slot_count,
            fact_weight: config.fact_weight,
            color_weight: config.color_weight,
            useful_weight: config.useful_weight,
        })
    }

    /// Return JSON array of built-in story identifiers.
    pub fn available_stories() -> String {
        serde_json::to_string(&["river_flood", "mill_strike"]).unwrap_or_else(|_| "[]".to_string())
    }
}
