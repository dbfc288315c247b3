/// Story scoring integration tests — loaded content, worked scenarios and
/// randomized invariants over seeded selections.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::path::Path;
use story_score::core::catalog::ScrapCatalog;
use story_score::core::evaluator::{EvaluatorError, StoryEvaluator};
use story_score::core::stats::{compute, ScoreError, ScoreTier};
use story_score::schema::scrap::{ScrapId, ScrapQuality};
use story_score::schema::story::{SelectionSet, StoryConfig};

fn flood_catalog() -> ScrapCatalog {
    ScrapCatalog::load_from_ron(Path::new("tests/fixtures/flood_scraps.ron")).unwrap()
}

fn flood_evaluator() -> StoryEvaluator {
    StoryEvaluator::builder()
        .catalog_file("tests/fixtures/flood_scraps.ron")
        .story_config("tests/fixtures/flood_story.ron")
        .build()
        .unwrap()
}

fn names(evaluator: &StoryEvaluator, names: &[Option<&str>]) -> SelectionSet {
    evaluator.selection_from_names(names).unwrap()
}

#[test]
fn fixtures_load() {
    let evaluator = flood_evaluator();
    assert_eq!(evaluator.config().name, "river_flood");
    assert_eq!(evaluator.config().slot_count, 3);
    assert_eq!(evaluator.catalog().len(), 10);
}

#[test]
fn balanced_full_story_hits_max_alignment() {
    let mut evaluator = flood_evaluator();
    let sel = names(
        &evaluator,
        &[Some("levee_fact"), Some("baker_quote"), Some("shelter_photo")],
    );
    let stats = evaluator.evaluate(&sel).unwrap();

    assert_eq!(stats.scrap_count, 3);
    assert_eq!(stats.total_quality, 0);
    assert!(stats.has_picture);
    assert!(stats.is_full);
    assert!(stats.can_publish);
    assert!((stats.alignment - 0.8).abs() < 1e-6);
    assert_eq!(stats.score, ScoreTier::Bad);
}

#[test]
fn all_facts_no_picture_story() {
    let mut evaluator = flood_evaluator();
    let sel = names(
        &evaluator,
        &[Some("mayor_quote"), Some("council_minutes"), Some("court_record")],
    );
    let stats = evaluator.evaluate(&sel).unwrap();

    assert_eq!(stats.quality_add, 3);
    assert!(!stats.has_picture);
    assert_eq!(stats.total_quality, 2);
    assert_eq!(stats.score, ScoreTier::Medium);
    assert_eq!(
        (stats.fact_count, stats.color_count, stats.useful_count),
        (3, 0, 0)
    );
    assert_eq!(stats.attribute_count(), 3);
    // |1 - 1/3| + |0 - 1/3| + |0 - 1/3| = 4/3
    assert!((stats.alignment - (0.8 - 4.0 / 3.0)).abs() < 1e-5);
}

#[test]
fn underfilled_story_is_penalized_per_missing_slot() {
    let catalog = flood_catalog();
    let config = StoryConfig::new(5, 1, 1, 1);
    let mut sel = SelectionSet::for_config(&config);
    sel.assign(0, ScrapId::from_name("levee_fact")).unwrap();

    let stats = compute(&sel, &config, &catalog).unwrap();
    assert_eq!(stats.missing_slots(), 4);
    assert!(!stats.is_full);

    let unpenalized = 0.8 - 4.0 / 3.0;
    assert!((stats.alignment - unpenalized * 0.4).abs() < 1e-5);
}

#[test]
fn unknown_scrap_fails_without_stats() {
    let mut evaluator = flood_evaluator();
    let ghost = ScrapId::from_name("ghost_quote");
    let sel = SelectionSet::from_slots(vec![Some(ScrapId::from_name("levee_fact")), Some(ghost), None]);

    let err = evaluator.evaluate(&sel).unwrap_err();
    assert!(matches!(err, EvaluatorError::Score(ScoreError::UnknownScrap(id)) if id == ghost));
}

#[test]
fn great_picture_story_is_good() {
    let mut evaluator = flood_evaluator();
    let sel = names(
        &evaluator,
        &[Some("evacuation_map"), Some("rainfall_graph"), Some("mayor_quote")],
    );
    let stats = evaluator.evaluate(&sel).unwrap();
    assert_eq!(stats.total_quality, 3);
    assert_eq!(stats.score, ScoreTier::Good);
    // The map carries two attributes
    assert_eq!(stats.attribute_count(), 4);
}

#[test]
fn catalog_dir_merges_in_name_order() {
    let catalog = ScrapCatalog::load_dir(Path::new("tests/fixtures/catalog_dir")).unwrap();
    assert_eq!(catalog.len(), 2);
    assert_eq!(
        catalog.get_by_name("levee_fact").unwrap().quality,
        ScrapQuality::Great
    );
}

#[test]
fn builder_reports_missing_story_file() {
    let err = StoryEvaluator::builder()
        .with_catalog(flood_catalog())
        .story_config("tests/fixtures/no_such_story.ron")
        .build()
        .err()
        .unwrap();
    assert!(matches!(err, EvaluatorError::Config(_)));
}

// ---------------------------------------------------------------------------
// Randomized invariants
// ---------------------------------------------------------------------------

fn random_selection(rng: &mut StdRng, ids: &[ScrapId]) -> (StoryConfig, SelectionSet) {
    let slot_count = rng.gen_range(1..=8u32);
    let config = StoryConfig::new(
        slot_count,
        rng.gen_range(0..=3),
        rng.gen_range(0..=3),
        rng.gen_range(0..=3),
    );
    let mut sel = SelectionSet::for_config(&config);
    for slot in 0..slot_count as usize {
        if rng.gen_bool(0.6) {
            let id = *ids.choose(rng).unwrap();
            sel.assign(slot, id).unwrap();
        }
    }
    (config, sel)
}

#[test]
fn random_selections_hold_invariants() {
    let catalog = flood_catalog();
    let ids: Vec<ScrapId> = catalog.iter().map(|(id, _)| *id).collect();
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..500 {
        let (config, sel) = random_selection(&mut rng, &ids);
        let stats = compute(&sel, &config, &catalog).unwrap();

        let penalty = if stats.has_picture { 0 } else { 1 };
        assert_eq!(
            stats.quality_add as i32 - stats.quality_subtract as i32 - penalty,
            stats.total_quality
        );
        assert!(stats.scrap_count <= config.slot_count);
        assert_eq!(stats.is_full, stats.scrap_count == config.slot_count);
        assert_eq!(stats.can_publish, stats.scrap_count > 0);
        assert!(stats.fact_count <= stats.scrap_count);
        assert!(stats.color_count <= stats.scrap_count);
        assert!(stats.useful_count <= stats.scrap_count);
        assert!(stats.alignment <= 0.8 + 1e-6);
        assert_eq!(stats.score, ScoreTier::from_total_quality(stats.total_quality));

        if stats.scrap_count == 0 {
            assert_eq!(stats.total_quality, -1);
            assert_eq!(stats.alignment, 0.0);
            assert_eq!(stats.score, ScoreTier::Bad);
        }
    }
}

#[test]
fn compute_is_idempotent() {
    let catalog = flood_catalog();
    let ids: Vec<ScrapId> = catalog.iter().map(|(id, _)| *id).collect();
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..200 {
        let (config, sel) = random_selection(&mut rng, &ids);
        let first = compute(&sel, &config, &catalog).unwrap();
        let second = compute(&sel, &config, &catalog).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.alignment.to_bits(), second.alignment.to_bits());
    }
}

#[test]
fn adding_great_picture_never_lowers_quality() {
    let catalog = flood_catalog();
    let ids: Vec<ScrapId> = catalog.iter().map(|(id, _)| *id).collect();
    let map = ScrapId::from_name("evacuation_map");
    let mut rng = StdRng::seed_from_u64(1234);

    for _ in 0..300 {
        let (config, mut sel) = random_selection(&mut rng, &ids);
        let Some(slot) = sel.first_empty() else {
            continue;
        };
        let before = compute(&sel, &config, &catalog).unwrap();
        sel.assign(slot, map).unwrap();
        let after = compute(&sel, &config, &catalog).unwrap();
        assert!(after.total_quality >= before.total_quality);
        assert_eq!(after.scrap_count, before.scrap_count + 1);
    }
}
