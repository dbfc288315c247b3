/// Story Preview — score a story layout against its scrap catalog.
///
/// Usage: story_preview --catalog <path> --story <path> [--select a,b,-] [--random <n>] [--seed <n>]
///
/// `--catalog` accepts a single RON file or a directory of them. In
/// `--select`, `-` leaves a slot empty. `--random` scores n random layouts
/// and prints the tier distribution. Set `RUST_LOG=debug` for load and
/// scoring traces.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::path::Path;
use std::process;
use story_score::core::catalog::ScrapCatalog;
use story_score::core::evaluator::StoryEvaluator;
use story_score::core::stats::{ScoreTier, StoryStats};
use story_score::schema::scrap::ScrapId;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage();
        return;
    }

    let mut catalog_path = None;
    let mut story_path = None;
    let mut select = None;
    let mut random_runs: Option<usize> = None;
    let mut seed: u64 = 42;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--catalog" if i + 1 < args.len() => {
                i += 1;
                catalog_path = Some(args[i].clone());
            }
            "--story" if i + 1 < args.len() => {
                i += 1;
                story_path = Some(args[i].clone());
            }
            "--select" if i + 1 < args.len() => {
                i += 1;
                select = Some(args[i].clone());
            }
            "--random" if i + 1 < args.len() => {
                i += 1;
                match parse_run_count(&args[i]) {
                    Ok(runs) => random_runs = Some(runs),
                    Err(e) => {
                        eprintln!("ERROR: {}", e);
                        process::exit(1);
                    }
                }
            }
            "--seed" if i + 1 < args.len() => {
                i += 1;
                seed = args[i].parse().unwrap_or(42);
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    let (Some(catalog_path), Some(story_path)) = (catalog_path, story_path) else {
        eprintln!("ERROR: --catalog and --story are required");
        print_usage();
        process::exit(1);
    };

    let builder = if Path::new(&catalog_path).is_dir() {
        StoryEvaluator::builder().catalog_dir(&catalog_path)
    } else {
        StoryEvaluator::builder().catalog_file(&catalog_path)
    };
    let mut evaluator = match builder.story_config(&story_path).build() {
        Ok(evaluator) => evaluator,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            process::exit(1);
        }
    };

    let config = evaluator.config().clone();
    println!(
        "Story '{}': {} slots, target facts/color/useful = {}/{}/{}",
        config.name, config.slot_count, config.fact_weight, config.color_weight, config.useful_weight
    );
    println!("Catalog: {} scraps\n", evaluator.catalog().len());

    if let Some(ref select) = select {
        let names: Vec<Option<&str>> = select
            .split(',')
            .map(str::trim)
            .map(|s| if s == "-" || s.is_empty() { None } else { Some(s) })
            .collect();

        let result = evaluator
            .selection_from_names(&names)
            .and_then(|sel| evaluator.evaluate(&sel));
        match result {
            Ok(stats) => print_breakdown(&stats),
            Err(e) => {
                eprintln!("ERROR: {}", e);
                process::exit(1);
            }
        }
    }

    if let Some(runs) = random_runs {
        run_random(&mut evaluator, runs, seed);
    }

    if select.is_none() && random_runs.is_none() {
        list_catalog(evaluator.catalog());
    }
}

fn parse_run_count(arg: &str) -> Result<usize, String> {
    match arg.parse::<usize>() {
        Ok(0) => Err("--random needs at least one run".to_string()),
        Ok(runs) => Ok(runs),
        Err(_) => Err(format!("--random expects a run count, got '{}'", arg)),
    }
}

fn print_usage() {
    println!(
        "Usage: story_preview --catalog <path> --story <path> [--select a,b,-] [--random <n>] [--seed <n>]"
    );
}

fn print_breakdown(stats: &StoryStats) {
    println!("--- Story Breakdown ---");
    println!("Scraps:        {}/{}", stats.scrap_count, stats.slot_count);
    println!(
        "Quality:       +{} -{} {}=> {}",
        stats.quality_add,
        stats.quality_subtract,
        if stats.has_picture { "" } else { "(no picture -1) " },
        stats.total_quality
    );
    println!(
        "Attributes:    facts {} / color {} / useful {}",
        stats.fact_count, stats.color_count, stats.useful_count
    );
    println!("Alignment:     {:.3}", stats.alignment);
    println!("Full:          {}", stats.is_full);
    println!("Publishable:   {}", stats.can_publish);
    println!("Score:         {:?}", stats.score);
    println!("--- End ---\n");
}

fn run_random(evaluator: &mut StoryEvaluator, runs: usize, seed: u64) {
    let mut ids: Vec<ScrapId> = evaluator.catalog().iter().map(|(id, _)| *id).collect();
    // Catalog iteration order is not part of the seed contract
    ids.sort();
    if ids.is_empty() {
        eprintln!("ERROR: catalog is empty");
        process::exit(1);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut tiers = [0usize; 3];
    let mut alignment_sum = 0.0f64;
    let mut scored = 0usize;

    for _ in 0..runs {
        let mut sel = evaluator.new_selection();
        for slot in 0..sel.slot_count() {
            if rng.gen_bool(0.75) {
                if let Some(&id) = ids.choose(&mut rng) {
                    if let Err(e) = sel.assign(slot, id) {
                        eprintln!("ERROR: {}", e);
                        process::exit(1);
                    }
                }
            }
        }

        match evaluator.evaluate(&sel) {
            Ok(stats) => {
                let tier = match stats.score {
                    ScoreTier::Bad => 0,
                    ScoreTier::Medium => 1,
                    ScoreTier::Good => 2,
                };
                tiers[tier] += 1;
                alignment_sum += stats.alignment as f64;
                scored += 1;
            }
            Err(e) => eprintln!("WARNING: {}", e),
        }
    }

    println!("=== Random Layouts (seed {}) ===\n", seed);
    println!("Scored:         {}", scored);
    println!("Bad:            {}", tiers[0]);
    println!("Medium:         {}", tiers[1]);
    println!("Good:           {}", tiers[2]);
    if scored > 0 {
        println!("Mean alignment: {:.3}", alignment_sum / scored as f64);
    }
}

fn list_catalog(catalog: &ScrapCatalog) {
    let mut scraps: Vec<_> = catalog.iter().map(|(_, s)| s).collect();
    scraps.sort_by(|a, b| a.name.cmp(&b.name));
    for scrap in scraps {
        println!(
            "  {:<24} {:<8} {:<6} {}",
            scrap.name,
            format!("{:?}", scrap.kind),
            format!("{:?}", scrap.quality),
            format!("{:?}", scrap.attributes)
        );
    }
}
