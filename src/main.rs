//! Pipeforge CLI - Compose a forecasting pipeline from JSON configuration.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use pipeforge::{
    composer::RandomSearchComposer,
    metrics::MetricKind,
    models,
    schema::{ComposerRequirements, CompositionConfig, Dataset, SearchConfig},
};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 && args[1] == "--example" {
        print_example_config();
        return;
    }

    if args.len() < 3 {
        eprintln!("Usage: {} <config.json> <series.csv> [forecast_length]", args[0]);
        eprintln!();
        eprintln!("Compose a forecasting pipeline by random search.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  config.json      Composition configuration file");
        eprintln!("  series.csv       Series file; the last column is the series");
        eprintln!("  forecast_length  Holdout horizon in steps (default: 10)");
        eprintln!();
        eprintln!("Print an example configuration with --example.");
        std::process::exit(1);
    }

    let config_path = PathBuf::from(&args[1]);
    let series_path = PathBuf::from(&args[2]);
    let forecast_length: usize = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(10);

    // Load configuration
    let config_str = fs::read_to_string(&config_path).unwrap_or_else(|e| {
        eprintln!("Error reading config file: {}", e);
        std::process::exit(1);
    });
    let config: CompositionConfig = serde_json::from_str(&config_str).unwrap_or_else(|e| {
        eprintln!("Error parsing config: {}", e);
        std::process::exit(1);
    });
    if let Err(e) = config.validate() {
        eprintln!("Invalid config: {}", e);
        std::process::exit(1);
    }

    // Load the series
    let data = Dataset::from_csv(&series_path, forecast_length).unwrap_or_else(|e| {
        eprintln!("Error loading series: {}", e);
        std::process::exit(1);
    });
    let data = Arc::new(data);

    println!("Pipeforge Composition");
    println!("=====================");
    println!(
        "Series:     {} points ({} train / {} holdout)",
        data.len(),
        data.train().len(),
        data.holdout().len()
    );
    println!(
        "Candidates: {} primary, {} secondary",
        config.requirements.primary.len(),
        config.requirements.secondary.len()
    );
    println!("Iterations: {}", config.search.iterations);
    println!("Metric:     {:?}", config.metric);
    println!();

    let composer = RandomSearchComposer::new(config.search.clone());
    let metric = models::holdout_metric(config.metric);

    // Run the search
    println!("Running search...");
    let start = Instant::now();
    let result = composer.compose_with_callback(
        Arc::clone(&data),
        &config.requirements,
        metric,
        |progress| {
            if progress.improved {
                println!(
                    "iter {:>4}/{}: score {:.3} ({} node(s)) -- new best",
                    progress.iteration + 1,
                    progress.budget,
                    progress.score,
                    progress.nodes
                );
            }
        },
    );
    let pipeline = result.unwrap_or_else(|e| {
        eprintln!("Composition failed: {}", e);
        std::process::exit(1);
    });
    let elapsed = start.elapsed();

    println!();
    if pipeline.is_empty() {
        println!("No pipeline composed: no trial produced a usable score.");
        return;
    }

    // Score the winner once more for the summary line.
    let score = models::holdout_metric(config.metric)(&pipeline).unwrap_or(f64::NAN);
    println!("Best pipeline: {}", pipeline);
    println!("Holdout score: {:.3}", score);
    println!(
        "Time: {:.2}s ({:.1} iterations/s)",
        elapsed.as_secs_f32(),
        config.search.iterations as f32 / elapsed.as_secs_f32()
    );
}

fn print_example_config() {
    let config = CompositionConfig {
        requirements: ComposerRequirements::new(
            models::primary_candidates(),
            models::secondary_candidates(),
        ),
        search: SearchConfig {
            iterations: 50,
            random_seed: Some(42),
        },
        metric: MetricKind::Rmse,
    };

    println!("Example configuration (config.json):");
    println!("{}", serde_json::to_string_pretty(&config).unwrap());
}
