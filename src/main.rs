//! Feature search CLI - Run a genetic feature search from a JSON run file.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use knn_feature_ga::{
    Chromosome, FitnessEvaluator, GeneticSearch, SearchContext,
    compute::evolution::baseline_report,
    schema::SearchPhase,
    storage::{self, RunConfig},
};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <run.json> [seed]", args[0]);
        eprintln!();
        eprintln!("Search for the feature subset with the best 1-NN accuracy.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  run.json  Path to run configuration (input files + search settings)");
        eprintln!("  seed      Random seed, overrides search.random_seed");
        eprintln!();
        eprintln!("Print an example run configuration with --example.");
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_config();
        return;
    }

    let run_path = PathBuf::from(&args[1]);
    let mut run = RunConfig::load(&run_path).unwrap_or_else(|e| {
        eprintln!("Error loading run configuration: {}", e);
        std::process::exit(1);
    });
    if let Some(arg) = args.get(2) {
        let seed = parse_seed(arg).unwrap_or_else(|e| {
            eprintln!("{}", e);
            eprintln!("Usage: {} <run.json> [seed]", args[0]);
            std::process::exit(1);
        });
        run.search.random_seed = Some(seed);
    }

    let context = run.load_context().unwrap_or_else(|e| {
        eprintln!("Error loading data: {}", e);
        std::process::exit(1);
    });

    println!("kNN Feature Search");
    println!("==================");
    println!(
        "Train: {} rows, Test: {} rows, Features: {}",
        context.train.len(),
        context.test.len(),
        context.feature_count()
    );
    println!(
        "Population: {}, mutation rate: {}, threshold: {}%, max generations: {}",
        run.search.population_size,
        run.search.mutation_rate,
        run.search.accuracy_threshold,
        run.search.max_generations
    );
    println!();

    print_baselines(&run, &context);

    let context = Arc::new(context);
    let mut search = GeneticSearch::new(run.search.clone(), Arc::clone(&context))
        .unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        });

    println!("Running search ({:?})...", run.search.distance_metric);
    let start = Instant::now();
    let report_every = (run.search.max_generations / 10).max(1);

    let result = search
        .run_with_callback(|progress| {
            if progress.phase == SearchPhase::Initializing {
                return;
            }
            if progress.generation % report_every == 0 || progress.phase == SearchPhase::Complete
            {
                println!(
                    "  Generation {}/{}: best={:.2}%, generation best={:.2}%, mean={:.2}%",
                    progress.generation,
                    progress.max_generations,
                    progress.best_accuracy,
                    progress.generation_best,
                    progress.mean_accuracy
                );
            }
        })
        .unwrap_or_else(|e| {
            eprintln!("Search failed: {}", e);
            std::process::exit(1);
        });

    let elapsed = start.elapsed();

    println!();
    println!("Result:");
    println!("  Stop reason: {:?}", result.stats.stop_reason);
    println!("  Generations: {}", result.stats.generations);
    println!(
        "  Best mask: {} ({} of {} features)",
        result.best.chromosome,
        result.best.chromosome.active_count(),
        result.best.chromosome.len()
    );
    println!("  Accuracy: {:.2}%", result.best.accuracy);
    println!("  Time: {:.2}s", elapsed.as_secs_f32());

    if let Some(path) = &run.result_output {
        if let Err(e) = storage::write_result(path, &result) {
            eprintln!("Error writing result to {}: {}", path.display(), e);
            std::process::exit(1);
        }
        println!("  Result written to {}", path.display());
    }

    if let Some(path) = &run.predictions_output {
        let evaluator = FitnessEvaluator::new(run.search.distance_metric);
        let written = evaluator
            .predictions(&result.best.chromosome, &context)
            .map_err(|e| e.to_string())
            .and_then(|p| storage::write_predictions(path, &p).map_err(|e| e.to_string()));
        match written {
            Ok(()) => println!("  Predictions written to {}", path.display()),
            Err(e) => {
                eprintln!("Error writing predictions to {}: {}", path.display(), e);
                std::process::exit(1);
            }
        }
    }
}

/// Accuracy of the full feature set (and the pruned set, if configured)
/// under each metric.
fn print_baselines(run: &RunConfig, context: &SearchContext) {
    let all = Chromosome::all_active(context.feature_count());
    let mut masks = vec![("All features", all.clone())];
    if let Some(prune) = &run.prune {
        let dropped = context
            .train
            .features()
            .low_signal_columns(prune.threshold, prune.columns);
        println!(
            "Pruned columns (fewest values < {}): {:?}",
            prune.threshold, dropped
        );
        masks.push(("Pruned", all.with_inactive(&dropped)));
    }

    for (name, mask) in masks {
        match baseline_report(context, &mask) {
            Ok(scores) => {
                for score in scores {
                    println!("{} {:?}: {:.2}%", name, score.metric, score.accuracy);
                }
            }
            Err(e) => println!("{}: baseline unavailable ({})", name, e),
        }
    }
    println!();
}

/// Parse the optional seed argument.
fn parse_seed(arg: &str) -> Result<u64, String> {
    arg.parse()
        .map_err(|_| format!("Invalid seed {:?}: expected an unsigned integer", arg))
}

fn print_example_config() {
    let run = RunConfig::default();

    println!("Example run configuration (run.json):");
    match serde_json::to_string_pretty(&run) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing example: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seed() {
        assert_eq!(parse_seed("42"), Ok(42));
        assert!(parse_seed("12x").is_err());
        assert!(parse_seed("-1").is_err());
    }
}
