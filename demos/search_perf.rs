//! Quick search performance test

use std::sync::Arc;
use std::time::Instant;

use knn_feature_ga::{Dataset, FeatureMatrix, GeneticSearch, SearchConfig, SearchContext};
use rand::prelude::*;

/// Synthetic data: the first `informative` columns carry the label, the rest are noise.
fn synthetic_context(rows: usize, cols: usize, informative: usize) -> SearchContext {
    let mut rng = StdRng::seed_from_u64(11);
    let mut make = |n: usize| {
        let labels: Vec<u8> = (0..n).map(|_| rng.gen_range(0..=1)).collect();
        let data = labels
            .iter()
            .flat_map(|&label| {
                (0..cols)
                    .map(|c| {
                        let noise = rng.gen_range(0.0..1.0f32);
                        if c < informative {
                            f32::from(label) + 0.3 * noise
                        } else {
                            3.0 * noise
                        }
                    })
                    .collect::<Vec<_>>()
            })
            .collect();
        Dataset::new(FeatureMatrix::from_flat(data, n, cols).unwrap(), labels).unwrap()
    };
    let train = make(rows);
    let test = make(rows / 4);
    SearchContext::new(train, test).unwrap()
}

fn main() {
    println!("=== Feature Search Performance Test ===\n");

    // Test different feature counts
    for cols in [16, 64, 256] {
        println!("Features: {}", cols);

        let context = Arc::new(synthetic_context(400, cols, 3));
        let config = SearchConfig {
            population_size: 20,
            max_generations: 10,
            accuracy_threshold: 100.0,
            random_seed: Some(42),
            ..Default::default()
        };

        let start = Instant::now();
        let mut search = GeneticSearch::new(config, context).unwrap();
        let result = search.run().unwrap();
        let elapsed = start.elapsed();

        let total_evals = result.stats.total_evaluations;
        let evals_per_sec = total_evals as f64 / elapsed.as_secs_f64();

        println!("  Generations:    {}", result.stats.generations);
        println!("  Evaluations:    {}", total_evals);
        println!("  Elapsed:        {:.2}s", elapsed.as_secs_f64());
        println!("  Evals/sec:      {:.1}", evals_per_sec);
        println!("  Best accuracy:  {:.2}%", result.best.accuracy);
        println!();
    }

    println!("=== Parallel vs Sequential (64 features) ===\n");

    let context = Arc::new(synthetic_context(400, 64, 3));
    for parallel in [false, true] {
        let config = SearchConfig {
            population_size: 40,
            max_generations: 5,
            accuracy_threshold: 100.0,
            random_seed: Some(42),
            parallel,
            ..Default::default()
        };

        let start = Instant::now();
        let mut search = GeneticSearch::new(config, Arc::clone(&context)).unwrap();
        let result = search.run().unwrap();
        let elapsed = start.elapsed();

        println!(
            "parallel={}: {} evals in {:.2}s (best {:.2}%)",
            parallel,
            result.stats.total_evaluations,
            elapsed.as_secs_f64(),
            result.best.accuracy
        );
    }
}
