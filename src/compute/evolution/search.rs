//! Generational search for the feature mask with the best 1-NN accuracy.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use log::{debug, info, trace, warn};
use rayon::prelude::*;

use crate::compute::ComputeError;
use crate::schema::{
    Chromosome, ConfigError, FitnessRecord, GenerationRecord, Population, SearchConfig,
    SearchContext, SearchPhase, SearchProgress, SearchResult, SearchStats, StopReason,
};

use super::chromosome::ChromosomeRng;
use super::fitness::FitnessEvaluator;

/// Errors surfaced by the search entry point.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("Invalid search configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Compute(#[from] ComputeError),
    #[error("Dataset has no feature columns to select from")]
    NoFeatures,
}

/// Genetic search over feature-selection chromosomes.
///
/// Each generation is evaluated, the better half kept, and the population
/// refilled by crossover and mutation of the survivors. The run ends when
/// the best accuracy reaches the configured threshold, when the generation
/// ceiling is hit, or when the cancel handle is set.
pub struct GeneticSearch {
    config: SearchConfig,
    context: Arc<SearchContext>,
    rng: ChromosomeRng,
    evaluator: FitnessEvaluator,
    population: Population,
    generation: usize,
    best: Option<FitnessRecord>,
    trace: Vec<GenerationRecord>,
    cancelled: Arc<AtomicBool>,
}

impl GeneticSearch {
    /// Create a search over `context` after validating `config`.
    pub fn new(config: SearchConfig, context: Arc<SearchContext>) -> Result<Self, SearchError> {
        config.validate()?;
        if context.feature_count() == 0 {
            return Err(SearchError::NoFeatures);
        }

        let seed = config.random_seed.unwrap_or_else(rand::random);
        let rng = ChromosomeRng::new(seed);
        let evaluator = FitnessEvaluator::new(config.distance_metric);

        Ok(Self {
            config,
            context,
            rng,
            evaluator,
            population: Vec::new(),
            generation: 0,
            best: None,
            trace: Vec::new(),
            cancelled: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Replace the random source.
    pub fn with_rng(mut self, rng: ChromosomeRng) -> Self {
        self.rng = rng;
        self
    }

    /// Get cancellation handle.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    pub fn population(&self) -> &[Chromosome] {
        &self.population
    }

    /// Generations evaluated so far.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Initialize the population.
    pub fn initialize(&mut self) {
        self.generation = 0;
        self.best = None;
        self.trace.clear();
        self.population = self
            .rng
            .random_population(self.config.population_size, self.context.feature_count());
    }

    /// Score every chromosome, keeping population order.
    ///
    /// Chromosomes with no active feature score 0. Returns the records and
    /// the number of such chromosomes.
    fn evaluate_population(&self) -> Result<(Vec<FitnessRecord>, usize), ComputeError> {
        let evaluator = &self.evaluator;
        let context = self.context.as_ref();
        let score = |c: &Chromosome| evaluator.try_score(c, context);

        let scores: Vec<Option<f64>> = if self.config.parallel {
            self.population.par_iter().map(score).collect::<Result<_, _>>()?
        } else {
            self.population.iter().map(score).collect::<Result<_, _>>()?
        };

        let mut skipped = 0;
        let records = self
            .population
            .iter()
            .zip(scores)
            .map(|(chromosome, score)| {
                let accuracy = score.unwrap_or_else(|| {
                    trace!("Skipping chromosome {} with no active features", chromosome);
                    skipped += 1;
                    0.0
                });
                FitnessRecord {
                    chromosome: chromosome.clone(),
                    accuracy,
                }
            })
            .collect();

        Ok((records, skipped))
    }

    /// Append the generation summary to the trace and update the best record.
    fn record_generation(&mut self, records: &[FitnessRecord], skipped: usize) -> GenerationRecord {
        let generation_best = records
            .iter()
            .fold(None::<&FitnessRecord>, |best, r| match best {
                Some(b) if b.accuracy >= r.accuracy => Some(b),
                _ => Some(r),
            });

        if let Some(candidate) = generation_best
            && self
                .best
                .as_ref()
                .is_none_or(|b| candidate.accuracy > b.accuracy)
        {
            self.best = Some(candidate.clone());
        }

        let mean_accuracy = if records.is_empty() {
            0.0
        } else {
            records.iter().map(|r| r.accuracy).sum::<f64>() / records.len() as f64
        };

        let summary = GenerationRecord {
            generation: self.generation,
            best_accuracy: generation_best.map_or(0.0, |r| r.accuracy),
            mean_accuracy,
            skipped,
            diversity: self.compute_diversity(),
        };
        self.trace.push(summary.clone());
        summary
    }

    /// Mean pairwise Hamming distance of the current population.
    fn compute_diversity(&self) -> f64 {
        let n = self.population.len();
        if n < 2 {
            return 0.0;
        }

        let mut total = 0usize;
        for i in 0..n {
            for j in (i + 1)..n {
                total += self.population[i].hamming_distance(&self.population[j]);
            }
        }
        total as f64 / (n * (n - 1) / 2) as f64
    }

    /// Rank by accuracy (descending, stable) and keep the better half.
    pub fn select(&self, mut records: Vec<FitnessRecord>) -> Vec<Chromosome> {
        records.sort_by(|a, b| b.accuracy.total_cmp(&a.accuracy));
        records
            .into_iter()
            .take(self.config.survivor_count())
            .map(|r| r.chromosome)
            .collect()
    }

    /// Build the next generation from ranked survivors.
    ///
    /// The top survivor passes through unchanged. The others are paired in
    /// rank order and replaced by their mutated offspring; an unpaired
    /// survivor is crossed with the top one. Fresh offspring of random
    /// survivor pairs then top the population back up to its configured size.
    pub fn breed(&mut self, survivors: &[Chromosome]) -> Population {
        let size = self.config.population_size;
        let rate = self.config.mutation_rate;

        let Some((elite, rest)) = survivors.split_first() else {
            return self
                .rng
                .random_population(size, self.context.feature_count());
        };

        let mut next = Vec::with_capacity(size + 1);
        next.push(elite.clone());

        for pair in rest.chunks(2) {
            match pair {
                [a, b] => {
                    let (x, y) = self.rng.crossover(a, b);
                    next.push(self.rng.mutate(&x, rate));
                    next.push(self.rng.mutate(&y, rate));
                }
                [a] => {
                    let (x, _) = self.rng.crossover(a, elite);
                    next.push(self.rng.mutate(&x, rate));
                }
                _ => {}
            }
        }

        while next.len() < size {
            let a = &survivors[self.rng.index(survivors.len())];
            let b = &survivors[self.rng.index(survivors.len())];
            let (x, y) = self.rng.crossover(a, b);
            next.push(self.rng.mutate(&x, rate));
            next.push(self.rng.mutate(&y, rate));
        }

        next.truncate(size);
        next
    }

    /// Check if the search should stop after the latest evaluation.
    fn should_stop(&self, generation_best: f64) -> Option<StopReason> {
        if generation_best >= self.config.accuracy_threshold {
            return Some(StopReason::ThresholdMet);
        }

        if self.cancelled.load(Ordering::Relaxed) {
            return Some(StopReason::Cancelled);
        }

        if self.generation >= self.config.max_generations {
            return Some(StopReason::ThresholdNotReached);
        }

        None
    }

    /// Get current progress.
    pub fn progress(&self, phase: SearchPhase) -> SearchProgress {
        let (generation_best, mean_accuracy) = self
            .trace
            .last()
            .map_or((0.0, 0.0), |r| (r.best_accuracy, r.mean_accuracy));

        SearchProgress {
            generation: self.generation,
            max_generations: self.config.max_generations,
            best_accuracy: self.best.as_ref().map_or(0.0, |b| b.accuracy),
            generation_best,
            mean_accuracy,
            best: self.best.clone(),
            phase,
        }
    }

    /// Run the search with progress callback.
    pub fn run_with_callback<F>(&mut self, mut callback: F) -> Result<SearchResult, SearchError>
    where
        F: FnMut(&SearchProgress),
    {
        let start_time = Instant::now();
        info!(
            "Starting feature search: {} chromosomes x {} features, {:?} metric, threshold {:.2}%",
            self.config.population_size,
            self.context.feature_count(),
            self.config.distance_metric,
            self.config.accuracy_threshold
        );

        self.initialize();
        callback(&self.progress(SearchPhase::Initializing));

        let stop_reason = loop {
            let (records, skipped) = self.evaluate_population()?;
            let summary = self.record_generation(&records, skipped);
            self.generation += 1;

            debug!(
                "Generation {}: best {:.2}%, mean {:.2}%, diversity {:.2}, skipped {}",
                summary.generation,
                summary.best_accuracy,
                summary.mean_accuracy,
                summary.diversity,
                skipped
            );

            if let Some(reason) = self.should_stop(summary.best_accuracy) {
                let phase = if reason == StopReason::Cancelled {
                    SearchPhase::Stopped
                } else {
                    SearchPhase::Complete
                };
                callback(&self.progress(phase));
                break reason;
            }
            callback(&self.progress(SearchPhase::Evaluating));

            let survivors = self.select(records);
            self.population = self.breed(&survivors);
        };

        let best = self
            .best
            .clone()
            .ok_or(ComputeError::EmptyInput("no generation was evaluated"))?;
        let elapsed = start_time.elapsed().as_secs_f64();

        match stop_reason {
            StopReason::ThresholdNotReached => warn!(
                "Threshold {:.2}% not reached after {} generations; best {:.2}% ({})",
                self.config.accuracy_threshold, self.generation, best.accuracy, best.chromosome
            ),
            _ => info!(
                "Search stopped ({:?}) after {} generations: best {:.2}% ({})",
                stop_reason, self.generation, best.accuracy, best.chromosome
            ),
        }

        Ok(SearchResult {
            best,
            stats: SearchStats {
                generations: self.generation,
                total_evaluations: self.generation as u64 * self.config.population_size as u64,
                metric: self.config.distance_metric,
                elapsed_seconds: elapsed,
                stop_reason,
            },
            trace: self.trace.clone(),
        })
    }

    /// Run the search (blocking).
    pub fn run(&mut self) -> Result<SearchResult, SearchError> {
        self.run_with_callback(|_| {})
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Dataset, DistanceMetric, FeatureMatrix};

    fn matrix(rows: &[&[f32]]) -> FeatureMatrix {
        FeatureMatrix::from_rows(rows.iter().map(|r| r.to_vec()).collect()).unwrap()
    }

    fn context(
        train: &[&[f32]],
        train_labels: Vec<u8>,
        test: &[&[f32]],
        test_labels: Vec<u8>,
    ) -> Arc<SearchContext> {
        let train = Dataset::new(matrix(train), train_labels).unwrap();
        let test = Dataset::new(matrix(test), test_labels).unwrap();
        Arc::new(SearchContext::new(train, test).unwrap())
    }

    /// Column 0 separates the classes; columns 1-3 are misleading noise.
    fn informative_context() -> Arc<SearchContext> {
        context(
            &[
                &[0.0, 9.0, 1.0, 7.0],
                &[0.5, 1.0, 8.0, 2.0],
                &[10.0, 8.0, 2.0, 6.0],
                &[9.5, 2.0, 9.0, 1.0],
            ],
            vec![0, 0, 1, 1],
            &[
                &[0.2, 2.0, 9.0, 1.0],
                &[9.8, 9.0, 1.0, 7.0],
                &[0.1, 8.0, 2.0, 6.0],
                &[9.9, 1.0, 8.0, 2.0],
            ],
            vec![0, 1, 0, 1],
        )
    }

    /// Identical test rows with different labels cap accuracy at 50%.
    fn capped_context() -> Arc<SearchContext> {
        context(
            &[&[0.0, 0.0], &[1.0, 1.0]],
            vec![0, 1],
            &[&[0.0, 0.0], &[0.0, 0.0]],
            vec![0, 1],
        )
    }

    fn config(size: usize, max_generations: usize) -> SearchConfig {
        SearchConfig {
            population_size: size,
            max_generations,
            mutation_rate: 0.2,
            random_seed: Some(42),
            ..Default::default()
        }
    }

    #[test]
    fn test_search_creation() {
        let mut search = GeneticSearch::new(config(10, 5), informative_context()).unwrap();
        search.initialize();

        assert_eq!(search.population().len(), 10);
        assert!(search.population().iter().all(|c| c.len() == 4));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let bad = SearchConfig {
            mutation_rate: 2.0,
            ..Default::default()
        };
        assert!(matches!(
            GeneticSearch::new(bad, informative_context()),
            Err(SearchError::Config(ConfigError::InvalidMutationRate(_)))
        ));
    }

    #[test]
    fn test_no_features_rejected() {
        let train = Dataset::new(FeatureMatrix::from_flat(Vec::new(), 1, 0).unwrap(), vec![0]);
        let test = Dataset::new(FeatureMatrix::from_flat(Vec::new(), 1, 0).unwrap(), vec![0]);
        let ctx = Arc::new(SearchContext::new(train.unwrap(), test.unwrap()).unwrap());
        assert!(matches!(
            GeneticSearch::new(SearchConfig::default(), ctx),
            Err(SearchError::NoFeatures)
        ));
    }

    #[test]
    fn test_unreachable_threshold_terminates() {
        let cfg = SearchConfig {
            accuracy_threshold: 100.0,
            ..config(6, 7)
        };
        let mut search = GeneticSearch::new(cfg, capped_context()).unwrap();
        let result = search.run().unwrap();

        assert_eq!(result.stats.stop_reason, StopReason::ThresholdNotReached);
        assert!(!result.threshold_met());
        assert_eq!(result.stats.generations, 7);
        assert_eq!(result.trace.len(), 7);
        assert!(result.best.accuracy <= 50.0);
    }

    #[test]
    fn test_threshold_met() {
        let cfg = SearchConfig {
            accuracy_threshold: 100.0,
            mutation_rate: 0.3,
            ..config(12, 200)
        };
        let mut search = GeneticSearch::new(cfg, informative_context()).unwrap();
        let result = search.run().unwrap();

        assert_eq!(result.stats.stop_reason, StopReason::ThresholdMet);
        assert_eq!(result.best.accuracy, 100.0);
        assert!(result.stats.generations <= 200);
        assert_eq!(
            result.trace.last().map(|r| r.best_accuracy),
            Some(result.best.accuracy)
        );
    }

    #[test]
    fn test_trace_is_ordered_and_monotone() {
        let cfg = SearchConfig {
            accuracy_threshold: 100.0,
            ..config(8, 10)
        };
        let mut search = GeneticSearch::new(cfg, capped_context()).unwrap();
        let result = search.run().unwrap();

        let trace = result.best_accuracy_trace();
        for (i, (generation, _)) in trace.iter().enumerate() {
            assert_eq!(*generation, i);
        }
        // The top survivor is carried over unchanged, so the best never drops.
        assert!(trace.windows(2).all(|w| w[1].1 >= w[0].1));
    }

    #[test]
    fn test_population_size_restored() {
        for size in 1..=9 {
            let mut search = GeneticSearch::new(config(size, 5), informative_context()).unwrap();
            search.initialize();
            for _ in 0..3 {
                let (records, _) = search.evaluate_population().unwrap();
                let survivors = search.select(records);
                assert_eq!(survivors.len(), size.div_ceil(2));
                search.population = search.breed(&survivors);
                assert_eq!(search.population().len(), size);
            }
        }
    }

    #[test]
    fn test_breed_keeps_elite() {
        let mut search = GeneticSearch::new(config(6, 5), informative_context()).unwrap();
        let survivors: Vec<Chromosome> = ["1000", "0100", "0010"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        let next = search.breed(&survivors);

        assert_eq!(next.len(), 6);
        assert_eq!(next[0], survivors[0]);
    }

    #[test]
    fn test_select_ranks_by_accuracy() {
        let search = GeneticSearch::new(config(4, 5), informative_context()).unwrap();
        let records = [("0001", 25.0), ("1000", 100.0), ("0100", 50.0), ("0010", 50.0)]
            .iter()
            .map(|(c, accuracy)| FitnessRecord {
                chromosome: c.parse().unwrap(),
                accuracy: *accuracy,
            })
            .collect();
        let survivors = search.select(records);

        assert_eq!(survivors.len(), 2);
        assert_eq!(survivors[0].to_string(), "1000");
        assert_eq!(survivors[1].to_string(), "0100");
    }

    #[test]
    fn test_empty_chromosome_scores_zero() {
        let mut search = GeneticSearch::new(config(2, 5), informative_context()).unwrap();
        search.population = vec!["0000".parse().unwrap(), "1000".parse().unwrap()];
        let (records, skipped) = search.evaluate_population().unwrap();

        assert_eq!(skipped, 1);
        assert_eq!(records[0].accuracy, 0.0);
        assert_eq!(records[1].accuracy, 100.0);
        assert_eq!(search.compute_diversity(), 1.0);
    }

    #[test]
    fn test_same_seed_reproduces_run() {
        let cfg = SearchConfig {
            accuracy_threshold: 100.0,
            ..config(8, 6)
        };
        let run = |parallel: bool| {
            let cfg = SearchConfig {
                parallel,
                ..cfg.clone()
            };
            GeneticSearch::new(cfg, capped_context())
                .unwrap()
                .run()
                .unwrap()
        };

        let a = run(true);
        let b = run(true);
        let c = run(false);
        assert_eq!(a.trace, b.trace);
        assert_eq!(a.best, b.best);
        assert_eq!(a.trace, c.trace);
        assert_eq!(a.best, c.best);
    }

    #[test]
    fn test_injected_rng() {
        let cfg = SearchConfig {
            random_seed: None,
            ..config(5, 3)
        };
        let mut a = GeneticSearch::new(cfg.clone(), informative_context())
            .unwrap()
            .with_rng(ChromosomeRng::new(9));
        let mut b = GeneticSearch::new(cfg, informative_context())
            .unwrap()
            .with_rng(ChromosomeRng::new(9));
        a.initialize();
        b.initialize();
        assert_eq!(a.population(), b.population());
    }

    #[test]
    fn test_cancellation() {
        let cfg = SearchConfig {
            accuracy_threshold: 100.0,
            ..config(5, 100)
        };
        let mut search = GeneticSearch::new(cfg, capped_context()).unwrap();
        let cancel = search.cancel_handle();

        // Cancel immediately
        cancel.store(true, Ordering::Relaxed);

        let result = search.run().unwrap();
        assert_eq!(result.stats.stop_reason, StopReason::Cancelled);
        assert_eq!(result.stats.generations, 1);
    }

    #[test]
    fn test_progress_callback() {
        let cfg = SearchConfig {
            accuracy_threshold: 100.0,
            distance_metric: DistanceMetric::Manhattan,
            ..config(4, 3)
        };
        let mut search = GeneticSearch::new(cfg, capped_context()).unwrap();
        let mut phases = Vec::new();
        search
            .run_with_callback(|p| phases.push((p.generation, p.phase)))
            .unwrap();

        assert_eq!(
            phases,
            vec![
                (0, SearchPhase::Initializing),
                (1, SearchPhase::Evaluating),
                (2, SearchPhase::Evaluating),
                (3, SearchPhase::Complete),
            ]
        );
    }
}
