//! Parallel all-pairs scoring of a corpus.

use dashmap::DashSet;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Instant;
use tracing::{info, warn};

use super::loader::Corpus;
use super::matrix::SimilarityMatrix;
use crate::document::InstanceDocument;
use crate::error::SimilarityError;
use crate::similarity::{SimilarityEngine, SimilarityScores, Weights};

/// Matrices produced by one corpus run.
#[derive(Debug)]
pub struct CorpusResult {
    /// Structural scores.
    pub structural: SimilarityMatrix,
    /// Semantic scores, normalized to `[0, 1]`.
    pub semantic: SimilarityMatrix,
    /// Weighted combination.
    pub combined: SimilarityMatrix,
    /// Ordered id pairs that were scored, in both directions.
    pub compared: DashSet<(String, String)>,
    /// Id pairs whose comparison failed; their cells are left at 0.
    pub failed: Vec<(String, String)>,
}

/// Scores of every pair computed by one batch.
struct Batch {
    scores: Vec<((usize, usize), SimilarityScores)>,
    compared: DashSet<(String, String)>,
    failed: Vec<(String, String)>,
}

/// Runs a [`SimilarityEngine`] over every unordered pair of a corpus.
pub struct CorpusScheduler {
    engine: SimilarityEngine,
    threads: Option<usize>,
}

impl CorpusScheduler {
    pub fn new(engine: SimilarityEngine) -> Self {
        Self {
            engine,
            threads: None,
        }
    }

    /// Fix the worker count instead of using every available core.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads.max(1));
        self
    }

    pub fn engine(&self) -> &SimilarityEngine {
        &self.engine
    }

    /// Worker count of the pool this scheduler builds.
    pub fn threads(&self) -> usize {
        self.threads.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }

    /// Score all pairs under `weights`.
    pub fn run(&self, corpus: &Corpus, weights: Weights) -> Result<CorpusResult, SimilarityError> {
        self.run_with_progress(corpus, weights, &|| {})
    }

    /// Like [`run`](Self::run), calling `on_pair` once per finished pair.
    pub fn run_with_progress(
        &self,
        corpus: &Corpus,
        weights: Weights,
        on_pair: &(dyn Fn() + Sync),
    ) -> Result<CorpusResult, SimilarityError> {
        let started = Instant::now();
        let batch = self.score_pairs(corpus, weights, on_pair)?;

        let labels = corpus.ids();
        let mut structural = SimilarityMatrix::new(labels.clone());
        let mut semantic = SimilarityMatrix::new(labels.clone());
        let mut combined = SimilarityMatrix::new(labels);

        for ((i, j), scores) in &batch.scores {
            structural.set_pair(*i, *j, scores.structural);
            semantic.set_pair(*i, *j, scores.semantic_normalized());
            combined.set_pair(*i, *j, scores.combined);
        }

        info!(
            models = corpus.len(),
            pairs = batch.scores.len(),
            failed = batch.failed.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "corpus comparison finished"
        );

        Ok(CorpusResult {
            structural,
            semantic,
            combined,
            compared: batch.compared,
            failed: batch.failed,
        })
    }

    /// Combined matrices for every split of [`Weights::sweep`].
    pub fn sweep(&self, corpus: &Corpus) -> Result<Vec<(Weights, SimilarityMatrix)>, SimilarityError> {
        self.sweep_with_progress(corpus, &|| {})
    }

    /// Like [`sweep`](Self::sweep), calling `on_pair` once per finished pair.
    ///
    /// Component scores do not depend on the weights, so pairs are scored once
    /// and recombined for each split.
    pub fn sweep_with_progress(
        &self,
        corpus: &Corpus,
        on_pair: &(dyn Fn() + Sync),
    ) -> Result<Vec<(Weights, SimilarityMatrix)>, SimilarityError> {
        let batch = self.score_pairs(corpus, Weights::default(), on_pair)?;

        let matrices = Weights::sweep()
            .into_iter()
            .map(|weights| {
                info!(
                    structural = weights.structural,
                    semantic = weights.semantic,
                    "calculating similarities"
                );
                let mut combined = SimilarityMatrix::new(corpus.ids());
                for ((i, j), scores) in &batch.scores {
                    combined.set_pair(*i, *j, scores.reweighted(weights).combined);
                }
                (weights, combined)
            })
            .collect();

        Ok(matrices)
    }

    fn score_pairs(
        &self,
        corpus: &Corpus,
        weights: Weights,
        on_pair: &(dyn Fn() + Sync),
    ) -> Result<Batch, SimilarityError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(self.threads())
            .thread_name(|i| format!("archsim-worker-{}", i))
            .build()
            .map_err(|e| SimilarityError::Config(format!("failed to start worker pool: {}", e)))?;

        let sources = corpus.sources();
        let pairs: Vec<(usize, usize)> = (0..sources.len())
            .flat_map(|i| (i..sources.len()).map(move |j| (i, j)))
            .collect();
        let compared: DashSet<(String, String)> = DashSet::new();

        let outcomes: Vec<((usize, usize), Result<SimilarityScores, String>)> =
            pool.install(|| {
                let documents: Vec<Result<InstanceDocument, String>> = sources
                    .par_iter()
                    .map(|source| source.document().map_err(|e| e.to_string()))
                    .collect();

                pairs
                    .par_iter()
                    .filter_map(|&(i, j)| {
                        let (id1, id2) = (&sources[i].id, &sources[j].id);

                        let key = (id1.clone(), id2.clone());
                        let reversed = (id2.clone(), id1.clone());
                        if compared.contains(&reversed) || !compared.insert(key) {
                            info!(model1 = %id1, model2 = %id2, "comparison already done");
                            return None;
                        }
                        compared.insert(reversed);

                        info!(model1 = %id1, model2 = %id2, "comparing");
                        let outcome = match (&documents[i], &documents[j]) {
                            (Ok(doc1), Ok(doc2)) => catch_unwind(AssertUnwindSafe(|| {
                                self.engine.score(doc1, doc2, id1, id2, weights)
                            }))
                            .map_err(panic_message)
                            .and_then(|scored| scored.map_err(|e| e.to_string())),
                            (Err(e), _) | (_, Err(e)) => Err(e.clone()),
                        };
                        on_pair();
                        Some(((i, j), outcome))
                    })
                    .collect()
            });

        let mut scores = Vec::with_capacity(outcomes.len());
        let mut failed = Vec::new();
        for ((i, j), outcome) in outcomes {
            match outcome {
                Ok(s) => scores.push(((i, j), s)),
                Err(e) => {
                    let (id1, id2) = (&sources[i].id, &sources[j].id);
                    warn!(model1 = %id1, model2 = %id2, error = %e, "comparison failed, cells left at 0");
                    failed.push((id1.clone(), id2.clone()));
                }
            }
        }

        Ok(Batch {
            scores,
            compared,
            failed,
        })
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    let message = if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    };
    format!("comparison panicked: {}", message)
}
