//! Scoring of graph pairs and accumulation over a corpus.

use crate::candidate_pool::CandidatePool;
use crate::config::{SmatchConfig, TripleSelection};
use crate::error::SmatchError;
use crate::graph::Graph;
use crate::graph_traits::GraphSource;
use crate::hill_climbing::best_match;
use crate::mapping::Mapping;
use crate::score::{compute_f, RunningTotals, Scores};
use log::{debug, error, info, log_enabled, warn, Level};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;

/// Node id prefix of the test (produced) graph.
pub const TEST_PREFIX: &str = "a";

/// Node id prefix of the gold (reference) graph.
pub const GOLD_PREFIX: &str = "b";

/// Result of matching one graph pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairMatch {
    /// Best mapping from test nodes to gold nodes.
    pub mapping: Mapping,
    pub num_matches: u32,
    pub num_test: usize,
    pub num_gold: usize,
}

impl PairMatch {
    pub fn scores(&self) -> Scores {
        compute_f(self.num_matches as u64, self.num_test as u64, self.num_gold as u64)
    }
}

/// Triples of `g` counted towards the totals under `selection`.
pub fn count_triples(g: &Graph, selection: TripleSelection) -> usize {
    match selection {
        TripleSelection::All => g.num_triples(),
        TripleSelection::JustInstance => g.instances().len(),
        TripleSelection::JustAttribute => g.attributes().len(),
        TripleSelection::JustRelation => g.relations().len(),
    }
}

/// Corpus-level result.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Report {
    pub totals: RunningTotals,
    pub scores: Scores,
    pub significant: usize,
    pub precision_recall: bool,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "{} {} {}",
            self.totals.num_matches, self.totals.num_test, self.totals.num_gold
        )?;
        write!(
            f,
            "{}",
            self.scores
                .format("Document F-score", self.significant, self.precision_recall)
        )
    }
}

/// Accumulates Smatch scores over a stream of (test, gold) graph pairs.
///
/// Per-pair state (candidate pool, weight table, match cache) is created for every
/// pair and dropped afterwards; only the running totals outlive a pair. Scorers
/// are not shared between threads: use one per worker and merge their
/// [`RunningTotals`].
#[derive(Debug)]
pub struct Smatch<R: Rng = StdRng> {
    config: SmatchConfig,
    totals: RunningTotals,
    num_pairs: usize,
    rng: R,
}

impl Smatch<StdRng> {
    /// A scorer drawing restarts from a freshly seeded random source.
    pub fn new(config: SmatchConfig) -> Smatch<StdRng> {
        Smatch::with_rng(config, StdRng::from_entropy())
    }

    /// A scorer with reproducible restarts.
    pub fn seeded(config: SmatchConfig, seed: u64) -> Smatch<StdRng> {
        Smatch::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Smatch<R> {
    pub fn with_rng(config: SmatchConfig, rng: R) -> Smatch<R> {
        Smatch {
            config,
            totals: RunningTotals::new(),
            num_pairs: 0,
            rng,
        }
    }

    pub fn config(&self) -> &SmatchConfig {
        &self.config
    }

    pub fn totals(&self) -> RunningTotals {
        self.totals
    }

    /// Number of pairs processed since the last reset.
    pub fn num_pairs(&self) -> usize {
        self.num_pairs
    }

    /// Finds the best mapping for one pair without touching the running totals.
    pub fn match_pair(&mut self, test: &Graph, gold: &Graph) -> PairMatch {
        let selection = self.config.selection;
        if log_enabled!(Level::Debug) {
            let (inst1, attr1, rel1) = test.triples();
            let (inst2, attr2, rel2) = gold.triples();
            debug!("graph pair {}", self.num_pairs + 1);
            debug!("instance triples of graph 1: {} {:?}", inst1.len(), inst1);
            debug!("attribute triples of graph 1: {} {:?}", attr1.len(), attr1);
            debug!("relation triples of graph 1: {} {:?}", rel1.len(), rel1);
            debug!("instance triples of graph 2: {} {:?}", inst2.len(), inst2);
            debug!("attribute triples of graph 2: {} {:?}", attr2.len(), attr2);
            debug!("relation triples of graph 2: {} {:?}", rel2.len(), rel2);
        }

        let pool = CandidatePool::build(test, gold, selection.kinds());
        let best = best_match(test, gold, &pool, self.config.restarts, &mut self.rng);

        PairMatch {
            mapping: best.mapping,
            num_matches: best.num_matches,
            num_test: count_triples(test, selection),
            num_gold: count_triples(gold, selection),
        }
    }

    /// Matches one pair and adds it to the running totals. Unless scoring at
    /// document level, the pair's score is logged at info level.
    pub fn process_pair(&mut self, test: &Graph, gold: &Graph) -> PairMatch {
        let pair = self.match_pair(test, gold);
        self.num_pairs += 1;

        if !self.config.document_level {
            info!(
                "{}",
                pair.scores()
                    .format("F-score", self.config.significant, self.config.precision_recall)
            );
        }

        self.totals
            .add(pair.num_matches as u64, pair.num_test as u64, pair.num_gold as u64);
        pair
    }

    /// Processes two parallel sequences of graph sources.
    ///
    /// Sources that fail to produce a graph are replaced by
    /// [`Graph::placeholder`]. Sequences of different length are rejected before
    /// any pair is processed.
    pub fn process_batch<T: GraphSource, G: GraphSource>(
        &mut self,
        tests: &[T],
        golds: &[G],
    ) -> Result<Vec<PairMatch>, SmatchError> {
        if tests.len() != golds.len() {
            error!(
                "{} test graphs but {} gold graphs",
                tests.len(),
                golds.len()
            );
            return Err(SmatchError::BatchLengthMismatch {
                tests: tests.len(),
                golds: golds.len(),
            });
        }

        let mut pairs = Vec::with_capacity(tests.len());
        for (test, gold) in tests.iter().zip(golds) {
            let test = self.load(test, TEST_PREFIX);
            let gold = self.load(gold, GOLD_PREFIX);
            pairs.push(self.process_pair(&test, &gold));
        }
        Ok(pairs)
    }

    fn load<S: GraphSource>(&self, source: &S, prefix: &str) -> Graph {
        source.to_graph(prefix).unwrap_or_else(|e| {
            warn!(
                "graph pair {}: {}, scoring placeholder graph instead",
                self.num_pairs + 1,
                e
            );
            Graph::placeholder(prefix)
        })
    }

    /// Scores over all pairs processed so far.
    pub fn metrics(&self) -> Scores {
        self.totals.scores()
    }

    pub fn report(&self) -> Report {
        debug!(
            "total match number, total triple number in graph 1, and total triple number in graph 2: {} {} {}",
            self.totals.num_matches, self.totals.num_test, self.totals.num_gold
        );
        Report {
            totals: self.totals,
            scores: self.metrics(),
            significant: self.config.significant,
            precision_recall: self.config.precision_recall,
        }
    }

    /// Clears the running totals and the pair counter.
    pub fn reset(&mut self) {
        self.totals.reset();
        self.num_pairs = 0;
    }
}
