//! Multi-start hill-climbing over node mappings.
//!
//! Each round starts from an initial mapping and repeatedly applies the move or
//! swap with the largest positive gain. The match count grows strictly with every
//! step and is bounded by the number of triples, so every round terminates.

use crate::candidate_pool::CandidatePool;
use crate::evaluator::MatchEvaluator;
use crate::graph::Graph;
use crate::mapping::{random_init, smart_init, Alignment, Mapping};
use log::{debug, error, log_enabled, trace, Level};
use rand::Rng;

/// A single local-search step.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Step {
    /// Remap `node` to the currently unmatched `target`.
    Move { node: usize, target: usize },

    /// Exchange the targets of `i` and `j`.
    Swap { i: usize, j: usize },
}

impl Step {
    pub fn apply(self, mapping: &mut Mapping) {
        match self {
            Step::Move { node, target } => mapping.set(node, Some(target)),
            Step::Swap { i, j } => mapping.swap(i, j),
        }
    }
}

/// The best mapping found for a graph pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BestMatch {
    pub mapping: Mapping,
    pub num_matches: u32,
}

/// Local search over the candidate pool of one graph pair.
#[derive(Debug)]
pub struct HillClimbing<'p> {
    pool: &'p CandidatePool,
    evaluator: MatchEvaluator<'p>,
    num_steps: usize,
}

impl<'p> HillClimbing<'p> {
    pub fn new(pool: &'p CandidatePool) -> HillClimbing<'p> {
        HillClimbing {
            pool,
            evaluator: MatchEvaluator::new(pool.weights()),
            num_steps: 0,
        }
    }

    /// Total number of steps applied over all rounds.
    pub fn num_steps(&self) -> usize {
        self.num_steps
    }

    pub fn evaluator(&mut self) -> &mut MatchEvaluator<'p> {
        &mut self.evaluator
    }

    /// Climbs from `mapping` to a local optimum. Returns it with its match count.
    pub fn climb(&mut self, mut mapping: Mapping) -> (Mapping, u32) {
        let mut match_num = self.evaluator.compute_match(&mapping);
        trace!("start mapping {:?} with {} matches", mapping, match_num);

        while let Some((step, gain)) = self.best_step(&mapping, match_num) {
            step.apply(&mut mapping);
            match_num = (match_num as i64 + gain) as u32;
            self.num_steps += 1;
            trace!("{:?} gained {}, now {} matches", step, gain, match_num);
        }
        (mapping, match_num)
    }

    /// The move or swap with the largest positive gain, if any. Ties go to the
    /// first found: moves before swaps, lower node indices first.
    pub fn best_step(&mut self, mapping: &Mapping, match_num: u32) -> Option<(Step, i64)> {
        let pool = self.pool;
        let mut unmatched = vec![true; pool.num_nodes_b()];
        for target in mapping.iter().flatten() {
            unmatched[target] = false;
        }

        let mut best: Option<(Step, i64)> = None;
        let mut largest_gain = 0;

        for node in 0..mapping.len() {
            for &target in pool.candidates(node) {
                if !unmatched[target] {
                    continue;
                }
                let gain = self.evaluator.move_gain(mapping, node, Some(target), match_num);
                self.check_gain(mapping, Step::Move { node, target }, match_num, gain);
                if gain > largest_gain {
                    largest_gain = gain;
                    best = Some((Step::Move { node, target }, gain));
                }
            }
        }

        for i in 0..mapping.len() {
            for j in i + 1..mapping.len() {
                if mapping.get(i).is_none() && mapping.get(j).is_none() {
                    continue;
                }
                let gain = self.evaluator.swap_gain(mapping, i, j, match_num);
                self.check_gain(mapping, Step::Swap { i, j }, match_num, gain);
                if gain > largest_gain {
                    largest_gain = gain;
                    best = Some((Step::Swap { i, j }, gain));
                }
            }
        }

        best
    }

    fn check_gain(&self, mapping: &Mapping, step: Step, match_num: u32, gain: i64) {
        if !log_enabled!(Level::Trace) {
            return;
        }
        let mut next = mapping.clone();
        step.apply(&mut next);
        let full = self.evaluator.compute_match_uncached(&next) as i64;
        if full != match_num as i64 + gain {
            error!(
                "inconsistent gain {} of {:?} from {} matches: {:?} has {} matches",
                gain, step, match_num, next, full
            );
        }
    }
}

/// Runs `restarts + 1` hill-climbing rounds on the pair (`a`, `b`) and returns the
/// best mapping seen. The first round starts from the smart initialization, the
/// others from random ones drawn from `rng`.
pub fn best_match<R: Rng + ?Sized>(
    a: &Graph,
    b: &Graph,
    pool: &CandidatePool,
    restarts: usize,
    rng: &mut R,
) -> BestMatch {
    let mut climbing = HillClimbing::new(pool);
    let mut best = BestMatch {
        mapping: Mapping::unmapped(a.num_nodes()),
        num_matches: 0,
    };

    for round in 0..=restarts {
        let start = if round == 0 {
            smart_init(pool, a, b, rng)
        } else {
            random_init(pool, rng)
        };
        let (mapping, match_num) = climbing.climb(start);
        trace!("round {} ended with {} matches", round, match_num);
        if match_num > best.num_matches {
            best = BestMatch {
                mapping,
                num_matches: match_num,
            };
        }
    }

    if log_enabled!(Level::Debug) {
        debug!("best match number {}", best.num_matches);
        debug!(
            "best node mapping alignment: {}",
            Alignment {
                mapping: &best.mapping,
                a,
                b
            }
        );
    }
    best
}
