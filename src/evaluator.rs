//! Triple match counts of node mappings, with memoization and incremental gains.

use crate::candidate_pool::{NodePair, WeightTable};
use crate::mapping::Mapping;
use fnv::FnvHashMap;

/// Evaluates mappings against the weight table of one graph pair.
///
/// Every count computed, by full evaluation or by a gain, is memoized by mapping.
/// The cache lives as long as the evaluator, i.e. one graph pair.
#[derive(Debug)]
pub struct MatchEvaluator<'w> {
    weights: &'w WeightTable,
    cache: FnvHashMap<Mapping, u32>,
}

impl<'w> MatchEvaluator<'w> {
    pub fn new(weights: &'w WeightTable) -> MatchEvaluator<'w> {
        MatchEvaluator {
            weights,
            cache: FnvHashMap::default(),
        }
    }

    /// Number of memoized mappings.
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }

    /// Total number of matched triples under `mapping`.
    pub fn compute_match(&mut self, mapping: &Mapping) -> u32 {
        if let Some(&num) = self.cache.get(mapping) {
            return num;
        }
        let num = self.compute_match_uncached(mapping);
        self.cache.insert(mapping.clone(), num);
        num
    }

    /// Full evaluation of `mapping`, bypassing the cache.
    pub fn compute_match_uncached(&self, mapping: &Mapping) -> u32 {
        let mut num = 0;
        for (i, target) in mapping.iter().enumerate() {
            let m = match target {
                Some(m) => m,
                None => continue,
            };
            if let Some(w) = self.weights.get(NodePair::new(i, m)) {
                num += w.self_match();
                // joint weights are stored under both pairs; count from the lower node
                for (other, weight) in w.joint() {
                    if other.a >= i && mapping.get(other.a) == Some(other.b) {
                        num += weight;
                    }
                }
            }
        }
        num
    }

    /// Change in match count when `node` is remapped to `new_target`.
    ///
    /// `match_num` must be the match count of `mapping`.
    pub fn move_gain(
        &mut self,
        mapping: &Mapping,
        node: usize,
        new_target: Option<usize>,
        match_num: u32,
    ) -> i64 {
        let old_target = mapping.get(node);
        let moved = mapping.with_move(node, new_target);
        if let Some(&num) = self.cache.get(&moved) {
            return num as i64 - match_num as i64;
        }

        let gain = self.contribution(node, new_target, &moved, None)
            - self.contribution(node, old_target, mapping, None);

        self.cache.insert(moved, (match_num as i64 + gain) as u32);
        gain
    }

    /// Change in match count when the targets of `i` and `j` are exchanged.
    ///
    /// `match_num` must be the match count of `mapping`.
    pub fn swap_gain(&mut self, mapping: &Mapping, i: usize, j: usize, match_num: u32) -> i64 {
        let (i, j) = if i > j { (j, i) } else { (i, j) };
        let swapped = mapping.with_swap(i, j);
        if let Some(&num) = self.cache.get(&swapped) {
            return num as i64 - match_num as i64;
        }

        let (target_i, target_j) = (mapping.get(i), mapping.get(j));
        // terms joining i and j are counted with i only
        let gain = self.contribution(i, target_j, &swapped, None)
            + self.contribution(j, target_i, &swapped, Some(i))
            - self.contribution(i, target_i, mapping, None)
            - self.contribution(j, target_j, mapping, Some(i));

        self.cache.insert(swapped, (match_num as i64 + gain) as u32);
        gain
    }

    /// Matches contributed by `node -> target` under `mapping`, ignoring joint
    /// terms with `skip`.
    fn contribution(
        &self,
        node: usize,
        target: Option<usize>,
        mapping: &Mapping,
        skip: Option<usize>,
    ) -> i64 {
        let w = match target.and_then(|t| self.weights.get(NodePair::new(node, t))) {
            Some(w) => w,
            None => return 0,
        };
        let mut sum = w.self_match() as i64;
        for (other, weight) in w.joint() {
            if Some(other.a) == skip {
                continue;
            }
            if mapping.get(other.a) == Some(other.b) {
                sum += weight as i64;
            }
        }
        sum
    }
}
