//! Node mappings from graph A to graph B and how the search starts from one.

use crate::candidate_pool::CandidatePool;
use crate::graph::Graph;
use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;

/// A partial injective mapping. Entry `i` is the node of graph B that node `i`
/// of graph A maps to, or `None` if it is unmapped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Mapping(Vec<Option<usize>>);

impl Mapping {
    /// Maps none of the `num_nodes` nodes.
    pub fn unmapped(num_nodes: usize) -> Mapping {
        Mapping(vec![None; num_nodes])
    }

    pub fn from_vec(targets: Vec<Option<usize>>) -> Mapping {
        Mapping(targets)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn get(&self, node: usize) -> Option<usize> {
        self.0[node]
    }

    #[inline]
    pub fn set(&mut self, node: usize, target: Option<usize>) {
        self.0[node] = target;
    }

    #[inline]
    pub fn swap(&mut self, i: usize, j: usize) {
        self.0.swap(i, j);
    }

    pub fn as_slice(&self) -> &[Option<usize>] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<usize>> + '_ {
        self.0.iter().copied()
    }

    /// The mapping with `node` remapped to `target`.
    pub fn with_move(&self, node: usize, target: Option<usize>) -> Mapping {
        let mut m = self.clone();
        m.set(node, target);
        m
    }

    /// The mapping with the targets of `i` and `j` exchanged.
    pub fn with_swap(&self, i: usize, j: usize) -> Mapping {
        let mut m = self.clone();
        m.swap(i, j);
        m
    }

    pub fn num_mapped(&self) -> usize {
        self.0.iter().filter(|t| t.is_some()).count()
    }

    /// No node of graph B is used twice.
    pub fn is_injective(&self) -> bool {
        let mut seen: Vec<usize> = self.0.iter().filter_map(|&t| t).collect();
        let n = seen.len();
        seen.sort_unstable();
        seen.dedup();
        seen.len() == n
    }

    pub fn into_vec(self) -> Vec<Option<usize>> {
        self.0
    }
}

/// Concept-driven start: every node takes the first unclaimed candidate with the
/// very same concept. Nodes without such a candidate get a random unclaimed one.
pub fn smart_init<R: Rng + ?Sized>(pool: &CandidatePool, a: &Graph, b: &Graph, rng: &mut R) -> Mapping {
    let mut claimed = vec![false; pool.num_nodes_b()];
    let mut mapping = Mapping::unmapped(pool.num_nodes_a());
    let mut no_concept_match = Vec::new();

    for i in 0..pool.num_nodes_a() {
        let candidates = pool.candidates(i);
        if candidates.is_empty() {
            continue;
        }
        let concept = a.concept(i);
        match candidates
            .iter()
            .copied()
            .find(|&j| !claimed[j] && b.concept(j) == concept)
        {
            Some(j) => {
                claimed[j] = true;
                mapping.set(i, Some(j));
            }
            None => no_concept_match.push(i),
        }
    }

    for i in no_concept_match {
        let unclaimed: Vec<usize> = pool.candidates(i).iter().copied().filter(|&j| !claimed[j]).collect();
        if let Some(&j) = unclaimed.choose(rng) {
            claimed[j] = true;
            mapping.set(i, Some(j));
        }
    }

    mapping
}

/// Random start: every node takes a random candidate not claimed by an earlier node.
pub fn random_init<R: Rng + ?Sized>(pool: &CandidatePool, rng: &mut R) -> Mapping {
    let mut claimed = vec![false; pool.num_nodes_b()];
    let mut mapping = Mapping::unmapped(pool.num_nodes_a());

    for i in 0..pool.num_nodes_a() {
        let mut candidates: Vec<usize> = pool.candidates(i).iter().copied().collect();
        candidates.shuffle(rng);
        if let Some(j) = candidates.into_iter().find(|&j| !claimed[j]) {
            claimed[j] = true;
            mapping.set(i, Some(j));
        }
    }

    mapping
}

/// Displays a mapping as `a0(want-01)-b0(want-01) a1(boy)-Null`.
pub struct Alignment<'a> {
    pub mapping: &'a Mapping,
    pub a: &'a Graph,
    pub b: &'a Graph,
}

impl<'a> fmt::Display for Alignment<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, target) in self.mapping.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}({})-", self.a.node_id(i), self.a.concept(i))?;
            match target {
                Some(j) => write!(f, "{}({})", self.b.node_id(j), self.b.concept(j))?,
                None => write!(f, "Null")?,
            }
        }
        Ok(())
    }
}
