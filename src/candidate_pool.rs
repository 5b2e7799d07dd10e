//! Candidate node pairs and the triple-match weight of each pairing.

use crate::config::TripleKinds;
use crate::graph::{normalize, Graph};
use fnv::FnvHashMap;
use log::trace;
use std::collections::BTreeSet;

/// Node `a` of graph A paired with node `b` of graph B.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodePair {
    pub a: usize,
    pub b: usize,
}

impl NodePair {
    #[inline]
    pub fn new(a: usize, b: usize) -> NodePair {
        NodePair { a, b }
    }
}

/// One entry in the weight table of a node pair.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Contribution {
    /// Instance and attribute triples matched by the pair alone.
    SelfMatch(u32),

    /// Relation triples matched when the other pair is part of the mapping too.
    Joint(NodePair, u32),
}

/// All contributions of a single node pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairWeights {
    self_match: u32,
    joint: FnvHashMap<NodePair, u32>,
}

impl PairWeights {
    #[inline]
    pub fn self_match(&self) -> u32 {
        self.self_match
    }

    /// Joint contributions with other node pairs.
    #[inline]
    pub fn joint(&self) -> impl Iterator<Item = (NodePair, u32)> + '_ {
        self.joint.iter().map(|(&pair, &w)| (pair, w))
    }

    pub fn joint_with(&self, other: NodePair) -> u32 {
        self.joint.get(&other).copied().unwrap_or(0)
    }

    pub fn contributions(&self) -> impl Iterator<Item = Contribution> + '_ {
        std::iter::once(Contribution::SelfMatch(self.self_match))
            .chain(self.joint().map(|(pair, w)| Contribution::Joint(pair, w)))
    }
}

/// Pairwise mapping contributions. A pair missing from the table contributes nothing.
#[derive(Debug, Clone, Default)]
pub struct WeightTable {
    weights: FnvHashMap<NodePair, PairWeights>,
}

impl WeightTable {
    pub fn new() -> WeightTable {
        WeightTable::default()
    }

    #[inline]
    pub fn get(&self, pair: NodePair) -> Option<&PairWeights> {
        self.weights.get(&pair)
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodePair, &PairWeights)> + '_ {
        self.weights.iter().map(|(&pair, w)| (pair, w))
    }

    pub fn add_self_match(&mut self, pair: NodePair) {
        self.weights.entry(pair).or_default().self_match += 1;
    }

    /// Registers one relation triple satisfied by `first` and `second` together,
    /// under both pairs. Identical pairs count as a self match.
    pub fn add_joint(&mut self, first: NodePair, second: NodePair) {
        if first == second {
            self.add_self_match(first);
            return;
        }
        let (first, second) = if first.a > second.a {
            (second, first)
        } else {
            (first, second)
        };
        *self
            .weights
            .entry(first)
            .or_default()
            .joint
            .entry(second)
            .or_insert(0) += 1;
        *self
            .weights
            .entry(second)
            .or_default()
            .joint
            .entry(first)
            .or_insert(0) += 1;
    }
}

/// Feasible partners of every node of graph A, plus the weight table.
#[derive(Debug, Clone)]
pub struct CandidatePool {
    candidates: Vec<BTreeSet<usize>>,
    weights: WeightTable,
    num_nodes_b: usize,
}

impl CandidatePool {
    /// Collects every node pair that matches at least one triple of the selected
    /// kinds.
    pub fn build(a: &Graph, b: &Graph, kinds: TripleKinds) -> CandidatePool {
        let mut candidates = vec![BTreeSet::new(); a.num_nodes()];
        let mut weights = WeightTable::new();

        if kinds.instance {
            let concepts_b: Vec<String> = b.instances().iter().map(|i| normalize(&i.concept)).collect();
            for ia in a.instances() {
                let concept_a = normalize(&ia.concept);
                for (ib, concept_b) in b.instances().iter().zip(&concepts_b) {
                    if concept_a == *concept_b {
                        candidates[ia.node].insert(ib.node);
                        weights.add_self_match(NodePair::new(ia.node, ib.node));
                    }
                }
            }
        }

        if kinds.attribute {
            let keys_b: Vec<(String, String)> = b
                .attributes()
                .iter()
                .map(|t| (normalize(&t.label), normalize(&t.value)))
                .collect();
            for ta in a.attributes() {
                let key_a = (normalize(&ta.label), normalize(&ta.value));
                for (tb, key_b) in b.attributes().iter().zip(&keys_b) {
                    if key_a == *key_b {
                        candidates[ta.node].insert(tb.node);
                        weights.add_self_match(NodePair::new(ta.node, tb.node));
                    }
                }
            }
        }

        if kinds.relation {
            let labels_b: Vec<String> = b.relations().iter().map(|r| normalize(&r.label)).collect();
            for ra in a.relations() {
                let label_a = normalize(&ra.label);
                for (rb, label_b) in b.relations().iter().zip(&labels_b) {
                    if label_a == *label_b {
                        candidates[ra.source].insert(rb.source);
                        candidates[ra.target].insert(rb.target);
                        weights.add_joint(
                            NodePair::new(ra.source, rb.source),
                            NodePair::new(ra.target, rb.target),
                        );
                    }
                }
            }
        }

        trace!("candidate mappings: {:?}", candidates);
        trace!("weight table: {:?}", weights);

        CandidatePool {
            candidates,
            weights,
            num_nodes_b: b.num_nodes(),
        }
    }

    #[inline]
    pub fn candidates(&self, node: usize) -> &BTreeSet<usize> {
        &self.candidates[node]
    }

    #[inline]
    pub fn weights(&self) -> &WeightTable {
        &self.weights
    }

    /// Number of nodes in graph A.
    #[inline]
    pub fn num_nodes_a(&self) -> usize {
        self.candidates.len()
    }

    #[inline]
    pub fn num_nodes_b(&self) -> usize {
        self.num_nodes_b
    }
}
