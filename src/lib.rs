//! Smatch: a similarity score between two semantic graphs (for instance AMR
//! graphs), see [this paper][1].
//!
//! Both graphs are given as instance, attribute and relation triples over
//! anonymized nodes. The score counts the triples that agree under the best
//! one-to-one node mapping. Finding that mapping is NP-hard, so it is
//! approximated by hill-climbing with random restarts.
//!
//! [1]: https://aclanthology.org/P13-2131 "2013, Shu Cai and Kevin Knight,
//!      Smatch: an Evaluation Metric for Semantic Feature Structures"

pub mod candidate_pool;
mod config;
mod error;
pub mod evaluator;
pub mod graph;
mod graph_traits;
pub mod hill_climbing;
pub mod mapping;
mod score;
mod smatch;

pub use crate::{config::*, error::*, graph::Graph, graph_traits::*, score::*, smatch::*};

/// F-score of `test` against `gold` with `restarts` random restarts.
pub fn smatch_score(test: &Graph, gold: &Graph, restarts: usize) -> Scores {
    let mut s = Smatch::new(SmatchConfig::default().restarts(restarts));
    s.match_pair(test, gold).scores()
}
