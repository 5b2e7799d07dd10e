//! Where graphs come from. Parsing a textual graph notation happens outside this
//! crate; a parser hands its output over through [`GraphSource`].

use crate::error::SmatchError;
use crate::graph::{Graph, Triple};

/// Anything that can produce an anonymized [`Graph`].
pub trait GraphSource {
    /// Produces the graph with node ids rendered under `prefix`. Fails if the
    /// source is not a well-formed graph.
    fn to_graph(&self, prefix: &str) -> Result<Graph, SmatchError>;
}

impl GraphSource for Graph {
    fn to_graph(&self, prefix: &str) -> Result<Graph, SmatchError> {
        Ok(self.with_prefix(prefix))
    }
}

impl<G: GraphSource> GraphSource for Result<G, SmatchError> {
    fn to_graph(&self, prefix: &str) -> Result<Graph, SmatchError> {
        match self {
            Ok(g) => g.to_graph(prefix),
            Err(e) => Err(e.clone()),
        }
    }
}

/// Triples in string form, as emitted by a graph parser.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Triples {
    /// Prefix of the node ids in the triples.
    pub prefix: String,
    pub instances: Vec<Triple>,
    pub attributes: Vec<Triple>,
    pub relations: Vec<Triple>,
}

impl GraphSource for Triples {
    fn to_graph(&self, prefix: &str) -> Result<Graph, SmatchError> {
        let g = Graph::from_triples(
            &self.prefix,
            self.instances.clone(),
            self.attributes.clone(),
            self.relations.clone(),
        )?;
        Ok(g.with_prefix(prefix))
    }
}
