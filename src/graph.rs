use crate::error::SmatchError;
use petgraph::graph::NodeIndex;
use petgraph::Directed;
use petgraph::Graph as PetGraph;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt::Debug;

/// Kind tag carried by every instance triple.
pub const INSTANCE: &str = "instance";

/// Lowercases `item` and strips trailing underscores, the form in which labels,
/// concepts and constants are compared.
pub fn normalize(item: &str) -> String {
    item.to_lowercase().trim_end_matches('_').to_string()
}

/// The string form of a triple. Node ids are `<prefix><index>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Triple {
    pub relation: String,
    pub source: String,
    pub target: String,
}

impl Triple {
    pub fn new<R: Into<String>, S: Into<String>, T: Into<String>>(
        relation: R,
        source: S,
        target: T,
    ) -> Triple {
        Triple {
            relation: relation.into(),
            source: source.into(),
            target: target.into(),
        }
    }

    pub fn instance<S: Into<String>, T: Into<String>>(node: S, concept: T) -> Triple {
        Triple::new(INSTANCE, node, concept)
    }
}

/// Node typing: node `node` is an instance of `concept`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    pub node: usize,
    pub concept: String,
}

/// Node to constant: `label(node, value)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub label: String,
    pub node: usize,
    pub value: String,
}

/// Node to node: `label(source, target)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    pub label: String,
    pub source: usize,
    pub target: usize,
}

/// An anonymized semantic graph.
///
/// Node indices are dense and zero-based, and node `i` is described by
/// `instances()[i]`. Every attribute and relation refers to an existing node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    prefix: String,
    instances: Vec<Instance>,
    attributes: Vec<Attribute>,
    relations: Vec<Relation>,
}

fn parse_node_id(id: &str, prefix: &str, num_nodes: usize) -> Result<usize, SmatchError> {
    let index = id
        .strip_prefix(prefix)
        .filter(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|rest| rest.parse::<usize>().ok())
        .ok_or_else(|| SmatchError::MalformedNodeId {
            id: id.to_string(),
            prefix: prefix.to_string(),
        })?;
    if index >= num_nodes {
        return Err(SmatchError::NodeOutOfRange {
            id: id.to_string(),
            num_nodes,
        });
    }
    Ok(index)
}

impl Graph {
    /// Builds a graph from already anonymized triples, as produced by a graph parser.
    ///
    /// The node count is the number of instance triples; every node id must be
    /// `prefix` followed by an index below that count, and every node must be
    /// typed exactly once.
    pub fn from_triples(
        prefix: &str,
        instances: Vec<Triple>,
        attributes: Vec<Triple>,
        relations: Vec<Triple>,
    ) -> Result<Graph, SmatchError> {
        let num_nodes = instances.len();
        let mut concepts: Vec<Option<String>> = vec![None; num_nodes];
        for t in instances {
            let node = parse_node_id(&t.source, prefix, num_nodes)?;
            if concepts[node].is_some() {
                return Err(SmatchError::DuplicateNode(t.source));
            }
            concepts[node] = Some(t.target);
        }

        // n distinct indices below n: every slot is filled.
        let instances = concepts
            .into_iter()
            .enumerate()
            .map(|(node, concept)| Instance {
                node,
                concept: concept.unwrap_or_default(),
            })
            .collect();

        let attributes = attributes
            .into_iter()
            .map(|t| {
                Ok(Attribute {
                    node: parse_node_id(&t.source, prefix, num_nodes)?,
                    label: t.relation,
                    value: t.target,
                })
            })
            .collect::<Result<Vec<_>, SmatchError>>()?;

        let relations = relations
            .into_iter()
            .map(|t| {
                Ok(Relation {
                    source: parse_node_id(&t.source, prefix, num_nodes)?,
                    target: parse_node_id(&t.target, prefix, num_nodes)?,
                    label: t.relation,
                })
            })
            .collect::<Result<Vec<_>, SmatchError>>()?;

        Ok(Graph {
            prefix: prefix.to_string(),
            instances,
            attributes,
            relations,
        })
    }

    /// The graph substituted for malformed input:
    /// `(w / want-01 :ARG0 (b / boy) :ARG1 (g / go-01 :ARG0 b))`.
    pub fn placeholder(prefix: &str) -> Graph {
        let instance = |node: usize, concept: &str| Instance {
            node,
            concept: concept.to_string(),
        };
        let relation = |label: &str, source: usize, target: usize| Relation {
            label: label.to_string(),
            source,
            target,
        };
        Graph {
            prefix: prefix.to_string(),
            instances: vec![instance(0, "want-01"), instance(1, "boy"), instance(2, "go-01")],
            attributes: vec![Attribute {
                label: "TOP".to_string(),
                node: 0,
                value: "want-01".to_string(),
            }],
            relations: vec![
                relation("ARG0", 0, 1),
                relation("ARG1", 0, 2),
                relation("ARG0", 2, 1),
            ],
        }
    }

    /// The same graph with node ids rendered under another prefix.
    pub fn with_prefix(&self, prefix: &str) -> Graph {
        Graph {
            prefix: prefix.to_string(),
            ..self.clone()
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn num_nodes(&self) -> usize {
        self.instances.len()
    }

    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    #[inline]
    pub fn concept(&self, node: usize) -> &str {
        &self.instances[node].concept
    }

    pub fn num_triples(&self) -> usize {
        self.instances.len() + self.attributes.len() + self.relations.len()
    }

    /// Anonymized id of `node`, e.g. `a3`.
    pub fn node_id(&self, node: usize) -> String {
        format!("{}{}", self.prefix, node)
    }

    /// Instance, attribute and relation triples in string form.
    pub fn triples(&self) -> (Vec<Triple>, Vec<Triple>, Vec<Triple>) {
        let instances = self
            .instances
            .iter()
            .map(|i| Triple::instance(self.node_id(i.node), i.concept.as_str()))
            .collect();
        let attributes = self
            .attributes
            .iter()
            .map(|a| Triple::new(a.label.as_str(), self.node_id(a.node), a.value.as_str()))
            .collect();
        let relations = self
            .relations
            .iter()
            .map(|r| Triple::new(r.label.as_str(), self.node_id(r.source), self.node_id(r.target)))
            .collect();
        (instances, attributes, relations)
    }

    /// Converts the node/relation structure into a petgraph graph. Node weights
    /// are concepts, edge weights relation labels. Attributes are not included.
    pub fn to_petgraph(&self) -> PetGraph<String, String, Directed> {
        let mut graph = PetGraph::new();
        for instance in &self.instances {
            let idx = graph.add_node(instance.concept.clone());
            debug_assert!(idx.index() == instance.node);
        }
        for r in &self.relations {
            graph.add_edge(NodeIndex::new(r.source), NodeIndex::new(r.target), r.label.clone());
        }
        graph
    }
}

/// Builds a [`Graph`] from triples keyed by arbitrary variable names, assigning
/// dense node indices in order of first mention.
pub struct GraphBuilder<K: Ord + Debug> {
    // maps variable name to node index
    node_map: BTreeMap<K, usize>,
    concepts: Vec<Option<String>>,
    attributes: Vec<Attribute>,
    relations: Vec<Relation>,
    prefix: String,
}

impl<K: Ord + Debug> GraphBuilder<K> {
    pub fn new(prefix: &str) -> GraphBuilder<K> {
        GraphBuilder {
            node_map: BTreeMap::new(),
            concepts: Vec::new(),
            attributes: Vec::new(),
            relations: Vec::new(),
            prefix: prefix.to_string(),
        }
    }

    pub fn graph(self) -> Result<Graph, SmatchError> {
        let mut instances = Vec::with_capacity(self.concepts.len());
        for (node, concept) in self.concepts.into_iter().enumerate() {
            match concept {
                Some(concept) => instances.push(Instance { node, concept }),
                None => {
                    let var = self
                        .node_map
                        .iter()
                        .find(|&(_, &idx)| idx == node)
                        .map(|(var, _)| format!("{:?}", var))
                        .unwrap_or_default();
                    return Err(SmatchError::MissingNode(var));
                }
            }
        }
        Ok(Graph {
            prefix: self.prefix,
            instances,
            attributes: self.attributes,
            relations: self.relations,
        })
    }

    /// Declares the concept of `var`. Returns the node index.
    pub fn add_node<C: Into<String>>(&mut self, var: K, concept: C) -> Result<usize, SmatchError> {
        let desc = format!("{:?}", var);
        let idx = self.add_or_replace_node(var);
        if self.concepts[idx].is_some() {
            return Err(SmatchError::DuplicateNode(desc));
        }
        self.concepts[idx] = Some(concept.into());
        Ok(idx)
    }

    // returns node index
    pub fn add_or_replace_node(&mut self, var: K) -> usize {
        match self.node_map.entry(var) {
            Entry::Vacant(e) => {
                let next_id = self.concepts.len();
                self.concepts.push(None);
                e.insert(next_id);
                next_id
            }
            Entry::Occupied(e) => *e.get(),
        }
    }

    pub fn add_attribute<L: Into<String>, V: Into<String>>(&mut self, var: K, label: L, value: V) {
        let node = self.add_or_replace_node(var);
        self.attributes.push(Attribute {
            label: label.into(),
            node,
            value: value.into(),
        });
    }

    pub fn add_relation<L: Into<String>>(&mut self, source: K, label: L, target: K) {
        let source = self.add_or_replace_node(source);
        let target = self.add_or_replace_node(target);
        self.relations.push(Relation {
            label: label.into(),
            source,
            target,
        });
    }
}
