use smatch_hill_climbing::graph::{Graph, GraphBuilder, Triple};
use smatch_hill_climbing::{SmatchError, Triples};
use std::fs::File;
use std::io::Read;

/// Reads a graph in the line format of `graphs/amr/*.triples`:
///
/// ```text
/// instance <var> <concept>
/// attribute <var> <label> <value>
/// relation <var> <label> <var>
/// ```
///
/// Lines starting with `#` are comments.
pub fn parse_graph(graph_str: &str, prefix: &str) -> Result<Graph, SmatchError> {
    let mut builder: GraphBuilder<String> = GraphBuilder::new(prefix);
    for line in graph_str.lines().map(str::trim) {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        match fields.as_slice() {
            ["instance", var, concept] => {
                builder.add_node(var.to_string(), *concept)?;
            }
            ["attribute", var, label, value] => builder.add_attribute(var.to_string(), *label, *value),
            ["relation", source, label, target] => {
                builder.add_relation(source.to_string(), *label, target.to_string())
            }
            _ => return Err(SmatchError::Source(format!("cannot parse `{}`", line))),
        }
    }
    builder.graph()
}

pub fn load_graph(graph_file: &str, prefix: &str) -> Graph {
    let graph_str = {
        let mut graph_file = File::open(graph_file).unwrap();
        let mut graph_str = String::new();
        let _ = graph_file.read_to_string(&mut graph_str).unwrap();
        graph_str
    };
    parse_graph(&graph_str, prefix).unwrap()
}

/// The graph with node `i` renamed to `permutation[i]`, in string-triple form.
pub fn relabel(g: &Graph, permutation: &[usize]) -> Triples {
    let rename = |id: &str| -> String {
        let idx: usize = id[g.prefix().len()..].parse().unwrap();
        format!("{}{}", g.prefix(), permutation[idx])
    };
    let (instances, attributes, relations) = g.triples();
    Triples {
        prefix: g.prefix().to_string(),
        instances: instances
            .iter()
            .rev()
            .map(|t| Triple::instance(rename(&t.source), t.target.as_str()))
            .collect(),
        attributes: attributes
            .iter()
            .map(|t| Triple::new(t.relation.as_str(), rename(&t.source), t.target.as_str()))
            .collect(),
        relations: relations
            .iter()
            .map(|t| Triple::new(t.relation.as_str(), rename(&t.source), rename(&t.target)))
            .collect(),
    }
}
