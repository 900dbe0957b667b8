use petgraph::algo::tarjan_scc;
use petgraph::algo::toposort;
use petgraph::graph::DiGraph;
use petgraph::graph::NodeIndex;

use crate::WeldError;
use crate::WeldResult;
use crate::project::FileId;
use crate::project::SourceSet;

/// Linearize the candidate set so that for every resolved edge
/// `host -> imported`, the imported file is fully spliced strictly before
/// its host. Most-depended-upon files come first.
///
/// Fails fast with [`WeldError::ImportCycle`] when the import graph is
/// cyclic — nested splicing has no correct order in that case.
pub fn combine_order(set: &SourceSet) -> WeldResult<Vec<FileId>> {
	let mut graph: DiGraph<FileId, ()> = DiGraph::new();
	let nodes: Vec<NodeIndex> = set.ids().into_iter().map(|id| graph.add_node(id)).collect();

	for (host, file) in set.iter() {
		for edge in &file.imports {
			graph.add_edge(nodes[host.index()], nodes[edge.target.index()], ());
		}
	}

	match toposort(&graph, None) {
		// toposort puts hosts before their imports; the combine pipeline
		// needs imports first.
		Ok(order) => Ok(order.into_iter().rev().map(|node| graph[node]).collect()),
		Err(_) => {
			let mut members = Vec::new();
			for scc in tarjan_scc(&graph) {
				if scc.len() > 1 || scc.iter().any(|&node| graph.contains_edge(node, node)) {
					for node in scc {
						members.push(set.get(graph[node]).relative_path.display().to_string());
					}
				}
			}
			members.sort();
			Err(WeldError::ImportCycle {
				files: members.join(", "),
			})
		}
	}
}
