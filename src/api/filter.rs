use uuid::Uuid;

use super::GraphResponse;

/// Whether `id` has the hyphenated UUID shape org-roam uses for node ids.
pub fn is_node_id(id: &str) -> bool {
	id.len() == 36 && Uuid::try_parse(id).is_ok()
}

/// Drop edges whose destination is not a node id.
///
/// Returns the number of edges removed.
pub fn retain_well_formed_edges(graph: &mut GraphResponse) -> usize {
	let before = graph.edges.len();
	graph.edges.retain(|edge| is_node_id(&edge.dest));
	before - graph.edges.len()
}
