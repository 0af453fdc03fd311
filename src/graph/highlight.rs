//! Focus a node's closed neighbourhood by dimming everything else.

use std::collections::HashSet;
use std::rc::Rc;

use super::engine::{ColorAccessor, ElementGraph, ForceCore};
use super::instance::{Capability, GraphInstance};
use super::types::GraphLink;

/// Opacity of nodes outside the neighbourhood (element engine) and the alpha
/// their colors are blended to (force engines).
pub const DIM_NODE: f64 = 0.15;
/// Same for edges.
pub const DIM_EDGE: f64 = 0.05;

/// `focus` plus every id sharing a link with it.
pub fn neighbor_ids<'a>(links: impl IntoIterator<Item = &'a GraphLink>, focus: &str) -> HashSet<String> {
	let mut ids = HashSet::from([focus.to_string()]);
	for link in links {
		let (source, target) = (link.source.id(), link.target.id());
		if source == focus || target == focus {
			ids.insert(source.to_string());
			ids.insert(target.to_string());
		}
	}
	ids
}

/// Dim everything outside the closed neighbourhood of `focus`.
pub fn highlight_neighborhood(instance: &mut GraphInstance, focus: &str) {
	match instance.capability() {
		Capability::Elements(graph) => highlight_elements(graph, focus),
		Capability::GraphData(core) => highlight_force(core, focus),
	}
}

/// Undo [`highlight_neighborhood`].
pub fn reset_highlight(instance: &mut GraphInstance) {
	match instance.capability() {
		Capability::Elements(graph) => {
			for node in graph.nodes_mut() {
				node.opacity = 1.0;
			}
			for edge in graph.edges_mut() {
				edge.opacity = 1.0;
			}
		}
		Capability::GraphData(core) => {
			core.node_color = ColorAccessor::Field;
			core.link_color = ColorAccessor::Field;
		}
	}
}

fn highlight_elements(graph: &mut ElementGraph, focus: &str) {
	let hood = graph.closed_neighborhood(focus);
	for node in graph.nodes_mut() {
		node.opacity = if hood.nodes.contains(&node.data.id) {
			1.0
		} else {
			DIM_NODE
		};
	}
	for edge in graph.edges_mut() {
		edge.opacity = if hood.edges.contains(&edge.id) {
			1.0
		} else {
			DIM_EDGE
		};
	}
}

fn highlight_force(core: &mut ForceCore, focus: &str) {
	let members = Rc::new(neighbor_ids(&core.links, focus));
	core.node_color = ColorAccessor::Dimmed {
		members: members.clone(),
		alpha: DIM_NODE,
	};
	core.link_color = ColorAccessor::Dimmed {
		members,
		alpha: DIM_EDGE,
	};
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;

	use super::*;
	use crate::graph::engine::{ForceGraph2D, ForceGraph3D};
	use crate::graph::types::{GraphData, GraphNode, NodeRef};

	fn node(id: &str) -> GraphNode {
		GraphNode {
			id: id.into(),
			label: id.into(),
			color: "#1f77b4".into(),
		}
	}

	fn link(a: &str, b: &str) -> GraphLink {
		GraphLink {
			source: a.into(),
			target: b.into(),
			color: "#b0b0b0".into(),
		}
	}

	fn data(ids: &[&str], links: &[(&str, &str)]) -> GraphData {
		GraphData {
			nodes: ids.iter().map(|id| node(id)).collect(),
			links: links.iter().map(|(a, b)| link(a, b)).collect(),
		}
	}

	fn instances(d: &GraphData) -> Vec<GraphInstance> {
		let mut e = ElementGraph::new(100.0, 100.0);
		e.add(d);
		let mut f2 = ForceGraph2D::new(100.0, 100.0);
		f2.graph_data(d);
		let mut f3 = ForceGraph3D::new(100.0, 100.0);
		f3.graph_data(d);
		vec![
			GraphInstance::ConstraintLayout(Box::new(e)),
			GraphInstance::Force2D(Box::new(f2)),
			GraphInstance::Force3D(Box::new(f3)),
		]
	}

	/// Every node and link appearance, in element order.
	fn appearance(instance: &GraphInstance) -> Vec<String> {
		if let Some(g) = instance.elements() {
			let nodes = g.nodes().iter().map(|n| format!("{}:{}", n.data.id, n.opacity));
			let edges = g.edges().iter().map(|e| format!("{}:{}", e.id, e.opacity));
			return nodes.chain(edges).collect();
		}
		let core = instance.graph_data().expect("force engine");
		let nodes = core.nodes.iter().map(|n| core.node_color.node_color(n).into_owned());
		let links = core.links.iter().map(|l| core.link_color.link_color(l).into_owned());
		nodes.chain(links).collect()
	}

	#[test]
	fn single_node_keeps_full_opacity() {
		let mut inst = GraphInstance::ConstraintLayout(Box::new(ElementGraph::new(10.0, 10.0)));
		if let Some(g) = inst.elements_mut() {
			g.add(&GraphData {
				nodes: vec![GraphNode {
					id: "A".into(),
					label: "Alpha".into(),
					color: "#123456".into(),
				}],
				links: vec![],
			});
		}
		highlight_neighborhood(&mut inst, "A");
		assert_eq!(inst.elements().and_then(|g| g.node("A")).map(|n| n.opacity), Some(1.0));
	}

	#[test]
	fn element_engine_dims_outsiders() {
		let d = data(&["a", "b", "c"], &[("a", "b"), ("b", "c")]);
		let mut inst = instances(&d).remove(0);
		highlight_neighborhood(&mut inst, "a");
		let g = inst.elements().unwrap();
		assert_eq!(g.node("b").unwrap().opacity, 1.0);
		assert_eq!(g.node("c").unwrap().opacity, DIM_NODE);
		assert_eq!(g.edges()[0].opacity, 1.0);
		assert_eq!(g.edges()[1].opacity, DIM_EDGE);
	}

	#[test]
	fn force_engine_blends_outsiders() {
		let d = data(&["a", "b", "c"], &[("a", "b"), ("b", "c")]);
		let mut inst = instances(&d).remove(1);
		highlight_neighborhood(&mut inst, "a");
		assert_eq!(
			appearance(&inst),
			vec![
				"#1f77b4",
				"#1f77b4",
				"rgba(31, 119, 180, 0.15)",
				"#b0b0b0",
				"rgba(176, 176, 176, 0.05)",
			]
		);
	}

	#[test]
	fn resolved_endpoints_count_as_ids() {
		let target = Rc::new(node("b"));
		let links = vec![GraphLink {
			source: NodeRef::Id("a".into()),
			target: NodeRef::Node(target),
			color: "#000".into(),
		}];
		let ids = neighbor_ids(&links, "b");
		assert!(ids.contains("a") && ids.contains("b"));
	}

	#[test]
	fn highlight_survives_simulation_ticks() {
		let d = data(&["a", "b", "c"], &[("a", "b")]);
		for mut inst in instances(&d).into_iter().skip(1) {
			inst.tick(0.016);
			highlight_neighborhood(&mut inst, "b");
			let shown = appearance(&inst);
			assert_eq!(shown[0], "#1f77b4");
			assert_eq!(shown[2], "rgba(31, 119, 180, 0.15)");
		}
	}

	fn arb_graph() -> impl Strategy<Value = (usize, Vec<(usize, usize)>, usize)> {
		(1usize..8).prop_flat_map(|n| {
			(
				Just(n),
				prop::collection::vec((0..n, 0..n), 0..16),
				0..n,
			)
		})
	}

	fn build(n: usize, edges: &[(usize, usize)]) -> (Vec<String>, GraphData) {
		let ids: Vec<String> = (0..n).map(|i| format!("n{}", i)).collect();
		let d = GraphData {
			nodes: ids.iter().map(|id| node(id)).collect(),
			links: edges.iter().map(|(a, b)| link(&ids[*a], &ids[*b])).collect(),
		};
		(ids, d)
	}

	proptest! {
		#[test]
		fn neighbor_set_is_closed_neighborhood((n, edges, focus) in arb_graph()) {
			let (ids, d) = build(n, &edges);
			let got = neighbor_ids(&d.links, &ids[focus]);
			let mut want = HashSet::from([ids[focus].clone()]);
			for (a, b) in &edges {
				if *a == focus { want.insert(ids[*b].clone()); }
				if *b == focus { want.insert(ids[*a].clone()); }
			}
			prop_assert_eq!(got, want);
		}

		#[test]
		fn members_stay_lit_outsiders_dim((n, edges, focus) in arb_graph()) {
			let (ids, d) = build(n, &edges);
			let members = neighbor_ids(&d.links, &ids[focus]);
			for mut inst in instances(&d) {
				highlight_neighborhood(&mut inst, &ids[focus]);
				if let Some(g) = inst.elements() {
					for node in g.nodes() {
						let lit = members.contains(&node.data.id);
						prop_assert_eq!(node.opacity, if lit { 1.0 } else { DIM_NODE });
					}
				} else {
					let core = inst.graph_data().unwrap();
					for node in &core.nodes {
						let lit = members.contains(&node.id);
						prop_assert_eq!(core.node_color.node_color(node) == node.color.as_str(), lit);
					}
				}
			}
		}

		#[test]
		fn reset_restores_original_appearance((n, edges, focus) in arb_graph()) {
			let (ids, d) = build(n, &edges);
			for mut inst in instances(&d) {
				let before = appearance(&inst);
				highlight_neighborhood(&mut inst, &ids[focus]);
				reset_highlight(&mut inst);
				prop_assert_eq!(appearance(&inst), before);
			}
		}
	}
}
