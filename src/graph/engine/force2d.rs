use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::force_data::{ForceCore, ForceStyle};
use crate::graph::types::GraphData;
use crate::graph::viewport::{Scene, Viewport};

/// Radius multiplier: `radius = sqrt(val) * NODE_REL_SIZE`, so `val` reads as area.
pub const NODE_REL_SIZE: f64 = 4.0;
/// Extra pick tolerance around a node, in world units.
pub const HIT_PADDING: f64 = 4.0;

#[derive(Clone, Debug, Default)]
struct SimNode {
	slot: usize,
}

fn simulation() -> ForceGraph<SimNode, ()> {
	ForceGraph::new(SimulationParameters {
		force_charge: 150.0,
		force_spring: 0.05,
		force_max: 100.0,
		node_speed: 3000.0,
		damping_factor: 0.9,
	})
}

/// Planar force-directed engine over the `force_graph` simulation.
pub struct ForceGraph2D {
	/// Node and link data with color accessors.
	pub core: ForceCore,
	sim: ForceGraph<SimNode, ()>,
	handles: Vec<DefaultNodeIdx>,
	positions: Vec<(f64, f64)>,
	viewport: Viewport,
	paused: bool,
}

impl ForceGraph2D {
	/// Empty engine over a `width` × `height` viewport.
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			core: ForceCore::default(),
			sim: simulation(),
			handles: Vec::new(),
			positions: Vec::new(),
			viewport: Viewport::new(width, height),
			paused: false,
		}
	}

	/// Replace the graph data. Nodes that were already on screen keep their
	/// position; new ones start on a ring around the origin.
	pub fn graph_data(&mut self, data: &GraphData) {
		let previous: HashMap<String, (f64, f64)> = self
			.core
			.nodes
			.iter()
			.zip(&self.positions)
			.map(|(n, p)| (n.id.clone(), *p))
			.collect();

		self.core.set_data(data);
		self.sim = simulation();
		self.handles.clear();
		self.positions.clear();

		let count = self.core.nodes.len().max(1) as f64;
		for (slot, node) in self.core.nodes.iter().enumerate() {
			let (x, y) = previous.get(&node.id).copied().unwrap_or_else(|| {
				let angle = slot as f64 * 2.0 * PI / count;
				(100.0 * angle.cos(), 100.0 * angle.sin())
			});
			let idx = self.sim.add_node(NodeData {
				x: x as f32,
				y: y as f32,
				mass: 10.0,
				is_anchor: false,
				user_data: SimNode { slot },
			});
			self.handles.push(idx);
			self.positions.push((x, y));
		}
		for (a, b) in self.core.edge_slots() {
			if a == b {
				continue;
			}
			self.sim
				.add_edge(self.handles[a], self.handles[b], EdgeData::default());
		}
	}

	/// Replace the style.
	pub fn set_style(&mut self, style: ForceStyle) {
		self.core.style = style;
	}

	/// Node radius: `sqrt(val) * NODE_REL_SIZE`.
	pub fn radius(&self) -> f64 {
		self.core.style.node_val.max(0.0).sqrt() * NODE_REL_SIZE
	}

	/// World positions, indexed by node slot.
	pub fn positions(&self) -> &[(f64, f64)] {
		&self.positions
	}

	/// Advance the simulation; link endpoints resolve to nodes on the first tick.
	pub fn tick(&mut self, dt: f32) {
		if self.paused {
			return;
		}
		self.core.resolve_links();
		self.sim.update(dt);
		let positions = &mut self.positions;
		self.sim.visit_nodes(|node| {
			if let Some(p) = positions.get_mut(node.data.user_data.slot) {
				*p = (node.x() as f64, node.y() as f64);
			}
		});
	}

	/// Stop advancing the simulation.
	pub fn pause_animation(&mut self) {
		self.paused = true;
	}

	/// Continue the simulation.
	pub fn resume_animation(&mut self) {
		self.paused = false;
	}

	/// Whether the simulation is stopped.
	pub fn is_paused(&self) -> bool {
		self.paused
	}
}

impl Scene for ForceGraph2D {
	fn viewport(&self) -> &Viewport {
		&self.viewport
	}

	fn viewport_mut(&mut self) -> &mut Viewport {
		&mut self.viewport
	}

	fn node_at(&self, sx: f64, sy: f64) -> Option<usize> {
		let (gx, gy) = self.viewport.screen_to_graph(sx, sy);
		let reach = self.radius() + HIT_PADDING;
		// last drawn wins
		self.positions
			.iter()
			.rposition(|(x, y)| (x - gx).hypot(y - gy) < reach)
	}

	fn node_id(&self, slot: usize) -> Option<&str> {
		self.core.nodes.get(slot).map(|n| n.id.as_str())
	}

	fn grab_node(&mut self, slot: usize) -> Option<(f64, f64)> {
		self.positions.get(slot).copied()
	}

	fn drag_node(&mut self, slot: usize, x: f64, y: f64) {
		let Some(&handle) = self.handles.get(slot) else {
			return;
		};
		self.sim.visit_nodes_mut(|node| {
			if node.index() == handle {
				node.data.x = x as f32;
				node.data.y = y as f32;
				node.data.is_anchor = true;
			}
		});
		self.positions[slot] = (x, y);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::types::{GraphLink, GraphNode, NodeRef};

	fn data(ids: &[&str], links: &[(&str, &str)]) -> GraphData {
		GraphData {
			nodes: ids
				.iter()
				.map(|id| GraphNode {
					id: id.to_string(),
					label: id.to_string(),
					color: "#336699".into(),
				})
				.collect(),
			links: links
				.iter()
				.map(|(a, b)| GraphLink {
					source: (*a).into(),
					target: (*b).into(),
					color: "#999999".into(),
				})
				.collect(),
		}
	}

	#[test]
	fn radius_follows_area_semantics() {
		let mut g = ForceGraph2D::new(100.0, 100.0);
		g.set_style(ForceStyle {
			node_val: 16.0,
			..ForceStyle::default()
		});
		assert_eq!(g.radius(), 16.0);
	}

	#[test]
	fn surviving_nodes_keep_positions() {
		let mut g = ForceGraph2D::new(100.0, 100.0);
		g.graph_data(&data(&["a", "b"], &[("a", "b")]));
		g.drag_node(0, 42.0, -7.0);
		g.graph_data(&data(&["c", "a"], &[]));
		assert_eq!(g.positions()[1], (42.0, -7.0));
	}

	#[test]
	fn first_tick_resolves_links() {
		let mut g = ForceGraph2D::new(100.0, 100.0);
		g.graph_data(&data(&["a", "b"], &[("a", "b")]));
		assert!(matches!(g.core.links[0].source, NodeRef::Id(_)));
		g.tick(0.016);
		assert!(matches!(g.core.links[0].source, NodeRef::Node(_)));
	}

	#[test]
	fn paused_engine_does_not_move() {
		let mut g = ForceGraph2D::new(100.0, 100.0);
		g.graph_data(&data(&["a", "b"], &[]));
		let before = g.positions().to_vec();
		g.pause_animation();
		g.tick(0.5);
		assert_eq!(g.positions(), &before[..]);
	}
}
