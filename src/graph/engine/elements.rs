use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use log::warn;

use super::ClickHandler;
use super::layout;
use crate::graph::types::{GraphData, GraphNode, LayoutName};
use crate::graph::viewport::{Scene, Viewport};

/// Label font size at `labelScale == 1`.
pub const BASE_FONT_SIZE: f64 = 10.0;

/// A node element with its position and current opacity.
#[derive(Clone, Debug)]
pub struct NodeElement {
	/// The node this element draws.
	pub data: Rc<GraphNode>,
	/// World x.
	pub x: f64,
	/// World y.
	pub y: f64,
	/// 0 is invisible, 1 fully drawn.
	pub opacity: f64,
}

/// An edge element between two node ids.
#[derive(Clone, Debug)]
pub struct EdgeElement {
	/// `e{n}` in insertion order.
	pub id: String,
	/// Source node id.
	pub source: String,
	/// Target node id.
	pub target: String,
	/// Stroke color.
	pub color: String,
	/// 0 is invisible, 1 fully drawn.
	pub opacity: f64,
}

/// Stylesheet applied to every element.
#[derive(Clone, Debug, PartialEq)]
pub struct ElementStyle {
	/// Node width.
	pub width: f64,
	/// Node height.
	pub height: f64,
	/// Label size in px.
	pub font_size: f64,
	/// Whether labels are drawn.
	pub show_labels: bool,
	/// Label text color.
	pub label_color: String,
	/// Canvas fill behind the graph.
	pub background: String,
}

impl Default for ElementStyle {
	fn default() -> Self {
		Self {
			width: 10.0,
			height: 10.0,
			font_size: BASE_FONT_SIZE,
			show_labels: true,
			label_color: "#222222".into(),
			background: "#ffffff".into(),
		}
	}
}

/// Ids of a node, its direct neighbours and the edges joining them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Neighborhood {
	/// Member node ids.
	pub nodes: HashSet<String>,
	/// Member edge ids.
	pub edges: HashSet<String>,
}

/// Element-store engine: discrete layouts, per-element opacity and live
/// style updates.
pub struct ElementGraph {
	nodes: Vec<NodeElement>,
	edges: Vec<EdgeElement>,
	index: HashMap<String, usize>,
	style: ElementStyle,
	tap_listeners: Vec<ClickHandler>,
	viewport: Viewport,
	layout: Option<LayoutName>,
	destroyed: bool,
}

impl ElementGraph {
	/// Empty engine over a `width` × `height` viewport.
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			nodes: Vec::new(),
			edges: Vec::new(),
			index: HashMap::new(),
			style: ElementStyle::default(),
			tap_listeners: Vec::new(),
			viewport: Viewport::new(width, height),
			layout: None,
			destroyed: false,
		}
	}

	/// Remove every element.
	pub fn remove_all(&mut self) {
		self.nodes.clear();
		self.edges.clear();
		self.index.clear();
	}

	/// Add the elements of `data`. Edges pointing at unknown nodes are skipped.
	pub fn add(&mut self, data: &GraphData) {
		for node in &data.nodes {
			if self.index.contains_key(&node.id) {
				continue;
			}
			self.index.insert(node.id.clone(), self.nodes.len());
			self.nodes.push(NodeElement {
				data: Rc::new(node.clone()),
				x: 0.0,
				y: 0.0,
				opacity: 1.0,
			});
		}
		for link in &data.links {
			let (source, target) = (link.source.id(), link.target.id());
			if !self.index.contains_key(source) || !self.index.contains_key(target) {
				warn!("skipping edge {} -> {} with a missing endpoint", source, target);
				continue;
			}
			self.edges.push(EdgeElement {
				id: format!("e{}", self.edges.len()),
				source: source.to_string(),
				target: target.to_string(),
				color: link.color.clone(),
				opacity: 1.0,
			});
		}
	}

	/// All node elements, in insertion order.
	pub fn nodes(&self) -> &[NodeElement] {
		&self.nodes
	}

	/// All edge elements.
	pub fn edges(&self) -> &[EdgeElement] {
		&self.edges
	}

	/// The node element with `id`.
	pub fn node(&self, id: &str) -> Option<&NodeElement> {
		self.index.get(id).map(|&i| &self.nodes[i])
	}

	/// The active stylesheet.
	pub fn style(&self) -> &ElementStyle {
		&self.style
	}

	/// Replace the stylesheet.
	pub fn set_style(&mut self, style: ElementStyle) {
		self.style = style;
	}

	/// Live update of node width and height.
	pub fn set_node_size(&mut self, size: f64) {
		self.style.width = size;
		self.style.height = size;
	}

	/// Live update of the label font.
	pub fn set_label_scale(&mut self, scale: f64) {
		self.style.font_size = BASE_FONT_SIZE * scale;
	}

	/// Position every node with `name`.
	pub fn run_layout(&mut self, name: LayoutName) {
		let ids: Vec<&str> = self.nodes.iter().map(|n| n.data.id.as_str()).collect();
		let edges: Vec<(usize, usize)> = self
			.edges
			.iter()
			.map(|e| (self.index[&e.source], self.index[&e.target]))
			.collect();
		let spacing = self.style.width.max(self.style.height) * 3.0;
		let positions = layout::place(name, &ids, &edges, spacing);
		for (node, (x, y)) in self.nodes.iter_mut().zip(positions) {
			node.x = x;
			node.y = y;
		}
		self.layout = Some(name);
	}

	/// Layout most recently run, as requested.
	pub fn last_layout(&self) -> Option<LayoutName> {
		self.layout
	}

	/// The node plus its neighbours and incident edges; empty for unknown ids.
	pub fn closed_neighborhood(&self, id: &str) -> Neighborhood {
		let mut hood = Neighborhood::default();
		if !self.index.contains_key(id) {
			return hood;
		}
		hood.nodes.insert(id.to_string());
		for edge in &self.edges {
			if edge.source == id || edge.target == id {
				hood.nodes.insert(edge.source.clone());
				hood.nodes.insert(edge.target.clone());
				hood.edges.insert(edge.id.clone());
			}
		}
		hood
	}

	/// Mutable node elements.
	pub fn nodes_mut(&mut self) -> impl Iterator<Item = &mut NodeElement> {
		self.nodes.iter_mut()
	}

	/// Mutable edge elements.
	pub fn edges_mut(&mut self) -> impl Iterator<Item = &mut EdgeElement> {
		self.edges.iter_mut()
	}

	/// Add a node tap listener.
	pub fn on_node_tap(&mut self, handler: ClickHandler) {
		self.tap_listeners.push(handler);
	}

	/// Remove every node tap listener.
	pub fn off_node_tap(&mut self) {
		self.tap_listeners.clear();
	}

	/// Number of bound tap handlers.
	pub fn tap_listener_count(&self) -> usize {
		self.tap_listeners.len()
	}

	/// Handlers currently bound to node taps.
	pub fn tap_listeners(&self) -> Vec<ClickHandler> {
		self.tap_listeners.clone()
	}

	/// Drop elements and listeners; the engine draws nothing afterwards.
	pub fn destroy(&mut self) {
		self.remove_all();
		self.tap_listeners.clear();
		self.destroyed = true;
	}

	/// Whether `destroy` has run.
	pub fn is_destroyed(&self) -> bool {
		self.destroyed
	}
}

impl Scene for ElementGraph {
	fn viewport(&self) -> &Viewport {
		&self.viewport
	}

	fn viewport_mut(&mut self) -> &mut Viewport {
		&mut self.viewport
	}

	fn node_at(&self, sx: f64, sy: f64) -> Option<usize> {
		let (gx, gy) = self.viewport.screen_to_graph(sx, sy);
		let (hw, hh) = (self.style.width / 2.0, self.style.height / 2.0);
		self.nodes
			.iter()
			.rposition(|n| ((n.x - gx) / hw).powi(2) + ((n.y - gy) / hh).powi(2) <= 1.0)
	}

	fn node_id(&self, slot: usize) -> Option<&str> {
		self.nodes.get(slot).map(|n| n.data.id.as_str())
	}

	fn grab_node(&mut self, slot: usize) -> Option<(f64, f64)> {
		self.nodes.get(slot).map(|n| (n.x, n.y))
	}

	fn drag_node(&mut self, slot: usize, x: f64, y: f64) {
		if let Some(node) = self.nodes.get_mut(slot) {
			node.x = x;
			node.y = y;
		}
	}
}
