use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use super::ClickHandler;
use crate::graph::types::{GraphData, GraphLink, GraphNode, NodeRef};
use crate::style::with_alpha;

/// How a force engine derives node or link colors.
#[derive(Clone, Debug, Default)]
pub enum ColorAccessor {
	/// Read the element's own `color` field.
	#[default]
	Field,
	/// Keep members' color, blend everything else down to `alpha`.
	Dimmed {
		members: Rc<HashSet<String>>,
		alpha: f64,
	},
}

impl ColorAccessor {
	/// Fill color of `node`.
	pub fn node_color<'a>(&self, node: &'a GraphNode) -> Cow<'a, str> {
		match self {
			ColorAccessor::Field => Cow::Borrowed(&node.color),
			ColorAccessor::Dimmed { members, alpha } => {
				if members.contains(&node.id) {
					Cow::Borrowed(&node.color)
				} else {
					Cow::Owned(with_alpha(&node.color, *alpha))
				}
			}
		}
	}

	/// Links stay undimmed only when both endpoints are members.
	pub fn link_color<'a>(&self, link: &'a GraphLink) -> Cow<'a, str> {
		match self {
			ColorAccessor::Field => Cow::Borrowed(&link.color),
			ColorAccessor::Dimmed { members, alpha } => {
				if members.contains(link.source.id()) && members.contains(link.target.id()) {
					Cow::Borrowed(&link.color)
				} else {
					Cow::Owned(with_alpha(&link.color, *alpha))
				}
			}
		}
	}
}

/// Per-render sizing for a force engine.
#[derive(Clone, Debug)]
pub struct ForceStyle {
	/// Node value; radius derives from it per engine.
	pub node_val: f64,
	/// Label size in px.
	pub font_size: f64,
	/// Whether labels are drawn.
	pub show_labels: bool,
	/// Label text color.
	pub label_color: String,
	/// Canvas fill behind the graph.
	pub background: String,
}

impl Default for ForceStyle {
	fn default() -> Self {
		Self {
			node_val: 1.0,
			font_size: 12.0,
			show_labels: true,
			label_color: "#222222".into(),
			background: "#ffffff".into(),
		}
	}
}

/// Graph data and accessors shared by the force-directed engines.
#[derive(Default)]
pub struct ForceCore {
	/// Nodes, indexed by slot.
	pub nodes: Vec<Rc<GraphNode>>,
	/// Links; endpoints resolve to nodes once simulated.
	pub links: Vec<GraphLink>,
	/// Node fill colors.
	pub node_color: ColorAccessor,
	/// Link stroke colors.
	pub link_color: ColorAccessor,
	/// Sizing of the current render.
	pub style: ForceStyle,
	index: HashMap<String, usize>,
	on_click: Option<ClickHandler>,
}

impl ForceCore {
	/// Replace the graph data wholesale. Links whose endpoints are missing are
	/// kept in `links` but never simulated.
	pub fn set_data(&mut self, data: &GraphData) {
		self.nodes = data.nodes.iter().cloned().map(Rc::new).collect();
		self.links = data.links.clone();
		self.index = self
			.nodes
			.iter()
			.enumerate()
			.map(|(i, n)| (n.id.clone(), i))
			.collect();
	}

	/// Slot of the node with `id`.
	pub fn slot_of(&self, id: &str) -> Option<usize> {
		self.index.get(id).copied()
	}

	/// Slot pairs of every link with both endpoints present.
	pub fn edge_slots(&self) -> Vec<(usize, usize)> {
		self.links
			.iter()
			.filter_map(|l| Some((self.slot_of(l.source.id())?, self.slot_of(l.target.id())?)))
			.collect()
	}

	/// Swap id endpoints for the node objects they point at.
	pub fn resolve_links(&mut self) {
		for link in &mut self.links {
			for end in [&mut link.source, &mut link.target] {
				if let NodeRef::Id(id) = end {
					if let Some(&slot) = self.index.get(id.as_str()) {
						*end = NodeRef::Node(self.nodes[slot].clone());
					}
				}
			}
		}
	}

	/// Register the node click callback, replacing any previous one.
	pub fn on_node_click(&mut self, handler: ClickHandler) {
		self.on_click = Some(handler);
	}

	/// The bound click callback.
	pub fn click_handler(&self) -> Option<ClickHandler> {
		self.on_click.clone()
	}
}
