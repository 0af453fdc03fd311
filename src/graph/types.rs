use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::api::GraphResponse;
use crate::style::{Palette, Theme};

/// A note as drawn in the graph.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
	/// Node UUID.
	pub id: String,
	/// Text drawn next to the node.
	pub label: String,
	/// Fill color.
	pub color: String,
}

/// Link endpoint: a bare id, or the node itself once a force simulation has
/// resolved it.
#[derive(Clone, Debug)]
pub enum NodeRef {
	/// Unresolved id.
	Id(String),
	/// Resolved node.
	Node(Rc<GraphNode>),
}

impl NodeRef {
	/// Id of the referenced node, whichever form it is in.
	pub fn id(&self) -> &str {
		match self {
			NodeRef::Id(id) => id,
			NodeRef::Node(node) => &node.id,
		}
	}
}

impl From<&str> for NodeRef {
	fn from(id: &str) -> Self {
		NodeRef::Id(id.to_string())
	}
}

/// A link between two notes.
#[derive(Clone, Debug)]
pub struct GraphLink {
	/// Link source.
	pub source: NodeRef,
	/// Link target.
	pub target: NodeRef,
	/// Stroke color.
	pub color: String,
}

/// One rendered graph snapshot.
#[derive(Clone, Debug, Default)]
pub struct GraphData {
	/// Nodes of the snapshot.
	pub nodes: Vec<GraphNode>,
	/// Links; endpoints resolve to nodes once simulated.
	pub links: Vec<GraphLink>,
}

impl GraphData {
	/// Build a snapshot from the backend response, coloring it with `palette`.
	pub fn from_response(response: &GraphResponse, palette: &Palette) -> Self {
		let nodes = response
			.nodes
			.iter()
			.map(|n| GraphNode {
				id: n.id.clone(),
				label: n.title.clone(),
				color: palette.node_color(&n.id),
			})
			.collect();
		let links = response
			.edges
			.iter()
			.map(|e| GraphLink {
				source: NodeRef::Id(e.source.clone()),
				target: NodeRef::Id(e.dest.clone()),
				color: palette.edge.clone(),
			})
			.collect();
		Self { nodes, links }
	}
}

/// The visualization engine behind the graph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RendererKind {
	/// Element-store renderer with discrete layouts and live style patches.
	#[default]
	#[serde(rename = "constraint")]
	ConstraintLayout,
	/// Planar force simulation.
	#[serde(rename = "force-2d")]
	Force2D,
	/// Spatial force simulation with a perspective camera.
	#[serde(rename = "force-3d")]
	Force3D,
}

impl RendererKind {
	/// Identifier used in settings and persisted state.
	pub fn as_str(self) -> &'static str {
		match self {
			RendererKind::ConstraintLayout => "constraint",
			RendererKind::Force2D => "force-2d",
			RendererKind::Force3D => "force-3d",
		}
	}

	/// All renderers in menu order.
	pub fn all() -> &'static [RendererKind] {
		&[
			RendererKind::ConstraintLayout,
			RendererKind::Force2D,
			RendererKind::Force3D,
		]
	}
}

impl fmt::Display for RendererKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for RendererKind {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::all()
			.iter()
			.copied()
			.find(|k| k.as_str() == s)
			.ok_or(())
	}
}

/// Layout algorithm for the constraint-layout renderer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutName {
	/// Force-directed placement.
	#[default]
	Cose,
	/// Accepted for compatibility; always runs [`LayoutName::Cose`].
	Fcose,
	/// Square grid in input order.
	Grid,
	/// Single ring.
	Circle,
	/// Rings by degree, busiest in the middle.
	Concentric,
	/// Rows by breadth-first depth.
	Breadthfirst,
	/// Scatter seeded by the node id.
	Random,
}

impl LayoutName {
	/// Identifier used in settings and persisted state.
	pub fn as_str(self) -> &'static str {
		match self {
			LayoutName::Cose => "cose",
			LayoutName::Fcose => "fcose",
			LayoutName::Grid => "grid",
			LayoutName::Circle => "circle",
			LayoutName::Concentric => "concentric",
			LayoutName::Breadthfirst => "breadthfirst",
			LayoutName::Random => "random",
		}
	}

	/// All layouts in menu order.
	pub fn all() -> &'static [LayoutName] {
		&[
			LayoutName::Cose,
			LayoutName::Fcose,
			LayoutName::Grid,
			LayoutName::Circle,
			LayoutName::Concentric,
			LayoutName::Breadthfirst,
			LayoutName::Random,
		]
	}

	/// The algorithm that actually runs for this name.
	pub fn resolve(self) -> LayoutName {
		match self {
			LayoutName::Fcose => LayoutName::Cose,
			other => other,
		}
	}
}

impl fmt::Display for LayoutName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for LayoutName {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::all()
			.iter()
			.copied()
			.find(|l| l.as_str() == s)
			.ok_or(())
	}
}

/// View configuration owned by the graph manager.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphConfig {
	/// Engine family.
	pub renderer: RendererKind,
	/// Layout of the constraint-layout engine.
	pub layout: LayoutName,
	/// Node size; each engine reads it on its own scale.
	pub node_size: f64,
	/// Label font multiplier.
	pub label_scale: f64,
	/// Whether labels are drawn.
	pub show_labels: bool,
}

impl Default for GraphConfig {
	fn default() -> Self {
		Self {
			renderer: RendererKind::default(),
			layout: LayoutName::default(),
			node_size: 10.0,
			label_scale: 1.0,
			show_labels: true,
		}
	}
}

/// Everything an adapter needs to style one render.
#[derive(Clone, Debug)]
pub struct RenderStyle {
	/// Active theme.
	pub theme: Theme,
	/// Colors resolved for `theme`.
	pub palette: Palette,
	/// Node size.
	pub node_size: f64,
	/// Label font multiplier.
	pub label_scale: f64,
	/// Whether labels are drawn.
	pub show_labels: bool,
}

impl RenderStyle {
	/// Style for `config` under `theme`.
	pub fn new(config: &GraphConfig, theme: Theme, palette: Palette) -> Self {
		Self {
			theme,
			palette,
			node_size: config.node_size,
			label_scale: config.label_scale,
			show_labels: config.show_labels,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::api::{EdgeRecord, NodeSummary};
	use crate::style::NoCss;

	#[test]
	fn fcose_resolves_to_cose() {
		assert_eq!(LayoutName::Fcose.resolve(), LayoutName::Cose);
		assert_eq!(LayoutName::Grid.resolve(), LayoutName::Grid);
	}

	#[test]
	fn names_parse_back() {
		for layout in LayoutName::all() {
			assert_eq!(layout.as_str().parse::<LayoutName>(), Ok(*layout));
		}
		for kind in RendererKind::all() {
			assert_eq!(kind.as_str().parse::<RendererKind>(), Ok(*kind));
		}
		assert!("webgl".parse::<RendererKind>().is_err());
	}

	#[test]
	fn serde_names_match_display() {
		let json = serde_json::to_string(&RendererKind::Force3D).unwrap();
		assert_eq!(json, "\"force-3d\"");
		let json = serde_json::to_string(&LayoutName::Breadthfirst).unwrap();
		assert_eq!(json, "\"breadthfirst\"");
	}

	#[test]
	fn response_becomes_colored_snapshot() {
		let palette = Palette::resolve(Theme::Dark, &NoCss);
		let response = GraphResponse {
			nodes: vec![
				NodeSummary {
					id: "a".into(),
					title: "Alpha".into(),
				},
				NodeSummary {
					id: "b".into(),
					title: "Beta".into(),
				},
			],
			edges: vec![EdgeRecord {
				source: "a".into(),
				dest: "b".into(),
			}],
		};
		let data = GraphData::from_response(&response, &palette);
		assert_eq!(data.nodes[0].label, "Alpha");
		assert_eq!(data.nodes[0].color, palette.node_color("a"));
		assert_eq!(data.links[0].target.id(), "b");
		assert_eq!(data.links[0].color, palette.edge);
	}
}
