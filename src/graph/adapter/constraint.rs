use log::debug;

use super::{Renderer, reusable};
use crate::graph::GraphError;
use crate::graph::container::Container;
use crate::graph::engine::{BASE_FONT_SIZE, ElementGraph, ElementStyle};
use crate::graph::instance::GraphInstance;
use crate::graph::types::{GraphData, LayoutName, RenderStyle, RendererKind};

/// Renders through the element-store engine and its discrete layouts.
pub struct ConstraintLayoutAdapter;

/// A style property the element engine can update without a re-render.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StylePatch {
	/// Node width and height.
	NodeSize(f64),
	/// Label font multiplier.
	LabelScale(f64),
}

/// Element stylesheet: nodes are `nodeSize` wide and tall.
fn element_style(style: &RenderStyle) -> ElementStyle {
	ElementStyle {
		width: style.node_size,
		height: style.node_size,
		font_size: BASE_FONT_SIZE * style.label_scale,
		show_labels: style.show_labels,
		label_color: style.palette.label.clone(),
		background: style.palette.background.clone(),
	}
}

/// Apply `patch` in place. Returns `false` when `instance` has no element
/// accessor and therefore needs a full re-render instead.
pub fn patch_style(instance: &mut GraphInstance, patch: StylePatch) -> bool {
	let Some(graph) = instance.elements_mut() else {
		return false;
	};
	match patch {
		StylePatch::NodeSize(size) => graph.set_node_size(size),
		StylePatch::LabelScale(scale) => graph.set_label_scale(scale),
	}
	true
}

impl Renderer for ConstraintLayoutAdapter {
	fn kind(&self) -> RendererKind {
		RendererKind::ConstraintLayout
	}

	fn render(
		&self,
		data: &GraphData,
		layout: LayoutName,
		container: &mut dyn Container,
		existing: Option<GraphInstance>,
		style: &RenderStyle,
	) -> Result<GraphInstance, GraphError> {
		let (width, height) = container.size();
		let mut instance = match reusable(existing, self.kind(), container) {
			Some(instance) => instance,
			None => {
				container.mount_surface()?;
				GraphInstance::ConstraintLayout(Box::new(ElementGraph::new(width, height)))
			}
		};
		instance.resize(width, height);
		if let Some(graph) = instance.elements_mut() {
			graph.remove_all();
			graph.add(data);
			graph.set_style(element_style(style));
			graph.run_layout(layout);
			debug!(
				"constraint layout: {} nodes, {} edges, layout {}",
				graph.nodes().len(),
				graph.edges().len(),
				layout
			);
		}
		Ok(instance)
	}
}
