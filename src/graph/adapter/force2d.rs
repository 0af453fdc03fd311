use log::debug;

use super::{FORCE_FONT_SIZE, Renderer, reusable};
use crate::graph::GraphError;
use crate::graph::container::Container;
use crate::graph::engine::{ForceGraph2D, ForceStyle};
use crate::graph::instance::GraphInstance;
use crate::graph::types::{GraphData, LayoutName, RenderStyle, RendererKind};

/// Renders through the planar force simulation. The layout name is ignored.
pub struct Force2DAdapter;

/// `nodeSize` becomes the node value; the engine turns it into an area.
pub(super) fn force_style(style: &RenderStyle) -> ForceStyle {
	ForceStyle {
		node_val: style.node_size,
		font_size: FORCE_FONT_SIZE * style.label_scale,
		show_labels: style.show_labels,
		label_color: style.palette.label.clone(),
		background: style.palette.background.clone(),
	}
}

impl Renderer for Force2DAdapter {
	fn kind(&self) -> RendererKind {
		RendererKind::Force2D
	}

	fn render(
		&self,
		data: &GraphData,
		_layout: LayoutName,
		container: &mut dyn Container,
		existing: Option<GraphInstance>,
		style: &RenderStyle,
	) -> Result<GraphInstance, GraphError> {
		let (width, height) = container.size();
		let mut instance = match reusable(existing, self.kind(), container) {
			Some(instance) => instance,
			None => {
				container.mount_surface()?;
				GraphInstance::Force2D(Box::new(ForceGraph2D::new(width, height)))
			}
		};
		instance.resize(width, height);
		if let GraphInstance::Force2D(graph) = &mut instance {
			graph.graph_data(data);
			graph.set_style(force_style(style));
			graph.resume_animation();
			debug!("force 2d: {} nodes, {} links", graph.core.nodes.len(), graph.core.links.len());
		}
		Ok(instance)
	}
}

#[cfg(test)]
mod tests {
	use super::super::tests::{Host, data, style};
	use super::*;
	use crate::graph::types::GraphConfig;

	#[test]
	fn node_size_is_an_area() {
		let config = GraphConfig {
			node_size: 9.0,
			label_scale: 1.5,
			..GraphConfig::default()
		};
		let inst = Force2DAdapter
			.render(&data(&["a"], &[]), config.layout, &mut Host::default(), None, &style(&config))
			.unwrap();
		let GraphInstance::Force2D(g) = &inst else {
			panic!("expected a 2d force instance");
		};
		assert_eq!(g.radius(), 12.0);
		assert_eq!(g.core.style.font_size, 18.0);
	}

	#[test]
	fn refresh_resumes_a_paused_engine() {
		let config = GraphConfig::default();
		let mut host = Host::default();
		let mut inst = Force2DAdapter
			.render(&data(&["a"], &[]), config.layout, &mut host, None, &style(&config))
			.unwrap();
		inst.teardown();
		let inst = Force2DAdapter
			.render(&data(&["a"], &[]), config.layout, &mut host, Some(inst), &style(&config))
			.unwrap();
		let GraphInstance::Force2D(g) = &inst else {
			panic!("expected a 2d force instance");
		};
		assert!(!g.is_paused());
	}
}
