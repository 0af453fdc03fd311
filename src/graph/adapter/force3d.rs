use log::debug;

use super::force2d::force_style;
use super::{Renderer, reusable};
use crate::graph::GraphError;
use crate::graph::container::Container;
use crate::graph::engine::ForceGraph3D;
use crate::graph::instance::GraphInstance;
use crate::graph::types::{GraphData, LayoutName, RenderStyle, RendererKind};

/// Renders through the spatial force simulation and orbit camera.
///
/// Shares the 2D style derivation; the engine reads the node value as a
/// volume rather than an area.
pub struct Force3DAdapter;

impl Renderer for Force3DAdapter {
	fn kind(&self) -> RendererKind {
		RendererKind::Force3D
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
				GraphInstance::Force3D(Box::new(ForceGraph3D::new(width, height)))
			}
		};
		instance.resize(width, height);
		if let GraphInstance::Force3D(graph) = &mut instance {
			graph.graph_data(data);
			graph.set_style(force_style(style));
			graph.resume_animation();
			debug!("force 3d: {} nodes, {} links", graph.core.nodes.len(), graph.core.links.len());
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
	fn node_size_is_a_volume() {
		let config = GraphConfig {
			node_size: 8.0,
			..GraphConfig::default()
		};
		let inst = Force3DAdapter
			.render(&data(&["a", "b"], &[("a", "b")]), config.layout, &mut Host::default(), None, &style(&config))
			.unwrap();
		let GraphInstance::Force3D(g) = &inst else {
			panic!("expected a 3d force instance");
		};
		assert!((g.radius() - 8.0).abs() < 1e-9);
		assert_eq!(g.projected().len(), 2);
	}
}
