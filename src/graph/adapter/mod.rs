//! One adapter per renderer family behind a uniform `render` contract.
//!
//! Each adapter derives node size and label font from the shared
//! [`RenderStyle`] with its own engine's geometry, so equal settings do not
//! look identical across renderers.

mod constraint;
mod force2d;
mod force3d;

use log::debug;

pub use constraint::{ConstraintLayoutAdapter, StylePatch, patch_style};
pub use force2d::Force2DAdapter;
pub use force3d::Force3DAdapter;

use super::GraphError;
use super::container::Container;
use super::instance::GraphInstance;
use super::types::{GraphData, LayoutName, RenderStyle, RendererKind};

/// Label font size of the force renderers at `labelScale == 1`.
pub const FORCE_FONT_SIZE: f64 = 12.0;

/// Draws graph data through one visualization engine.
pub trait Renderer {
	/// The engine this adapter drives.
	fn kind(&self) -> RendererKind;

	/// Render `data` into `container`.
	///
	/// With `existing`, the handle is updated in place and handed back.
	/// Otherwise a new engine is constructed and bound to the container.
	fn render(
		&self,
		data: &GraphData,
		layout: LayoutName,
		container: &mut dyn Container,
		existing: Option<GraphInstance>,
		style: &RenderStyle,
	) -> Result<GraphInstance, GraphError>;
}

/// The adapter for `kind`.
pub fn adapter_for(kind: RendererKind) -> &'static dyn Renderer {
	match kind {
		RendererKind::ConstraintLayout => &ConstraintLayoutAdapter,
		RendererKind::Force2D => &Force2DAdapter,
		RendererKind::Force3D => &Force3DAdapter,
	}
}

/// Split `existing` into a reusable handle of the adapter's own family.
///
/// A handle from another family is torn down and the container emptied so the
/// caller can build a fresh engine.
fn reusable(existing: Option<GraphInstance>, kind: RendererKind, container: &mut dyn Container) -> Option<GraphInstance> {
	let mut instance = existing?;
	if instance.kind() == kind {
		return Some(instance);
	}
	debug!("{} adapter replacing a {} instance", kind, instance.kind());
	instance.teardown();
	container.clear_children();
	None
}
