//! A live engine handle and the capability probes used to drive it.

use super::engine::{ClickHandler, ElementGraph, ForceCore, ForceGraph2D, ForceGraph3D};
use super::types::RendererKind;
use super::viewport::{self, Scene};

/// One live visualization engine.
pub enum GraphInstance {
	/// Element-store engine with discrete layouts.
	ConstraintLayout(Box<ElementGraph>),
	/// Planar force simulation.
	Force2D(Box<ForceGraph2D>),
	/// Spatial force simulation.
	Force3D(Box<ForceGraph3D>),
}

/// What a handle exposes for styling and highlighting.
pub enum Capability<'a> {
	/// Element collection with per-element opacity.
	Elements(&'a mut ElementGraph),
	/// Node/link data with color accessors.
	GraphData(&'a mut ForceCore),
}

/// Which teardown path ran when a handle was released.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Teardown {
	/// The engine freed its resources.
	Destroyed,
	/// The engine has no destroy; its animation was stopped.
	Paused,
	/// Neither was available; the handle was only dropped.
	Released,
}

/// Try `destroy`, falling back to `pause`, falling back to dropping the handle.
fn release<T>(handle: &mut T, destroy: fn(&mut T) -> bool, pause: fn(&mut T) -> bool) -> Teardown {
	if destroy(handle) {
		Teardown::Destroyed
	} else if pause(handle) {
		Teardown::Paused
	} else {
		Teardown::Released
	}
}

/// A node click waiting to be delivered to its listeners.
pub struct NodeClick {
	/// Clicked node.
	pub id: String,
	handlers: Vec<ClickHandler>,
}

impl NodeClick {
	/// Call every listener with the clicked id.
	pub fn fire(self) {
		for handler in &self.handlers {
			handler(&self.id);
		}
	}
}

impl GraphInstance {
	/// The engine this handle wraps.
	pub fn kind(&self) -> RendererKind {
		match self {
			GraphInstance::ConstraintLayout(_) => RendererKind::ConstraintLayout,
			GraphInstance::Force2D(_) => RendererKind::Force2D,
			GraphInstance::Force3D(_) => RendererKind::Force3D,
		}
	}

	/// Probe which styling interface this engine offers.
	pub fn capability(&mut self) -> Capability<'_> {
		match self {
			GraphInstance::ConstraintLayout(g) => Capability::Elements(g),
			GraphInstance::Force2D(g) => Capability::GraphData(&mut g.core),
			GraphInstance::Force3D(g) => Capability::GraphData(&mut g.core),
		}
	}

	/// Element accessor; only the constraint-layout engine has one.
	pub fn elements(&self) -> Option<&ElementGraph> {
		match self {
			GraphInstance::ConstraintLayout(g) => Some(&**g),
			_ => None,
		}
	}

	/// Mutable element store, if this is the constraint-layout engine.
	pub fn elements_mut(&mut self) -> Option<&mut ElementGraph> {
		match self {
			GraphInstance::ConstraintLayout(g) => Some(&mut **g),
			_ => None,
		}
	}

	/// Graph data accessor; only the force-directed engines have one.
	pub fn graph_data(&self) -> Option<&ForceCore> {
		match self {
			GraphInstance::ConstraintLayout(_) => None,
			GraphInstance::Force2D(g) => Some(&g.core),
			GraphInstance::Force3D(g) => Some(&g.core),
		}
	}

	/// Mutable graph data, if this is a force engine.
	pub fn graph_data_mut(&mut self) -> Option<&mut ForceCore> {
		match self.capability() {
			Capability::GraphData(core) => Some(core),
			Capability::Elements(_) => None,
		}
	}

	/// Whether node size and label scale can be patched without re-rendering.
	pub fn supports_style_patch(&self) -> bool {
		self.elements().is_some()
	}

	/// Wire node clicks to `handler`.
	///
	/// Element engines drop earlier tap listeners first; force engines
	/// overwrite their single click callback.
	pub fn bind_node_click(&mut self, handler: ClickHandler) {
		match self.capability() {
			Capability::Elements(g) => {
				g.off_node_tap();
				g.on_node_tap(handler);
			}
			Capability::GraphData(core) => core.on_node_click(handler),
		}
	}

	fn try_destroy(&mut self) -> bool {
		match self {
			GraphInstance::ConstraintLayout(g) => {
				g.destroy();
				true
			}
			GraphInstance::Force3D(g) => {
				g.destroy();
				true
			}
			GraphInstance::Force2D(_) => false,
		}
	}

	fn try_pause(&mut self) -> bool {
		match self {
			GraphInstance::Force2D(g) => {
				g.pause_animation();
				true
			}
			GraphInstance::Force3D(g) => {
				g.pause_animation();
				true
			}
			GraphInstance::ConstraintLayout(_) => false,
		}
	}

	/// Release engine resources: destroy if supported, else pause animation.
	///
	/// Every current engine supports one of the two, so [`Teardown::Released`]
	/// is only reached by engines added without either.
	pub fn teardown(&mut self) -> Teardown {
		release(self, Self::try_destroy, Self::try_pause)
	}

	/// Advance animated engines by `dt` seconds.
	pub fn tick(&mut self, dt: f32) {
		match self {
			GraphInstance::ConstraintLayout(_) => {}
			GraphInstance::Force2D(g) => g.tick(dt),
			GraphInstance::Force3D(g) => g.tick(dt),
		}
	}

	/// The engine as a pannable, pickable scene.
	pub fn scene(&self) -> &dyn Scene {
		match self {
			GraphInstance::ConstraintLayout(g) => &**g,
			GraphInstance::Force2D(g) => &**g,
			GraphInstance::Force3D(g) => &**g,
		}
	}

	/// Mutable [`scene`](Self::scene).
	pub fn scene_mut(&mut self) -> &mut dyn Scene {
		match self {
			GraphInstance::ConstraintLayout(g) => &mut **g,
			GraphInstance::Force2D(g) => &mut **g,
			GraphInstance::Force3D(g) => &mut **g,
		}
	}

	fn click_handlers(&self) -> Vec<ClickHandler> {
		match self {
			GraphInstance::ConstraintLayout(g) => g.tap_listeners(),
			GraphInstance::Force2D(g) => g.core.click_handler().into_iter().collect(),
			GraphInstance::Force3D(g) => g.core.click_handler().into_iter().collect(),
		}
	}

	/// Build the click event for the node in `slot`, if it has listeners.
	pub fn node_click(&self, slot: usize) -> Option<NodeClick> {
		let id = self.scene().node_id(slot)?.to_string();
		let handlers = self.click_handlers();
		(!handlers.is_empty()).then_some(NodeClick { id, handlers })
	}

	/// Press at screen point `(x, y)`.
	pub fn pointer_down(&mut self, x: f64, y: f64) {
		viewport::pointer_down(self.scene_mut(), x, y);
	}

	/// Pointer moved to `(x, y)`.
	pub fn pointer_move(&mut self, x: f64, y: f64) {
		viewport::pointer_move(self.scene_mut(), x, y);
	}

	/// Finish a gesture; a click on a node yields the event to fire.
	pub fn pointer_up(&mut self, x: f64, y: f64) -> Option<NodeClick> {
		let slot = viewport::pointer_up(self.scene_mut(), x, y)?;
		self.node_click(slot)
	}

	/// Pointer left the surface.
	pub fn pointer_leave(&mut self) {
		viewport::pointer_leave(self.scene_mut());
	}

	/// Zoom by a wheel step at `(x, y)`.
	pub fn wheel(&mut self, x: f64, y: f64, delta_y: f64) {
		viewport::wheel(self.scene_mut(), x, y, delta_y);
	}

	/// Follow a change of the surface size.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.scene_mut().viewport_mut().resize(width, height);
	}
}
