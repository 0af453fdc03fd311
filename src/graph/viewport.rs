//! Pan, zoom and drag handling shared by every engine.

/// Pointer travel (screen px) below which a press/release counts as a click.
pub const CLICK_SLOP: f64 = 4.0;

/// Screen offset `(x, y)` and zoom `k` of the world origin.
#[derive(Clone, Debug)]
pub struct ViewTransform {
	/// Screen x of the origin.
	pub x: f64,
	/// Screen y of the origin.
	pub y: f64,
	/// Zoom factor.
	pub k: f64,
}

/// A node drag in progress.
#[derive(Clone, Debug, Default)]
pub struct DragState {
	/// Whether the gesture is running.
	pub active: bool,
	/// Slot of the dragged node.
	pub node: Option<usize>,
	/// Screen x of the press.
	pub start_x: f64,
	/// Screen y of the press.
	pub start_y: f64,
	/// World x of the node at the press.
	pub node_start_x: f64,
	/// World y of the node at the press.
	pub node_start_y: f64,
}

/// A background pan in progress.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	/// Whether the gesture is running.
	pub active: bool,
	/// Screen x of the press.
	pub start_x: f64,
	/// Screen y of the press.
	pub start_y: f64,
	/// Transform x at the press.
	pub transform_start_x: f64,
	/// Transform y at the press.
	pub transform_start_y: f64,
}

/// Screen-space view of one engine.
#[derive(Clone, Debug)]
pub struct Viewport {
	/// Current pan and zoom.
	pub transform: ViewTransform,
	/// Node drag state.
	pub drag: DragState,
	/// Background pan state.
	pub pan: PanState,
	/// Width in CSS pixels.
	pub width: f64,
	/// Height in CSS pixels.
	pub height: f64,
	press: Option<(f64, f64)>,
}

impl Viewport {
	/// Viewport of `width` × `height` with the world origin centred.
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			width,
			height,
			press: None,
		}
	}

	/// Convert a screen point to world coordinates.
	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Record a new surface size.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	fn reset_gesture(&mut self) {
		self.drag.active = false;
		self.drag.node = None;
		self.pan.active = false;
		self.press = None;
	}
}

/// An engine that can be panned, zoomed and have its nodes picked.
pub trait Scene {
	/// Viewport of this scene.
	fn viewport(&self) -> &Viewport;
	/// Mutable viewport of this scene.
	fn viewport_mut(&mut self) -> &mut Viewport;

	/// Node slot drawn under the screen point, if any.
	fn node_at(&self, sx: f64, sy: f64) -> Option<usize>;

	/// Id of the node in `slot`.
	fn node_id(&self, slot: usize) -> Option<&str>;

	/// World position of a node about to be dragged, or `None` if nodes of
	/// this engine cannot be dragged.
	fn grab_node(&mut self, slot: usize) -> Option<(f64, f64)>;

	/// Move the grabbed node to world point `(x, y)`.
	fn drag_node(&mut self, slot: usize, x: f64, y: f64);

	/// A background drag is starting.
	fn begin_pan(&mut self) {}

	/// Background drag by a total screen offset since the press.
	fn pan_by(&mut self, dx: f64, dy: f64) {
		let vp = self.viewport_mut();
		vp.transform.x = vp.pan.transform_start_x + dx;
		vp.transform.y = vp.pan.transform_start_y + dy;
	}
}

/// Start a gesture: a node drag when over a node, else a pan.
pub fn pointer_down<S: Scene + ?Sized>(scene: &mut S, x: f64, y: f64) {
	scene.viewport_mut().press = Some((x, y));
	let grabbed = scene
		.node_at(x, y)
		.and_then(|slot| scene.grab_node(slot).map(|pos| (slot, pos)));

	let vp = scene.viewport_mut();
	if let Some((slot, (nx, ny))) = grabbed {
		vp.drag = DragState {
			active: true,
			node: Some(slot),
			start_x: x,
			start_y: y,
			node_start_x: nx,
			node_start_y: ny,
		};
	} else {
		vp.pan = PanState {
			active: true,
			start_x: x,
			start_y: y,
			transform_start_x: vp.transform.x,
			transform_start_y: vp.transform.y,
		};
		scene.begin_pan();
	}
}

/// Continue the current gesture.
pub fn pointer_move<S: Scene + ?Sized>(scene: &mut S, x: f64, y: f64) {
	let vp = scene.viewport();
	if vp.drag.active {
		if let Some(slot) = vp.drag.node {
			let k = vp.transform.k;
			let (nx, ny) = (
				vp.drag.node_start_x + (x - vp.drag.start_x) / k,
				vp.drag.node_start_y + (y - vp.drag.start_y) / k,
			);
			scene.drag_node(slot, nx, ny);
		}
	} else if vp.pan.active {
		let (dx, dy) = (x - vp.pan.start_x, y - vp.pan.start_y);
		scene.pan_by(dx, dy);
	}
}

/// Finish a gesture; returns the clicked node slot when the pointer barely moved.
pub fn pointer_up<S: Scene + ?Sized>(scene: &mut S, x: f64, y: f64) -> Option<usize> {
	let press = scene.viewport().press;
	scene.viewport_mut().reset_gesture();
	let (px, py) = press?;
	if (x - px).hypot(y - py) > CLICK_SLOP {
		return None;
	}
	scene.node_at(x, y)
}

/// Abandon the current gesture.
pub fn pointer_leave<S: Scene + ?Sized>(scene: &mut S) {
	scene.viewport_mut().reset_gesture();
}

/// Zoom around the cursor, clamped to `0.1..=10`.
pub fn wheel<S: Scene + ?Sized>(scene: &mut S, x: f64, y: f64, delta_y: f64) {
	let t = &mut scene.viewport_mut().transform;
	let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
	let new_k = (t.k * factor).clamp(0.1, 10.0);
	let ratio = new_k / t.k;
	t.x = x - (x - t.x) * ratio;
	t.y = y - (y - t.y) * ratio;
	t.k = new_k;
}

#[cfg(test)]
mod tests {
	use super::*;

	struct Dots {
		vp: Viewport,
		pos: Vec<(f64, f64)>,
	}

	impl Scene for Dots {
		fn viewport(&self) -> &Viewport {
			&self.vp
		}
		fn viewport_mut(&mut self) -> &mut Viewport {
			&mut self.vp
		}
		fn node_at(&self, sx: f64, sy: f64) -> Option<usize> {
			let (gx, gy) = self.vp.screen_to_graph(sx, sy);
			self.pos
				.iter()
				.position(|(x, y)| (x - gx).hypot(y - gy) < 5.0)
		}
		fn node_id(&self, _slot: usize) -> Option<&str> {
			None
		}
		fn grab_node(&mut self, slot: usize) -> Option<(f64, f64)> {
			self.pos.get(slot).copied()
		}
		fn drag_node(&mut self, slot: usize, x: f64, y: f64) {
			self.pos[slot] = (x, y);
		}
	}

	fn dots() -> Dots {
		Dots {
			vp: Viewport::new(200.0, 100.0),
			pos: vec![(0.0, 0.0)],
		}
	}

	#[test]
	fn click_on_node_reports_slot() {
		let mut s = dots();
		pointer_down(&mut s, 100.0, 50.0);
		assert_eq!(pointer_up(&mut s, 101.0, 50.0), Some(0));
	}

	#[test]
	fn drag_moves_node_and_is_not_a_click() {
		let mut s = dots();
		pointer_down(&mut s, 100.0, 50.0);
		pointer_move(&mut s, 120.0, 60.0);
		assert_eq!(s.pos[0], (20.0, 10.0));
		assert_eq!(pointer_up(&mut s, 120.0, 60.0), None);
	}

	#[test]
	fn background_drag_pans() {
		let mut s = dots();
		pointer_down(&mut s, 10.0, 10.0);
		pointer_move(&mut s, 30.0, 5.0);
		assert_eq!((s.vp.transform.x, s.vp.transform.y), (120.0, 45.0));
		pointer_leave(&mut s);
		assert!(!s.vp.pan.active);
	}

	#[test]
	fn wheel_zoom_is_clamped() {
		let mut s = dots();
		for _ in 0..100 {
			wheel(&mut s, 0.0, 0.0, -1.0);
		}
		assert_eq!(s.vp.transform.k, 10.0);
	}
}
