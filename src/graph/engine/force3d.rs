use std::collections::HashMap;
use std::f64::consts::PI;

use glam::{DMat3, DVec3};

use super::force_data::{ForceCore, ForceStyle};
use crate::graph::types::GraphData;
use crate::graph::viewport::{Scene, Viewport};

/// Radius multiplier: `radius = cbrt(val) * NODE_REL_SIZE`, so `val` reads as volume.
pub const NODE_REL_SIZE: f64 = 4.0;
/// Camera distance from the origin.
pub const FOCAL_LENGTH: f64 = 600.0;

const CHARGE: f64 = 900.0;
const SOFTENING: f64 = 25.0;
const LINK_DISTANCE: f64 = 40.0;
const SPRING: f64 = 0.02;
const CENTER_PULL: f64 = 0.002;
const DAMPING: f64 = 0.85;
const MAX_SPEED: f64 = 40.0;
const AUTO_ROTATE: f64 = 0.1;
const ORBIT_SPEED: f64 = 0.01;

/// A node after camera projection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
	/// Node slot.
	pub slot: usize,
	/// Screen x.
	pub x: f64,
	/// Screen y.
	pub y: f64,
	/// Perspective factor, larger when closer to the camera.
	pub scale: f64,
	/// Distance from the camera.
	pub depth: f64,
}

/// Spatial force-directed engine viewed through an orbiting perspective camera.
pub struct ForceGraph3D {
	/// Node and link data with color accessors.
	pub core: ForceCore,
	positions: Vec<DVec3>,
	velocities: Vec<DVec3>,
	edges: Vec<(usize, usize)>,
	yaw: f64,
	pitch: f64,
	orbit_start: (f64, f64),
	viewport: Viewport,
	paused: bool,
	destroyed: bool,
}

fn sphere_point(slot: usize, count: usize) -> DVec3 {
	// fibonacci sphere, radius 100
	let golden = PI * (3.0 - 5f64.sqrt());
	let y = 1.0 - 2.0 * (slot as f64 + 0.5) / count.max(1) as f64;
	let r = (1.0 - y * y).sqrt();
	let theta = golden * slot as f64;
	DVec3::new(r * theta.cos(), y, r * theta.sin()) * 100.0
}

impl ForceGraph3D {
	/// Empty engine over a `width` × `height` viewport.
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			core: ForceCore::default(),
			positions: Vec::new(),
			velocities: Vec::new(),
			edges: Vec::new(),
			yaw: 0.0,
			pitch: 0.3,
			orbit_start: (0.0, 0.3),
			viewport: Viewport::new(width, height),
			paused: false,
			destroyed: false,
		}
	}

	/// Replace the graph data. Nodes already in the scene keep their positions.
	pub fn graph_data(&mut self, data: &GraphData) {
		let previous: HashMap<String, DVec3> = self
			.core
			.nodes
			.iter()
			.zip(&self.positions)
			.map(|(n, p)| (n.id.clone(), *p))
			.collect();

		self.core.set_data(data);
		let count = self.core.nodes.len();
		self.positions = self
			.core
			.nodes
			.iter()
			.enumerate()
			.map(|(slot, n)| {
				previous
					.get(&n.id)
					.copied()
					.unwrap_or_else(|| sphere_point(slot, count))
			})
			.collect();
		self.velocities = vec![DVec3::ZERO; count];
		self.edges = self
			.core
			.edge_slots()
			.into_iter()
			.filter(|(a, b)| a != b)
			.collect();
		self.destroyed = false;
	}

	/// Replace the style.
	pub fn set_style(&mut self, style: ForceStyle) {
		self.core.style = style;
	}

	/// Node radius before perspective.
	pub fn radius(&self) -> f64 {
		self.core.style.node_val.max(0.0).cbrt() * NODE_REL_SIZE
	}

	/// World positions, indexed by node slot.
	pub fn positions(&self) -> &[DVec3] {
		&self.positions
	}

	/// Advance the simulation by `dt` seconds and keep the camera turning.
	pub fn tick(&mut self, dt: f32) {
		if self.paused || self.destroyed {
			return;
		}
		self.core.resolve_links();
		let steps = (dt as f64 * 60.0).clamp(0.25, 3.0);
		self.step_physics(steps);
		self.yaw = (self.yaw + AUTO_ROTATE * dt as f64) % (2.0 * PI);
	}

	fn step_physics(&mut self, steps: f64) {
		let n = self.positions.len();
		let mut forces = vec![DVec3::ZERO; n];

		for i in 0..n {
			for j in (i + 1)..n {
				let d = self.positions[i] - self.positions[j];
				let dist_sq = d.length_squared() + SOFTENING;
				let f = d.normalize_or_zero() * (CHARGE / dist_sq);
				forces[i] += f;
				forces[j] -= f;
			}
		}

		for &(a, b) in &self.edges {
			let d = self.positions[b] - self.positions[a];
			let dist = d.length().max(0.01);
			let f = d / dist * ((dist - LINK_DISTANCE) * SPRING);
			forces[a] += f;
			forces[b] -= f;
		}

		for ((p, v), force) in self.positions.iter_mut().zip(&mut self.velocities).zip(forces) {
			*v = ((*v + force - *p * CENTER_PULL) * DAMPING).clamp_length_max(MAX_SPEED);
			*p += *v * steps;
		}
	}

	/// Project every node through the camera, far to near.
	pub fn projected(&self) -> Vec<Projected> {
		let t = &self.viewport.transform;
		// yaw about the vertical axis, then pitch towards the camera
		let camera = DMat3::from_rotation_x(self.pitch) * DMat3::from_rotation_y(-self.yaw);
		let mut out: Vec<Projected> = self
			.positions
			.iter()
			.enumerate()
			.filter_map(|(slot, &p)| {
				let view = camera * p;
				let depth = FOCAL_LENGTH + view.z;
				if depth <= 1.0 {
					return None;
				}
				let scale = FOCAL_LENGTH / depth;
				Some(Projected {
					slot,
					x: t.x + view.x * scale * t.k,
					y: t.y + view.y * scale * t.k,
					scale,
					depth,
				})
			})
			.collect();
		out.sort_by(|a, b| b.depth.total_cmp(&a.depth));
		out
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

	/// Release the simulation buffers and stop ticking.
	pub fn destroy(&mut self) {
		self.destroyed = true;
		self.paused = true;
		self.positions.clear();
		self.velocities.clear();
		self.edges.clear();
	}

	/// Whether `destroy` has run.
	pub fn is_destroyed(&self) -> bool {
		self.destroyed
	}
}

impl Scene for ForceGraph3D {
	fn viewport(&self) -> &Viewport {
		&self.viewport
	}

	fn viewport_mut(&mut self) -> &mut Viewport {
		&mut self.viewport
	}

	fn node_at(&self, sx: f64, sy: f64) -> Option<usize> {
		let (radius, k) = (self.radius(), self.viewport.transform.k);
		// nearest to the camera wins
		self.projected()
			.into_iter()
			.rev()
			.find(|p| (p.x - sx).hypot(p.y - sy) < radius * p.scale * k + 2.0)
			.map(|p| p.slot)
	}

	fn node_id(&self, slot: usize) -> Option<&str> {
		self.core.nodes.get(slot).map(|n| n.id.as_str())
	}

	fn grab_node(&mut self, _slot: usize) -> Option<(f64, f64)> {
		None
	}

	fn drag_node(&mut self, _slot: usize, _x: f64, _y: f64) {}

	fn begin_pan(&mut self) {
		self.orbit_start = (self.yaw, self.pitch);
	}

	/// Background drags orbit the camera instead of panning.
	fn pan_by(&mut self, dx: f64, dy: f64) {
		let (yaw, pitch) = self.orbit_start;
		self.yaw = yaw + dx * ORBIT_SPEED;
		self.pitch = (pitch + dy * ORBIT_SPEED).clamp(-PI / 2.0, PI / 2.0);
	}
}
