//! Node placement for the constraint-layout engine.

use std::collections::VecDeque;
use std::f64::consts::PI;

use force_graph::{EdgeData, ForceGraph, NodeData, SimulationParameters};

use crate::graph::types::LayoutName;
use crate::style::stable_pair;

/// Simulation steps a `cose` layout runs before it is considered settled.
pub const COSE_ITERATIONS: usize = 300;

/// Compute positions for `ids`, centred on the origin.
///
/// `edges` index into `ids`; `spacing` is the centre-to-centre gap used by
/// the geometric layouts.
pub fn place(layout: LayoutName, ids: &[&str], edges: &[(usize, usize)], spacing: f64) -> Vec<(f64, f64)> {
	if ids.is_empty() {
		return Vec::new();
	}
	let positions = match layout.resolve() {
		LayoutName::Cose | LayoutName::Fcose => cose(ids.len(), edges),
		LayoutName::Grid => grid(ids.len(), spacing),
		LayoutName::Circle => circle(ids.len(), spacing),
		LayoutName::Concentric => concentric(ids.len(), edges, spacing),
		LayoutName::Breadthfirst => breadthfirst(ids.len(), edges, spacing),
		LayoutName::Random => random(ids, spacing),
	};
	centre(positions)
}

fn centre(mut positions: Vec<(f64, f64)>) -> Vec<(f64, f64)> {
	let n = positions.len() as f64;
	let (sx, sy) = positions
		.iter()
		.fold((0.0, 0.0), |(ax, ay), (x, y)| (ax + x, ay + y));
	let (cx, cy) = (sx / n, sy / n);
	for p in &mut positions {
		p.0 -= cx;
		p.1 -= cy;
	}
	positions
}

fn cose(n: usize, edges: &[(usize, usize)]) -> Vec<(f64, f64)> {
	let mut sim: ForceGraph<usize, ()> = ForceGraph::new(SimulationParameters {
		force_charge: 150.0,
		force_spring: 0.05,
		force_max: 100.0,
		node_speed: 3000.0,
		damping_factor: 0.9,
	});
	let handles: Vec<_> = (0..n)
		.map(|i| {
			let angle = i as f64 * 2.0 * PI / n as f64;
			sim.add_node(NodeData {
				x: (100.0 * angle.cos()) as f32,
				y: (100.0 * angle.sin()) as f32,
				mass: 10.0,
				is_anchor: false,
				user_data: i,
			})
		})
		.collect();
	for &(a, b) in edges {
		if a != b && a < n && b < n {
			sim.add_edge(handles[a], handles[b], EdgeData::default());
		}
	}
	for _ in 0..COSE_ITERATIONS {
		sim.update(0.016);
	}
	let mut positions = vec![(0.0, 0.0); n];
	sim.visit_nodes(|node| positions[node.data.user_data] = (node.x() as f64, node.y() as f64));
	positions
}

fn grid(n: usize, spacing: f64) -> Vec<(f64, f64)> {
	let cols = (n as f64).sqrt().ceil() as usize;
	(0..n)
		.map(|i| ((i % cols) as f64 * spacing, (i / cols) as f64 * spacing))
		.collect()
}

fn ring(count: usize, radius: f64, phase: f64) -> impl Iterator<Item = (f64, f64)> {
	(0..count).map(move |i| {
		let angle = phase + i as f64 * 2.0 * PI / count as f64;
		(radius * angle.cos(), radius * angle.sin())
	})
}

fn circle(n: usize, spacing: f64) -> Vec<(f64, f64)> {
	let radius = if n == 1 {
		0.0
	} else {
		(n as f64 * spacing / (2.0 * PI)).max(spacing)
	};
	ring(n, radius, -PI / 2.0).collect()
}

fn degrees(n: usize, edges: &[(usize, usize)]) -> Vec<usize> {
	let mut degree = vec![0usize; n];
	for &(a, b) in edges {
		if a < n && b < n {
			degree[a] += 1;
			degree[b] += 1;
		}
	}
	degree
}

fn concentric(n: usize, edges: &[(usize, usize)], spacing: f64) -> Vec<(f64, f64)> {
	let degree = degrees(n, edges);
	let mut order: Vec<usize> = (0..n).collect();
	order.sort_by(|a, b| degree[*b].cmp(&degree[*a]).then(a.cmp(b)));

	let mut positions = vec![(0.0, 0.0); n];
	let mut placed = 0;
	let mut level = 0usize;
	while placed < n {
		let remaining = &order[placed..];
		let level_degree = degree[remaining[0]];
		let on_level = remaining
			.iter()
			.take_while(|i| degree[**i] == level_degree)
			.count();
		let radius = level as f64 * spacing * 2.0;
		// a ring must be wide enough for its members
		let radius = radius.max(if on_level > 1 {
			on_level as f64 * spacing / (2.0 * PI)
		} else {
			0.0
		});
		for (slot, pos) in remaining[..on_level].iter().zip(ring(on_level, radius, 0.0)) {
			positions[*slot] = pos;
		}
		placed += on_level;
		level += 1;
	}
	positions
}

fn breadthfirst(n: usize, edges: &[(usize, usize)], spacing: f64) -> Vec<(f64, f64)> {
	let degree = degrees(n, edges);
	let mut adjacency = vec![Vec::new(); n];
	for &(a, b) in edges {
		if a < n && b < n && a != b {
			adjacency[a].push(b);
			adjacency[b].push(a);
		}
	}

	let mut roots: Vec<usize> = (0..n).collect();
	roots.sort_by(|a, b| degree[*b].cmp(&degree[*a]).then(a.cmp(b)));

	let mut depth = vec![usize::MAX; n];
	let mut rows: Vec<Vec<usize>> = Vec::new();
	for root in roots {
		if depth[root] != usize::MAX {
			continue;
		}
		depth[root] = 0;
		let mut queue = VecDeque::from([root]);
		while let Some(current) = queue.pop_front() {
			let d = depth[current];
			if rows.len() <= d {
				rows.resize_with(d + 1, Vec::new);
			}
			rows[d].push(current);
			for &next in &adjacency[current] {
				if depth[next] == usize::MAX {
					depth[next] = d + 1;
					queue.push_back(next);
				}
			}
		}
	}

	let mut positions = vec![(0.0, 0.0); n];
	for (d, row) in rows.iter().enumerate() {
		let width = (row.len() as f64 - 1.0) * spacing;
		for (i, slot) in row.iter().enumerate() {
			positions[*slot] = (i as f64 * spacing - width / 2.0, d as f64 * spacing * 1.5);
		}
	}
	positions
}

fn random(ids: &[&str], spacing: f64) -> Vec<(f64, f64)> {
	let extent = (ids.len() as f64).sqrt() * spacing;
	ids.iter()
		.map(|id| {
			let (x, y) = stable_pair(id);
			(x * extent, y * extent)
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	const IDS: &[&str] = &["a", "b", "c", "d", "e"];
	const EDGES: &[(usize, usize)] = &[(0, 1), (0, 2), (0, 3), (3, 4)];

	#[test]
	fn fcose_matches_cose() {
		let cose = place(LayoutName::Cose, IDS, EDGES, 30.0);
		let fcose = place(LayoutName::Fcose, IDS, EDGES, 30.0);
		assert_eq!(cose, fcose);
	}

	#[test]
	fn every_layout_places_every_node_centred() {
		for layout in LayoutName::all() {
			let positions = place(*layout, IDS, EDGES, 30.0);
			assert_eq!(positions.len(), IDS.len(), "{}", layout);
			let cx: f64 = positions.iter().map(|p| p.0).sum::<f64>() / 5.0;
			let cy: f64 = positions.iter().map(|p| p.1).sum::<f64>() / 5.0;
			assert!(cx.abs() < 1e-6 && cy.abs() < 1e-6, "{}", layout);
		}
	}

	#[test]
	fn grid_rows_are_square() {
		let positions = grid(5, 10.0);
		assert_eq!(positions[2], (20.0, 0.0));
		assert_eq!(positions[3], (0.0, 10.0));
	}

	#[test]
	fn breadthfirst_puts_hub_on_top_row() {
		let positions = breadthfirst(5, EDGES, 10.0);
		assert_eq!(positions[0].1, 0.0);
		assert_eq!(positions[4].1, 30.0);
	}

	#[test]
	fn concentric_keeps_hub_central() {
		let positions = concentric(5, EDGES, 10.0);
		assert_eq!(positions[0], (0.0, 0.0));
	}

	#[test]
	fn empty_and_single() {
		assert!(place(LayoutName::Circle, &[], &[], 10.0).is_empty());
		assert_eq!(place(LayoutName::Cose, &["a"], &[], 10.0), vec![(0.0, 0.0)]);
	}
}
