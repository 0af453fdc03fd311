use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::engine::{ElementGraph, ForceGraph2D, ForceGraph3D};
use super::instance::GraphInstance;
use super::viewport::Scene;

const ARROW_SIZE: f64 = 6.0;
const LABEL_GAP: f64 = 3.0;

/// Paint one frame of `instance`.
pub fn draw(instance: &GraphInstance, ctx: &CanvasRenderingContext2d) {
	match instance {
		GraphInstance::ConstraintLayout(g) => draw_elements(g, ctx),
		GraphInstance::Force2D(g) => draw_force2d(g, ctx),
		GraphInstance::Force3D(g) => draw_force3d(g, ctx),
	}
}

fn clear(scene: &dyn Scene, background: &str, ctx: &CanvasRenderingContext2d) {
	let vp = scene.viewport();
	ctx.set_global_alpha(1.0);
	ctx.set_fill_style_str(background);
	ctx.fill_rect(0.0, 0.0, vp.width, vp.height);
}

fn enter_world(scene: &dyn Scene, ctx: &CanvasRenderingContext2d) {
	let t = &scene.viewport().transform;
	ctx.save();
	let _ = ctx.translate(t.x, t.y);
	let _ = ctx.scale(t.k, t.k);
}

/// Straight link from `a` to `b` with an arrowhead touching the target's rim.
fn draw_link(ctx: &CanvasRenderingContext2d, a: (f64, f64), b: (f64, f64), target_radius: f64, width: f64) {
	let (dx, dy) = (b.0 - a.0, b.1 - a.1);
	let dist = dx.hypot(dy);
	if dist < 0.001 {
		return;
	}
	let (ux, uy) = (dx / dist, dy / dist);
	let arrow = ARROW_SIZE * width;
	let (tip_x, tip_y) = (b.0 - ux * target_radius, b.1 - uy * target_radius);
	let (back_x, back_y) = (tip_x - ux * arrow, tip_y - uy * arrow);

	ctx.set_line_width(width);
	ctx.begin_path();
	ctx.move_to(a.0, a.1);
	ctx.line_to(back_x, back_y);
	ctx.stroke();

	let (px, py) = (-uy * arrow * 0.5, ux * arrow * 0.5);
	ctx.begin_path();
	ctx.move_to(tip_x, tip_y);
	ctx.line_to(back_x + px, back_y + py);
	ctx.line_to(back_x - px, back_y - py);
	ctx.close_path();
	ctx.fill();
}

fn draw_elements(g: &ElementGraph, ctx: &CanvasRenderingContext2d) {
	let style = g.style();
	clear(g, &style.background, ctx);
	if g.is_destroyed() {
		return;
	}
	enter_world(g, ctx);
	let k = g.viewport().transform.k;
	let (rx, ry) = (style.width / 2.0, style.height / 2.0);

	for edge in g.edges() {
		let (Some(a), Some(b)) = (g.node(&edge.source), g.node(&edge.target)) else {
			continue;
		};
		ctx.set_global_alpha(edge.opacity);
		ctx.set_stroke_style_str(&edge.color);
		ctx.set_fill_style_str(&edge.color);
		draw_link(ctx, (a.x, a.y), (b.x, b.y), rx.max(ry), 1.0 / k.max(0.5));
	}

	for node in g.nodes() {
		ctx.set_global_alpha(node.opacity);
		ctx.begin_path();
		let _ = ctx.ellipse(node.x, node.y, rx, ry, 0.0, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&node.data.color);
		ctx.fill();
		if style.show_labels {
			ctx.set_fill_style_str(&style.label_color);
			ctx.set_font(&format!("{}px sans-serif", style.font_size));
			ctx.set_text_align("center");
			let _ = ctx.fill_text(&node.data.label, node.x, node.y + ry + style.font_size + LABEL_GAP);
		}
	}
	ctx.set_global_alpha(1.0);
	ctx.restore();
}

fn draw_force2d(g: &ForceGraph2D, ctx: &CanvasRenderingContext2d) {
	let core = &g.core;
	clear(g, &core.style.background, ctx);
	enter_world(g, ctx);
	let k = g.viewport().transform.k;
	let radius = g.radius();
	let positions = g.positions();

	for link in &core.links {
		let (Some(a), Some(b)) = (core.slot_of(link.source.id()), core.slot_of(link.target.id())) else {
			continue;
		};
		let color = core.link_color.link_color(link);
		ctx.set_stroke_style_str(&color);
		ctx.set_fill_style_str(&color);
		draw_link(ctx, positions[a], positions[b], radius, 1.0 / k.max(0.5));
	}

	ctx.set_font(&format!("{}px sans-serif", core.style.font_size / k.max(0.5)));
	ctx.set_text_align("left");
	for (node, &(x, y)) in core.nodes.iter().zip(positions) {
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&core.node_color.node_color(node));
		ctx.fill();
		if core.style.show_labels {
			ctx.set_fill_style_str(&core.style.label_color);
			let _ = ctx.fill_text(&node.label, x + radius + LABEL_GAP, y + LABEL_GAP);
		}
	}
	ctx.restore();
}

/// Projections are already in screen space, so no world transform applies.
fn draw_force3d(g: &ForceGraph3D, ctx: &CanvasRenderingContext2d) {
	let core = &g.core;
	clear(g, &core.style.background, ctx);
	if g.is_destroyed() {
		return;
	}
	let k = g.viewport().transform.k;
	let radius = g.radius();
	let projected = g.projected();
	let mut by_slot = vec![None; core.nodes.len()];
	for p in &projected {
		if let Some(entry) = by_slot.get_mut(p.slot) {
			*entry = Some(*p);
		}
	}

	ctx.set_line_width(1.0);
	for link in &core.links {
		let ends = core
			.slot_of(link.source.id())
			.zip(core.slot_of(link.target.id()));
		let Some((Some(a), Some(b))) = ends.map(|(a, b)| (by_slot[a], by_slot[b])) else {
			continue;
		};
		ctx.set_stroke_style_str(&core.link_color.link_color(link));
		ctx.begin_path();
		ctx.move_to(a.x, a.y);
		ctx.line_to(b.x, b.y);
		ctx.stroke();
	}

	ctx.set_text_align("left");
	for p in &projected {
		let Some(node) = core.nodes.get(p.slot) else {
			continue;
		};
		let r = radius * p.scale * k;
		ctx.begin_path();
		let _ = ctx.arc(p.x, p.y, r, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&core.node_color.node_color(node));
		ctx.fill();
		if core.style.show_labels {
			ctx.set_fill_style_str(&core.style.label_color);
			ctx.set_font(&format!("{}px sans-serif", core.style.font_size * p.scale));
			let _ = ctx.fill_text(&node.label, p.x + r + LABEL_GAP, p.y + LABEL_GAP);
		}
	}
}
