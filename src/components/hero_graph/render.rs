//! Drawing for the hero graph.
//!
//! Rendering is a pure function of the simulation, the pointer sample, and a
//! [`RenderStyle`]. It issues calls on a [`DrawTarget`] so the same pass can
//! paint a canvas or be recorded in tests. Two passes keep z-ordering simple:
//! 1. Edges between every pair within the link distance
//! 2. Node markers on top

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::pointer::PointerSample;
use super::simulation::Simulation;
use super::theme::{Color, clamp_unit};

/// Minimal drawing surface used by the render pass. Coordinates are logical
/// pixels.
pub trait DrawTarget {
	/// Erase the whole surface.
	fn clear(&self, width: f64, height: f64);
	/// Stroke a straight segment.
	fn stroke_line(&self, from: (f64, f64), to: (f64, f64), width: f64, color: Color);
	/// Fill a disc.
	fn fill_circle(&self, center: (f64, f64), radius: f64, color: Color);
}

impl DrawTarget for CanvasRenderingContext2d {
	fn clear(&self, width: f64, height: f64) {
		self.clear_rect(0.0, 0.0, width, height);
	}

	fn stroke_line(&self, from: (f64, f64), to: (f64, f64), width: f64, color: Color) {
		self.set_stroke_style_str(&color.to_css());
		self.set_line_width(width);
		self.begin_path();
		self.move_to(from.0, from.1);
		self.line_to(to.0, to.1);
		self.stroke();
	}

	fn fill_circle(&self, center: (f64, f64), radius: f64, color: Color) {
		self.set_fill_style_str(&color.to_css());
		self.begin_path();
		let _ = self.arc(center.0, center.1, radius, 0.0, 2.0 * PI);
		self.fill();
	}
}

/// Per-frame visual inputs supplied by the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderStyle {
	/// Ink for edges and nodes.
	pub color: Color,
	/// Global alpha multiplier in `[0, 1]` for caller-driven cross-fades.
	pub fade_opacity: f64,
}

impl Default for RenderStyle {
	fn default() -> Self {
		Self {
			color: Color::FALLBACK,
			fade_opacity: 1.0,
		}
	}
}

/// Gaussian falloff: 1 at distance 0, ~0.61 at one `sigma`.
fn gaussian(distance: f64, sigma: f64) -> f64 {
	if sigma <= 0.0 {
		return 0.0;
	}
	(-(distance * distance) / (2.0 * sigma * sigma)).exp()
}

/// Pointer proximity weight at `(x, y)`; zero while the pointer is inactive.
fn proximity(pointer: PointerSample, x: f64, y: f64, reveal_radius: f64) -> f64 {
	if !pointer.active {
		return 0.0;
	}
	gaussian(pointer.distance_to(x, y), reveal_radius / 2.0)
}

/// Renders the complete graph to `target`.
pub fn render(
	sim: &Simulation,
	pointer: PointerSample,
	style: RenderStyle,
	target: &impl DrawTarget,
) {
	target.clear(sim.width(), sim.height());
	if sim.width() <= 0.0 || sim.height() <= 0.0 {
		return;
	}

	let fade = clamp_unit(style.fade_opacity);
	let ink = style.color.clamped();

	draw_edges(sim, pointer, ink, fade, target);
	draw_nodes(sim, pointer, ink, fade, target);
}

fn draw_edges(
	sim: &Simulation,
	pointer: PointerSample,
	ink: Color,
	fade: f64,
	target: &impl DrawTarget,
) {
	let cfg = sim.config();
	if cfg.link_distance <= 0.0 {
		return;
	}
	let nodes = sim.nodes();

	for (i, a) in nodes.iter().enumerate() {
		for b in &nodes[i + 1..] {
			let d = (a.x - b.x).hypot(a.y - b.y);
			if d.is_nan() || d >= cfg.link_distance {
				continue;
			}
			let closeness = 1.0 - d / cfg.link_distance;
			let (mx, my) = ((a.x + b.x) / 2.0, (a.y + b.y) / 2.0);
			let boost = 1.0 + cfg.edge_highlight * proximity(pointer, mx, my, cfg.reveal_radius);
			let alpha =
				clamp_unit((cfg.edge_alpha_base + closeness * cfg.edge_alpha_range) * boost);

			target.stroke_line(
				(a.x, a.y),
				(b.x, b.y),
				cfg.edge_width,
				ink.scale_alpha(alpha * fade),
			);
		}
	}
}

fn draw_nodes(
	sim: &Simulation,
	pointer: PointerSample,
	ink: Color,
	fade: f64,
	target: &impl DrawTarget,
) {
	let cfg = sim.config();
	for node in sim.nodes() {
		let near = proximity(pointer, node.x, node.y, cfg.reveal_radius);
		let radius = cfg.node_radius * node.size * (1.0 + cfg.node_highlight_radius * near);
		let alpha = clamp_unit(cfg.node_alpha * (1.0 + cfg.node_highlight * near));

		target.fill_circle((node.x, node.y), radius.max(0.0), ink.scale_alpha(alpha * fade));
	}
}
