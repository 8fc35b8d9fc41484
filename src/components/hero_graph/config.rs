//! Tuning constants for the hero graph simulation and renderer.
//!
//! Everything the physics step and render pass need lives in [`GraphConfig`],
//! so variants of the visualization differ only by preset. Two presets ship:
//!
//! - [`GraphConfig::hero`]: a sparse, calm field for the landing page.
//! - [`GraphConfig::dense`]: a busier field that keeps clear of a fixed
//!   navigation bar by spawning below a reserved top band.

use serde::Deserialize;

/// Smallest distance used in any distance-based division.
pub const EPSILON: f64 = 1e-3;

/// How nodes behave when they reach the edge of the surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPolicy {
	/// Clamp position to the margin and bounce back with damped speed.
	/// Keeps every node strictly inside the surface.
	#[default]
	ClampDamped,
	/// Negate velocity once a node leaves the surface, without moving it back.
	/// Nodes may briefly overshoot the edge.
	Reflect,
}

/// Complete configuration for one hero graph instance.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
	/// Number of nodes, fixed for the lifetime of a simulation.
	pub node_count: usize,
	/// Maximum node speed in pixels per frame.
	pub max_speed: f64,
	/// Scale applied to the initial velocity range.
	pub initial_speed_scale: f64,
	/// Node size multiplier range `(min, max)`.
	pub size_range: (f64, f64),
	/// Fraction of the height reserved at the top where nodes never spawn.
	pub top_margin: f64,

	/// Boundary handling policy.
	pub boundary: BoundaryPolicy,
	/// Distance from each edge at which [`BoundaryPolicy::ClampDamped`] bounces.
	pub edge_margin: f64,
	/// Fraction of speed kept after a clamped bounce.
	pub bounce_damping: f64,

	/// Pairs closer than this push each other apart.
	pub min_node_distance: f64,
	/// Scale of the pairwise repulsion force.
	pub repulsion_strength: f64,
	/// Spring constant pulling nodes back to their anchor.
	pub return_force: f64,

	/// Magnitude of the idle drift force.
	pub drift_strength: f64,
	/// Angular frequency of the idle drift (radians per second).
	pub drift_frequency: f64,
	/// Per-node phase offset of the idle drift (radians).
	pub drift_phase: f64,

	/// Pointer influence radius.
	pub reveal_radius: f64,
	/// Numerator of the inverse-square pointer attraction.
	pub attraction_strength: f64,
	/// Upper bound of the pointer attraction per frame.
	pub attraction_cap: f64,
	/// Perpendicular swirl as a fraction of the attraction.
	pub swirl: f64,

	/// Per-frame velocity multiplier.
	pub damping: f64,

	/// Maximum pairwise distance at which an edge is drawn.
	pub link_distance: f64,
	/// Edge alpha at the link distance.
	pub edge_alpha_base: f64,
	/// Extra edge alpha gained as a pair closes to zero distance.
	pub edge_alpha_range: f64,
	/// Edge stroke width in logical pixels.
	pub edge_width: f64,
	/// Relative edge alpha boost next to the pointer.
	pub edge_highlight: f64,
	/// Base node radius in logical pixels.
	pub node_radius: f64,
	/// Base node alpha.
	pub node_alpha: f64,
	/// Relative node alpha boost next to the pointer.
	pub node_highlight: f64,
	/// Relative node radius boost next to the pointer.
	pub node_highlight_radius: f64,

	/// Upper bound on the device pixel ratio used for the backing store.
	pub max_pixel_ratio: f64,
}

impl GraphConfig {
	/// Sparse landing-page field.
	pub fn hero() -> Self {
		Self {
			node_count: 26,
			max_speed: 0.45,
			initial_speed_scale: 0.8,
			size_range: (0.6, 1.0),
			top_margin: 0.0,

			boundary: BoundaryPolicy::ClampDamped,
			edge_margin: 8.0,
			bounce_damping: 0.3,

			min_node_distance: 42.0,
			repulsion_strength: 0.02,
			return_force: 0.0004,

			drift_strength: 0.004,
			drift_frequency: 0.6,
			drift_phase: 0.7,

			reveal_radius: 220.0,
			attraction_strength: 20.0,
			attraction_cap: 0.012,
			swirl: 0.35,

			damping: 0.995,

			link_distance: 140.0,
			edge_alpha_base: 0.12,
			edge_alpha_range: 0.18,
			edge_width: 1.0,
			edge_highlight: 1.2,
			node_radius: 2.0,
			node_alpha: 0.45,
			node_highlight: 1.0,
			node_highlight_radius: 0.6,

			max_pixel_ratio: 2.0,
		}
	}

	/// Busier field that avoids the top 12% of the surface when spawning.
	pub fn dense() -> Self {
		Self {
			node_count: 150,
			max_speed: 0.35,
			top_margin: 0.12,
			min_node_distance: 28.0,
			link_distance: 90.0,
			edge_alpha_base: 0.06,
			edge_alpha_range: 0.14,
			node_radius: 1.6,
			..Self::hero()
		}
	}

	/// Lower bound of the node size range.
	pub fn size_min(&self) -> f64 {
		self.size_range.0.min(self.size_range.1)
	}

	/// Upper bound of the node size range.
	pub fn size_max(&self) -> f64 {
		self.size_range.0.max(self.size_range.1)
	}
}

impl Default for GraphConfig {
	fn default() -> Self {
		Self::hero()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn dense_inherits_hero_physics() {
		let (hero, dense) = (GraphConfig::hero(), GraphConfig::dense());
		assert_eq!(dense.node_count, 150);
		assert_eq!(dense.damping, hero.damping);
		assert_eq!(dense.boundary, BoundaryPolicy::ClampDamped);
		assert!(dense.top_margin > 0.0);
	}

	#[test]
	fn partial_json_overrides_keep_defaults() {
		let config: GraphConfig =
			serde_json::from_str(r#"{ "node_count": 12, "boundary": "reflect" }"#).unwrap();
		assert_eq!(config.node_count, 12);
		assert_eq!(config.boundary, BoundaryPolicy::Reflect);
		assert_eq!(config.link_distance, GraphConfig::hero().link_distance);
	}

	#[test]
	fn size_range_is_order_insensitive() {
		let config = GraphConfig {
			size_range: (1.0, 0.6),
			..GraphConfig::hero()
		};
		assert_eq!(config.size_min(), 0.6);
		assert_eq!(config.size_max(), 1.0);
	}
}
