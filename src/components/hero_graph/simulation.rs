//! Node simulation for the hero graph.
//!
//! A fixed set of particles wanders across the surface. Each frame the physics
//! step integrates positions, keeps nodes inside the surface, and accumulates
//! repulsion, anchor, idle drift, and pointer forces into velocity before
//! damping and clamping the speed.

use rand::Rng;

use super::config::{BoundaryPolicy, EPSILON, GraphConfig};
use super::pointer::PointerSample;
use super::surface::SurfaceMetrics;

/// A single simulated particle.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	/// Horizontal position in logical pixels.
	pub x: f64,
	/// Vertical position in logical pixels.
	pub y: f64,
	/// Horizontal velocity, logical pixels per frame.
	pub vx: f64,
	/// Vertical velocity, logical pixels per frame.
	pub vy: f64,
	/// Size multiplier, constant for the node's lifetime.
	pub size: f64,
	/// Spawn position, used as a soft restoring target.
	pub anchor_x: f64,
	/// See `anchor_x`.
	pub anchor_y: f64,
}

impl Node {
	/// A node at rest, anchored where it spawns.
	pub fn at_rest(x: f64, y: f64, size: f64) -> Self {
		Self {
			x,
			y,
			vx: 0.0,
			vy: 0.0,
			size,
			anchor_x: x,
			anchor_y: y,
		}
	}

	/// Velocity magnitude.
	pub fn speed(&self) -> f64 {
		self.vx.hypot(self.vy)
	}

	fn add_velocity(&mut self, fx: f64, fy: f64) {
		self.vx += fx;
		self.vy += fy;
	}
}

/// Fixed-size particle field plus the surface bounds it lives in.
#[derive(Clone, Debug)]
pub struct Simulation {
	nodes: Vec<Node>,
	config: GraphConfig,
	width: f64,
	height: f64,
}

impl Simulation {
	/// Spawn `config.node_count` nodes on a surface of the given size.
	pub fn new(config: GraphConfig, metrics: SurfaceMetrics, rng: &mut impl Rng) -> Self {
		let nodes = spawn_nodes(&config, metrics.width, metrics.height, rng);
		Self {
			nodes,
			config,
			width: metrics.width,
			height: metrics.height,
		}
	}

	/// Build a simulation around an explicit node set.
	pub fn from_nodes(config: GraphConfig, metrics: SurfaceMetrics, nodes: Vec<Node>) -> Self {
		Self {
			nodes,
			config,
			width: metrics.width,
			height: metrics.height,
		}
	}

	/// Populate the field only if it does not already hold the configured
	/// number of nodes. Returns `true` when nodes were (re)created.
	pub fn ensure_initialized(&mut self, rng: &mut impl Rng) -> bool {
		if self.nodes.len() == self.config.node_count {
			return false;
		}
		self.reset(rng);
		true
	}

	/// Regenerate every node for the current bounds.
	pub fn reset(&mut self, rng: &mut impl Rng) {
		self.nodes = spawn_nodes(&self.config, self.width, self.height, rng);
	}

	/// Current node set.
	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	/// Tuning in effect.
	pub fn config(&self) -> &GraphConfig {
		&self.config
	}

	/// Surface width in logical pixels.
	pub fn width(&self) -> f64 {
		self.width
	}

	/// Surface height in logical pixels.
	pub fn height(&self) -> f64 {
		self.height
	}

	/// Adopt new surface bounds. Node positions are left untouched; nodes
	/// outside the new bounds are brought back by the next step.
	pub fn resize(&mut self, metrics: SurfaceMetrics) {
		self.width = metrics.width;
		self.height = metrics.height;
	}

	/// Advance the field by one frame. `time` is a continuous clock in seconds
	/// driving the idle drift.
	pub fn step(&mut self, pointer: PointerSample, time: f64) {
		let time = if time.is_finite() { time } else { 0.0 };

		for node in &mut self.nodes {
			node.x += node.vx;
			node.y += node.vy;
		}
		self.apply_bounds();
		self.apply_repulsion();

		let cfg = &self.config;
		for (i, node) in self.nodes.iter_mut().enumerate() {
			node.add_velocity(
				(node.anchor_x - node.x) * cfg.return_force,
				(node.anchor_y - node.y) * cfg.return_force,
			);

			if pointer.active {
				let (fx, fy) = pointer_force(cfg, node, pointer);
				node.add_velocity(fx, fy);
			} else {
				let (fx, fy) = drift_force(cfg, i, time);
				node.add_velocity(fx, fy);
			}

			node.vx *= cfg.damping;
			node.vy *= cfg.damping;
			clamp_speed(node, cfg.max_speed);
		}
	}

	fn apply_bounds(&mut self) {
		let (w, h) = (self.width, self.height);
		let cfg = &self.config;
		for node in &mut self.nodes {
			match cfg.boundary {
				BoundaryPolicy::ClampDamped => {
					clamp_axis(&mut node.x, &mut node.vx, w, cfg.edge_margin, cfg.bounce_damping);
					clamp_axis(&mut node.y, &mut node.vy, h, cfg.edge_margin, cfg.bounce_damping);
				}
				BoundaryPolicy::Reflect => {
					if node.x < 0.0 || node.x > w {
						node.vx = -node.vx;
					}
					if node.y < 0.0 || node.y > h {
						node.vy = -node.vy;
					}
				}
			}
		}
	}

	/// Push apart every pair closer than the minimum node distance with equal
	/// and opposite forces.
	fn apply_repulsion(&mut self) {
		let cfg = &self.config;
		let n = self.nodes.len();
		for i in 0..n {
			for j in (i + 1)..n {
				let (a, b) = (&self.nodes[i], &self.nodes[j]);
				let Some((fx, fy)) = repulsion_between(cfg, (a.x, a.y), (b.x, b.y), i, j) else {
					continue;
				};
				self.nodes[i].add_velocity(fx, fy);
				self.nodes[j].add_velocity(-fx, -fy);
			}
		}
	}
}

fn spawn_nodes(config: &GraphConfig, width: f64, height: f64, rng: &mut impl Rng) -> Vec<Node> {
	let top = height * config.top_margin.clamp(0.0, 1.0);
	let half_speed = config.max_speed / 2.0 * config.initial_speed_scale;
	let (size_min, size_max) = (config.size_min(), config.size_max());

	(0..config.node_count)
		.map(|_| {
			let x = sample(rng, 0.0, width);
			let y = sample(rng, top, height);
			let size = if size_max > size_min {
				rng.random_range(size_min..=size_max)
			} else {
				size_min
			};
			Node {
				vx: symmetric(rng, half_speed),
				vy: symmetric(rng, half_speed),
				..Node::at_rest(x, y, size)
			}
		})
		.collect()
}

/// Uniform in `[lo, hi)`, or `lo` when the range is empty.
fn sample(rng: &mut impl Rng, lo: f64, hi: f64) -> f64 {
	if hi > lo { rng.random_range(lo..hi) } else { lo.max(0.0) }
}

/// Uniform in `[-half, half]`.
fn symmetric(rng: &mut impl Rng, half: f64) -> f64 {
	if half > 0.0 {
		rng.random_range(-half..=half)
	} else {
		0.0
	}
}

fn clamp_axis(pos: &mut f64, vel: &mut f64, extent: f64, margin: f64, damping: f64) {
	let extent = extent.max(0.0);
	let lo = margin.min(extent / 2.0);
	let hi = (extent - margin).max(extent / 2.0);
	if *pos < lo {
		*pos = lo;
		*vel = vel.abs() * damping;
	} else if *pos > hi {
		*pos = hi;
		*vel = -vel.abs() * damping;
	} else if pos.is_nan() {
		*pos = extent / 2.0;
		*vel = 0.0;
	}
}

/// Force on the first node of a pair; the second receives the negation.
fn repulsion_between(
	cfg: &GraphConfig,
	a: (f64, f64),
	b: (f64, f64),
	i: usize,
	j: usize,
) -> Option<(f64, f64)> {
	let (dx, dy) = (a.0 - b.0, a.1 - b.1);
	let dist = dx.hypot(dy);
	if dist.is_nan() || dist >= cfg.min_node_distance {
		return None;
	}
	let (ux, uy) = if dist > EPSILON {
		(dx / dist, dy / dist)
	} else {
		// Coincident nodes: split along a direction derived from the pair.
		let angle = ((i as f64) * 0.618_034 + (j as f64) * 0.414_214) * std::f64::consts::TAU;
		(angle.cos(), angle.sin())
	};
	let magnitude = (cfg.min_node_distance - dist) / cfg.min_node_distance * cfg.repulsion_strength;
	Some((ux * magnitude, uy * magnitude))
}

fn drift_force(cfg: &GraphConfig, index: usize, time: f64) -> (f64, f64) {
	let phase = index as f64 * cfg.drift_phase;
	(
		cfg.drift_strength * (time * cfg.drift_frequency + phase).sin(),
		cfg.drift_strength * (time * cfg.drift_frequency * 0.8 + phase).cos(),
	)
}

fn pointer_force(cfg: &GraphConfig, node: &Node, pointer: PointerSample) -> (f64, f64) {
	let (dx, dy) = (pointer.x - node.x, pointer.y - node.y);
	let dist = dx.hypot(dy);
	if dist.is_nan() || dist >= cfg.reveal_radius {
		return (0.0, 0.0);
	}
	let d = dist.max(EPSILON);
	let force = (cfg.attraction_strength / (d * d)).min(cfg.attraction_cap);
	let (ux, uy) = (dx / d, dy / d);
	let swirl = force * cfg.swirl;
	(ux * force - uy * swirl, uy * force + ux * swirl)
}

fn clamp_speed(node: &mut Node, max_speed: f64) {
	let speed = node.speed();
	if !speed.is_finite() {
		node.vx = 0.0;
		node.vy = 0.0;
	} else if speed > max_speed {
		let k = max_speed / speed;
		node.vx *= k;
		node.vy *= k;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;
	use rand::SeedableRng;
	use rand::rngs::SmallRng;

	const TOLERANCE: f64 = 1e-9;

	fn metrics(w: f64, h: f64) -> SurfaceMetrics {
		SurfaceMetrics::measure(w, h, 1.0, 2.0)
	}

	fn seeded(config: GraphConfig, w: f64, h: f64, seed: u64) -> Simulation {
		let mut rng = SmallRng::seed_from_u64(seed);
		Simulation::new(config, metrics(w, h), &mut rng)
	}

	fn assert_invariants(sim: &Simulation) {
		let margin = sim.config().edge_margin;
		for node in sim.nodes() {
			assert!(node.speed() <= sim.config().max_speed + TOLERANCE);
			assert!(node.x >= -margin && node.x <= sim.width() + margin, "x = {}", node.x);
			assert!(node.y >= -margin && node.y <= sim.height() + margin, "y = {}", node.y);
		}
	}

	#[test]
	fn spawns_configured_nodes() {
		let sim = seeded(GraphConfig::hero(), 400.0, 200.0, 7);
		let cfg = GraphConfig::hero();
		let half = cfg.max_speed / 2.0 * cfg.initial_speed_scale;

		assert_eq!(sim.nodes().len(), 26);
		for node in sim.nodes() {
			assert!((0.0..400.0).contains(&node.x));
			assert!((0.0..200.0).contains(&node.y));
			assert!(node.vx.abs() <= half && node.vy.abs() <= half);
			assert!((0.6..=1.0).contains(&node.size));
			assert_eq!((node.anchor_x, node.anchor_y), (node.x, node.y));
		}
	}

	#[test]
	fn dense_preset_keeps_clear_of_top_band() {
		let sim = seeded(GraphConfig::dense(), 800.0, 500.0, 11);
		assert_eq!(sim.nodes().len(), 150);
		assert!(sim.nodes().iter().all(|n| n.y >= 500.0 * 0.12));
	}

	#[test]
	fn ensure_initialized_keeps_existing_nodes() {
		let mut rng = SmallRng::seed_from_u64(3);
		let mut sim = Simulation::new(GraphConfig::hero(), metrics(300.0, 300.0), &mut rng);
		let before = sim.nodes().to_vec();

		assert!(!sim.ensure_initialized(&mut rng));
		assert_eq!(sim.nodes(), before.as_slice());

		let mut empty = Simulation::from_nodes(GraphConfig::hero(), metrics(300.0, 300.0), vec![]);
		assert!(empty.ensure_initialized(&mut rng));
		assert_eq!(empty.nodes().len(), 26);
	}

	#[test]
	fn idle_field_stays_in_bounds_with_capped_speed() {
		let config = GraphConfig {
			node_count: 3,
			..GraphConfig::hero()
		};
		let mut sim = seeded(config, 300.0, 300.0, 42);
		for frame in 0..100 {
			sim.step(PointerSample::inactive(), frame as f64 / 60.0);
			assert_invariants(&sim);
		}
		for node in sim.nodes() {
			assert!((0.0..=300.0).contains(&node.x));
			assert!((0.0..=300.0).contains(&node.y));
		}
	}

	#[test]
	fn pointer_pulls_node_towards_it() {
		let mut sim = Simulation::from_nodes(
			GraphConfig::hero(),
			metrics(300.0, 300.0),
			vec![Node::at_rest(10.0, 10.0, 1.0)],
		);
		sim.step(PointerSample::at(150.0, 150.0), 0.0);

		let node = &sim.nodes()[0];
		let (dx, dy) = (150.0 - node.x, 150.0 - node.y);
		assert!(node.vx * dx + node.vy * dy > 0.0);
	}

	#[test]
	fn pointer_outside_reveal_radius_has_no_pull() {
		let config = GraphConfig::hero();
		let node = Node::at_rest(0.0, 0.0, 1.0);
		let far = PointerSample::at(config.reveal_radius + 1.0, 0.0);
		assert_eq!(pointer_force(&config, &node, far), (0.0, 0.0));

		let on_top = PointerSample::at(0.0, 0.0);
		let (fx, fy) = pointer_force(&config, &node, on_top);
		assert!(fx.is_finite() && fy.is_finite());
	}

	#[test]
	fn repulsion_is_equal_and_opposite() {
		let config = GraphConfig {
			return_force: 0.0,
			drift_strength: 0.0,
			damping: 1.0,
			..GraphConfig::hero()
		};
		let mut sim = Simulation::from_nodes(
			config,
			metrics(300.0, 300.0),
			vec![Node::at_rest(100.0, 100.0, 1.0), Node::at_rest(110.0, 105.0, 1.0)],
		);
		sim.step(PointerSample::inactive(), 0.0);

		let (a, b) = (&sim.nodes()[0], &sim.nodes()[1]);
		assert!(a.speed() > 0.0);
		assert!((a.vx + b.vx).abs() < TOLERANCE);
		assert!((a.vy + b.vy).abs() < TOLERANCE);
		// Pushed apart: a moves away from b.
		assert!(a.vx < 0.0 && b.vx > 0.0);
	}

	#[test]
	fn coincident_nodes_still_separate() {
		let config = GraphConfig::hero();
		let (fx, fy) = repulsion_between(&config, (50.0, 50.0), (50.0, 50.0), 0, 1).unwrap();
		assert!(fx.is_finite() && fy.is_finite());
		assert!(fx.hypot(fy) > 0.0);
		assert!(repulsion_between(&config, (0.0, 0.0), (100.0, 0.0), 0, 1).is_none());
	}

	#[test]
	fn resize_leaves_positions_alone() {
		let mut sim = seeded(GraphConfig::hero(), 300.0, 300.0, 5);
		let before = sim.nodes().to_vec();

		sim.resize(metrics(600.0, 150.0));
		sim.resize(metrics(600.0, 150.0));

		assert_eq!(sim.nodes(), before.as_slice());
		assert_eq!((sim.width(), sim.height()), (600.0, 150.0));
	}

	#[test]
	fn clamp_policy_bounces_with_damping() {
		let mut sim = Simulation::from_nodes(
			GraphConfig::hero(),
			metrics(100.0, 100.0),
			vec![Node {
				vx: -0.4,
				..Node::at_rest(8.2, 50.0, 1.0)
			}],
		);
		sim.step(PointerSample::inactive(), 0.0);
		let node = &sim.nodes()[0];
		assert_eq!(node.x, 8.0);
		assert!(node.vx > 0.0 && node.vx < 0.4 * 0.3 + 0.01);
	}

	#[test]
	fn reflect_policy_negates_without_clamping() {
		let config = GraphConfig {
			boundary: BoundaryPolicy::Reflect,
			..GraphConfig::hero()
		};
		let mut sim = Simulation::from_nodes(
			config,
			metrics(100.0, 100.0),
			vec![Node {
				vx: -0.4,
				..Node::at_rest(0.2, 50.0, 1.0)
			}],
		);
		sim.step(PointerSample::inactive(), 0.0);
		let node = &sim.nodes()[0];
		assert!(node.x < 0.0);
		assert!(node.vx > 0.0);
	}

	#[test]
	fn zero_size_surface_is_harmless() {
		let mut sim = seeded(GraphConfig::hero(), 0.0, 0.0, 9);
		for frame in 0..10 {
			sim.step(PointerSample::at(0.0, 0.0), frame as f64);
		}
		for node in sim.nodes() {
			assert!(node.x.is_finite() && node.y.is_finite());
			assert_eq!((node.x, node.y), (0.0, 0.0));
		}
	}

	proptest! {
		#[test]
		fn drift_alone_never_exceeds_max_speed(
			seed in any::<u64>(),
			time in 0.0f64..10_000.0,
		) {
			let config = GraphConfig {
				drift_strength: 5.0,
				..GraphConfig::hero()
			};
			let mut sim = seeded(config, 500.0, 400.0, seed);
			sim.step(PointerSample::inactive(), time);
			for node in sim.nodes() {
				prop_assert!(node.speed() <= sim.config().max_speed + TOLERANCE);
			}
		}

		#[test]
		fn invariants_hold_under_pointer_input(
			seed in any::<u64>(),
			w in 1.0f64..900.0,
			h in 1.0f64..900.0,
			px in -100.0f64..1000.0,
			py in -100.0f64..1000.0,
		) {
			let mut sim = seeded(GraphConfig::hero(), w, h, seed);
			for frame in 0..30 {
				let pointer = if frame % 2 == 0 {
					PointerSample::at(px, py)
				} else {
					PointerSample::inactive()
				};
				sim.step(pointer, frame as f64 / 60.0);
				let margin = sim.config().edge_margin;
				for node in sim.nodes() {
					prop_assert!(node.speed() <= sim.config().max_speed + TOLERANCE);
					prop_assert!(node.x >= -margin && node.x <= sim.width() + margin);
					prop_assert!(node.y >= -margin && node.y <= sim.height() + margin);
				}
			}
		}
	}
}
