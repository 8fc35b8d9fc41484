//! Leptos component wrapping the hero graph canvas.
//!
//! The component fills its container with a canvas, observes the container's
//! size, tracks the pointer over it, and runs the simulation and renderer once
//! per animation frame. Everything is torn down when the component unmounts.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, info, warn};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Element, HtmlCanvasElement, PointerEvent};

use super::config::GraphConfig;
use super::driver::{AnimationDriver, RafScheduler};
use super::pointer::{PointerSample, PointerTracker};
use super::render::{self, RenderStyle};
use super::simulation::Simulation;
use super::surface::{ResizeSubscription, SurfaceMetrics, measure_element};
use super::theme::Color;

/// Mutable per-instance state shared by the frame task and resize callback.
struct GraphContext {
	sim: Simulation,
	metrics: SurfaceMetrics,
	rng: SmallRng,
	canvas: HtmlCanvasElement,
	ctx: CanvasRenderingContext2d,
	container: Element,
	/// Timestamp of the first frame, in milliseconds.
	started_at: Option<f64>,
}

impl GraphContext {
	fn resize(&mut self, metrics: SurfaceMetrics) {
		if metrics == self.metrics {
			return;
		}
		metrics.apply(&self.canvas, &self.ctx);
		let was_empty = self.metrics.is_empty();
		self.sim.resize(metrics);
		self.metrics = metrics;
		// Nodes spawned on a zero-size box all sit at the origin.
		if was_empty && !metrics.is_empty() {
			self.sim.reset(&mut self.rng);
		}
		debug!(
			"hero-graph: surface {}x{} @{}x",
			metrics.width, metrics.height, metrics.scale
		);
	}
}

/// Everything released on unmount: dropping it cancels the frame loop and
/// disconnects the resize observer.
struct HeroGraphHandle {
	context: Rc<RefCell<GraphContext>>,
	_driver: AnimationDriver<RafScheduler>,
	_resize: Option<ResizeSubscription>,
}

impl HeroGraphHandle {
	/// Called when the setup effect re-runs on a live instance. The node set
	/// survives unless it lost its configured cardinality.
	fn revalidate(&self) {
		let Ok(mut guard) = self.context.try_borrow_mut() else {
			return;
		};
		let c = &mut *guard;
		if c.sim.ensure_initialized(&mut c.rng) {
			debug!("hero-graph: node set regenerated");
		}
	}
}

fn entropy_seed() -> u64 {
	let random = (js_sys::Math::random() * u64::MAX as f64) as u64;
	random ^ js_sys::Date::now() as u64
}

/// Reads the computed CSS `color` of `element`.
fn computed_color(element: &Element) -> Option<Color> {
	let style = web_sys::window()?.get_computed_style(element).ok()??;
	Color::parse(&style.get_property_value("color").ok()?)
}

/// Decorative animated node-link field.
///
/// The graph fills whatever box its container gets and re-measures whenever
/// that box changes. Strokes and fills use `color` when given, otherwise the
/// container's CSS `color`, so it can be tinted with ordinary text classes.
/// `fade_opacity` multiplies every drawn alpha for caller-driven cross-fades.
/// A host-supplied `hover` sample, when active, overrides the pointer tracked
/// over the container itself.
#[component]
pub fn HeroGraph(
	#[prop(optional, into)] class: String,
	#[prop(optional, into)] style: String,
	#[prop(optional, into)] fade_opacity: MaybeProp<f64>,
	#[prop(optional, into)] color: Option<String>,
	#[prop(optional)] config: Option<GraphConfig>,
	#[prop(optional, into)] hover: Option<Signal<Option<PointerSample>>>,
) -> impl IntoView {
	let container_ref = NodeRef::<leptos::html::Div>::new();
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let config = config.unwrap_or_default();
	let explicit_color = color.as_deref().and_then(Color::parse);
	let pointer = Rc::new(PointerTracker::new());
	let handle = StoredValue::new_local(None::<HeroGraphHandle>);

	let pointer_frame = pointer.clone();
	Effect::new(move |_| {
		let (Some(container), Some(canvas)) = (container_ref.get(), canvas_ref.get()) else {
			return;
		};
		if handle.with_value(|h| h.as_ref().map(HeroGraphHandle::revalidate).is_some()) {
			return;
		}
		let container: Element = container.into();
		let canvas: HtmlCanvasElement = canvas.into();

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			warn!("hero-graph: 2d context unavailable, nothing will be drawn");
			return;
		};

		let metrics = measure_element(&container, config.max_pixel_ratio);
		metrics.apply(&canvas, &ctx);
		let mut rng = SmallRng::seed_from_u64(entropy_seed());
		let sim = Simulation::new(config.clone(), metrics, &mut rng);
		info!(
			"hero-graph: {} nodes on {}x{} @{}x",
			sim.nodes().len(),
			metrics.width,
			metrics.height,
			metrics.scale
		);

		let context = Rc::new(RefCell::new(GraphContext {
			sim,
			metrics,
			rng,
			canvas,
			ctx,
			container: container.clone(),
			started_at: None,
		}));

		let (context_resize, container_resize) = (context.clone(), container.clone());
		let max_pixel_ratio = config.max_pixel_ratio;
		let resize = ResizeSubscription::observe(&container, move || {
			if let Ok(mut c) = context_resize.try_borrow_mut() {
				c.resize(measure_element(&container_resize, max_pixel_ratio));
			}
		});
		if resize.is_none() {
			warn!("hero-graph: ResizeObserver unavailable, size is fixed at mount");
		}

		let (context_frame, pointer_frame) = (context.clone(), pointer_frame.clone());
		let driver = AnimationDriver::new(RafScheduler, move |timestamp| {
			let Ok(mut guard) = context_frame.try_borrow_mut() else {
				return;
			};
			let c = &mut *guard;
			let started = *c.started_at.get_or_insert(timestamp);
			let time = (timestamp - started) / 1000.0;

			let host = hover.and_then(|h| h.try_get_untracked().flatten());
			let sample = pointer_frame.resolve(host);
			c.sim.step(sample, time);

			let style = RenderStyle {
				color: explicit_color
					.or_else(|| computed_color(&c.container))
					.unwrap_or_default(),
				fade_opacity: fade_opacity.try_get_untracked().flatten().unwrap_or(1.0),
			};
			render::render(&c.sim, sample, style, &c.ctx);
		});
		driver.start();

		handle.set_value(Some(HeroGraphHandle {
			context,
			_driver: driver,
			_resize: resize,
		}));
	});

	on_cleanup(move || {
		if handle.try_update_value(Option::take).flatten().is_some() {
			debug!("hero-graph: torn down");
		}
	});

	let pointer_move = pointer.clone();
	let on_pointermove = move |ev: PointerEvent| {
		let Some(canvas) = canvas_ref.get_untracked() else {
			return;
		};
		let rect = canvas.get_bounding_client_rect();
		pointer_move.move_to(
			ev.client_x() as f64,
			ev.client_y() as f64,
			rect.left(),
			rect.top(),
		);
	};

	let pointer_leave = pointer;
	let on_pointerleave = move |_: PointerEvent| pointer_leave.leave();

	view! {
		<div
			node_ref=container_ref
			class=class
			style=style
			aria-hidden="true"
			on:pointermove=on_pointermove
			on:pointerleave=on_pointerleave
		>
			<canvas
				node_ref=canvas_ref
				class="hero-graph-canvas"
				style="display: block; width: 100%; height: 100%; pointer-events: none;"
			/>
		</div>
	}
}
