//! Canvas sizing and device pixel ratio handling.
//!
//! The simulation and renderer work in logical (CSS) pixels. The canvas
//! backing store is sized in physical pixels and the 2D context is scaled so
//! draw calls can keep using logical coordinates.

use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Element, HtmlCanvasElement, ResizeObserver};

/// Logical surface size plus the backing-store scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceMetrics {
	/// Logical width in CSS pixels.
	pub width: f64,
	/// Logical height in CSS pixels.
	pub height: f64,
	/// Physical pixels per logical pixel.
	pub scale: f64,
}

impl SurfaceMetrics {
	/// Measure a container box. Sizes are floored, and negative or NaN sizes
	/// become zero. The pixel ratio falls back to 1 when missing and is capped
	/// at `max_pixel_ratio`.
	pub fn measure(width: f64, height: f64, device_pixel_ratio: f64, max_pixel_ratio: f64) -> Self {
		let logical = |v: f64| if v.is_finite() && v > 0.0 { v.floor() } else { 0.0 };
		let dpr = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
			device_pixel_ratio
		} else {
			1.0
		};
		Self {
			width: logical(width),
			height: logical(height),
			scale: dpr.min(max_pixel_ratio.max(1.0)),
		}
	}

	/// Backing-store size in physical pixels, never smaller than 1x1.
	pub fn backing_size(&self) -> (u32, u32) {
		let physical = |v: f64| ((v * self.scale).floor() as u32).max(1);
		(physical(self.width), physical(self.height))
	}

	/// True when either dimension is zero.
	pub fn is_empty(&self) -> bool {
		self.width <= 0.0 || self.height <= 0.0
	}

	/// Resize the canvas backing store and reset the context transform.
	pub fn apply(&self, canvas: &HtmlCanvasElement, ctx: &CanvasRenderingContext2d) {
		let (w, h) = self.backing_size();
		canvas.set_width(w);
		canvas.set_height(h);
		let style = canvas.style();
		let _ = style.set_property("width", &format!("{}px", self.width));
		let _ = style.set_property("height", &format!("{}px", self.height));
		let _ = ctx.set_transform(self.scale, 0.0, 0.0, self.scale, 0.0, 0.0);
	}
}

impl Default for SurfaceMetrics {
	fn default() -> Self {
		Self {
			width: 0.0,
			height: 0.0,
			scale: 1.0,
		}
	}
}

/// Measure an element's current box with the window's pixel ratio.
pub fn measure_element(element: &Element, max_pixel_ratio: f64) -> SurfaceMetrics {
	let rect = element.get_bounding_client_rect();
	let dpr = web_sys::window()
		.map(|w| w.device_pixel_ratio())
		.unwrap_or(1.0);
	SurfaceMetrics::measure(rect.width(), rect.height(), dpr, max_pixel_ratio)
}

/// Active `ResizeObserver` on one element. Dropping it disconnects the
/// observer and releases the callback.
pub struct ResizeSubscription {
	observer: ResizeObserver,
	_callback: Closure<dyn FnMut()>,
}

impl ResizeSubscription {
	/// Calls `on_resize` whenever `element` changes size, including the
	/// initial observation the browser delivers right after `observe`.
	pub fn observe(element: &Element, on_resize: impl FnMut() + 'static) -> Option<Self> {
		let callback = Closure::<dyn FnMut()>::new(on_resize);
		let observer = ResizeObserver::new(callback.as_ref().unchecked_ref()).ok()?;
		observer.observe(element);
		Some(Self {
			observer,
			_callback: callback,
		})
	}
}

impl Drop for ResizeSubscription {
	fn drop(&mut self) {
		self.observer.disconnect();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn pixel_ratio_is_capped() {
		let metrics = SurfaceMetrics::measure(600.0, 150.0, 3.0, 2.0);
		assert_eq!(metrics.scale, 2.0);
		assert_eq!(metrics.backing_size(), (1200, 300));
	}

	#[test]
	fn backing_size_follows_resize() {
		for dpr in [1.0, 1.5, 2.0, 3.0] {
			let before = SurfaceMetrics::measure(300.0, 300.0, dpr, 2.0);
			let after = SurfaceMetrics::measure(600.0, 150.0, dpr, 2.0);
			let scale = f64::min(dpr, 2.0);
			assert_eq!(before.backing_size().0, (300.0 * scale) as u32);
			assert_eq!(
				after.backing_size(),
				((600.0 * scale) as u32, (150.0 * scale) as u32)
			);
		}
	}

	#[test]
	fn measuring_twice_is_idempotent() {
		let a = SurfaceMetrics::measure(320.7, 240.2, 1.25, 2.0);
		let b = SurfaceMetrics::measure(320.7, 240.2, 1.25, 2.0);
		assert_eq!(a, b);
		assert_eq!((a.width, a.height), (320.0, 240.0));
	}

	#[test]
	fn degenerate_boxes_are_safe() {
		let metrics = SurfaceMetrics::measure(-5.0, f64::NAN, 0.0, 2.0);
		assert!(metrics.is_empty());
		assert_eq!(metrics.scale, 1.0);
		assert_eq!(metrics.backing_size(), (1, 1));
	}
}
