//! Pointer input for the hero graph.
//!
//! Only the most recent sample matters: every move overwrites the previous one
//! and the frame task reads it once per frame.

use std::cell::Cell;

/// Latest pointer position in surface-local logical pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerSample {
	/// Surface-local x in logical pixels.
	pub x: f64,
	/// Surface-local y in logical pixels.
	pub y: f64,
	/// Whether the pointer is currently over the surface.
	pub active: bool,
}

impl PointerSample {
	/// An active sample at surface-local `(x, y)`.
	pub const fn at(x: f64, y: f64) -> Self {
		Self { x, y, active: true }
	}

	/// The pointer is outside the surface.
	pub const fn inactive() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			active: false,
		}
	}

	/// Converts client (viewport) coordinates using the surface's bounding
	/// rectangle origin.
	pub fn from_client(client_x: f64, client_y: f64, rect_left: f64, rect_top: f64) -> Self {
		Self::at(client_x - rect_left, client_y - rect_top)
	}

	/// Euclidean distance from the sample to `(x, y)`.
	pub fn distance_to(&self, x: f64, y: f64) -> f64 {
		(self.x - x).hypot(self.y - y)
	}
}

/// Single-slot, last-writer-wins pointer store.
#[derive(Debug, Default)]
pub struct PointerTracker {
	latest: Cell<PointerSample>,
}

impl PointerTracker {
	/// A tracker with an inactive sample.
	pub fn new() -> Self {
		Self::default()
	}

	/// Record a move in client coordinates.
	pub fn move_to(&self, client_x: f64, client_y: f64, rect_left: f64, rect_top: f64) {
		self.latest
			.set(PointerSample::from_client(client_x, client_y, rect_left, rect_top));
	}

	/// Record that the pointer left the surface.
	pub fn leave(&self) {
		self.latest.set(PointerSample::inactive());
	}

	/// The latest sample.
	pub fn sample(&self) -> PointerSample {
		self.latest.get()
	}

	/// The sample to use this frame: an active host-supplied sample wins over
	/// the locally tracked one.
	pub fn resolve(&self, host: Option<PointerSample>) -> PointerSample {
		match host {
			Some(sample) if sample.active => sample,
			_ => self.sample(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn converts_client_coordinates() {
		let sample = PointerSample::from_client(310.0, 95.0, 300.0, 80.0);
		assert_eq!(sample, PointerSample::at(10.0, 15.0));
	}

	#[test]
	fn latest_sample_wins() {
		let tracker = PointerTracker::new();
		assert!(!tracker.sample().active);

		tracker.move_to(5.0, 5.0, 0.0, 0.0);
		tracker.move_to(40.0, 60.0, 10.0, 10.0);
		assert_eq!(tracker.sample(), PointerSample::at(30.0, 50.0));

		tracker.leave();
		assert!(!tracker.sample().active);
	}

	#[test]
	fn active_host_sample_takes_precedence() {
		let tracker = PointerTracker::new();
		tracker.move_to(1.0, 1.0, 0.0, 0.0);

		let host = PointerSample::at(99.0, 99.0);
		assert_eq!(tracker.resolve(Some(host)), host);
		assert_eq!(
			tracker.resolve(Some(PointerSample::inactive())),
			PointerSample::at(1.0, 1.0)
		);
		assert_eq!(tracker.resolve(None), PointerSample::at(1.0, 1.0));
	}
}
