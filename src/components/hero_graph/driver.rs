//! Frame scheduling for the hero graph.
//!
//! [`AnimationDriver`] runs one frame task per display refresh through a
//! [`FrameScheduler`]. Each callback runs once and the driver reschedules
//! explicitly, so frames never overlap. Stopping cancels the pending frame and
//! bumps the run generation; a callback from an earlier run that still fires
//! afterwards returns without touching any state, even if the driver has been
//! started again in the meantime.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::prelude::*;

/// Handle to a scheduled frame, used for cancellation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameToken(pub i32);

/// "Run this once on the next frame" scheduling.
pub trait FrameScheduler {
	/// Schedule `callback` with the frame timestamp in milliseconds. Returns
	/// `None` when no frame can be scheduled.
	fn schedule_frame(&self, callback: Box<dyn FnOnce(f64)>) -> Option<FrameToken>;
	/// Cancel a frame scheduled earlier. Unknown or spent tokens are ignored.
	fn cancel_frame(&self, token: FrameToken);
}

/// `requestAnimationFrame`-backed scheduler.
#[derive(Clone, Copy, Debug, Default)]
pub struct RafScheduler;

impl FrameScheduler for RafScheduler {
	fn schedule_frame(&self, callback: Box<dyn FnOnce(f64)>) -> Option<FrameToken> {
		let window = web_sys::window()?;
		let callback = Closure::once_into_js(move |timestamp: f64| callback(timestamp));
		window
			.request_animation_frame(callback.unchecked_ref())
			.ok()
			.map(FrameToken)
	}

	fn cancel_frame(&self, token: FrameToken) {
		if let Some(window) = web_sys::window() {
			let _ = window.cancel_animation_frame(token.0);
		}
	}
}

/// Lifecycle of an [`AnimationDriver`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverState {
	/// No frame is pending and none will run.
	Stopped,
	/// A frame is pending or running.
	Running,
}

struct DriverInner {
	state: DriverState,
	/// Incremented by every stop; callbacks only run for the generation they
	/// were scheduled in.
	generation: u64,
	pending: Option<FrameToken>,
	frame: Box<dyn FnMut(f64)>,
}

/// Runs a frame closure once per display frame until stopped.
pub struct AnimationDriver<S: FrameScheduler + 'static> {
	inner: Rc<RefCell<DriverInner>>,
	scheduler: Rc<S>,
}

impl<S: FrameScheduler + 'static> AnimationDriver<S> {
	/// Wrap `frame` in a stopped driver. `frame` receives the frame timestamp in milliseconds.
	pub fn new(scheduler: S, frame: impl FnMut(f64) + 'static) -> Self {
		Self {
			inner: Rc::new(RefCell::new(DriverInner {
				state: DriverState::Stopped,
				generation: 0,
				pending: None,
				frame: Box::new(frame),
			})),
			scheduler: Rc::new(scheduler),
		}
	}

	/// Current lifecycle state.
	pub fn state(&self) -> DriverState {
		self.inner.borrow().state
	}

	/// Start the frame loop. Has no effect while already running.
	pub fn start(&self) {
		{
			let mut inner = self.inner.borrow_mut();
			if inner.state == DriverState::Running {
				return;
			}
			inner.state = DriverState::Running;
		}
		schedule_next(&self.inner, &self.scheduler);
	}

	/// Cancel the pending frame and stop. No frame runs after this returns.
	pub fn stop(&self) {
		let pending = {
			let mut inner = self.inner.borrow_mut();
			inner.state = DriverState::Stopped;
			inner.generation = inner.generation.wrapping_add(1);
			inner.pending.take()
		};
		if let Some(token) = pending {
			self.scheduler.cancel_frame(token);
		}
	}
}

impl<S: FrameScheduler + 'static> Drop for AnimationDriver<S> {
	fn drop(&mut self) {
		self.stop();
	}
}

fn schedule_next<S: FrameScheduler + 'static>(inner: &Rc<RefCell<DriverInner>>, scheduler: &Rc<S>) {
	let weak: Weak<RefCell<DriverInner>> = Rc::downgrade(inner);
	let next_scheduler = Rc::clone(scheduler);
	let generation = inner.borrow().generation;
	let token = scheduler.schedule_frame(Box::new(move |timestamp| {
		let Some(inner) = weak.upgrade() else {
			return;
		};
		{
			let mut guard = inner.borrow_mut();
			if guard.state != DriverState::Running || guard.generation != generation {
				return;
			}
			guard.pending = None;
			(guard.frame)(timestamp);
		}
		schedule_next(&inner, &next_scheduler);
	}));
	inner.borrow_mut().pending = token;
}
