//! Small circular gauge for a 0-100 score.
//!
//! The ring leaves a 60 degree gap at the bottom; the coloured arc covers the
//! share of the remaining track given by the score. Missing values draw the
//! empty track and an "N/A" label.

use std::f64::consts::PI;

use leptos::prelude::*;

use crate::risk::{RiskLevel, score_to_hue};

const GAP_DEGREES: f64 = 60.0;

/// Stroke geometry for one gauge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GaugeArcs {
	/// Ring radius, inset by half the stroke.
	pub radius: f64,
	/// Full circumference of the ring.
	pub circumference: f64,
	/// Length of the visible track.
	pub track: f64,
	/// Length of the filled part of the track.
	pub progress: f64,
	/// Rotation in degrees that centres the gap at the bottom.
	pub rotation: f64,
}

impl GaugeArcs {
	/// Geometry for `value` on a `size` square gauge with a `stroke` wide ring.
	pub fn new(value: Option<f64>, size: f64, stroke: f64) -> Self {
		let radius = ((size - stroke) / 2.0).max(0.0);
		let circumference = 2.0 * PI * radius;
		let track = circumference * (360.0 - GAP_DEGREES) / 360.0;
		let fill = value.map_or(0.0, clamp_score) / 100.0;
		GaugeArcs {
			radius,
			circumference,
			track,
			progress: track * fill,
			rotation: 90.0 + GAP_DEGREES / 2.0,
		}
	}
}

fn clamp_score(value: f64) -> f64 {
	if value.is_nan() { 0.0 } else { value.clamp(0.0, 100.0) }
}

/// Text shown in the middle of the gauge.
pub fn gauge_label(value: Option<f64>) -> String {
	match value.filter(|v| !v.is_nan()) {
		Some(v) => format!("{:.0}", clamp_score(v)),
		None => "N/A".into(),
	}
}

/// Circular score gauge coloured by risk band.
#[component]
pub fn RadialScore(
	/// Score in `0..=100`; `None` renders as "N/A".
	value: Option<f64>,
	/// Width and height in CSS pixels.
	#[prop(default = 40.0)]
	size: f64,
	/// Ring thickness in CSS pixels.
	#[prop(default = 5.0)]
	stroke: f64,
	/// Caption under the gauge.
	#[prop(optional, into)]
	label: Option<String>,
) -> impl IntoView {
	let arcs = GaugeArcs::new(value, size, stroke);
	let centre = size / 2.0;
	let tone = match value.filter(|v| !v.is_nan()) {
		Some(v) => {
			let score = clamp_score(v);
			let level = RiskLevel::from_score(score.round() as u8);
			(
				format!("radial-score risk-{}", level.color()),
				format!("hsl({:.0}, 70%, 40%)", score_to_hue(score)),
			)
		}
		None => ("radial-score risk-none".to_owned(), "currentColor".to_owned()),
	};
	let (class, fill) = tone;
	let transform = format!("rotate({} {centre} {centre})", arcs.rotation);

	view! {
		<figure class=class title=gauge_label(value)>
			<svg width=size height=size viewBox=format!("0 0 {size} {size}")>
				<g transform=transform>
					<circle
						cx=centre
						cy=centre
						r=arcs.radius
						fill="none"
						stroke="currentColor"
						stroke-opacity="0.15"
						stroke-width=stroke
						stroke-linecap="round"
						stroke-dasharray=format!("{} {}", arcs.track, arcs.circumference)
					/>
					<circle
						cx=centre
						cy=centre
						r=arcs.radius
						fill="none"
						stroke=fill
						stroke-width=stroke
						stroke-linecap="round"
						stroke-dasharray=format!("{} {}", arcs.progress, arcs.circumference)
					/>
				</g>
				<text x=centre y=centre text-anchor="middle" dominant-baseline="central">
					{gauge_label(value)}
				</text>
			</svg>
			{label.map(|l| view! { <figcaption>{l}</figcaption> })}
		</figure>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn track_leaves_a_gap() {
		let arcs = GaugeArcs::new(Some(100.0), 40.0, 4.0);
		assert_eq!(arcs.radius, 18.0);
		assert!((arcs.track / arcs.circumference - 300.0 / 360.0).abs() < 1e-12);
		assert_eq!(arcs.progress, arcs.track);
		assert_eq!(arcs.rotation, 120.0);
	}

	#[test]
	fn progress_is_proportional_and_clamped() {
		let half = GaugeArcs::new(Some(50.0), 40.0, 4.0);
		assert!((half.progress - half.track / 2.0).abs() < 1e-12);
		assert_eq!(GaugeArcs::new(Some(250.0), 40.0, 4.0).progress, half.track);
		assert_eq!(GaugeArcs::new(Some(-5.0), 40.0, 4.0).progress, 0.0);
		assert_eq!(GaugeArcs::new(None, 40.0, 4.0).progress, 0.0);
	}

	#[test]
	fn stroke_wider_than_gauge_collapses() {
		let arcs = GaugeArcs::new(Some(80.0), 4.0, 10.0);
		assert_eq!(arcs.radius, 0.0);
		assert_eq!(arcs.progress, 0.0);
	}

	#[test]
	fn labels_round_or_say_missing() {
		assert_eq!(gauge_label(Some(66.6)), "67");
		assert_eq!(gauge_label(Some(140.0)), "100");
		assert_eq!(gauge_label(None), "N/A");
		assert_eq!(gauge_label(Some(f64::NAN)), "N/A");
	}
}
