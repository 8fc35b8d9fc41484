//! Colors for the hero graph.
//!
//! The graph is drawn in a single ink color, normally the CSS `color` of its
//! container so that it follows the page theme. [`Color::parse`] turns the
//! computed style string into an explicit value for the render pass.

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
	/// Alpha in `[0, 1]`.
	pub a: f64,
}

impl Color {
	/// Slate ink used when no theme color can be resolved.
	pub const FALLBACK: Color = Color::rgb(100, 116, 139);

	/// Opaque color.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Color with explicit alpha.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Multiply the existing alpha, keeping the result in `[0, 1]`.
	pub fn scale_alpha(self, factor: f64) -> Self {
		Self {
			a: clamp_unit(self.a * factor),
			..self
		}
	}

	/// Same color with alpha forced into `[0, 1]` (NaN becomes 0).
	pub fn clamped(self) -> Self {
		Self {
			a: clamp_unit(self.a),
			..self
		}
	}

	/// CSS `rgba(...)` string for canvas styles.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}

	/// Parses a CSS color string.
	/// Supports hex (`#RGB`, `#RRGGBB`) and `rgb()`/`rgba()` in comma or
	/// space separated form, which is what `getComputedStyle` returns.
	pub fn parse(color_str: &str) -> Option<Color> {
		let s = color_str.trim();
		if let Some(hex) = s.strip_prefix('#') {
			return parse_hex(hex);
		}

		let body = s
			.strip_prefix("rgba(")
			.or_else(|| s.strip_prefix("rgb("))?
			.strip_suffix(')')?;
		let parts: Vec<&str> = body
			.split([',', ' ', '/'])
			.map(str::trim)
			.filter(|p| !p.is_empty())
			.collect();
		if parts.len() < 3 {
			return None;
		}

		let channel = |p: &str| p.parse::<f64>().ok().map(|v| v.clamp(0.0, 255.0).round() as u8);
		let a = match parts.get(3) {
			Some(p) => match p.strip_suffix('%') {
				Some(pct) => pct.parse::<f64>().ok()? / 100.0,
				None => p.parse::<f64>().ok()?,
			},
			None => 1.0,
		};
		Some(Color::rgba(
			channel(parts[0])?,
			channel(parts[1])?,
			channel(parts[2])?,
			clamp_unit(a),
		))
	}
}

impl Default for Color {
	fn default() -> Self {
		Self::FALLBACK
	}
}

fn parse_hex(hex: &str) -> Option<Color> {
	let digit = |i: usize| u8::from_str_radix(hex.get(i..i + 1)?, 16).ok();
	let pair = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
	match hex.len() {
		3 => Some(Color::rgb(digit(0)? * 17, digit(1)? * 17, digit(2)? * 17)),
		6 => Some(Color::rgb(pair(0)?, pair(2)?, pair(4)?)),
		_ => None,
	}
}

/// Clamp to `[0, 1]`, mapping NaN to 0.
pub fn clamp_unit(v: f64) -> f64 {
	if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_computed_style_forms() {
		assert_eq!(Color::parse("rgb(15, 23, 42)"), Some(Color::rgb(15, 23, 42)));
		assert_eq!(
			Color::parse("rgba(255, 0, 0, 0.5)"),
			Some(Color::rgba(255, 0, 0, 0.5))
		);
		assert_eq!(
			Color::parse("rgb(10 20 30 / 25%)"),
			Some(Color::rgba(10, 20, 30, 0.25))
		);
		assert_eq!(Color::parse("#0f172a"), Some(Color::rgb(15, 23, 42)));
		assert_eq!(Color::parse("#fff"), Some(Color::rgb(255, 255, 255)));
	}

	#[test]
	fn rejects_unsupported_colors() {
		assert_eq!(Color::parse("currentColor"), None);
		assert_eq!(Color::parse("#12345"), None);
		assert_eq!(Color::parse("rgb(1, 2)"), None);
	}

	#[test]
	fn alpha_is_clamped() {
		assert_eq!(Color::rgb(1, 2, 3).scale_alpha(3.0).a, 1.0);
		assert_eq!(Color::rgba(1, 2, 3, f64::NAN).clamped().a, 0.0);
		assert_eq!(Color::rgba(1, 2, 3, -0.5).clamped().a, 0.0);
	}

	#[test]
	fn css_output_drops_opaque_alpha() {
		assert_eq!(Color::rgb(255, 0, 16).to_css(), "#ff0010");
		assert_eq!(Color::rgba(1, 2, 3, 0.25).to_css(), "rgba(1, 2, 3, 0.25)");
	}
}
