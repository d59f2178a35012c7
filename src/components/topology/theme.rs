//! Visual theming for the topology canvas.

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 + (255.0 - self.r as f64) * f) as u8,
			g: (self.g as f64 + (255.0 - self.g as f64) * f) as u8,
			b: (self.b as f64 + (255.0 - self.b as f64) * f) as u8,
			a: self.a,
		}
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}

	/// Parses `#RRGGBB`; anything else yields `None`.
	pub fn from_hex(hex: &str) -> Option<Self> {
		let digits = hex.strip_prefix('#').filter(|d| d.len() == 6)?;
		let channel = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
		Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
	}
}

/// Background style configuration.
#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	pub color: Color,
	/// Secondary color for the radial gradient
	pub color_secondary: Color,
	pub use_gradient: bool,
}

/// Link style: line, arrowhead and interface labels.
#[derive(Clone, Debug)]
pub struct LinkStyle {
	pub color: Color,
	pub label_color: Color,
	/// Halo drawn behind interface labels so they stay legible over lines
	pub label_halo: Color,
}

/// Node style.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	/// Fill used when a node carries no `color` attribute
	pub fill: Color,
	/// Ring drawn around a node held by a drag
	pub pinned_ring: Color,
	pub border_color: Color,
	pub border_width: f64,
	pub label_color: Color,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	pub name: &'static str,
	pub background: BackgroundStyle,
	pub link: LinkStyle,
	pub node: NodeStyle,
}

impl Theme {
	/// Dark slate theme (default)
	pub fn slate() -> Self {
		Self {
			name: "slate",
			background: BackgroundStyle {
				color: Color::rgb(22, 27, 34),
				color_secondary: Color::rgb(30, 35, 42),
				use_gradient: true,
			},
			link: LinkStyle {
				color: Color::rgba(140, 160, 180, 0.7),
				label_color: Color::rgb(190, 205, 220),
				label_halo: Color::rgba(22, 27, 34, 0.85),
			},
			node: NodeStyle {
				fill: Color::rgb(79, 149, 157),
				pinned_ring: Color::rgba(255, 255, 255, 0.8),
				border_color: Color::rgba(255, 255, 255, 0.35),
				border_width: 1.0,
				label_color: Color::rgba(255, 255, 255, 0.9),
			},
		}
	}

	/// Light theme for printing and screenshots
	pub fn paper() -> Self {
		Self {
			name: "paper",
			background: BackgroundStyle {
				color: Color::rgb(250, 250, 247),
				color_secondary: Color::rgb(250, 250, 247),
				use_gradient: false,
			},
			link: LinkStyle {
				color: Color::rgba(60, 60, 60, 0.6),
				label_color: Color::rgb(90, 90, 90),
				label_halo: Color::rgba(250, 250, 247, 0.9),
			},
			node: NodeStyle {
				fill: Color::rgb(70, 130, 180),
				pinned_ring: Color::rgba(0, 0, 0, 0.6),
				border_color: Color::rgb(255, 255, 255),
				border_width: 1.5,
				label_color: Color::rgb(30, 30, 30),
			},
		}
	}

	pub fn by_name(name: &str) -> Option<Self> {
		match name {
			"slate" => Some(Self::slate()),
			"paper" => Some(Self::paper()),
			_ => None,
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::slate()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn hex_parsing() {
		assert_eq!(Color::from_hex("#1976d2"), Some(Color::rgb(0x19, 0x76, 0xd2)));
		assert_eq!(Color::from_hex("1976d2"), None);
		assert_eq!(Color::from_hex("#19"), None);
		assert_eq!(Color::from_hex("#zz76d2"), None);
	}

	#[test]
	fn css_output() {
		assert_eq!(Color::rgb(255, 0, 16).to_css(), "#ff0010");
		assert_eq!(Color::rgb(0, 0, 0).with_alpha(0.5).to_css(), "rgba(0, 0, 0, 0.5)");
	}

	#[test]
	fn themes_by_name() {
		assert_eq!(Theme::by_name("paper").map(|t| t.name), Some("paper"));
		assert!(Theme::by_name("neon").is_none());
	}
}
