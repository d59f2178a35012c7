//! Zoom-dependent scaling for the topology canvas.
//!
//! Sizes are given in world units (the layout's coordinate system) or screen
//! pixels, and [`ScaledValues`] turns them into world-space values for the current
//! zoom `k`, ready to use after the canvas transform has been applied.

/// Defines how a visual property scales with zoom level.
#[derive(Clone, Debug)]
pub enum ScaleBehavior {
	/// Constant screen-space size (pixels). Unaffected by zoom.
	Screen,
	/// World-space scaling, clamped to min/max screen-space bounds.
	Clamped { min_screen: f64, max_screen: f64 },
}

impl ScaleBehavior {
	/// World-space value for a base value at zoom `k`.
	pub fn apply(&self, base: f64, k: f64) -> f64 {
		match self {
			ScaleBehavior::Screen => base / k,
			ScaleBehavior::Clamped {
				min_screen,
				max_screen,
			} => base.clamp(min_screen / k, max_screen / k),
		}
	}
}

/// Alpha that fades in between two zoom levels.
#[derive(Clone, Debug)]
pub struct ZoomFade {
	/// Fully transparent at or below this zoom.
	pub zero_alpha_k: f64,
	/// Fully opaque at or above this zoom.
	pub full_alpha_k: f64,
}

impl ZoomFade {
	pub fn apply(&self, k: f64) -> f64 {
		if self.zero_alpha_k == self.full_alpha_k {
			return 1.0;
		}
		((k - self.zero_alpha_k) / (self.full_alpha_k - self.zero_alpha_k)).clamp(0.0, 1.0)
	}
}

/// Scale configuration for all topology elements.
#[derive(Clone, Debug)]
pub struct ScaleConfig {
	/// Node radius in world units.
	pub node_radius: f64,
	pub node_behavior: ScaleBehavior,
	/// Hit detection radius in world units.
	pub hit_radius: f64,
	/// Node label font size in screen pixels.
	pub node_label_size: f64,
	/// Gap between node and its label, in world units.
	pub node_label_offset: f64,
	/// Interface label font size in screen pixels.
	pub link_label_size: f64,
	/// Interface labels fade out when zoomed far out.
	pub link_label_fade: ZoomFade,
	/// Link line width in screen pixels.
	pub line_width: f64,
	pub arrow_size: f64,
	pub arrow_behavior: ScaleBehavior,
	/// Zoom clamp for wheel zooming.
	pub min_k: f64,
	pub max_k: f64,
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			node_radius: 10.0,
			node_behavior: ScaleBehavior::Clamped {
				min_screen: 4.0,
				max_screen: f64::INFINITY,
			},
			hit_radius: 14.0,
			node_label_size: 12.0,
			node_label_offset: 14.0,
			link_label_size: 10.0,
			link_label_fade: ZoomFade {
				zero_alpha_k: 0.35,
				full_alpha_k: 0.7,
			},
			line_width: 1.5,
			arrow_size: 8.0,
			arrow_behavior: ScaleBehavior::Clamped {
				min_screen: 3.0,
				max_screen: 16.0,
			},
			min_k: 0.1,
			max_k: 10.0,
		}
	}
}

/// Pre-computed scale values for a specific zoom level. Create once per frame.
#[derive(Clone, Debug)]
pub struct ScaledValues {
	pub k: f64,
	pub node_radius: f64,
	pub hit_radius: f64,
	pub node_label_font: String,
	pub node_label_offset: f64,
	pub link_label_font: String,
	pub link_label_alpha: f64,
	pub line_width: f64,
	pub arrow_size: f64,
}

impl ScaledValues {
	pub fn new(config: &ScaleConfig, k: f64) -> Self {
		let node_radius = config.node_behavior.apply(config.node_radius, k);
		Self {
			k,
			node_radius,
			hit_radius: config.hit_radius.max(node_radius),
			node_label_font: format!("{}px sans-serif", ScaleBehavior::Screen.apply(config.node_label_size, k)),
			node_label_offset: config.node_label_offset.max(node_radius + 4.0 / k),
			link_label_font: format!("{}px monospace", ScaleBehavior::Screen.apply(config.link_label_size, k)),
			link_label_alpha: config.link_label_fade.apply(k),
			line_width: ScaleBehavior::Screen.apply(config.line_width, k),
			arrow_size: config.arrow_behavior.apply(config.arrow_size, k),
		}
	}
}
