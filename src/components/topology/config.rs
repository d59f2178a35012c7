//! Runtime configuration for the topology view.
//!
//! Every field has a default, so a page may supply a partial JSON object in
//! `<script id="graph-config">` and only override what it cares about.

use force_graph::SimulationParameters;
use serde::Deserialize;

/// What bulk replacement does with links whose endpoints are not in the node set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DanglingPolicy {
	/// Keep the link as given; the layout skips it until both endpoints exist.
	#[default]
	Keep,
	/// Auto-create bare nodes for missing endpoints, as `upsert_link` does.
	CreateEndpoints,
	/// Discard the link.
	Drop,
}

/// Physics parameters, mirroring [`force_graph::SimulationParameters`].
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
	pub force_charge: f32,
	pub force_spring: f32,
	pub force_max: f32,
	pub node_speed: f32,
	pub damping_factor: f32,
	pub node_mass: f32,
}

impl Default for SimulationConfig {
	fn default() -> Self {
		Self {
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
			node_mass: 10.0,
		}
	}
}

impl SimulationConfig {
	/// Parameters for a fresh `force_graph` simulation.
	pub fn parameters(&self) -> SimulationParameters {
		SimulationParameters {
			force_charge: self.force_charge,
			force_spring: self.force_spring,
			force_max: self.force_max,
			node_speed: self.node_speed,
			damping_factor: self.damping_factor,
		}
	}
}

/// Energy (cooling) schedule of the layout driver.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct EnergyConfig {
	/// Energy the layout is restarted with after every mutation.
	pub restart: f64,
	/// Energy target held while a node is dragged.
	pub drag_target: f64,
	/// Below this (with a lower target) the layout idles.
	pub min: f64,
	/// Fraction of the gap to the target closed per step.
	pub decay: f64,
	/// Radius of the circle unplaced nodes are seeded on.
	pub seed_radius: f64,
}

impl Default for EnergyConfig {
	fn default() -> Self {
		Self {
			restart: 0.5,
			drag_target: 0.3,
			min: 0.001,
			// 1 - 0.001^(1/300): cools from 1.0 to `min` in ~300 steps
			decay: 0.0228,
			seed_radius: 100.0,
		}
	}
}

/// Where interface labels sit along an edge, as a fraction from source to target.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
	pub source_at: f64,
	pub target_at: f64,
}

impl Default for LabelConfig {
	fn default() -> Self {
		Self {
			source_at: 0.25,
			target_at: 0.75,
		}
	}
}

/// Complete topology configuration.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TopologyConfig {
	pub simulation: SimulationConfig,
	pub energy: EnergyConfig,
	pub labels: LabelConfig,
	pub dangling: DanglingPolicy,
	/// Theme name: `slate` (default) or `paper`.
	pub theme: Option<String>,
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn partial_config_keeps_defaults() {
		let config: TopologyConfig = serde_json::from_value(json!({
			"energy": { "restart": 0.8 },
			"dangling": "create_endpoints",
		}))
		.unwrap();

		assert_eq!(config.energy.restart, 0.8);
		assert_eq!(config.energy.drag_target, 0.3);
		assert_eq!(config.dangling, DanglingPolicy::CreateEndpoints);
		assert_eq!(config.labels, LabelConfig::default());
		assert_eq!(config.theme, None);
	}

	#[test]
	fn empty_object_is_default() {
		let config: TopologyConfig = serde_json::from_str("{}").unwrap();
		assert_eq!(config, TopologyConfig::default());
	}
}
