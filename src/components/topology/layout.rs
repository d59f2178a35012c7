//! Force layout driver.
//!
//! Wraps the `force_graph` physics simulation behind [`LayoutDriver`]. The driver is
//! handed a translation view of the links (index pairs into the node slice), never
//! the stored links themselves, and writes back only node position fields.

use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData};
use log::{debug, warn};

use super::config::{EnergyConfig, SimulationConfig};
use super::types::{Link, Node};

/// A link as the layout sees it: indices into the node slice it was given.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutLink {
	pub source: usize,
	pub target: usize,
}

/// Builds the layout's view of `links`, skipping links whose endpoints are not in `nodes`.
///
/// Self-loops stay in the store and the view but carry no force, so they are left out.
pub fn layout_links(nodes: &[Node], links: &[Link]) -> Vec<LayoutLink> {
	let index: HashMap<&str, usize> = nodes
		.iter()
		.enumerate()
		.map(|(i, n)| (n.id.as_str(), i))
		.collect();

	links
		.iter()
		.filter_map(|link| {
			match (index.get(link.source.as_str()), index.get(link.target.as_str())) {
				(Some(&source), Some(&target)) if source == target => {
					debug!("net-topology: self-loop {} not laid out", link.key());
					None
				}
				(Some(&source), Some(&target)) => Some(LayoutLink { source, target }),
				_ => {
					warn!("net-topology: link {} has a missing endpoint, not laid out", link.key());
					None
				}
			}
		})
		.collect()
}

/// Assigns 2-D positions to nodes over successive steps.
pub trait LayoutDriver {
	/// Replaces the simulated node set.
	fn set_nodes(&mut self, nodes: &[Node]);
	/// Replaces the simulated links. Indices refer to the last `set_nodes` slice.
	fn set_links(&mut self, links: &[LayoutLink]);
	/// Sets the current energy and wakes the layout.
	fn restart(&mut self, energy: f64);
	/// Sets the energy the layout cools (or warms) towards.
	fn set_energy_target(&mut self, target: f64);
	/// Current energy.
	fn energy(&self) -> f64;
	/// Advances the simulation and writes positions into `nodes`.
	/// Returns false once the layout has cooled down and is idle.
	fn step(&mut self, dt: f32, nodes: &mut [Node]) -> bool;
}

/// [`LayoutDriver`] backed by a `force_graph` simulation with a cooling schedule.
pub struct ForceLayout {
	graph: ForceGraph<String, ()>,
	slots: Vec<DefaultNodeIdx>,
	index: HashMap<String, DefaultNodeIdx>,
	simulation: SimulationConfig,
	schedule: EnergyConfig,
	energy: f64,
	target: f64,
}

impl ForceLayout {
	/// An empty layout; nodes arrive through [`LayoutDriver::set_nodes`].
	pub fn new(simulation: SimulationConfig, schedule: EnergyConfig) -> Self {
		let graph = ForceGraph::new(simulation.parameters());
		Self {
			graph,
			slots: Vec::new(),
			index: HashMap::new(),
			simulation,
			schedule,
			energy: 0.0,
			target: 0.0,
		}
	}

	/// True once both energy and target have dropped below the minimum.
	pub fn is_idle(&self) -> bool {
		self.energy < self.schedule.min && self.target < self.schedule.min
	}

	fn seed_position(&self, i: usize, count: usize) -> (f32, f32) {
		let angle = (i as f64) * 2.0 * PI / count.max(1) as f64;
		(
			(self.schedule.seed_radius * angle.cos()) as f32,
			(self.schedule.seed_radius * angle.sin()) as f32,
		)
	}
}

impl LayoutDriver for ForceLayout {
	fn set_nodes(&mut self, nodes: &[Node]) {
		self.graph = ForceGraph::new(self.simulation.parameters());
		self.slots.clear();
		self.index.clear();

		for (i, node) in nodes.iter().enumerate() {
			let (x, y) = node
				.pinned()
				.or(node.position())
				.map(|(x, y)| (x as f32, y as f32))
				.unwrap_or_else(|| self.seed_position(i, nodes.len()));

			let idx = self.graph.add_node(NodeData {
				x,
				y,
				mass: self.simulation.node_mass,
				is_anchor: node.pinned().is_some(),
				user_data: node.id.clone(),
			});
			self.slots.push(idx);
			self.index.insert(node.id.clone(), idx);
		}
	}

	fn set_links(&mut self, links: &[LayoutLink]) {
		for link in links {
			match (self.slots.get(link.source), self.slots.get(link.target)) {
				(Some(&src), Some(&tgt)) if src != tgt => {
					self.graph.add_edge(src, tgt, EdgeData::default());
				}
				_ => warn!("net-topology: layout link {}→{} ignored", link.source, link.target),
			}
		}
	}

	fn restart(&mut self, energy: f64) {
		self.energy = energy;
	}

	fn set_energy_target(&mut self, target: f64) {
		self.target = target;
	}

	fn energy(&self) -> f64 {
		self.energy
	}

	fn step(&mut self, dt: f32, nodes: &mut [Node]) -> bool {
		if self.is_idle() {
			return false;
		}
		self.energy += (self.target - self.energy) * self.schedule.decay;

		let pins: HashMap<DefaultNodeIdx, (f32, f32)> = nodes
			.iter()
			.filter_map(|n| {
				let (fx, fy) = n.pinned()?;
				Some((*self.index.get(&n.id)?, (fx as f32, fy as f32)))
			})
			.collect();
		self.graph.visit_nodes_mut(|node| match pins.get(&node.index()) {
			Some(&(x, y)) => {
				node.data.x = x;
				node.data.y = y;
				node.data.is_anchor = true;
			}
			None => node.data.is_anchor = false,
		});

		// Simulation speed follows the energy, so a cooling layout settles smoothly.
		let speed = (self.energy / self.schedule.restart.max(self.schedule.min)).min(1.0);
		self.graph.update(dt * speed as f32);

		let mut placed = HashMap::with_capacity(self.slots.len());
		self.graph.visit_nodes(|node| {
			placed.insert(node.index(), (node.x() as f64, node.y() as f64));
		});
		for node in nodes.iter_mut() {
			if let Some((x, y)) = self.index.get(&node.id).and_then(|idx| placed.get(idx)) {
				node.x = Some(*x);
				node.y = Some(*y);
			}
		}

		!self.is_idle()
	}
}
