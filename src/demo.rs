//! Demo controls: grow, shrink and reset a chain of 192.168.1.x routers.

use serde_json::Map;

use crate::components::topology::{GraphData, LayoutDriver, Topology, ViewSink};

const SUBNET: &str = "192.168.1.";

fn address(n: usize) -> String {
	format!("{SUBNET}{n}")
}

/// Adds the next address and links it back to the previous one.
pub fn add_next<L: LayoutDriver, V: ViewSink>(topology: &mut Topology<L, V>) {
	let n = topology.data().nodes.len() + 1;
	let id = address(n);
	topology.upsert_node(&id, Map::new());
	topology.upsert_link(&id, &address(n - 1), "eth69", "eth420");
}

/// Removes the highest address, assuming the chain is numbered densely.
pub fn remove_last<L: LayoutDriver, V: ViewSink>(topology: &mut Topology<L, V>) {
	let n = topology.data().nodes.len();
	topology.remove_node(&address(n));
}

/// Restores the graph the page started with.
pub fn reset<L: LayoutDriver, V: ViewSink>(topology: &mut Topology<L, V>, seed: &GraphData) {
	topology.set_data(seed.clone());
}
