//! Live network topology view.
//!
//! A mutable graph of nodes and directed, interface-labelled links kept in sync
//! with a rendered view and a force layout:
//! - [`Topology`] is the mutation API (upsert/remove nodes and links, bulk replace)
//! - every mutation runs one keyed reconciliation pass against the bound view
//! - the layout driver is restarted with the full current collections afterwards
//! - [`TopologyCanvas`] draws it with node dragging, pan and zoom
//!
//! # Example
//!
//! ```ignore
//! use net_topology::{GraphData, Topology, TopologyConfig};
//!
//! let config = TopologyConfig::default();
//! let topology = Topology::new(
//!     GraphData::seed(),
//!     ForceLayout::new(config.simulation.clone(), config.energy.clone()),
//!     CanvasView::new(config.labels.clone()),
//!     config,
//! );
//! topology.upsert_link("192.168.1.3", "192.168.1.1", "eth0", "eth1");
//!
//! view! { <TopologyCanvas topology=Rc::new(RefCell::new(topology)) fullscreen=true /> }
//! ```

use std::cell::RefCell;
use std::rc::Rc;

mod component;
pub mod config;
pub mod layout;
pub mod reconcile;
mod render;
pub mod scale;
mod state;
mod store;
pub mod theme;
#[allow(clippy::module_inception)]
mod topology;
mod types;
pub mod view;

pub use component::TopologyCanvas;
pub use config::{DanglingPolicy, TopologyConfig};
pub use layout::{ForceLayout, LayoutDriver};
pub use store::GraphStore;
pub use topology::Topology;
pub use types::{Endpoint, GraphData, Link, LinkKey, LinkLabels, Node};
pub use view::{CanvasView, ViewSink};

/// The browser topology: force layout drawing into the canvas view.
pub type CanvasTopology = Topology<ForceLayout, CanvasView>;

/// Shared handle used by the canvas component, the demo controls and `window.graph`.
pub type SharedTopology = Rc<RefCell<CanvasTopology>>;

/// Builds the browser topology from a seed graph and configuration.
pub fn canvas_topology(seed: GraphData, config: TopologyConfig) -> CanvasTopology {
	let layout = ForceLayout::new(config.simulation.clone(), config.energy.clone());
	let view = CanvasView::new(config.labels.clone());
	Topology::new(seed, layout, view, config)
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn canvas_topology_settles_and_binds_glyphs() {
		let mut topology = canvas_topology(GraphData::seed(), TopologyConfig::default());
		topology.upsert_link("192.168.1.3", "192.168.1.1", "eth0", "eth1");

		while topology.tick(0.016) {}

		let view = topology.view();
		assert_eq!(view.nodes().len(), 3);
		assert_eq!(view.links().len(), 2);
		assert!(view.nodes().iter().all(|g| g.placed));
		assert!(view.links().iter().all(|g| g.visible));
		assert!(topology.data().nodes.iter().all(|n| n.position().is_some()));
	}

	#[test]
	fn self_loop_is_kept_and_layout_keeps_running() {
		let mut topology = canvas_topology(GraphData::default(), TopologyConfig::default());
		topology.upsert_link("a", "a", "lo", "lo");
		topology.upsert_link("a", "b", "eth0", "eth1");

		for _ in 0..20 {
			topology.tick(0.016);
		}

		let keys: Vec<String> = topology.data().links.iter().map(|l| l.key().to_string()).collect();
		assert_eq!(keys, vec!["a→a", "a→b"]);
		assert_eq!(topology.view().links().len(), 2);
		assert!(topology.data().nodes.iter().all(|n| n.position().is_some()));
	}

	#[test]
	fn removed_node_disappears_from_view() {
		let mut topology = canvas_topology(GraphData::seed(), TopologyConfig::default());
		topology.tick(0.016);
		topology.remove_node("192.168.1.2");
		topology.tick(0.016);

		let keys: Vec<&str> = topology.view().nodes().iter().map(|g| g.key.as_str()).collect();
		assert_eq!(keys, vec!["192.168.1.1"]);
		assert!(topology.view().links().is_empty());
	}
}
