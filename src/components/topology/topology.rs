//! Live topology graph: the mutation API over the store.
//!
//! Every mutation finishes with exactly one reconciliation pass: the view sink gets
//! the keyed partitions, the layout driver gets the full current collections and is
//! restarted with elevated energy. Drag callbacks and layout steps only ever touch
//! node position fields.

use log::warn;
use serde_json::{Map, Value};

use super::config::{DanglingPolicy, TopologyConfig};
use super::layout::{LayoutDriver, layout_links};
use super::reconcile::{Bindings, reconcile};
use super::store::GraphStore;
use super::types::{GraphData, Link, LinkLabels, Node};
use super::view::ViewSink;

/// The graph store plus its bound layout and view.
pub struct Topology<L, V> {
	store: GraphStore,
	bindings: Bindings,
	layout: L,
	view: V,
	config: TopologyConfig,
}

impl<L: LayoutDriver, V: ViewSink> Topology<L, V> {
	/// Creates the topology from a seed graph and runs the initial pass.
	pub fn new(seed: GraphData, layout: L, view: V, config: TopologyConfig) -> Self {
		let mut topology = Self {
			store: GraphStore::default(),
			bindings: Bindings::default(),
			layout,
			view,
			config,
		};
		topology.set_data(seed);
		topology
	}

	/// Current nodes and links.
	pub fn data(&self) -> &GraphData {
		self.store.data()
	}

	/// The bound view sink.
	pub fn view(&self) -> &V {
		&self.view
	}

	/// The bound layout driver.
	pub fn layout(&self) -> &L {
		&self.layout
	}

	pub fn config(&self) -> &TopologyConfig {
		&self.config
	}

	/// Adds the node, or merges `attrs` into the existing one keeping its position.
	pub fn upsert_node(&mut self, id: &str, attrs: Map<String, Value>) {
		match self.store.node_mut(id) {
			Some(node) => node.merge_attrs(attrs),
			None => self.store.push_node(Node::with_attrs(id, attrs)),
		}
		self.update();
	}

	/// Removes the node and every link that starts or ends at it.
	pub fn remove_node(&mut self, id: &str) {
		self.store.remove_node(id);
		self.store.remove_links_touching(id);
		self.update();
	}

	/// Adds or relabels the `source → target` link, creating bare endpoint nodes
	/// when they do not exist yet.
	pub fn upsert_link(&mut self, source: &str, target: &str, dst_if: &str, src_if: &str) {
		match self.store.link_mut(source, target) {
			Some(link) => {
				link.dst_if = dst_if.to_string();
				link.src_if = src_if.to_string();
			}
			None => self.store.push_link(
				Link::new(source, target)
					.with_dst_if(dst_if)
					.with_src_if(src_if),
			),
		}
		for id in [source, target] {
			if !self.store.contains_node(id) {
				self.store.push_node(Node::new(id));
			}
		}
		self.update();
	}

	/// Sets only the labels present in `labels`. Does nothing for an unknown pair.
	pub fn set_link_labels(&mut self, source: &str, target: &str, labels: LinkLabels) {
		let Some(link) = self.store.link_mut(source, target) else {
			return;
		};
		if let Some(dst_if) = labels.dst_if {
			link.dst_if = dst_if;
		}
		if let Some(src_if) = labels.src_if {
			link.src_if = src_if;
		}
		self.update();
	}

	/// Removes the `source → target` link if present.
	pub fn remove_link(&mut self, source: &str, target: &str) {
		self.store.remove_link(source, target);
		self.update();
	}

	/// Replaces the whole graph.
	///
	/// Duplicate node ids merge into one node, duplicate pairs keep the last link.
	/// Links with missing endpoints are handled per [`DanglingPolicy`].
	pub fn set_data(&mut self, data: GraphData) {
		let mut next = GraphStore::default();

		for node in data.nodes {
			match next.node_mut(&node.id) {
				Some(existing) => existing.merge_attrs(node.attrs),
				None => next.push_node(node),
			}
		}

		for link in data.links {
			let dangling = !next.contains_node(&link.source) || !next.contains_node(&link.target);
			if dangling {
				match self.config.dangling {
					DanglingPolicy::Keep => {
						warn!("net-topology: link {} references a missing node", link.key());
					}
					DanglingPolicy::CreateEndpoints => {
						for id in [&link.source, &link.target] {
							if !next.contains_node(id) {
								next.push_node(Node::new(id.as_str()));
							}
						}
					}
					DanglingPolicy::Drop => {
						warn!("net-topology: dropping link {} with a missing endpoint", link.key());
						continue;
					}
				}
			}
			match next.link_mut(&link.source, &link.target) {
				Some(existing) => *existing = link,
				None => next.push_link(link),
			}
		}

		self.store = next;
		self.update();
	}

	/// Pins the node where it is and keeps the layout warm while it is dragged.
	pub fn drag_start(&mut self, id: &str) {
		let Some(node) = self.store.node_mut(id) else {
			return;
		};
		node.fx = node.x;
		node.fy = node.y;
		self.layout.set_energy_target(self.config.energy.drag_target);
	}

	/// Moves the pin of a dragged node.
	pub fn drag(&mut self, id: &str, x: f64, y: f64) {
		if let Some(node) = self.store.node_mut(id) {
			node.fx = Some(x);
			node.fy = Some(y);
		}
	}

	/// Releases the pin and lets the layout cool down again.
	pub fn drag_end(&mut self, id: &str) {
		if let Some(node) = self.store.node_mut(id) {
			node.fx = None;
			node.fy = None;
		}
		self.layout.set_energy_target(0.0);
	}

	/// Advances the layout one step and pushes new positions to the view.
	/// Returns whether the layout is still moving.
	pub fn tick(&mut self, dt: f32) -> bool {
		let active = self.layout.step(dt, self.store.nodes_mut());
		if active {
			self.view.positions(self.store.nodes(), self.store.links());
		}
		active
	}

	fn update(&mut self) {
		let (nodes, links) = (self.store.nodes(), self.store.links());
		let (bindings, pass) = reconcile(&self.bindings, nodes, links);
		self.bindings = bindings;

		self.view.bind_nodes(&pass.nodes, nodes);
		self.view.bind_links(&pass.links, links);
		self.view.positions(nodes, links);

		self.layout.set_nodes(nodes);
		self.layout.set_links(&layout_links(nodes, links));
		self.layout.restart(self.config.energy.restart);
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use proptest::prelude::*;
	use serde_json::json;

	use super::*;
	use crate::components::topology::layout::LayoutLink;
	use crate::components::topology::reconcile::KeyedDiff;
	use crate::components::topology::types::LinkKey;

	#[derive(Default)]
	struct RecordingLayout {
		nodes: Vec<String>,
		links: Vec<LayoutLink>,
		restarts: Vec<f64>,
		target: f64,
		steps: usize,
	}

	impl LayoutDriver for RecordingLayout {
		fn set_nodes(&mut self, nodes: &[Node]) {
			self.nodes = nodes.iter().map(|n| n.id.clone()).collect();
		}

		fn set_links(&mut self, links: &[LayoutLink]) {
			self.links = links.to_vec();
		}

		fn restart(&mut self, energy: f64) {
			self.restarts.push(energy);
		}

		fn set_energy_target(&mut self, target: f64) {
			self.target = target;
		}

		fn energy(&self) -> f64 {
			self.restarts.last().copied().unwrap_or(0.0)
		}

		fn step(&mut self, _dt: f32, nodes: &mut [Node]) -> bool {
			self.steps += 1;
			for (i, node) in nodes.iter_mut().enumerate() {
				let (x, y) = node.pinned().unwrap_or((i as f64, 0.0));
				node.x = Some(x);
				node.y = Some(y);
			}
			true
		}
	}

	#[derive(Default)]
	struct RecordingView {
		node_passes: Vec<KeyedDiff<String>>,
		link_passes: Vec<KeyedDiff<LinkKey>>,
		position_updates: usize,
	}

	impl ViewSink for RecordingView {
		fn bind_nodes(&mut self, diff: &KeyedDiff<String>, _nodes: &[Node]) {
			self.node_passes.push(diff.clone());
		}

		fn bind_links(&mut self, diff: &KeyedDiff<LinkKey>, _links: &[Link]) {
			self.link_passes.push(diff.clone());
		}

		fn positions(&mut self, _nodes: &[Node], _links: &[Link]) {
			self.position_updates += 1;
		}
	}

	type TestTopology = Topology<RecordingLayout, RecordingView>;

	fn topology(seed: GraphData) -> TestTopology {
		Topology::new(
			seed,
			RecordingLayout::default(),
			RecordingView::default(),
			TopologyConfig::default(),
		)
	}

	fn with_policy(seed: GraphData, dangling: DanglingPolicy) -> TestTopology {
		let config = TopologyConfig {
			dangling,
			..Default::default()
		};
		Topology::new(seed, RecordingLayout::default(), RecordingView::default(), config)
	}

	fn attrs(value: Value) -> Map<String, Value> {
		value.as_object().cloned().unwrap_or_default()
	}

	fn ids(topology: &TestTopology) -> Vec<&str> {
		topology.data().nodes.iter().map(|n| n.id.as_str()).collect()
	}

	fn passes(topology: &TestTopology) -> usize {
		topology.view().node_passes.len()
	}

	#[test]
	fn seed_runs_one_pass() {
		let t = topology(GraphData::seed());
		assert_eq!(passes(&t), 1);
		assert_eq!(t.view().node_passes[0].entering.len(), 2);
		assert_eq!(t.layout().restarts, vec![0.5]);
		assert_eq!(t.layout().links, vec![LayoutLink { source: 0, target: 1 }]);
	}

	#[test]
	fn upsert_node_merges_in_place() {
		let mut t = topology(GraphData::default());
		t.upsert_node("r1", attrs(json!({ "role": "core", "rack": 1 })));
		t.tick(0.016);
		let placed = t.data().nodes[0].position();

		t.upsert_node("r1", attrs(json!({ "rack": 2 })));

		assert_eq!(ids(&t), vec!["r1"]);
		let node = &t.data().nodes[0];
		assert_eq!(node.attrs, attrs(json!({ "role": "core", "rack": 2 })));
		assert_eq!(node.position(), placed);
		assert_eq!(t.view().node_passes.last().unwrap().updating, vec!["r1".to_string()]);
	}

	#[test]
	fn add_node_and_link_to_seed() {
		let mut t = topology(GraphData::seed());
		t.upsert_node("192.168.1.3", Map::new());
		t.upsert_link("192.168.1.3", "192.168.1.1", "eth0", "eth1");

		let data = t.data();
		assert_eq!(data.nodes.len(), 3);
		assert_eq!(
			data.links,
			vec![
				Link::new("192.168.1.1", "192.168.1.2")
					.with_src_if("eth69")
					.with_dst_if("eth420"),
				Link::new("192.168.1.3", "192.168.1.1")
					.with_dst_if("eth0")
					.with_src_if("eth1"),
			]
		);
	}

	#[test]
	fn remove_node_cascades_to_links() {
		let mut t = topology(GraphData::seed());
		t.remove_node("192.168.1.2");

		assert_eq!(ids(&t), vec!["192.168.1.1"]);
		assert!(t.data().links.is_empty());
		let last = t.view().link_passes.last().unwrap();
		assert_eq!(last.exiting, vec![LinkKey::new("192.168.1.1", "192.168.1.2")]);
	}

	#[test]
	fn remove_missing_node_is_a_no_op() {
		let mut t = topology(GraphData::seed());
		let before = t.data().clone();
		t.remove_node("10.0.0.1");
		assert_eq!(t.data(), &before);
	}

	#[test]
	fn upsert_link_overwrites_labels() {
		let mut t = topology(GraphData::default());
		t.upsert_link("a", "b", "x", "y");
		t.upsert_link("a", "b", "p", "q");

		assert_eq!(
			t.data().links,
			vec![Link::new("a", "b").with_dst_if("p").with_src_if("q")]
		);
	}

	#[test]
	fn upsert_link_creates_missing_endpoints() {
		let mut t = topology(GraphData::default());
		t.upsert_link("A", "B", "", "");

		assert_eq!(ids(&t), vec!["A", "B"]);
		assert_eq!(t.data().links.len(), 1);
		assert_eq!(passes(&t), 2);
	}

	#[test]
	fn upsert_link_keeps_reverse_direction_separate() {
		let mut t = topology(GraphData::default());
		t.upsert_link("a", "b", "", "");
		t.upsert_link("b", "a", "", "");
		assert_eq!(t.data().links.len(), 2);

		t.remove_link("a", "b");
		assert_eq!(t.data().links, vec![Link::new("b", "a")]);
	}

	#[test]
	fn set_link_labels_updates_only_given_fields() {
		let mut t = topology(GraphData::seed());
		t.set_link_labels(
			"192.168.1.1",
			"192.168.1.2",
			LinkLabels {
				dst_if: Some("eth1".into()),
				src_if: None,
			},
		);

		let link = &t.data().links[0];
		assert_eq!(link.dst_if, "eth1");
		assert_eq!(link.src_if, "eth69");
	}

	#[test]
	fn set_link_labels_on_unknown_pair_changes_nothing() {
		let mut t = topology(GraphData::seed());
		let before = t.data().clone();
		t.set_link_labels(
			"192.168.1.2",
			"192.168.1.1",
			LinkLabels {
				dst_if: Some("eth9".into()),
				src_if: Some("eth8".into()),
			},
		);
		assert_eq!(t.data(), &before);
		assert_eq!(passes(&t), 1);
	}

	#[test]
	fn set_data_replaces_and_reconciles() {
		let mut t = topology(GraphData::seed());
		t.set_data(GraphData {
			nodes: vec![Node::new("192.168.1.2"), Node::new("10.0.0.1")],
			links: vec![],
		});

		let pass = t.view().node_passes.last().unwrap();
		assert_eq!(pass.entering, vec!["10.0.0.1".to_string()]);
		assert_eq!(pass.updating, vec!["192.168.1.2".to_string()]);
		assert_eq!(pass.exiting, vec!["192.168.1.1".to_string()]);
	}

	#[test]
	fn set_data_collapses_duplicates() {
		let mut t = topology(GraphData::default());
		t.set_data(GraphData {
			nodes: vec![
				Node::with_attrs("a", attrs(json!({ "k": 1 }))),
				Node::new("b"),
				Node::with_attrs("a", attrs(json!({ "j": 2 }))),
			],
			links: vec![
				Link::new("a", "b").with_dst_if("old"),
				Link::new("a", "b").with_dst_if("new"),
			],
		});

		assert_eq!(ids(&t), vec!["a", "b"]);
		assert_eq!(t.data().nodes[0].attrs, attrs(json!({ "k": 1, "j": 2 })));
		assert_eq!(t.data().links, vec![Link::new("a", "b").with_dst_if("new")]);
	}

	#[test]
	fn set_data_dangling_policies() {
		let dangling = GraphData {
			nodes: vec![Node::new("a")],
			links: vec![Link::new("a", "ghost")],
		};

		let kept = with_policy(dangling.clone(), DanglingPolicy::Keep);
		assert_eq!(ids(&kept), vec!["a"]);
		assert_eq!(kept.data().links.len(), 1);
		assert!(kept.layout().links.is_empty());

		let created = with_policy(dangling.clone(), DanglingPolicy::CreateEndpoints);
		assert_eq!(ids(&created), vec!["a", "ghost"]);
		assert_eq!(created.layout().links, vec![LayoutLink { source: 0, target: 1 }]);

		let dropped = with_policy(dangling, DanglingPolicy::Drop);
		assert_eq!(ids(&dropped), vec!["a"]);
		assert!(dropped.data().links.is_empty());
	}

	#[test]
	fn every_mutation_restarts_layout() {
		let mut t = topology(GraphData::default());
		t.upsert_node("a", Map::new());
		t.upsert_link("a", "b", "", "");
		t.remove_link("a", "b");
		t.remove_node("b");

		assert_eq!(t.layout().restarts.len(), 5);
		assert_eq!(passes(&t), 5);
		assert_eq!(t.layout().nodes, vec!["a".to_string()]);
	}

	#[test]
	fn drag_pins_then_releases() {
		let mut t = topology(GraphData::seed());
		t.tick(0.016);

		t.drag_start("192.168.1.2");
		assert_eq!(t.layout().target, 0.3);
		assert_eq!(t.data().nodes[1].pinned(), Some((1.0, 0.0)));

		t.drag("192.168.1.2", 40.0, -8.0);
		t.tick(0.016);
		assert_eq!(t.data().nodes[1].position(), Some((40.0, -8.0)));

		t.drag_end("192.168.1.2");
		assert_eq!(t.layout().target, 0.0);
		assert_eq!(t.data().nodes[1].pinned(), None);
		assert_eq!(t.data().nodes[1].position(), Some((40.0, -8.0)));
	}

	#[test]
	fn drag_unknown_node_does_not_warm_layout() {
		let mut t = topology(GraphData::seed());
		t.drag_start("nope");
		assert_eq!(t.layout().target, 0.0);
	}

	#[test]
	fn tick_feeds_view_positions() {
		let mut t = topology(GraphData::seed());
		let before = t.view().position_updates;
		assert!(t.tick(0.016));
		assert_eq!(t.view().position_updates, before + 1);
		assert_eq!(t.layout().steps, 1);
	}

	fn attr_maps() -> impl Strategy<Value = Map<String, Value>> {
		prop::collection::vec(("[a-d]", any::<i32>()), 0..4)
			.prop_map(|pairs| pairs.into_iter().map(|(k, v)| (k, json!(v))).collect::<Map<String, Value>>())
	}

	proptest! {
		#[test]
		fn repeated_upserts_leave_one_merged_node(maps in prop::collection::vec(attr_maps(), 1..8)) {
			let mut t = topology(GraphData::default());
			let mut expected = Map::new();
			for map in &maps {
				t.upsert_node("n", map.clone());
				expected.extend(map.clone());
			}

			prop_assert_eq!(ids(&t), vec!["n"]);
			prop_assert_eq!(&t.data().nodes[0].attrs, &expected);
		}

		#[test]
		fn removed_node_leaves_no_trace(
			pairs in prop::collection::vec((0u8..5, 0u8..5), 0..12),
			victim in 0u8..5,
		) {
			let mut t = topology(GraphData::default());
			for (s, d) in &pairs {
				t.upsert_link(&format!("n{s}"), &format!("n{d}"), "", "");
			}
			let victim = format!("n{victim}");
			t.remove_node(&victim);

			let data = t.data();
			prop_assert!(data.nodes.iter().all(|n| n.id != victim));
			prop_assert!(data.links.iter().all(|l| !l.touches(&victim)));
			let endpoints_intact = data.links.iter().all(|l| {
				data.nodes.iter().any(|n| n.id == l.source) && data.nodes.iter().any(|n| n.id == l.target)
			});
			prop_assert!(endpoints_intact);
		}

		#[test]
		fn link_pairs_stay_unique(pairs in prop::collection::vec((0u8..4, 0u8..4, "[a-z]{0,3}"), 0..16)) {
			let mut t = topology(GraphData::default());
			for (s, d, label) in &pairs {
				t.upsert_link(&format!("n{s}"), &format!("n{d}"), label, "");
			}

			let mut keys: Vec<LinkKey> = t.data().links.iter().map(Link::key).collect();
			let total = keys.len();
			keys.sort();
			keys.dedup();
			prop_assert_eq!(keys.len(), total);
		}
	}
}
