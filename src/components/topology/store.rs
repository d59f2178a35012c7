//! Canonical node and link collections.
//!
//! The store is pure data: it knows nothing about rendering or layout and never
//! triggers reconciliation itself. Order is insertion order.

use super::types::{GraphData, Link, Node};

/// Node and link collections in insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphStore {
	data: GraphData,
}

impl GraphStore {
	pub fn new(data: GraphData) -> Self {
		Self { data }
	}

	pub fn data(&self) -> &GraphData {
		&self.data
	}

	pub fn nodes(&self) -> &[Node] {
		&self.data.nodes
	}

	pub fn links(&self) -> &[Link] {
		&self.data.links
	}

	/// Mutable access to nodes for position write-back. Callers own position fields only.
	pub fn nodes_mut(&mut self) -> &mut [Node] {
		&mut self.data.nodes
	}

	/// Looks a node up by id.
	pub fn node(&self, id: &str) -> Option<&Node> {
		self.data.nodes.iter().find(|n| n.id == id)
	}

	pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
		self.data.nodes.iter_mut().find(|n| n.id == id)
	}

	pub fn contains_node(&self, id: &str) -> bool {
		self.node(id).is_some()
	}

	/// The `source → target` link, if stored.
	pub fn link_mut(&mut self, source: &str, target: &str) -> Option<&mut Link> {
		self.data.links.iter_mut().find(|l| l.is_pair(source, target))
	}

	pub fn push_node(&mut self, node: Node) {
		self.data.nodes.push(node);
	}

	pub fn push_link(&mut self, link: Link) {
		self.data.links.push(link);
	}

	/// Removes the node with `id`. Returns whether anything was removed.
	pub fn remove_node(&mut self, id: &str) -> bool {
		let before = self.data.nodes.len();
		self.data.nodes.retain(|n| n.id != id);
		before != self.data.nodes.len()
	}

	/// Removes every link with `id` as either endpoint. Returns how many were removed.
	pub fn remove_links_touching(&mut self, id: &str) -> usize {
		let before = self.data.links.len();
		self.data.links.retain(|l| !l.touches(id));
		before - self.data.links.len()
	}

	pub fn remove_link(&mut self, source: &str, target: &str) -> bool {
		let before = self.data.links.len();
		self.data.links.retain(|l| !l.is_pair(source, target));
		before != self.data.links.len()
	}

	/// Replaces both collections wholesale. No referential checks happen here.
	pub fn replace(&mut self, data: GraphData) {
		self.data = data;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn remove_links_touching_drops_both_directions() {
		let mut store = GraphStore::new(GraphData {
			nodes: vec![Node::new("a"), Node::new("b"), Node::new("c")],
			links: vec![Link::new("a", "b"), Link::new("b", "a"), Link::new("b", "c")],
		});

		assert_eq!(store.remove_links_touching("a"), 2);
		assert_eq!(store.links(), &[Link::new("b", "c")]);
		assert!(store.remove_node("a"));
		assert!(!store.remove_node("a"));
	}

	#[test]
	fn link_lookup_is_directional() {
		let mut store = GraphStore::new(GraphData {
			nodes: vec![],
			links: vec![Link::new("a", "b")],
		});
		assert!(store.link_mut("b", "a").is_none());
		assert!(store.link_mut("a", "b").is_some());
		assert!(!store.remove_link("b", "a"));
		assert!(store.remove_link("a", "b"));
	}
}
