//! Graph data structures shared by the store, the reconciler and the JS bridge.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Attribute keys owned by identity or by the layout, never stored in [`Node::attrs`].
pub const RESERVED_KEYS: &[&str] = &["id", "x", "y", "fx", "fy"];

/// A vertex in the topology, identified by a stable string id.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Node {
	/// Unique identifier. Links reference nodes by this value.
	pub id: String,
	/// Free-form attributes (label, color, group, ...).
	#[serde(flatten)]
	pub attrs: Map<String, Value>,
	/// Layout position, assigned by the layout driver.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub x: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub y: Option<f64>,
	/// Pinned position set while the node is being dragged.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub fx: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub fy: Option<f64>,
}

impl Node {
	/// A bare node with no attributes and no position.
	pub fn new(id: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			..Default::default()
		}
	}

	/// A new node carrying `attrs`, reserved keys dropped.
	pub fn with_attrs(id: impl Into<String>, attrs: Map<String, Value>) -> Self {
		let mut node = Self::new(id);
		node.merge_attrs(attrs);
		node
	}

	/// Merges `attrs` into this node, later values winning. Reserved keys are skipped
	/// so the id and position fields are never touched.
	pub fn merge_attrs(&mut self, attrs: Map<String, Value>) {
		for (key, value) in attrs {
			if RESERVED_KEYS.contains(&key.as_str()) {
				log::debug!("net-topology: ignoring reserved attribute {key:?} on {}", self.id);
				continue;
			}
			self.attrs.insert(key, value);
		}
	}

	/// Current layout position, if the layout has placed this node.
	pub fn position(&self) -> Option<(f64, f64)> {
		Some((self.x?, self.y?))
	}

	/// Pinned position, if the node is held by a drag.
	pub fn pinned(&self) -> Option<(f64, f64)> {
		Some((self.fx?, self.fy?))
	}
}

/// A link endpoint as it may arrive from outside: either a raw id or an object
/// carrying an `id` field (what a tick-resolved layout hands back).
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Endpoint {
	/// A raw node id.
	Id(String),
	/// A node object; only its `id` is kept.
	Resolved { id: String },
}

impl Endpoint {
	/// The raw node id behind this endpoint.
	pub fn resolve_id(&self) -> &str {
		match self {
			Endpoint::Id(id) | Endpoint::Resolved { id } => id,
		}
	}

	/// Consumes the endpoint, returning the raw id.
	pub fn into_id(self) -> String {
		match self {
			Endpoint::Id(id) | Endpoint::Resolved { id } => id,
		}
	}
}

impl From<&str> for Endpoint {
	fn from(id: &str) -> Self {
		Endpoint::Id(id.to_string())
	}
}

fn endpoint_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
	Endpoint::deserialize(deserializer).map(Endpoint::into_id)
}

/// A directed edge between two node ids, labelled with the interface at each end.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Link {
	/// Source node id (always stored raw).
	#[serde(deserialize_with = "endpoint_id")]
	pub source: String,
	/// Target node id (always stored raw).
	#[serde(deserialize_with = "endpoint_id")]
	pub target: String,
	/// Interface name at the source end.
	#[serde(default)]
	pub src_if: String,
	/// Interface name at the target end.
	#[serde(default)]
	pub dst_if: String,
}

impl Link {
	/// An unlabelled link from `source` to `target`.
	pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
			..Default::default()
		}
	}

	/// Sets the source interface label.
	pub fn with_src_if(mut self, src_if: impl Into<String>) -> Self {
		self.src_if = src_if.into();
		self
	}

	/// Sets the target interface label.
	pub fn with_dst_if(mut self, dst_if: impl Into<String>) -> Self {
		self.dst_if = dst_if.into();
		self
	}

	/// Reconciliation key: the ordered endpoint pair.
	pub fn key(&self) -> LinkKey {
		LinkKey::new(&self.source, &self.target)
	}

	/// True when this is the `source → target` link.
	pub fn is_pair(&self, source: &str, target: &str) -> bool {
		self.source == source && self.target == target
	}

	/// True when either endpoint is `id`.
	pub fn touches(&self, id: &str) -> bool {
		self.source == id || self.target == id
	}
}

/// Identity of a link: the ordered `(source, target)` pair.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LinkKey {
	pub source: String,
	pub target: String,
}

impl LinkKey {
	pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
		}
	}
}

impl fmt::Display for LinkKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}→{}", self.source, self.target)
	}
}

/// Partial interface-label update. `None` leaves the field unchanged.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct LinkLabels {
	#[serde(default, alias = "dstIf")]
	pub dst_if: Option<String>,
	#[serde(default, alias = "srcIf")]
	pub src_if: Option<String>,
}

/// Complete graph data: nodes and links.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
	#[serde(default)]
	pub nodes: Vec<Node>,
	#[serde(default)]
	pub links: Vec<Link>,
}

impl GraphData {
	/// Built-in two-router seed used when the page provides no graph.
	pub fn seed() -> Self {
		Self {
			nodes: vec![Node::new("192.168.1.1"), Node::new("192.168.1.2")],
			links: vec![
				Link::new("192.168.1.1", "192.168.1.2")
					.with_src_if("eth69")
					.with_dst_if("eth420"),
			],
		}
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use serde_json::json;

	use super::*;

	#[test]
	fn link_endpoints_accept_raw_and_resolved_ids() {
		let links: Vec<Link> = serde_json::from_value(json!([
			{ "source": "a", "target": "b", "src_if": "eth0" },
			{ "source": { "id": "b", "x": 1.5, "index": 0 }, "target": { "id": "c" }, "dst_if": "eth1" },
		]))
		.unwrap();

		assert_eq!(links[0].key(), LinkKey::new("a", "b"));
		assert_eq!(links[0].dst_if, "");
		assert_eq!(links[1].key(), LinkKey::new("b", "c"));
		assert_eq!(links[1].dst_if, "eth1");
	}

	#[test]
	fn resolve_id_unwraps_both_forms() {
		assert_eq!(Endpoint::from("r1").resolve_id(), "r1");
		let resolved: Endpoint = serde_json::from_value(json!({ "id": "r2", "vx": 0.3 })).unwrap();
		assert_eq!(resolved.resolve_id(), "r2");
	}

	#[test]
	fn node_attributes_flatten_around_reserved_fields() {
		let node: Node =
			serde_json::from_value(json!({ "id": "r1", "label": "core", "x": 3.0, "y": 4.0 }))
				.unwrap();
		assert_eq!(node.id, "r1");
		assert_eq!(node.position(), Some((3.0, 4.0)));
		assert_eq!(node.attrs.get("label"), Some(&json!("core")));
		assert!(!node.attrs.contains_key("x"));

		let back = serde_json::to_value(&node).unwrap();
		assert_eq!(back, json!({ "id": "r1", "label": "core", "x": 3.0, "y": 4.0 }));
	}

	#[test]
	fn merge_skips_reserved_keys() {
		let mut node = Node::new("r1");
		node.x = Some(10.0);
		let attrs = json!({ "id": "other", "x": 99.0, "role": "edge" });
		node.merge_attrs(attrs.as_object().cloned().unwrap());

		assert_eq!(node.id, "r1");
		assert_eq!(node.x, Some(10.0));
		assert_eq!(node.attrs.get("role"), Some(&json!("edge")));
	}

	#[test]
	fn link_key_renders_with_arrow() {
		assert_eq!(LinkKey::new("10.0.0.1", "10.0.0.2").to_string(), "10.0.0.1→10.0.0.2");
	}

	#[test]
	fn labels_accept_camel_case() {
		let labels: LinkLabels = serde_json::from_value(json!({ "dstIf": "ge-0/0/1" })).unwrap();
		assert_eq!(labels.dst_if.as_deref(), Some("ge-0/0/1"));
		assert_eq!(labels.src_if, None);
	}
}
