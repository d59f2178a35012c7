//! View sink: the drawable element set bound to the graph.
//!
//! [`CanvasView`] keeps one glyph per bound node and link, applies reconciliation
//! partitions to them, and picks up positions after each layout step. The canvas
//! renderer draws straight from these glyphs.

use std::collections::HashMap;

use serde_json::Value;

use super::config::LabelConfig;
use super::reconcile::KeyedDiff;
use super::types::{Link, LinkKey, Node};

/// Receives reconciliation instructions and position updates.
pub trait ViewSink {
	/// Adds, refreshes and drops node elements per the node partitions.
	fn bind_nodes(&mut self, diff: &KeyedDiff<String>, nodes: &[Node]);
	/// Adds, refreshes and drops link elements per the link partitions.
	fn bind_links(&mut self, diff: &KeyedDiff<LinkKey>, links: &[Link]);
	/// Called after every layout step with the freshly positioned collections.
	fn positions(&mut self, nodes: &[Node], links: &[Link]);
}

/// A drawn node: circle plus text label.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeGlyph {
	/// Bound node id.
	pub key: String,
	/// Text drawn next to the node: its `label` attribute or the id.
	pub label: String,
	pub color: Option<String>,
	pub x: f64,
	pub y: f64,
	/// False until the layout has given the node a position.
	pub placed: bool,
	pub pinned: bool,
}

impl NodeGlyph {
	fn from_node(node: &Node) -> Self {
		let mut glyph = Self {
			key: node.id.clone(),
			label: String::new(),
			color: None,
			x: 0.0,
			y: 0.0,
			placed: false,
			pinned: false,
		};
		glyph.refresh(node);
		glyph
	}

	fn refresh(&mut self, node: &Node) {
		self.label = match node.attrs.get("label") {
			Some(Value::String(label)) => label.clone(),
			_ => node.id.clone(),
		};
		self.color = match node.attrs.get("color") {
			Some(Value::String(color)) => Some(color.clone()),
			_ => None,
		};
	}
}

/// A drawn link: directed edge with an interface label near each end.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkGlyph {
	pub key: LinkKey,
	pub src_label: String,
	pub dst_label: String,
	pub from: (f64, f64),
	pub to: (f64, f64),
	/// False while either endpoint is missing or not yet placed.
	pub visible: bool,
}

impl LinkGlyph {
	fn from_link(link: &Link) -> Self {
		Self {
			key: link.key(),
			src_label: link.src_if.clone(),
			dst_label: link.dst_if.clone(),
			from: (0.0, 0.0),
			to: (0.0, 0.0),
			visible: false,
		}
	}

	/// Point at `fraction` of the way from source to target.
	pub fn point_at(&self, fraction: f64) -> (f64, f64) {
		(
			self.from.0 + (self.to.0 - self.from.0) * fraction,
			self.from.1 + (self.to.1 - self.from.1) * fraction,
		)
	}
}

/// [`ViewSink`] holding the glyphs drawn on the canvas.
#[derive(Clone, Debug, Default)]
pub struct CanvasView {
	nodes: Vec<NodeGlyph>,
	links: Vec<LinkGlyph>,
	labels: LabelConfig,
}

impl CanvasView {
	/// An empty view placing interface labels per `labels`.
	pub fn new(labels: LabelConfig) -> Self {
		Self {
			labels,
			..Default::default()
		}
	}

	/// Node glyphs in draw order.
	pub fn nodes(&self) -> &[NodeGlyph] {
		&self.nodes
	}

	pub fn links(&self) -> &[LinkGlyph] {
		&self.links
	}

	/// Where the source-interface and destination-interface labels of `glyph` go.
	pub fn label_points(&self, glyph: &LinkGlyph) -> ((f64, f64), (f64, f64)) {
		(
			glyph.point_at(self.labels.source_at),
			glyph.point_at(self.labels.target_at),
		)
	}

	/// Topmost placed node within `radius` of the world-space point.
	pub fn node_at(&self, x: f64, y: f64, radius: f64) -> Option<&NodeGlyph> {
		self.nodes.iter().rev().find(|g| {
			let (dx, dy) = (g.x - x, g.y - y);
			g.placed && (dx * dx + dy * dy).sqrt() < radius
		})
	}
}

impl ViewSink for CanvasView {
	fn bind_nodes(&mut self, diff: &KeyedDiff<String>, nodes: &[Node]) {
		let by_id: HashMap<&str, &Node> = nodes.iter().map(|n| (n.id.as_str(), n)).collect();

		self.nodes.retain(|g| !diff.exiting.contains(&g.key));
		for glyph in &mut self.nodes {
			if let Some(node) = by_id.get(glyph.key.as_str()) {
				glyph.refresh(node);
			}
		}
		for key in &diff.entering {
			if let Some(node) = by_id.get(key.as_str()) {
				self.nodes.push(NodeGlyph::from_node(node));
			}
		}
	}

	fn bind_links(&mut self, diff: &KeyedDiff<LinkKey>, links: &[Link]) {
		let by_key: HashMap<LinkKey, &Link> = links.iter().map(|l| (l.key(), l)).collect();

		self.links.retain(|g| !diff.exiting.contains(&g.key));
		for glyph in &mut self.links {
			if let Some(link) = by_key.get(&glyph.key) {
				glyph.src_label = link.src_if.clone();
				glyph.dst_label = link.dst_if.clone();
			}
		}
		for key in &diff.entering {
			if let Some(link) = by_key.get(key) {
				self.links.push(LinkGlyph::from_link(link));
			}
		}
	}

	fn positions(&mut self, nodes: &[Node], _links: &[Link]) {
		let by_id: HashMap<&str, &Node> = nodes.iter().map(|n| (n.id.as_str(), n)).collect();

		for glyph in &mut self.nodes {
			let node = by_id.get(glyph.key.as_str());
			match node.and_then(|n| n.position()) {
				Some((x, y)) => {
					glyph.x = x;
					glyph.y = y;
					glyph.placed = true;
				}
				None => glyph.placed = false,
			}
			glyph.pinned = node.is_some_and(|n| n.pinned().is_some());
		}

		for glyph in &mut self.links {
			let from = by_id.get(glyph.key.source.as_str()).and_then(|n| n.position());
			let to = by_id.get(glyph.key.target.as_str()).and_then(|n| n.position());
			match (from, to) {
				(Some(from), Some(to)) => {
					glyph.from = from;
					glyph.to = to;
					glyph.visible = true;
				}
				_ => glyph.visible = false,
			}
		}
	}
}
