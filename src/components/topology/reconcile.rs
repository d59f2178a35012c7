//! Keyed reconciliation between the store and the previously bound view elements.
//!
//! The previously bound key sets are an explicit [`Bindings`] value: callers pass
//! the old one in and keep the one handed back, so a pass can be tested without
//! any rendering surface.

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

use log::debug;

use super::types::{Link, LinkKey, Node};

/// Something with a stable reconciliation identity.
pub trait Keyed {
	type Key: Clone + Eq + Hash + fmt::Display;

	fn key(&self) -> Self::Key;
}

impl Keyed for Node {
	type Key = String;

	fn key(&self) -> String {
		self.id.clone()
	}
}

impl Keyed for Link {
	type Key = LinkKey;

	fn key(&self) -> LinkKey {
		Link::key(self)
	}
}

/// Result of diffing one collection: what must be created, refreshed and removed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyedDiff<K> {
	/// Present now, absent before.
	pub entering: Vec<K>,
	/// Present in both; attributes and text must be refreshed.
	pub updating: Vec<K>,
	/// Present before, absent now.
	pub exiting: Vec<K>,
}

impl<K> Default for KeyedDiff<K> {
	fn default() -> Self {
		Self {
			entering: Vec::new(),
			updating: Vec::new(),
			exiting: Vec::new(),
		}
	}
}

impl<K> KeyedDiff<K> {
	/// True when nothing enters or exits.
	pub fn is_stable(&self) -> bool {
		self.entering.is_empty() && self.exiting.is_empty()
	}
}

/// Keys bound to view elements, in bind order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoundSet<K> {
	keys: Vec<K>,
}

impl<K> Default for BoundSet<K> {
	fn default() -> Self {
		Self { keys: Vec::new() }
	}
}

impl<K: Clone + Eq + Hash> BoundSet<K> {
	pub fn keys(&self) -> &[K] {
		&self.keys
	}

	pub fn len(&self) -> usize {
		self.keys.len()
	}

	pub fn is_empty(&self) -> bool {
		self.keys.is_empty()
	}

	pub fn contains(&self, key: &K) -> bool {
		self.keys.contains(key)
	}
}

/// Diffs `current` against `previous`, returning the partitions and the new bound set.
///
/// A key repeated in `current` binds once, at its first position.
pub fn diff<T: Keyed>(
	previous: &BoundSet<T::Key>,
	current: &[T],
) -> (KeyedDiff<T::Key>, BoundSet<T::Key>) {
	let before: HashSet<&T::Key> = previous.keys.iter().collect();
	let mut seen = HashSet::with_capacity(current.len());
	let mut result = KeyedDiff::default();
	let mut next = BoundSet {
		keys: Vec::with_capacity(current.len()),
	};

	for item in current {
		let key = item.key();
		if !seen.insert(key.clone()) {
			debug!("net-topology: duplicate key {key} bound once");
			continue;
		}
		if before.contains(&key) {
			result.updating.push(key.clone());
		} else {
			result.entering.push(key.clone());
		}
		next.keys.push(key);
	}

	result.exiting = previous
		.keys
		.iter()
		.filter(|k| !seen.contains(*k))
		.cloned()
		.collect();

	(result, next)
}

/// Node and link key sets currently bound to the view.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Bindings {
	pub nodes: BoundSet<String>,
	pub links: BoundSet<LinkKey>,
}

/// Partitions for both collections from one reconciliation pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Reconciliation {
	pub nodes: KeyedDiff<String>,
	pub links: KeyedDiff<LinkKey>,
}

/// Runs one reconciliation pass over the current collections.
pub fn reconcile(previous: &Bindings, nodes: &[Node], links: &[Link]) -> (Bindings, Reconciliation) {
	let (node_diff, node_set) = diff(&previous.nodes, nodes);
	let (link_diff, link_set) = diff(&previous.links, links);

	debug!(
		"net-topology: reconcile nodes +{} ~{} -{}, links +{} ~{} -{}",
		node_diff.entering.len(),
		node_diff.updating.len(),
		node_diff.exiting.len(),
		link_diff.entering.len(),
		link_diff.updating.len(),
		link_diff.exiting.len(),
	);

	(
		Bindings {
			nodes: node_set,
			links: link_set,
		},
		Reconciliation {
			nodes: node_diff,
			links: link_diff,
		},
	)
}
