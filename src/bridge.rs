//! `window.graph`: the mutation API exposed to page scripts.
//!
//! Values cross the boundary as JSON. Link endpoints may be raw ids or node
//! objects carrying an `id`; both are normalized on the way in.

use js_sys::{JSON, Reflect};
use log::{info, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Map;
use wasm_bindgen::prelude::*;

use crate::components::topology::{GraphData, Link, LinkLabels, Node, SharedTopology};
use crate::error::BridgeError;

fn decode<T: DeserializeOwned>(what: &'static str, text: &str) -> Result<T, BridgeError> {
	serde_json::from_str(text).map_err(|source| BridgeError::Decode { what, source })
}

fn from_js<T: DeserializeOwned + Default>(what: &'static str, value: &JsValue) -> Result<T, BridgeError> {
	if value.is_undefined() || value.is_null() {
		return Ok(T::default());
	}
	let text: String = JSON::stringify(value).map_err(|_| BridgeError::NotJson)?.into();
	decode(what, &text)
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, BridgeError> {
	let text = serde_json::to_string(value)?;
	JSON::parse(&text).map_err(|_| BridgeError::NotJson)
}

/// Handle to the live topology, installed as `window.graph`.
#[wasm_bindgen]
pub struct GraphHandle {
	topology: SharedTopology,
}

impl GraphHandle {
	pub fn new(topology: SharedTopology) -> Self {
		Self { topology }
	}
}

#[wasm_bindgen]
impl GraphHandle {
	#[wasm_bindgen(js_name = upsertNode)]
	pub fn upsert_node(&self, id: &str, attrs: JsValue) -> Result<(), JsError> {
		let attrs: Map<_, _> = from_js("node attributes", &attrs)?;
		self.topology.borrow_mut().upsert_node(id, attrs);
		Ok(())
	}

	#[wasm_bindgen(js_name = removeNode)]
	pub fn remove_node(&self, id: &str) {
		self.topology.borrow_mut().remove_node(id);
	}

	#[wasm_bindgen(js_name = upsertLink)]
	pub fn upsert_link(&self, source: &str, target: &str, dst_if: Option<String>, src_if: Option<String>) {
		self.topology.borrow_mut().upsert_link(
			source,
			target,
			dst_if.as_deref().unwrap_or_default(),
			src_if.as_deref().unwrap_or_default(),
		);
	}

	#[wasm_bindgen(js_name = setLinkLabels)]
	pub fn set_link_labels(&self, source: &str, target: &str, labels: JsValue) -> Result<(), JsError> {
		let labels: LinkLabels = from_js("link labels", &labels)?;
		self.topology.borrow_mut().set_link_labels(source, target, labels);
		Ok(())
	}

	#[wasm_bindgen(js_name = removeLink)]
	pub fn remove_link(&self, source: &str, target: &str) {
		self.topology.borrow_mut().remove_link(source, target);
	}

	#[wasm_bindgen(js_name = setData)]
	pub fn set_data(&self, nodes: JsValue, links: JsValue) -> Result<(), JsError> {
		let data = GraphData {
			nodes: from_js::<Vec<Node>>("nodes", &nodes)?,
			links: from_js::<Vec<Link>>("links", &links)?,
		};
		self.topology.borrow_mut().set_data(data);
		Ok(())
	}

	/// Snapshot of the current nodes and links.
	#[wasm_bindgen(getter)]
	pub fn data(&self) -> JsValue {
		to_js(self.topology.borrow().data()).unwrap_or_else(|e| {
			warn!("net-topology: {e}");
			JsValue::NULL
		})
	}
}

/// Installs a [`GraphHandle`] for `topology` as `window.graph`.
pub fn expose(topology: &SharedTopology) {
	let Some(window) = web_sys::window() else {
		warn!("net-topology: no window, graph API not exposed");
		return;
	};
	let handle = JsValue::from(GraphHandle::new(topology.clone()));
	match Reflect::set(&window, &JsValue::from_str("graph"), &handle) {
		Ok(_) => info!("net-topology: graph API available as window.graph"),
		Err(_) => warn!("net-topology: could not set window.graph"),
	}
}
