//! net-topology: live network topology visualization.
//!
//! This crate provides a WASM-based topology view: a mutable graph of routers and
//! interface-labelled links, kept in sync with a canvas rendering and a
//! physics-based layout, and scriptable from the page through `window.graph`.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use serde::de::DeserializeOwned;
use wasm_bindgen::JsCast;
use web_sys::HtmlScriptElement;

pub mod bridge;
pub mod components;
mod demo;
pub mod error;

pub use components::topology::{
	CanvasTopology, GraphData, Link, LinkLabels, Node, SharedTopology, Topology, TopologyCanvas,
	TopologyConfig, canvas_topology,
};
pub use error::{BridgeError, LoadError};

/// Id of the `<script>` element holding the seed graph JSON.
pub const GRAPH_DATA_ID: &str = "graph-data";
/// Id of the optional `<script>` element holding [`TopologyConfig`] JSON.
pub const GRAPH_CONFIG_ID: &str = "graph-config";

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("net-topology: logging initialized");
}

/// Reads and parses the JSON text of the `<script>` element with the given id.
fn load_script_json<T: DeserializeOwned>(id: &'static str) -> Result<T, LoadError> {
	let document = web_sys::window()
		.and_then(|w| w.document())
		.ok_or(LoadError::NoDocument)?;
	let element = document
		.get_element_by_id(id)
		.ok_or(LoadError::MissingElement(id))?;
	let script: HtmlScriptElement = element.dyn_into().map_err(|_| LoadError::NotAScript(id))?;
	let text = script.text().map_err(|_| LoadError::Unreadable(id))?;
	serde_json::from_str(&text).map_err(|source| LoadError::Json { id, source })
}

fn load_seed() -> GraphData {
	match load_script_json::<GraphData>(GRAPH_DATA_ID) {
		Ok(data) => {
			info!(
				"net-topology: loaded {} nodes, {} links",
				data.nodes.len(),
				data.links.len()
			);
			data
		}
		Err(LoadError::MissingElement(_)) => GraphData::seed(),
		Err(e) => {
			warn!("net-topology: {e}, using built-in seed");
			GraphData::seed()
		}
	}
}

fn load_config() -> TopologyConfig {
	match load_script_json::<TopologyConfig>(GRAPH_CONFIG_ID) {
		Ok(config) => config,
		Err(LoadError::MissingElement(_)) => TopologyConfig::default(),
		Err(e) => {
			warn!("net-topology: {e}, using default config");
			TopologyConfig::default()
		}
	}
}

/// Main application component.
/// Builds the topology from the page seed, exposes `window.graph`, and renders
/// the canvas with the demo controls.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let seed = load_seed();
	let topology: SharedTopology =
		Rc::new(RefCell::new(canvas_topology(seed.clone(), load_config())));
	bridge::expose(&topology);

	let (topology_add, topology_remove, topology_reset) =
		(topology.clone(), topology.clone(), topology.clone());
	let on_add = move |_| demo::add_next(&mut *topology_add.borrow_mut());
	let on_remove = move |_| demo::remove_last(&mut *topology_remove.borrow_mut());
	let on_reset = move |_| demo::reset(&mut *topology_reset.borrow_mut(), &seed);

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Network Topology" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph">
			<div class="toolbar">
				<button id="addNode" on:click=on_add>"Add node"</button>
				<button id="removeNode" on:click=on_remove>"Remove node"</button>
				<button id="reset" on:click=on_reset>"Reset"</button>
			</div>
			<TopologyCanvas topology=topology fullscreen=true />
		</div>
	}
}
