//! Errors at the crate's fallible edges: reading the page and crossing into JS.
//!
//! The mutation API itself is total and has no error type.

use thiserror::Error;

/// Failure to read seed data or configuration embedded in the page.
#[derive(Debug, Error)]
pub enum LoadError {
	#[error("no browser window or document")]
	NoDocument,

	#[error("element #{0} not found")]
	MissingElement(&'static str),

	#[error("element #{0} is not a <script>")]
	NotAScript(&'static str),

	#[error("element #{0} has no readable text")]
	Unreadable(&'static str),

	#[error("invalid JSON in #{id}: {source}")]
	Json {
		id: &'static str,
		#[source]
		source: serde_json::Error,
	},
}

/// Failure to convert a value passed through `window.graph`.
#[derive(Debug, Error)]
pub enum BridgeError {
	#[error("value is not JSON-serializable")]
	NotJson,

	#[error("invalid {what}: {source}")]
	Decode {
		what: &'static str,
		#[source]
		source: serde_json::Error,
	},

	#[error("could not encode graph data: {0}")]
	Encode(#[from] serde_json::Error),
}
