//! Backend wire types and the data source seam used by the graph manager.

mod asset;
mod filter;
mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use asset::{AssetPathError, asset_url, decode_asset_path, encode_asset_path};
pub use filter::{is_node_id, retain_well_formed_edges};
pub use http::HttpClient;

/// Node entry of `/api/graph.json`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeSummary {
	/// Node UUID.
	pub id: String,
	/// Title of the node's first heading or file.
	pub title: String,
}

/// Edge entry of `/api/graph.json`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
	/// Linking node.
	pub source: String,
	/// Linked node.
	pub dest: String,
}

/// Body of `/api/graph.json`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphResponse {
	/// Every node in the database.
	pub nodes: Vec<NodeSummary>,
	/// Links between nodes.
	pub edges: Vec<EdgeRecord>,
}

/// A note linking to the requested node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Backlink {
	/// Node that links here.
	pub source: String,
	/// Title of the linking node.
	pub title: String,
}

/// Body of `/api/node/{id}.json`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeResponse {
	/// Node UUID.
	pub id: String,
	/// Display title.
	pub title: String,
	/// Unrendered Org source.
	pub raw: String,
	/// Nodes linking to this one.
	#[serde(default)]
	pub backlinks: Vec<Backlink>,
}

/// Failure talking to the backend.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApiError {
	/// The backend answered `404` / `not_found`.
	#[error("node {0} not found")]
	NotFound(String),
	/// Any other non-2xx status.
	#[error("backend returned status {0}")]
	Status(u16),
	/// A 2xx body that carried an `error` field.
	#[error("backend error: {0}")]
	Server(String),
	/// The request never completed.
	#[error("request failed: {0}")]
	Transport(String),
	/// The body was not the expected JSON.
	#[error("invalid response body: {0}")]
	Decode(String),
}

/// Where graph snapshots and node sources come from.
#[async_trait(?Send)]
pub trait GraphSource {
	/// Fetch the whole graph; edges with malformed destinations are already gone.
	async fn fetch_graph(&self) -> Result<GraphResponse, ApiError>;

	/// Fetch a single node's source text and backlinks.
	async fn fetch_node(&self, id: &str) -> Result<NodeResponse, ApiError>;
}
