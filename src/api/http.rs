use async_trait::async_trait;
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{ApiError, GraphResponse, GraphSource, NodeResponse, retain_well_formed_edges};

/// [`GraphSource`] backed by the org-roam JSON API.
#[derive(Clone, Debug)]
pub struct HttpClient {
	client: reqwest::Client,
	base: String,
}

impl HttpClient {
	/// Client rooted at `base`, e.g. `http://localhost:5174`.
	pub fn new(base: impl Into<String>) -> Self {
		Self {
			client: reqwest::Client::new(),
			base: base.into().trim_end_matches('/').to_string(),
		}
	}

	/// API origin this client talks to.
	pub fn base(&self) -> &str {
		&self.base
	}

	async fn get_json<T: DeserializeOwned>(&self, path: &str, subject: &str) -> Result<T, ApiError> {
		let url = format!("{}{}", self.base, path);
		debug!("GET {}", url);
		let response = self
			.client
			.get(&url)
			.send()
			.await
			.map_err(|e| ApiError::Transport(e.to_string()))?;
		let status = response.status();
		let text = response
			.text()
			.await
			.map_err(|e| ApiError::Transport(e.to_string()))?;
		decode_body(status.as_u16(), &text, subject)
	}
}

fn decode_body<T: DeserializeOwned>(status: u16, text: &str, subject: &str) -> Result<T, ApiError> {
	let body: Option<Value> = serde_json::from_str(text).ok();
	let error = body
		.as_ref()
		.and_then(|v| v.get("error"))
		.and_then(Value::as_str)
		.map(str::to_string);

	if status == 404 || error.as_deref() == Some("not_found") {
		return Err(ApiError::NotFound(subject.to_string()));
	}
	if !(200..300).contains(&status) {
		return Err(ApiError::Status(status));
	}
	if let Some(error) = error {
		return Err(ApiError::Server(error));
	}
	let body = body.ok_or_else(|| ApiError::Decode("body is not JSON".into()))?;
	serde_json::from_value(body).map_err(|e| ApiError::Decode(e.to_string()))
}

#[async_trait(?Send)]
impl GraphSource for HttpClient {
	async fn fetch_graph(&self) -> Result<GraphResponse, ApiError> {
		let mut graph: GraphResponse = self.get_json("/api/graph.json", "graph").await?;
		let dropped = retain_well_formed_edges(&mut graph);
		if dropped > 0 {
			warn!("dropped {} edges with malformed destinations", dropped);
		}
		Ok(graph)
	}

	async fn fetch_node(&self, id: &str) -> Result<NodeResponse, ApiError> {
		self.get_json(&format!("/api/node/{}.json", id), id).await
	}
}
