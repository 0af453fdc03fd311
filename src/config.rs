//! Application-level settings resolved at startup.

/// Build-time override of the API origin.
const API_BASE_OVERRIDE: Option<&str> = option_env!("ORG_GRAPH_API_BASE");

/// Key of the single persisted preferences entry.
pub const STORAGE_KEY: &str = "org-graph-canvas:ui";

/// Where the app talks to and what it persists under.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
	/// Origin of the backend API, without a trailing slash.
	pub api_base: String,
	/// `localStorage` key of the persisted preferences.
	pub storage_key: String,
}

impl AppConfig {
	/// The build-time override if set, else the page origin.
	pub fn from_env() -> Self {
		let api_base = API_BASE_OVERRIDE
			.map(str::to_string)
			.or_else(page_origin)
			.unwrap_or_default();
		Self::with_base(api_base)
	}

	/// Configuration pointing at `api_base`.
	pub fn with_base(api_base: impl Into<String>) -> Self {
		Self {
			api_base: api_base.into().trim_end_matches('/').to_string(),
			storage_key: STORAGE_KEY.to_string(),
		}
	}
}

fn page_origin() -> Option<String> {
	web_sys::window()?.location().origin().ok()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn base_loses_trailing_slash() {
		let config = AppConfig::with_base("http://localhost:5174/");
		assert_eq!(config.api_base, "http://localhost:5174");
		assert_eq!(config.storage_key, STORAGE_KEY);
	}
}
