use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::graph::types::{GraphConfig, LayoutName, RendererKind};
use crate::style::Theme;

/// The persisted projection of the UI state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
	/// Active theme.
	pub theme: Theme,
	/// Engine family.
	pub renderer: RendererKind,
	/// Constraint-layout layout.
	pub layout: LayoutName,
	/// Node size.
	pub node_size: f64,
	/// Label font multiplier.
	pub label_scale: f64,
	/// Whether labels are drawn.
	pub show_labels: bool,
}

impl Default for Preferences {
	fn default() -> Self {
		let config = GraphConfig::default();
		Self {
			theme: Theme::default(),
			renderer: config.renderer,
			layout: config.layout,
			node_size: config.node_size,
			label_scale: config.label_scale,
			show_labels: config.show_labels,
		}
	}
}

fn merge_field<T: DeserializeOwned>(object: &Map<String, Value>, key: &str, slot: &mut T) {
	let Some(value) = object.get(key) else {
		return;
	};
	match T::deserialize(value) {
		Ok(parsed) => *slot = parsed,
		Err(e) => warn!("ignoring persisted {}: {}", key, e),
	}
}

impl Preferences {
	/// Parse a stored entry, merging each recognised field over the defaults.
	///
	/// Malformed JSON or fields of the wrong type fall back to defaults.
	pub fn from_json(text: &str) -> Self {
		let mut prefs = Self::default();
		let value: Value = match serde_json::from_str(text) {
			Ok(value) => value,
			Err(e) => {
				warn!("persisted preferences are not valid JSON: {}", e);
				return prefs;
			}
		};
		let Some(object) = value.as_object() else {
			warn!("persisted preferences are not an object");
			return prefs;
		};
		merge_field(object, "theme", &mut prefs.theme);
		merge_field(object, "renderer", &mut prefs.renderer);
		merge_field(object, "layout", &mut prefs.layout);
		merge_field(object, "nodeSize", &mut prefs.node_size);
		merge_field(object, "labelScale", &mut prefs.label_scale);
		merge_field(object, "showLabels", &mut prefs.show_labels);
		prefs
	}

	/// Serialize as the stored JSON object.
	pub fn to_json(&self) -> String {
		// plain struct of scalars and unit enums; serialization cannot fail
		serde_json::to_string(self).unwrap_or_default()
	}

	/// Read the entry under `key`, or defaults when there is none.
	pub fn load(store: &dyn PreferenceStore, key: &str) -> Self {
		store
			.get(key)
			.map(|text| Self::from_json(&text))
			.unwrap_or_default()
	}

	/// Write under `key`, logging failures.
	pub fn save(&self, store: &dyn PreferenceStore, key: &str) {
		store.set(key, &self.to_json());
	}

	/// The graph view configuration these preferences describe.
	pub fn graph_config(&self) -> GraphConfig {
		GraphConfig {
			renderer: self.renderer,
			layout: self.layout,
			node_size: self.node_size,
			label_scale: self.label_scale,
			show_labels: self.show_labels,
		}
	}
}

/// Durable string key-value storage.
pub trait PreferenceStore {
	/// Value under `key`, if any.
	fn get(&self, key: &str) -> Option<String>;
	/// Store `value` under `key`.
	fn set(&self, key: &str, value: &str);
}

/// The browser's `localStorage`.
#[derive(Clone, Copy, Debug, Default)]
pub struct WebStorage;

impl WebStorage {
	fn storage() -> Option<web_sys::Storage> {
		web_sys::window()?.local_storage().ok()?
	}
}

impl PreferenceStore for WebStorage {
	fn get(&self, key: &str) -> Option<String> {
		Self::storage()?.get_item(key).ok()?
	}

	fn set(&self, key: &str, value: &str) {
		let Some(storage) = Self::storage() else {
			warn!("localStorage unavailable; preferences not saved");
			return;
		};
		if storage.set_item(key, value).is_err() {
			warn!("failed to write {} to localStorage", key);
		}
	}
}

/// In-memory storage; clones share the same map.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(Rc<RefCell<HashMap<String, String>>>);

impl PreferenceStore for MemoryStore {
	fn get(&self, key: &str) -> Option<String> {
		self.0.borrow().get(key).cloned()
	}

	fn set(&self, key: &str, value: &str) {
		self.0.borrow_mut().insert(key.to_string(), value.to_string());
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn missing_entry_gives_defaults() {
		assert_eq!(Preferences::load(&MemoryStore::default(), "k"), Preferences::default());
	}

	#[test]
	fn malformed_entry_gives_defaults() {
		assert_eq!(Preferences::from_json("{not json"), Preferences::default());
		assert_eq!(Preferences::from_json("[1, 2]"), Preferences::default());
	}

	#[test]
	fn partial_entry_merges_over_defaults() {
		let prefs = Preferences::from_json(r#"{"theme":"dark","nodeSize":"huge","renderer":"force-3d","extra":1}"#);
		assert_eq!(prefs.theme, Theme::Dark);
		assert_eq!(prefs.renderer, RendererKind::Force3D);
		assert_eq!(prefs.node_size, 10.0);
		assert_eq!(prefs.layout, LayoutName::Cose);
	}

	#[test]
	fn saved_entry_has_exactly_the_projection() {
		let store = MemoryStore::default();
		Preferences::default().save(&store, "k");
		let value: Value = serde_json::from_str(&store.get("k").unwrap()).unwrap();
		let mut keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
		keys.sort_unstable();
		assert_eq!(
			keys,
			vec!["labelScale", "layout", "nodeSize", "renderer", "showLabels", "theme"]
		);
		assert_eq!(Preferences::load(&store, "k"), Preferences::default());
	}
}
