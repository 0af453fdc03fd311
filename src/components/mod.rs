//! UI building blocks around the graph.

mod details;
mod graph_view;
mod settings;

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::error;

pub use details::DetailsPanel;
pub use graph_view::GraphView;
pub use settings::SettingsPanel;

use crate::api::HttpClient;
use crate::graph::GraphManager;
use crate::state::{Action, DocumentTheme, Store, UiState, WebStorage};

/// The page's graph manager, owned by the reactive tree.
pub type GraphHandle = StoredValue<GraphManager<HttpClient>, LocalStorage>;

/// Open `id` in the details panel.
pub fn open_node(graph: GraphHandle, id: String) {
	let Some(manager) = graph.try_get_value() else {
		return;
	};
	spawn_local(async move {
		if let Err(e) = manager.open_node(&id).await {
			error!("cannot open node {}: {}", id, e);
		}
	});
}

/// Reactive view of the UI store.
#[derive(Clone, Copy)]
pub struct Ui {
	/// Current UI state.
	pub state: ReadSignal<UiState>,
	set_state: WriteSignal<UiState>,
	store: StoredValue<Store<WebStorage, DocumentTheme>>,
}

impl Ui {
	/// Load persisted preferences under `key`.
	pub fn load(key: &str) -> Self {
		let store = Store::load(WebStorage, DocumentTheme, key);
		let (state, set_state) = signal(store.state().clone());
		Self {
			state,
			set_state,
			store: StoredValue::new(store),
		}
	}

	/// Run `action` through the store and publish the result.
	pub fn dispatch(&self, action: Action) {
		if let Some(next) = self.store.try_update_value(|s| s.dispatch(action).clone()) {
			self.set_state.set(next);
		}
	}
}
