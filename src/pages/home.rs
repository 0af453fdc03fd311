use leptos::prelude::*;
use leptos::task::spawn_local;
use log::error;

use crate::api::HttpClient;
use crate::components::{DetailsPanel, GraphView, SettingsPanel, Ui};
use crate::config::AppConfig;
use crate::content::PreformattedBody;
use crate::graph::GraphManager;
use crate::state::{Action, StatePatch};
use crate::style::DocumentCss;

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let app = AppConfig::from_env();
	let ui = Ui::load(&app.storage_key);
	let prefs = ui.state.with_untracked(|s| s.preferences());

	let manager = GraphManager::new(
		HttpClient::new(app.api_base.clone()),
		PreformattedBody::new(app.api_base),
		DocumentCss,
		prefs.graph_config(),
		prefs.theme,
	);
	manager.open_on_click(|task| spawn_local(task));
	manager.on_select(move |detail| {
		ui.dispatch(Action::SetState(StatePatch {
			selected: Some(detail),
			details_open: Some(true),
			..StatePatch::default()
		}));
	});
	let graph = StoredValue::new_local(manager);

	// push preference changes into the graph
	let preferences = Memo::new(move |_| ui.state.with(|s| s.preferences()));
	Effect::new(move |_| {
		let prefs = preferences.get();
		let Some(manager) = graph.try_get_value() else {
			return;
		};
		spawn_local(async move {
			if let Err(e) = manager.apply_preferences(prefs.graph_config(), prefs.theme).await {
				error!("cannot apply preferences: {}", e);
			}
		});
	});

	// closing the details panel drops the highlight
	let details_open = Memo::new(move |_| ui.state.with(|s| s.details_open));
	Effect::new(move |was_open: Option<bool>| {
		let open = details_open.get();
		if was_open == Some(true) && !open {
			graph.with_value(|m| m.clear_highlight());
		}
		open
	});

	let settings_open = move || ui.state.with(|s| s.settings_open);

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-graph">
				<GraphView graph=graph />
				<div class="graph-overlay">
					<h1>"Knowledge Graph"</h1>
					<button on:click=move |_| ui.dispatch(Action::ToggleSettings)>"Settings"</button>
					<button on:click=move |_| ui.dispatch(Action::ToggleDetails)>"Details"</button>
				</div>
				<Show when=settings_open>
					<SettingsPanel ui=ui />
				</Show>
				<DetailsPanel ui=ui graph=graph />
			</div>
		</ErrorBoundary>
	}
}
