use std::str::FromStr;

use leptos::prelude::*;

use super::Ui;
use crate::graph::types::{LayoutName, RendererKind};
use crate::state::{Action, StatePatch};
use crate::style::Theme;

fn set(ui: Ui, patch: StatePatch) {
	ui.dispatch(Action::SetState(patch));
}

/// `<select>` over every value of `T`, dispatching the chosen one.
fn choice<T>(
	ui: Ui,
	label: &'static str,
	all: &'static [T],
	current: impl Fn(&crate::state::UiState) -> T + Copy + Send + Sync + 'static,
	patch: impl Fn(T) -> StatePatch + Copy + Send + Sync + 'static,
) -> impl IntoView
where
	T: Copy + PartialEq + ToString + FromStr + Send + Sync + 'static,
{
	let options = all
		.iter()
		.map(|value| {
			let value = *value;
			view! {
				<option value=value.to_string() selected=move || ui.state.with(current) == value>
					{value.to_string()}
				</option>
			}
		})
		.collect_view();

	view! {
		<label>
			{label}
			<select on:change=move |ev| {
				if let Ok(value) = event_target_value(&ev).parse::<T>() {
					set(ui, patch(value));
				}
			}>{options}</select>
		</label>
	}
}

/// View preferences: theme, renderer, layout and node styling.
#[component]
pub fn SettingsPanel(ui: Ui) -> impl IntoView {
	let node_size = move || ui.state.with(|s| s.node_size).to_string();
	let label_scale = move || ui.state.with(|s| s.label_scale).to_string();
	let show_labels = move || ui.state.with(|s| s.show_labels);

	view! {
		<aside class="settings-panel">
			<h2>"Settings"</h2>
			{choice(ui, "Theme", Theme::all(), |s| s.theme, |theme| StatePatch {
				theme: Some(theme),
				..StatePatch::default()
			})}
			{choice(ui, "Renderer", RendererKind::all(), |s| s.renderer, |renderer| StatePatch {
				renderer: Some(renderer),
				..StatePatch::default()
			})}
			{choice(ui, "Layout", LayoutName::all(), |s| s.layout, |layout| StatePatch {
				layout: Some(layout),
				..StatePatch::default()
			})}
			<label>
				"Node size"
				<input
					type="range"
					min="1"
					max="40"
					step="1"
					prop:value=node_size
					on:input=move |ev| {
						if let Ok(size) = event_target_value(&ev).parse() {
							set(ui, StatePatch { node_size: Some(size), ..StatePatch::default() });
						}
					}
				/>
			</label>
			<label>
				"Label scale"
				<input
					type="range"
					min="0.5"
					max="3"
					step="0.1"
					prop:value=label_scale
					on:input=move |ev| {
						if let Ok(scale) = event_target_value(&ev).parse() {
							set(ui, StatePatch { label_scale: Some(scale), ..StatePatch::default() });
						}
					}
				/>
			</label>
			<label>
				<input
					type="checkbox"
					prop:checked=show_labels
					on:change=move |ev| {
						set(ui, StatePatch { show_labels: Some(event_target_checked(&ev)), ..StatePatch::default() });
					}
				/>
				"Show labels"
			</label>
		</aside>
	}
}
