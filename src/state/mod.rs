//! UI state: a pure reducer plus the persisting, theme-syncing store around it.

mod persist;
mod store;

pub use persist::{MemoryStore, PreferenceStore, Preferences, WebStorage};
pub use store::{DocumentTheme, Store, ThemeSink};

use crate::api::Backlink;
use crate::graph::types::{LayoutName, RendererKind};
use crate::style::Theme;

/// A node opened in the details panel.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeDetail {
	/// Node UUID.
	pub id: String,
	/// Display title.
	pub title: String,
	/// Unrendered Org source.
	pub raw: String,
	/// HTML produced by the body renderer.
	pub body: String,
	/// Nodes linking here.
	pub backlinks: Vec<Backlink>,
}

/// Everything the UI shows besides the graph itself.
#[derive(Clone, Debug, PartialEq)]
pub struct UiState {
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
	/// Whether the settings panel is shown.
	pub settings_open: bool,
	/// Whether the details panel is shown.
	pub details_open: bool,
	/// The open node, kept after the panel closes.
	pub selected: Option<NodeDetail>,
}

impl Default for UiState {
	fn default() -> Self {
		Self::from_preferences(Preferences::default())
	}
}

impl UiState {
	/// Fresh session state seeded from persisted preferences.
	pub fn from_preferences(prefs: Preferences) -> Self {
		Self {
			theme: prefs.theme,
			renderer: prefs.renderer,
			layout: prefs.layout,
			node_size: prefs.node_size,
			label_scale: prefs.label_scale,
			show_labels: prefs.show_labels,
			settings_open: false,
			details_open: false,
			selected: None,
		}
	}

	/// The fields that outlive the session.
	pub fn preferences(&self) -> Preferences {
		Preferences {
			theme: self.theme,
			renderer: self.renderer,
			layout: self.layout,
			node_size: self.node_size,
			label_scale: self.label_scale,
			show_labels: self.show_labels,
		}
	}
}

/// Partial update merged by [`Action::SetState`]; `None` fields are kept.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatePatch {
	/// Active theme.
	pub theme: Option<Theme>,
	/// Engine family.
	pub renderer: Option<RendererKind>,
	/// Constraint-layout layout.
	pub layout: Option<LayoutName>,
	/// Node size.
	pub node_size: Option<f64>,
	/// Label font multiplier.
	pub label_scale: Option<f64>,
	/// Whether labels are drawn.
	pub show_labels: Option<bool>,
	/// Settings panel visibility.
	pub settings_open: Option<bool>,
	/// Details panel visibility.
	pub details_open: Option<bool>,
	/// Node to show.
	pub selected: Option<NodeDetail>,
}

/// Transitions of [`UiState`].
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
	/// Show or hide the settings panel.
	ToggleSettings,
	/// Show the details panel.
	OpenDetails,
	/// Hide the details panel.
	CloseDetails,
	/// Show or hide the details panel.
	ToggleDetails,
	/// Merge the patch into the state.
	SetState(StatePatch),
}

/// Next state for `action`. No side effects.
pub fn reduce(state: &UiState, action: Action) -> UiState {
	let mut next = state.clone();
	match action {
		Action::ToggleSettings => next.settings_open = !state.settings_open,
		Action::OpenDetails => next.details_open = true,
		Action::CloseDetails => next.details_open = false,
		Action::ToggleDetails => next.details_open = !state.details_open,
		Action::SetState(patch) => {
			macro_rules! merge {
				($($field:ident),*) => {
					$(if let Some(value) = patch.$field {
						next.$field = value;
					})*
				};
			}
			merge!(theme, renderer, layout, node_size, label_scale, show_labels, settings_open, details_open);
			if let Some(detail) = patch.selected {
				next.selected = Some(detail);
			}
		}
	}
	next
}
