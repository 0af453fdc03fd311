use log::debug;

use super::persist::{PreferenceStore, Preferences};
use super::{Action, UiState, reduce};
use crate::style::Theme;

/// Where the active theme is reflected outside the state itself.
pub trait ThemeSink {
	/// Reflect `theme`.
	fn apply(&self, theme: Theme);
}

/// Sets `data-theme` on the document element.
#[derive(Clone, Copy, Debug, Default)]
pub struct DocumentTheme;

impl ThemeSink for DocumentTheme {
	fn apply(&self, theme: Theme) {
		let root = web_sys::window()
			.and_then(|w| w.document())
			.and_then(|d| d.document_element());
		if let Some(root) = root {
			let _ = root.set_attribute("data-theme", theme.as_str());
		}
	}
}

/// Runs the reducer, then persists and syncs the theme after every transition.
pub struct Store<P, T> {
	state: UiState,
	prefs: P,
	theme: T,
	key: String,
}

impl<P: PreferenceStore, T: ThemeSink> Store<P, T> {
	/// Seed state from the entry under `key` and apply its theme.
	pub fn load(prefs: P, theme: T, key: impl Into<String>) -> Self {
		let key = key.into();
		let state = UiState::from_preferences(Preferences::load(&prefs, &key));
		theme.apply(state.theme);
		Self {
			state,
			prefs,
			theme,
			key,
		}
	}

	/// Current state.
	pub fn state(&self) -> &UiState {
		&self.state
	}

	/// Apply `action`, persist preferences and sync the theme.
	pub fn dispatch(&mut self, action: Action) -> &UiState {
		debug!("dispatch {:?}", action);
		let next = reduce(&self.state, action);
		next.preferences().save(&self.prefs, &self.key);
		if next.theme != self.state.theme {
			self.theme.apply(next.theme);
		}
		self.state = next;
		&self.state
	}
}
