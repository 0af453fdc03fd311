//! Theme palettes, deterministic node colors and CSS variable lookup.

mod color;

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use color::{parse_rgb, with_alpha};

const LIGHT_NODES: &[&str] = &[
	"#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
	"#bcbd22", "#17becf",
];

const DARK_NODES: &[&str] = &[
	"#6cb4f0", "#ffae5c", "#6fd36f", "#ff7b7c", "#c3a6e6", "#c59a8e", "#f5a8dc", "#bdbdbd",
	"#e0e25a", "#5fe1f0",
];

/// Number of palette slots exposed as `--graph-node-{i}` CSS variables.
pub const PALETTE_SIZE: usize = 10;

/// Color theme of the page and graph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
	/// Light background, dark labels.
	#[default]
	Light,
	/// Dark background, light labels.
	Dark,
}

impl Theme {
	/// Value written to the document's `data-theme` attribute.
	pub fn as_str(self) -> &'static str {
		match self {
			Theme::Light => "light",
			Theme::Dark => "dark",
		}
	}

	/// All selectable themes.
	pub fn all() -> &'static [Theme] {
		&[Theme::Light, Theme::Dark]
	}

	fn builtin_nodes(self) -> &'static [&'static str] {
		match self {
			Theme::Light => LIGHT_NODES,
			Theme::Dark => DARK_NODES,
		}
	}
}

impl fmt::Display for Theme {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Theme {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"light" => Ok(Theme::Light),
			"dark" => Ok(Theme::Dark),
			_ => Err(()),
		}
	}
}

/// Source of computed CSS custom properties.
pub trait CssVars {
	/// Resolved value of a custom property such as `--graph-edge`, if set.
	fn var(&self, name: &str) -> Option<String>;
}

/// Resolver with no stylesheet behind it; every lookup falls back to built-ins.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoCss;

impl CssVars for NoCss {
	fn var(&self, _name: &str) -> Option<String> {
		None
	}
}

/// Reads custom properties from the document element's computed style.
#[derive(Clone, Copy, Debug, Default)]
pub struct DocumentCss;

impl CssVars for DocumentCss {
	fn var(&self, name: &str) -> Option<String> {
		let window = web_sys::window()?;
		let root = window.document()?.document_element()?;
		let style = window.get_computed_style(&root).ok()??;
		let value = style.get_property_value(name).ok()?;
		let value = value.trim();
		(!value.is_empty()).then(|| value.to_string())
	}
}

/// Colors used to draw one graph snapshot.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
	/// Canvas fill.
	pub background: String,
	/// Label text.
	pub label: String,
	/// Default link stroke.
	pub edge: String,
	/// Node fills indexed by [`node_color_slot`].
	pub nodes: Vec<String>,
}

impl Palette {
	/// Resolve the palette for `theme`, preferring CSS variables when present.
	pub fn resolve(theme: Theme, css: &dyn CssVars) -> Self {
		let (background, label, edge) = match theme {
			Theme::Light => ("#ffffff", "#222222", "#b0b0b0"),
			Theme::Dark => ("#1a1a2e", "#e6e6e6", "#4a5068"),
		};
		let lookup = |name: &str, fallback: &str| resolve_var(css, name, fallback);
		let nodes = theme
			.builtin_nodes()
			.iter()
			.enumerate()
			.map(|(i, fallback)| lookup(&format!("--graph-node-{}", i), fallback))
			.collect();
		Self {
			background: lookup("--graph-background", background),
			label: lookup("--graph-label", label),
			edge: lookup("--graph-edge", edge),
			nodes,
		}
	}

	/// Fill color for the node with `id`.
	pub fn node_color(&self, id: &str) -> String {
		self.nodes[node_color_slot(id) % self.nodes.len()].clone()
	}
}

/// Resolve a CSS variable, falling back when it is unset.
///
/// Values of the form `var(--name)` are followed one level.
pub fn resolve_var(css: &dyn CssVars, name: &str, fallback: &str) -> String {
	let Some(value) = css.var(name) else {
		return fallback.to_string();
	};
	match value
		.strip_prefix("var(")
		.and_then(|rest| rest.strip_suffix(')'))
	{
		Some(inner) => css.var(inner.trim()).unwrap_or_else(|| fallback.to_string()),
		None => value,
	}
}

/// Stable palette slot for a node id.
pub fn node_color_slot(id: &str) -> usize {
	let mut hasher = DefaultHasher::new();
	id.hash(&mut hasher);
	(hasher.finish() % PALETTE_SIZE as u64) as usize
}

/// Stable pseudo-random pair in `[-1, 1]` derived from `id`.
pub fn stable_pair(id: &str) -> (f64, f64) {
	let mut hasher = DefaultHasher::new();
	id.hash(&mut hasher);
	let hash = hasher.finish();

	let x = (hash & 0xffff_ffff) as f64 / u32::MAX as f64;
	let y = ((hash >> 32) & 0xffff_ffff) as f64 / u32::MAX as f64;
	((x * 2.0) - 1.0, (y * 2.0) - 1.0)
}

#[cfg(test)]
mod tests {
	use std::collections::HashMap;

	use super::*;

	struct MapCss(HashMap<&'static str, &'static str>);

	impl CssVars for MapCss {
		fn var(&self, name: &str) -> Option<String> {
			self.0.get(name).map(|v| v.to_string())
		}
	}

	#[test]
	fn node_colors_are_deterministic() {
		let palette = Palette::resolve(Theme::Light, &NoCss);
		assert_eq!(palette.node_color("abc"), palette.node_color("abc"));
		assert!(LIGHT_NODES.contains(&palette.node_color("abc").as_str()));
	}

	#[test]
	fn css_variables_override_builtins() {
		let css = MapCss(HashMap::from([
			("--graph-edge", "#123456"),
			("--graph-label", "var(--fg)"),
			("--fg", "#abcdef"),
		]));
		let palette = Palette::resolve(Theme::Dark, &css);
		assert_eq!(palette.edge, "#123456");
		assert_eq!(palette.label, "#abcdef");
		assert_eq!(palette.background, "#1a1a2e");
	}

	#[test]
	fn dangling_var_reference_falls_back() {
		let css = MapCss(HashMap::from([("--graph-edge", "var(--missing)")]));
		assert_eq!(resolve_var(&css, "--graph-edge", "#000"), "#000");
	}

	#[test]
	fn theme_round_trips_through_str() {
		for theme in Theme::all() {
			assert_eq!(theme.as_str().parse::<Theme>(), Ok(*theme));
		}
	}

	#[test]
	fn stable_pair_in_range() {
		let (x, y) = stable_pair("node");
		assert!((-1.0..=1.0).contains(&x) && (-1.0..=1.0).contains(&y));
		assert_eq!(stable_pair("node"), stable_pair("node"));
	}
}
