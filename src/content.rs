//! Turning a node's raw source into the HTML shown in the details panel.

use crate::api::{NodeResponse, asset_url};
use crate::style::Theme;

/// Produces the details-panel body for a node.
pub trait BodyRenderer {
	/// HTML body of `node`, styled for `theme`.
	fn render_body(&self, theme: Theme, node: &NodeResponse) -> String;
}

/// Shows the raw source as escaped preformatted text, inlining
/// `[[file:...]]` image links as `<img>` tags served by the asset endpoint.
#[derive(Clone, Debug, Default)]
pub struct PreformattedBody {
	api_base: String,
}

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "svg", "webp"];

impl PreformattedBody {
	/// Renderer resolving asset links against `api_base`.
	pub fn new(api_base: impl Into<String>) -> Self {
		Self {
			api_base: api_base.into(),
		}
	}

	/// Render the link written as `[[inner]]`. Anything but an image link
	/// stays as its original text.
	fn link(&self, node_id: &str, inner: &str) -> String {
		let target = inner.split("][").next().unwrap_or(inner);
		let image = target.strip_prefix("file:").filter(|path| {
			path.rsplit_once('.')
				.is_some_and(|(_, ext)| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
		});
		let Some(path) = image else {
			return escape(&format!("[[{}]]", inner));
		};
		format!(
			"<img src=\"{}\" alt=\"{}\">",
			escape(&asset_url(&self.api_base, node_id, path)),
			escape(path)
		)
	}
}

impl BodyRenderer for PreformattedBody {
	fn render_body(&self, theme: Theme, node: &NodeResponse) -> String {
		let mut out = format!("<pre class=\"node-body\" data-theme=\"{}\">", theme);
		let mut rest = node.raw.as_str();
		while let Some(start) = rest.find("[[") {
			let Some(len) = rest[start + 2..].find("]]") else {
				break;
			};
			out.push_str(&escape(&rest[..start]));
			// an image replaces its [[target][desc]] description
			let inner = &rest[start + 2..start + 2 + len];
			out.push_str(&self.link(&node.id, inner));
			rest = &rest[start + 2 + len + 2..];
		}
		out.push_str(&escape(rest));
		out.push_str("</pre>");
		out
	}
}

/// Minimal HTML escaping for text and attribute values.
pub fn escape(text: &str) -> String {
	let mut out = String::with_capacity(text.len());
	for c in text.chars() {
		match c {
			'&' => out.push_str("&amp;"),
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			'"' => out.push_str("&quot;"),
			'\'' => out.push_str("&#39;"),
			_ => out.push(c),
		}
	}
	out
}

#[cfg(test)]
mod tests {
	use super::*;

	fn node(raw: &str) -> NodeResponse {
		NodeResponse {
			id: "n1".into(),
			title: "Note".into(),
			raw: raw.into(),
			backlinks: vec![],
		}
	}

	#[test]
	fn escapes_markup() {
		let html = PreformattedBody::default().render_body(Theme::Light, &node("a <b> & \"c\""));
		assert_eq!(
			html,
			"<pre class=\"node-body\" data-theme=\"light\">a &lt;b&gt; &amp; &quot;c&quot;</pre>"
		);
	}

	#[test]
	fn image_links_become_assets() {
		let html = PreformattedBody::new("http://host").render_body(Theme::Dark, &node("see [[file:img/plot.png]] here"));
		assert!(html.contains("data-theme=\"dark\""));
		assert!(html.contains("<img src=\"http://host/api/node/n1/"));
		assert!(html.ends_with(" here</pre>"));
	}

	#[test]
	fn other_links_stay_text() {
		let html = PreformattedBody::default().render_body(Theme::Light, &node("[[id:abc][Other]] and [[file:notes.org]]"));
		assert!(html.contains("[[id:abc][Other]]"));
		assert!(html.contains("[[file:notes.org]]"));
		assert!(!html.contains("<img"));
	}

	#[test]
	fn link_descriptions_survive() {
		let html = PreformattedBody::default().render_body(
			Theme::Light,
			&node("[[file:notes.org][My <notes>]] then [[file:a.png][caption]]"),
		);
		assert!(html.contains("[[file:notes.org][My &lt;notes&gt;]]"));
		assert!(html.contains("<img src="));
		assert!(!html.contains("caption"));
	}

	#[test]
	fn unterminated_link_is_plain_text() {
		let html = PreformattedBody::default().render_body(Theme::Light, &node("open [[file:x.png"));
		assert!(html.contains("open [[file:x.png"));
	}
}
