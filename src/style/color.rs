//! CSS color string helpers used when dimming graph elements.

/// Parse a CSS color into `(r, g, b)` channels.
///
/// Accepts `#rrggbb`, `#rgb`, `rgb(r, g, b)` and `rgba(r, g, b, a)`. Anything
/// else yields `None`.
pub fn parse_rgb(color: &str) -> Option<(u8, u8, u8)> {
	let color = color.trim();
	if let Some(hex) = color.strip_prefix('#') {
		return parse_hex(hex);
	}
	let inner = color
		.strip_prefix("rgba(")
		.or_else(|| color.strip_prefix("rgb("))?
		.strip_suffix(')')?;
	let mut channels = inner.split(',').map(|c| c.trim().parse::<u8>());
	let (r, g, b) = (channels.next()?, channels.next()?, channels.next()?);
	Some((r.ok()?, g.ok()?, b.ok()?))
}

fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
	if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
		return None;
	}
	let expanded: String = match hex.len() {
		6 => hex.to_string(),
		3 => hex.chars().flat_map(|c| [c, c]).collect(),
		_ => return None,
	};
	let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).ok();
	Some((channel(0)?, channel(2)?, channel(4)?))
}

/// Re-express `color` as `rgba(...)` with the given alpha.
///
/// Unparseable colors are returned unchanged.
pub fn with_alpha(color: &str, alpha: f64) -> String {
	match parse_rgb(color) {
		Some((r, g, b)) => format!("rgba({}, {}, {}, {})", r, g, b, alpha),
		None => color.to_string(),
	}
}
