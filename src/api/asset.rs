use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use thiserror::Error;

/// Asset path segment that could not be decoded.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssetPathError {
	/// The stem was not URL-safe base64.
	#[error("invalid base64 in asset path: {0}")]
	Base64(String),
	/// The stem decoded to bytes that are not UTF-8.
	#[error("asset path is not valid UTF-8")]
	Utf8,
}

/// Encode a file name as `{base64url(stem)}{.ext}`.
///
/// The extension stays readable so the backend can pick a content type. A
/// leading dot does not start an extension.
pub fn encode_asset_path(file_name: &str) -> String {
	match file_name.rfind('.') {
		Some(dot) if dot > 0 => {
			let (stem, ext) = file_name.split_at(dot);
			format!("{}{}", URL_SAFE_NO_PAD.encode(stem), ext)
		}
		_ => URL_SAFE_NO_PAD.encode(file_name),
	}
}

/// Inverse of [`encode_asset_path`].
pub fn decode_asset_path(encoded: &str) -> Result<String, AssetPathError> {
	// '.' is outside the base64url alphabet, so the first one ends the stem
	let (stem, ext) = match encoded.find('.') {
		Some(dot) => encoded.split_at(dot),
		None => (encoded, ""),
	};
	let bytes = URL_SAFE_NO_PAD
		.decode(stem)
		.map_err(|e| AssetPathError::Base64(e.to_string()))?;
	let stem = String::from_utf8(bytes).map_err(|_| AssetPathError::Utf8)?;
	Ok(format!("{}{}", stem, ext))
}

/// URL of a file attached to a node.
pub fn asset_url(api_base: &str, node_id: &str, file_name: &str) -> String {
	let base_name = file_name.rsplit('/').next().unwrap_or(file_name);
	format!(
		"{}/api/node/{}/{}",
		api_base.trim_end_matches('/'),
		node_id,
		encode_asset_path(base_name)
	)
}
