//! Decoder limits and defaults, loadable from YAML.
//!
//! ```yaml
//! max_pixels: 4194304
//! max_decoder_bytes: 67108864
//! default_mime: image/png
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
	fs::File,
	io::{BufReader, Read},
	path::Path,
};

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DecodeConfig {
	/// Largest accepted `width * height` of a decoded image. Bigger images are reported as out of memory
	/// before the output buffer is allocated.
	pub max_pixels: u64,

	/// Memory limit handed to the PNG and JPEG decoders for their working state.
	pub max_decoder_bytes: usize,

	/// Mime type assumed for `data:` references that do not declare one.
	pub default_mime: String,
}

impl Default for DecodeConfig {
	fn default() -> Self {
		Self {
			max_pixels: 16384 * 16384,
			max_decoder_bytes: 512 * 1024 * 1024,
			default_mime: String::from("image/png"),
		}
	}
}

impl DecodeConfig {
	pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
		Ok(serde_yaml_ng::from_reader(reader)?)
	}

	pub fn from_string(text: &str) -> Result<Self> {
		// an empty document deserializes to unit, not to an empty map
		if text.trim().is_empty() {
			return Ok(Self::default());
		}
		Ok(serde_yaml_ng::from_str(text)?)
	}

	pub fn from_path(path: &Path) -> Result<Self> {
		let file = File::open(path).with_context(|| format!("opening decode config {}", path.display()))?;
		Self::from_reader(BufReader::new(file)).with_context(|| format!("parsing decode config {}", path.display()))
	}
}
