pub mod convert;
pub mod probe;

use anyhow::{Context, Result};
use std::path::PathBuf;
use svgimage_core::{DecodeConfig, FileResolver, ImageResourceResolver, PixelBuffer};

/// Options shared by every subcommand that decodes a reference.
#[derive(clap::Args, Debug)]
pub struct DecodeOptions {
	/// directory that relative references are resolved against
	#[arg(long, value_name = "DIR", display_order = 1)]
	base_dir: Option<PathBuf>,

	/// YAML file with decoder limits and defaults
	#[arg(long, value_name = "FILE", display_order = 1)]
	config: Option<PathBuf>,
}

impl DecodeOptions {
	fn resolver(&self) -> Result<ImageResourceResolver> {
		let config = match &self.config {
			Some(path) => DecodeConfig::from_path(path)?,
			None => DecodeConfig::default(),
		};
		log::debug!("decode config: {config:?}");

		let files = match &self.base_dir {
			Some(dir) => FileResolver::with_base_dir(dir),
			None => FileResolver::new(),
		};
		Ok(ImageResourceResolver::new(files, config))
	}

	pub fn decode(&self, reference: &str) -> Result<PixelBuffer> {
		let pixels = self
			.resolver()?
			.decode(reference)
			.with_context(|| format!("decoding image {:?}", abbreviate(reference)))?;
		Ok(pixels)
	}
}

/// Shortens inline payloads for messages.
fn abbreviate(reference: &str) -> String {
	const MAX: usize = 64;
	match reference.char_indices().nth(MAX) {
		Some((end, _)) => format!("{}...", &reference[..end]),
		None => reference.to_string(),
	}
}
