//! Turning an image reference into pixels.
//!
//! A reference is either an inline `data:` URI carrying a base64 payload, or anything else, which is
//! handed to a [`ResourceResolver`]. Inline references without a `base64,` marker are not an error;
//! they are resolved as external references like any other string.

mod data_uri;
mod external;

pub use data_uri::DataUri;
pub use external::{FileResolver, ResourceHandle, ResourceResolver};

use crate::{DecodeConfig, FormatDispatcher, ImageError, ImageFormat, PixelBuffer, base64::decode_lenient};
use std::fmt::Debug;

/// Where the encoded image bytes of a reference come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
	/// Payload of a `data:` reference, already base64-decoded.
	Inline { bytes: Vec<u8>, mime: String },
	External(ResourceHandle),
}

/// Something that can turn a reference into a decoded image.
pub trait ImageLoader {
	fn load(&self, reference: &str) -> Result<PixelBuffer, ImageError>;
}

pub struct ImageResourceResolver {
	external: Box<dyn ResourceResolver>,
	dispatcher: FormatDispatcher,
}

impl ImageResourceResolver {
	pub fn new(external: impl ResourceResolver + 'static, config: DecodeConfig) -> Self {
		Self::with_dispatcher(external, FormatDispatcher::new(config))
	}

	pub fn with_dispatcher(external: impl ResourceResolver + 'static, dispatcher: FormatDispatcher) -> Self {
		Self {
			external: Box::new(external),
			dispatcher,
		}
	}

	pub fn dispatcher(&self) -> &FormatDispatcher {
		&self.dispatcher
	}

	/// Classifies `reference` and fetches the encoded bytes or a handle to them.
	pub fn resolve(&self, reference: &str) -> Result<ImageSource, ImageError> {
		if let Some(uri) = DataUri::parse(reference) {
			let mime = uri.mime.unwrap_or(&self.dispatcher.config().default_mime).to_string();
			let bytes = decode_lenient(uri.payload.as_bytes());
			if bytes.is_empty() {
				return Err(ImageError::parse(format!("invalid or empty base64 payload in {mime} data URI")));
			}
			log::debug!("inline {mime} image, {} bytes", bytes.len());
			return Ok(ImageSource::Inline { bytes, mime });
		}

		if reference.starts_with("data:") {
			log::warn!("data URI without base64 payload, resolving it as an external reference");
		}
		self.external.resolve(reference).map(ImageSource::External)
	}

	/// Resolves and decodes `reference`.
	pub fn decode(&self, reference: &str) -> Result<PixelBuffer, ImageError> {
		match self.resolve(reference)? {
			ImageSource::Inline { bytes, mime } => self.dispatcher.decode_bytes(&bytes, ImageFormat::from_mime(&mime)),
			ImageSource::External(handle) => self.dispatcher.decode_resource(&handle, None),
		}
	}
}

impl ImageLoader for ImageResourceResolver {
	fn load(&self, reference: &str) -> Result<PixelBuffer, ImageError> {
		self.decode(reference)
	}
}

impl Default for ImageResourceResolver {
	fn default() -> Self {
		Self::new(FileResolver::new(), DecodeConfig::default())
	}
}

impl Debug for ImageResourceResolver {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ImageResourceResolver")
			.field("dispatcher", &self.dispatcher)
			.finish_non_exhaustive()
	}
}
