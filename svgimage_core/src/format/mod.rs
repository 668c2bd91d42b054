//! Raster codecs and the dispatcher that picks between them.
//!
//! Each codec module exposes a `decode` function that first sniffs its signature and then
//! normalizes the image into a [`PixelBuffer`](crate::PixelBuffer). The `dispatch` module tries
//! the codecs in order and turns their outcomes into a single result.

mod dispatch;
mod jpeg;
mod png;

pub use dispatch::FormatDispatcher;
pub(crate) use dispatch::{DecodeAttempt, FormatDecoder};
pub use jpeg::START_OF_IMAGE;
pub use png::SIGNATURE as PNG_SIGNATURE;

#[cfg(test)]
pub(crate) use dispatch::tests::counting_dispatcher;

use std::fmt::{Display, Formatter};

/// The raster formats the pipeline can decode.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ImageFormat {
	Png,
	Jpeg,
}

impl ImageFormat {
	/// Order in which codecs are probed when nothing better is known. PNG goes first since its
	/// 8-byte signature is cheap to verify.
	pub const PROBE_ORDER: [ImageFormat; 2] = [ImageFormat::Png, ImageFormat::Jpeg];

	/// Maps a mime type onto a supported format, ignoring case and parameters.
	///
	/// ```
	/// use svgimage_core::ImageFormat;
	/// assert_eq!(ImageFormat::from_mime("image/PNG"), Some(ImageFormat::Png));
	/// assert_eq!(ImageFormat::from_mime("image/jpg"), Some(ImageFormat::Jpeg));
	/// assert_eq!(ImageFormat::from_mime("image/gif"), None);
	/// ```
	pub fn from_mime(mime: &str) -> Option<Self> {
		let essence = mime.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
		match essence.as_str() {
			"image/png" | "image/x-png" => Some(ImageFormat::Png),
			"image/jpeg" | "image/jpg" | "image/pjpeg" => Some(ImageFormat::Jpeg),
			_ => None,
		}
	}

	pub fn as_mime(&self) -> &'static str {
		match self {
			ImageFormat::Png => "image/png",
			ImageFormat::Jpeg => "image/jpeg",
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			ImageFormat::Png => "png",
			ImageFormat::Jpeg => "jpeg",
		}
	}
}

impl Display for ImageFormat {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}
